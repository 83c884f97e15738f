//! Ranking orchestration: dense embeddings first, TF-IDF when they are
//! unavailable.

use crate::config::{MatchOptions, MatcherConfig};
use crate::dense::rank_dense;
use crate::lexical::{rank_lexical, rank_lexical_for_record};
use crate::provider::{ProviderHandle, ProviderLoader};
use crate::result::{MatchResponse, Provenance, SimilarityResult};
use scholarlink_core::graph::DEFAULT_THRESHOLD;
use scholarlink_core::vector::abs_sum;
use scholarlink_core::{
    analyze_topics, clean_text, EmbeddingLayout, Error, FacultyId, FacultyRecord, Graph,
    GraphBuilder, RecordFilter, Result, TopicReport,
};
use scholarlink_storage::FacultyStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Why a call is served by the lexical path
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    NotRequested,
    FetchFailed(String),
    NoEmbeddedCandidates,
    ProbeFailed(String),
    DenseFailed(String),
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::NotRequested => write!(f, "dense ranking not requested"),
            FallbackReason::FetchFailed(e) => write!(f, "candidate fetch failed: {}", e),
            FallbackReason::NoEmbeddedCandidates => write!(f, "no candidate carries an embedding"),
            FallbackReason::ProbeFailed(e) => write!(f, "provider probe failed: {}", e),
            FallbackReason::DenseFailed(e) => write!(f, "dense ranking failed: {}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Dense,
    Lexical(FallbackReason),
}

pub struct Matcher {
    store: Arc<dyn FacultyStore>,
    provider: ProviderHandle,
    config: MatcherConfig,
    layout: EmbeddingLayout,
}

impl Matcher {
    pub fn new(
        store: Arc<dyn FacultyStore>,
        loader: Arc<dyn ProviderLoader>,
        config: MatcherConfig,
    ) -> Result<Self> {
        config.validate()?;
        let layout = config.layout()?;
        let provider = ProviderHandle::new(loader, config.provider_timeout());
        Ok(Self {
            store,
            provider,
            config,
            layout,
        })
    }

    #[inline]
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    #[inline]
    pub fn layout(&self) -> &EmbeddingLayout {
        &self.layout
    }

    #[inline]
    pub fn provider(&self) -> &ProviderHandle {
        &self.provider
    }

    /// Rank faculty similar to a stored record.
    ///
    /// An unknown `target_id` is the only error; provider, embedding and
    /// storage problems downgrade the call to the lexical path.
    pub async fn match_by_record(
        &self,
        target_id: &FacultyId,
        options: &MatchOptions,
    ) -> Result<MatchResponse> {
        let Some(target) = self.lookup_target(target_id).await? else {
            return Ok(MatchResponse::new(Provenance::Lexical, Vec::new()));
        };

        let (candidates, route) = self.candidates_and_route(options).await;
        let candidates: Vec<FacultyRecord> =
            candidates.into_iter().filter(|r| r.id != target.id).collect();

        let route = match route {
            Route::Dense => match self.dense_for_record(&target, &candidates, options).await {
                Ok(results) => return Ok(MatchResponse::new(Provenance::Dense, results)),
                Err(reason) => Route::Lexical(reason),
            },
            lexical => lexical,
        };
        debug!("Faculty {} matched lexically: {:?}", target.id, route);

        let results = rank_lexical_for_record(
            &target,
            &candidates,
            options.min_similarity,
            options.max_results,
        );
        Ok(MatchResponse::new(Provenance::Lexical, results))
    }

    /// Rank faculty against free text
    pub async fn match_by_query(&self, text: &str, options: &MatchOptions) -> Result<MatchResponse> {
        let (candidates, route) = self.candidates_and_route(options).await;

        let route = match route {
            Route::Dense => match self.dense_for_query(text, &candidates, options).await {
                Ok(results) => return Ok(MatchResponse::new(Provenance::Dense, results)),
                Err(reason) => Route::Lexical(reason),
            },
            lexical => lexical,
        };
        debug!("Query matched lexically: {:?}", route);

        let results = rank_lexical(text, &candidates, options.min_similarity, options.max_results);
        Ok(MatchResponse::new(Provenance::Lexical, results))
    }

    /// Similarity graph over the filtered records carrying embeddings
    pub async fn build_graph(
        &self,
        filter: &RecordFilter,
        threshold: Option<f32>,
        max_connections: Option<usize>,
    ) -> Result<Graph> {
        let records = self.store.query(filter).await?;
        let builder = GraphBuilder::new(self.layout)
            .threshold(threshold.unwrap_or(DEFAULT_THRESHOLD))
            .max_connections(max_connections.unwrap_or(self.config.default_max_connections));

        let (graph, malformed) = builder.build(&records);
        for id in &malformed {
            warn!("Faculty {} left out of the graph: embedding is not {} long", id, self.layout.storage_dim());
        }
        debug!(
            "Graph built: {} nodes, {} edges, {} clusters",
            graph.nodes.len(),
            graph.edges.len(),
            graph.clusters.len()
        );
        Ok(graph)
    }

    pub async fn analyze_topics(&self, filter: &RecordFilter, num_topics: usize) -> Result<TopicReport> {
        let records = self.store.query(filter).await?;
        Ok(analyze_topics(&records, num_topics))
    }

    /// Compute a storage-length embedding for a record. Provider failures
    /// are returned to the caller.
    pub async fn embed_record(&self, record: &FacultyRecord) -> Result<Vec<f32>> {
        let native = self.embed_text(record.research_text().unwrap_or("")).await?;
        self.layout.pad_to_storage(&native)
    }

    /// Resolve the target record, trying the store twice.
    ///
    /// `Ok(None)` means the store could not answer at all; an id the store
    /// does not know is `NotFound`.
    async fn lookup_target(&self, target_id: &FacultyId) -> Result<Option<FacultyRecord>> {
        let found = match self.store.get_by_id(target_id).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Lookup of faculty {} failed, retrying: {}", target_id, e);
                match self.store.get_by_id(target_id).await {
                    Ok(found) => found,
                    Err(e) => {
                        warn!("Lookup of faculty {} failed again, no candidates: {}", target_id, e);
                        return Ok(None);
                    }
                }
            }
        };
        found.map(Some).ok_or_else(|| Error::NotFound(target_id.clone()))
    }

    /// Fetch the filtered candidates and decide the route. A failed fetch
    /// goes lexical over a second fetch, or over nothing if that fails too.
    async fn candidates_and_route(&self, options: &MatchOptions) -> (Vec<FacultyRecord>, Route) {
        let filter = options.filter();
        match self.store.query(&filter).await {
            Ok(candidates) => {
                let route = self.route(options, &candidates).await;
                (candidates, route)
            }
            Err(e) => {
                warn!("Candidate fetch failed, falling back to lexical ranking: {}", e);
                let candidates = match self.store.query(&filter).await {
                    Ok(candidates) => candidates,
                    Err(e) => {
                        warn!("Candidate fetch failed again: {}", e);
                        Vec::new()
                    }
                };
                (candidates, Route::Lexical(FallbackReason::FetchFailed(e.to_string())))
            }
        }
    }

    async fn route(&self, options: &MatchOptions, candidates: &[FacultyRecord]) -> Route {
        if !options.prefer_dense {
            return Route::Lexical(FallbackReason::NotRequested);
        }
        if !candidates.iter().any(FacultyRecord::has_embedding) {
            return Route::Lexical(FallbackReason::NoEmbeddedCandidates);
        }
        match self.probe().await {
            Ok(()) => Route::Dense,
            Err(e) => {
                warn!("Falling back to lexical ranking: {}", e);
                Route::Lexical(FallbackReason::ProbeFailed(e.to_string()))
            }
        }
    }

    /// Embed the probe phrase and check the output carries signal
    async fn probe(&self) -> Result<()> {
        let vector = self.provider.embed(&self.config.probe_phrase).await?;
        if vector.len() != self.layout.native_dim() {
            return Err(Error::DimensionMismatch {
                expected: self.layout.native_dim(),
                actual: vector.len(),
            });
        }
        if abs_sum(&vector) == 0.0 {
            return Err(Error::ProviderUnavailable("probe produced an all-zero vector".into()));
        }
        Ok(())
    }

    /// Native-length embedding of cleaned text; text that cleans to nothing
    /// maps to the zero vector without a provider call.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return Ok(self.layout.zero_native());
        }
        let vector = self.provider.embed(&cleaned).await?;
        if vector.len() != self.layout.native_dim() {
            return Err(Error::DimensionMismatch {
                expected: self.layout.native_dim(),
                actual: vector.len(),
            });
        }
        Ok(vector)
    }

    async fn target_embedding(&self, target: &FacultyRecord) -> Result<Vec<f32>> {
        if let Some(stored) = target.embedding.as_deref() {
            match self.layout.extract_native(stored) {
                Ok(native) => return Ok(native.to_vec()),
                Err(e) => warn!("Stored embedding of faculty {} unusable, recomputing: {}", target.id, e),
            }
        }
        self.embed_text(target.research_text().unwrap_or("")).await
    }

    async fn dense_for_record(
        &self,
        target: &FacultyRecord,
        candidates: &[FacultyRecord],
        options: &MatchOptions,
    ) -> std::result::Result<Vec<SimilarityResult>, FallbackReason> {
        let query = self
            .target_embedding(target)
            .await
            .map_err(|e| FallbackReason::DenseFailed(e.to_string()))?;
        self.rank(&query, candidates, options)
    }

    async fn dense_for_query(
        &self,
        text: &str,
        candidates: &[FacultyRecord],
        options: &MatchOptions,
    ) -> std::result::Result<Vec<SimilarityResult>, FallbackReason> {
        let query = self
            .embed_text(text)
            .await
            .map_err(|e| FallbackReason::DenseFailed(e.to_string()))?;
        self.rank(&query, candidates, options)
    }

    fn rank(
        &self,
        query: &[f32],
        candidates: &[FacultyRecord],
        options: &MatchOptions,
    ) -> std::result::Result<Vec<SimilarityResult>, FallbackReason> {
        rank_dense(
            &self.layout,
            query,
            candidates,
            options.min_similarity,
            options.max_results,
        )
        .ok_or(FallbackReason::NoEmbeddedCandidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{EmbeddingProvider, ReadyLoader};
    use async_trait::async_trait;
    use scholarlink_storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const AXES: [&[&str]; 3] = [&["neural"], &["learning"], &["cooking", "recipes"]];

    /// One axis per topic group plus a catch-all, so expected cosines are exact
    struct AxisProvider {
        calls: AtomicUsize,
    }

    impl AxisProvider {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0) }
        }

        fn encode(text: &str) -> Vec<f32> {
            let mut v = vec![0.0; 4];
            for word in text.split_whitespace() {
                match AXES.iter().position(|group| group.contains(&word)) {
                    Some(axis) => v[axis] += 1.0,
                    None if word == "probe" => v[3] += 1.0,
                    None => {}
                }
            }
            v
        }
    }

    #[async_trait]
    impl EmbeddingProvider for AxisProvider {
        fn dimension(&self) -> usize {
            4
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Self::encode(text))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl EmbeddingProvider for FailingProvider {
        fn dimension(&self) -> usize {
            4
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(Error::ProviderUnavailable("connection refused".into()))
        }
    }

    struct ZeroProvider;

    #[async_trait]
    impl EmbeddingProvider for ZeroProvider {
        fn dimension(&self) -> usize {
            4
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0; 4])
        }
    }

    struct StalledProvider;

    #[async_trait]
    impl EmbeddingProvider for StalledProvider {
        fn dimension(&self) -> usize {
            4
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(vec![1.0; 4])
        }
    }

    struct HangingLoader;

    #[async_trait]
    impl ProviderLoader for HangingLoader {
        async fn load(&self) -> Result<Arc<dyn EmbeddingProvider>> {
            std::future::pending().await
        }
    }

    /// Fails the first `failures` calls, then serves from `inner`
    struct FlakyStore {
        inner: MemoryStore,
        failures: AtomicUsize,
    }

    impl FlakyStore {
        fn new(inner: MemoryStore, failures: usize) -> Self {
            Self {
                inner,
                failures: AtomicUsize::new(failures),
            }
        }

        fn check(&self) -> Result<()> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(Error::Storage("database offline".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl FacultyStore for FlakyStore {
        async fn query(&self, filter: &RecordFilter) -> Result<Vec<FacultyRecord>> {
            self.check()?;
            self.inner.query(filter).await
        }

        async fn get_by_id(&self, id: &FacultyId) -> Result<Option<FacultyRecord>> {
            self.check()?;
            self.inner.get_by_id(id).await
        }
    }

    fn config() -> MatcherConfig {
        MatcherConfig {
            native_dim: 4,
            storage_dim: 6,
            probe_phrase: "probe".to_string(),
            provider_timeout_ms: 100,
            ..Default::default()
        }
    }

    fn record(id: u64, name: &str, department: &str, keywords: &str) -> FacultyRecord {
        let native = AxisProvider::encode(&clean_text(keywords));
        let layout = config().layout().unwrap();
        FacultyRecord::new(id, name)
            .with_school("Engineering")
            .with_department(department)
            .with_keywords(keywords)
            .with_embedding(layout.pad_to_storage(&native).unwrap())
    }

    fn store() -> MemoryStore {
        MemoryStore::from_records(vec![
            record(1, "A", "CS", "machine learning, neural networks"),
            record(2, "B", "CS", "deep learning, neural networks"),
            record(3, "C", "Culinary", "cooking, recipes"),
        ])
    }

    fn matcher_with(store: MemoryStore, provider: Arc<dyn EmbeddingProvider>) -> Matcher {
        Matcher::new(Arc::new(store), Arc::new(ReadyLoader(provider)), config()).unwrap()
    }

    fn names(response: &MatchResponse) -> Vec<&str> {
        response.results.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_query_dense_path() {
        let matcher = matcher_with(store(), Arc::new(AxisProvider::new()));
        let response = matcher
            .match_by_query("neural networks", &MatchOptions::default())
            .await
            .unwrap();

        assert_eq!(response.provenance, Provenance::Dense);
        assert_eq!(names(&response), vec!["A", "B"]);
        assert!((response.results[0].score - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_failing_provider_matches_lexical_path() {
        let store = store();
        let records = store.records();
        let matcher = matcher_with(store, Arc::new(FailingProvider));
        let options = MatchOptions::default();

        let response = matcher.match_by_query("neural networks", &options).await.unwrap();
        assert_eq!(response.provenance, Provenance::Lexical);
        assert_eq!(
            response.results,
            rank_lexical("neural networks", &records, options.min_similarity, options.max_results)
        );
        assert_eq!(names(&response), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_zero_probe_falls_back() {
        let matcher = matcher_with(store(), Arc::new(ZeroProvider));
        let response = matcher
            .match_by_query("neural networks", &MatchOptions::default())
            .await
            .unwrap();
        assert_eq!(response.provenance, Provenance::Lexical);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_provider_falls_back() {
        let matcher = matcher_with(store(), Arc::new(StalledProvider));
        let response = matcher
            .match_by_record(&FacultyId::Integer(1), &MatchOptions::default())
            .await
            .unwrap();

        assert_eq!(response.provenance, Provenance::Lexical);
        assert_eq!(names(&response), vec!["B"]);
    }

    #[tokio::test]
    async fn test_record_dense_uses_stored_embedding() {
        let provider = Arc::new(AxisProvider::new());
        let matcher = matcher_with(store(), provider.clone());
        let response = matcher
            .match_by_record(&FacultyId::Integer(1), &MatchOptions::default())
            .await
            .unwrap();

        assert_eq!(response.provenance, Provenance::Dense);
        assert_eq!(names(&response), vec!["B"]);
        assert!((response.results[0].score - 1.0).abs() < 1e-5);
        // only the probe reached the provider
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_record_dense_computes_missing_target_embedding() {
        let store = store();
        store.upsert(FacultyRecord::new(9u64, "D").with_keywords("Recipes"));
        let provider = Arc::new(AxisProvider::new());
        let matcher = matcher_with(store, provider.clone());

        let response = matcher
            .match_by_record(&FacultyId::Integer(9), &MatchOptions::default())
            .await
            .unwrap();
        assert_eq!(response.provenance, Provenance::Dense);
        assert_eq!(names(&response), vec!["C"]);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unknown_target_is_not_found() {
        let matcher = matcher_with(store(), Arc::new(AxisProvider::new()));
        let options = MatchOptions::default().lexical_only();
        let err = matcher
            .match_by_record(&FacultyId::from("nobody"), &options)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unreachable_store_answers_lexically() {
        let provider = Arc::new(AxisProvider::new());
        let matcher = Matcher::new(
            Arc::new(FlakyStore::new(store(), usize::MAX)),
            Arc::new(ReadyLoader(provider.clone())),
            config(),
        )
        .unwrap();

        let response = matcher
            .match_by_query("neural networks", &MatchOptions::default())
            .await
            .unwrap();
        assert_eq!(response.provenance, Provenance::Lexical);
        assert!(response.is_empty());

        let response = matcher
            .match_by_record(&FacultyId::Integer(1), &MatchOptions::default())
            .await
            .unwrap();
        assert_eq!(response.provenance, Provenance::Lexical);
        assert!(response.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retried_for_lexical_path() {
        let store = store();
        let records = store.records();
        let provider = Arc::new(AxisProvider::new());
        let matcher = Matcher::new(
            Arc::new(FlakyStore::new(store, 1)),
            Arc::new(ReadyLoader(provider.clone())),
            config(),
        )
        .unwrap();
        let options = MatchOptions::default();

        let response = matcher.match_by_query("neural networks", &options).await.unwrap();
        assert_eq!(response.provenance, Provenance::Lexical);
        assert_eq!(
            response.results,
            rank_lexical("neural networks", &records, options.min_similarity, options.max_results)
        );
        assert_eq!(names(&response), vec!["A", "B"]);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_target_lookup_is_retried() {
        let matcher = Matcher::new(
            Arc::new(FlakyStore::new(store(), 1)),
            Arc::new(ReadyLoader(Arc::new(AxisProvider::new()))),
            config(),
        )
        .unwrap();

        let response = matcher
            .match_by_record(&FacultyId::Integer(1), &MatchOptions::default())
            .await
            .unwrap();
        assert_eq!(response.provenance, Provenance::Dense);
        assert_eq!(names(&response), vec!["B"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_loader_falls_back() {
        let matcher =
            Matcher::new(Arc::new(store()), Arc::new(HangingLoader), config()).unwrap();

        let response = tokio::time::timeout(
            Duration::from_secs(3600),
            matcher.match_by_query("neural networks", &MatchOptions::default()),
        )
        .await
        .expect("matching must not wait on a hanging provider load")
        .unwrap();

        assert_eq!(response.provenance, Provenance::Lexical);
        assert_eq!(names(&response), vec!["A", "B"]);
        assert!(!matcher.provider().is_loaded());
    }

    #[tokio::test]
    async fn test_empty_filtered_set() {
        let matcher = matcher_with(store(), Arc::new(AxisProvider::new()));
        let options = MatchOptions::default().with_department("Astronomy");
        let response = matcher.match_by_query("neural networks", &options).await.unwrap();

        assert!(response.is_empty());
        assert_eq!(response.provenance, Provenance::Lexical);
    }

    #[tokio::test]
    async fn test_filters_restrict_candidates() {
        let matcher = matcher_with(store(), Arc::new(AxisProvider::new()));
        let options = MatchOptions::default().with_department("Culinary").with_min_similarity(0.0);
        let response = matcher.match_by_query("neural networks", &options).await.unwrap();

        assert_eq!(names(&response), vec!["C"]);
    }

    #[tokio::test]
    async fn test_lexical_only_skips_provider() {
        let provider = Arc::new(AxisProvider::new());
        let matcher = matcher_with(store(), provider.clone());
        let response = matcher
            .match_by_query("neural networks", &MatchOptions::default().lexical_only())
            .await
            .unwrap();

        assert_eq!(response.provenance, Provenance::Lexical);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert!(!matcher.provider().is_loaded());
    }

    #[tokio::test]
    async fn test_embed_record() {
        let provider = Arc::new(AxisProvider::new());
        let matcher = matcher_with(store(), provider.clone());

        let padded = matcher
            .embed_record(&FacultyRecord::new(5u64, "E").with_keywords("Neural; Learning"))
            .await
            .unwrap();
        assert_eq!(padded, vec![1.0, 1.0, 0.0, 0.0, 0.0, 0.0]);

        let blank = matcher
            .embed_record(&FacultyRecord::new(6u64, "F").with_keywords("N/A"))
            .await
            .unwrap();
        assert_eq!(blank, vec![0.0; 6]);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        let failing = matcher_with(store(), Arc::new(FailingProvider));
        let err = failing
            .embed_record(&FacultyRecord::new(7u64, "G").with_keywords("robotics"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_build_graph_and_topics() {
        let matcher = matcher_with(store(), Arc::new(AxisProvider::new()));

        let graph = matcher.build_graph(&RecordFilter::all(), None, None).await.unwrap();
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.clusters.len(), 2);

        let report = matcher.analyze_topics(&RecordFilter::all(), 2).await.unwrap();
        assert_eq!(report.topics[0].keyword, "learning");
        assert_eq!(report.coverage, 3);
    }
}
