//! Embedding provider seam and the shared, lazily loaded handle.

use async_trait::async_trait;
use scholarlink_core::vector::l2_normalize;
use scholarlink_core::{Error, Result};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Text encoder producing native-length vectors
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Output length of every vector this provider returns
    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Produces a provider; called at most once per successful load
#[async_trait]
pub trait ProviderLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn EmbeddingProvider>>;
}

/// Loader for a provider that is already constructed
pub struct ReadyLoader(pub Arc<dyn EmbeddingProvider>);

#[async_trait]
impl ProviderLoader for ReadyLoader {
    async fn load(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        Ok(self.0.clone())
    }
}

/// Shared provider slot owned by the matcher.
///
/// Concurrent first callers wait on one in-flight load. Loads and embed
/// calls are both bounded by the timeout. A failed or timed-out load leaves
/// the slot empty so the next call tries again.
pub struct ProviderHandle {
    loader: Arc<dyn ProviderLoader>,
    cell: OnceCell<Arc<dyn EmbeddingProvider>>,
    timeout: Duration,
}

impl ProviderHandle {
    pub fn new(loader: Arc<dyn ProviderLoader>, timeout: Duration) -> Self {
        Self {
            loader,
            cell: OnceCell::new(),
            timeout,
        }
    }

    pub fn from_provider(provider: Arc<dyn EmbeddingProvider>, timeout: Duration) -> Self {
        Self::new(Arc::new(ReadyLoader(provider)), timeout)
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn get(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        let provider = self
            .cell
            .get_or_try_init(|| async {
                match tokio::time::timeout(self.timeout, self.loader.load()).await {
                    Ok(Ok(provider)) => {
                        info!("Embedding provider loaded (dimension {})", provider.dimension());
                        Ok(provider)
                    }
                    Ok(Err(e)) => {
                        warn!("Embedding provider failed to load: {}", e);
                        Err(e)
                    }
                    Err(_) => {
                        warn!("Embedding provider did not load within {} ms", self.timeout.as_millis());
                        Err(Error::ProviderUnavailable(format!(
                            "load did not finish within {} ms",
                            self.timeout.as_millis()
                        )))
                    }
                }
            })
            .await?;
        Ok(provider.clone())
    }

    /// Embed one text, bounded by the configured timeout
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let provider = self.get().await?;
        match tokio::time::timeout(self.timeout, provider.embed(text)).await {
            Ok(result) => result,
            Err(_) => Err(Error::ProviderUnavailable(format!(
                "no response within {} ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

/// Deterministic feature-hashing encoder.
///
/// Words and character trigrams are hashed into buckets and the result is
/// L2-normalized. It needs no model files, so the CLI uses it when nothing
/// better is wired in.
#[derive(Debug, Clone)]
pub struct HashingProvider {
    dim: usize,
}

impl HashingProvider {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    pub fn encode(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        if self.dim == 0 {
            return vector;
        }
        let normalized = text.to_lowercase();

        for word in normalized.split_whitespace() {
            vector[bucket(word, self.dim)] += 2.0;

            let padded: Vec<char> = format!(" {} ", word).chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                vector[bucket(&trigram, self.dim)] += 1.0;
            }
        }

        l2_normalize(&mut vector);
        vector
    }
}

fn bucket(feature: &str, dim: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    feature.hash(&mut hasher);
    (hasher.finish() as usize) % dim
}

#[async_trait]
impl EmbeddingProvider for HashingProvider {
    fn dimension(&self) -> usize {
        self.dim
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.encode(text))
    }
}
