use crate::snapshot::{read_snapshot, write_snapshot};
use crate::store::FacultyStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use scholarlink_core::{Error, FacultyId, FacultyRecord, RecordFilter, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Default)]
struct Inner {
    records: Vec<FacultyRecord>,
    index: HashMap<FacultyId, usize>,
}

/// In-process faculty directory, kept in insertion order
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = FacultyRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.upsert(record);
        }
        store
    }

    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let records = read_snapshot(&path)?;
        let store = Self::from_records(records);
        info!("Snapshot loaded: {} faculty records", store.len());
        Ok(store)
    }

    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let records = self.records();
        write_snapshot(path, &records)
    }

    /// Insert or replace a record; replaced records keep their position
    pub fn upsert(&self, record: FacultyRecord) {
        let mut inner = self.inner.write();
        if let Some(&pos) = inner.index.get(&record.id) {
            warn!("Replacing faculty record {}", record.id);
            inner.records[pos] = record;
        } else {
            let pos = inner.records.len();
            inner.index.insert(record.id.clone(), pos);
            inner.records.push(record);
        }
    }

    /// Persist a computed embedding for an existing record
    pub fn set_embedding(&self, id: &FacultyId, embedding: Vec<f32>) -> Result<()> {
        let mut inner = self.inner.write();
        let pos = *inner
            .index
            .get(id)
            .ok_or_else(|| Error::NotFound(id.clone()))?;
        inner.records[pos].embedding = Some(embedding);
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> Vec<FacultyRecord> {
        self.inner.read().records.clone()
    }
}

#[async_trait]
impl FacultyStore for MemoryStore {
    async fn query(&self, filter: &RecordFilter) -> Result<Vec<FacultyRecord>> {
        let inner = self.inner.read();
        Ok(inner
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &FacultyId) -> Result<Option<FacultyRecord>> {
        let inner = self.inner.read();
        Ok(inner.index.get(id).map(|&pos| inner.records[pos].clone()))
    }
}
