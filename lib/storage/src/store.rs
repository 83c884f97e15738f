use async_trait::async_trait;
use scholarlink_core::{FacultyId, FacultyRecord, RecordFilter, Result};

/// Read access to the faculty directory.
///
/// Implementations return records in a stable order; ranking ties keep that
/// order.
#[async_trait]
pub trait FacultyStore: Send + Sync {
    /// All records passing the filter
    async fn query(&self, filter: &RecordFilter) -> Result<Vec<FacultyRecord>>;

    /// A single record, or `None` when the id is unknown
    async fn get_by_id(&self, id: &FacultyId) -> Result<Option<FacultyRecord>>;
}
