//! # scholarlink Storage
//!
//! The storage collaborator seen by the matcher: a read-only
//! [`FacultyStore`] trait, an in-memory implementation, and JSON snapshots.

pub mod memory;
pub mod snapshot;
pub mod store;

pub use memory::MemoryStore;
pub use snapshot::{read_snapshot, write_snapshot, SnapshotData};
pub use store::FacultyStore;
