// JSON snapshots of a faculty directory
use anyhow::{Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use scholarlink_core::FacultyRecord;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// On-disk snapshot. Files holding a bare array of records are accepted too.
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotData {
    #[serde(default)]
    pub created_at: u64,
    pub records: Vec<FacultyRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Wrapped(SnapshotData),
    Bare(Vec<FacultyRecord>),
}

impl SnapshotData {
    pub fn new(records: Vec<FacultyRecord>) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self { created_at, records }
    }
}

pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<Vec<FacultyRecord>> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .with_context(|| format!("reading snapshot {:?}", path))?;
    let file: SnapshotFile = serde_json::from_slice(&data)
        .with_context(|| format!("parsing snapshot {:?}", path))?;

    Ok(match file {
        SnapshotFile::Wrapped(snapshot) => snapshot.records,
        SnapshotFile::Bare(records) => records,
    })
}

/// Write the snapshot through a temporary file and an atomic rename
pub fn write_snapshot<P: AsRef<Path>>(path: P, records: &[FacultyRecord]) -> Result<()> {
    let path = path.as_ref();
    let snapshot = SnapshotData::new(records.to_vec());
    let data = serde_json::to_vec_pretty(&snapshot)?;

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(&data))
        .with_context(|| format!("writing snapshot {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faculty.json");
        let records = vec![
            FacultyRecord::new(1u64, "Ada").with_keywords("analytical engines"),
            FacultyRecord::new("g-2", "Grace").with_embedding(vec![0.5, 0.0]),
        ];

        write_snapshot(&path, &records).unwrap();
        assert_eq!(read_snapshot(&path).unwrap(), records);
    }

    #[test]
    fn test_read_bare_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.json");
        std::fs::write(&path, r#"[{"id": 3, "name": "Alan", "department": "Math"}]"#).unwrap();

        let records = read_snapshot(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].department, "Math");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_snapshot(dir.path().join("absent.json")).is_err());
    }
}
