use serde::{Deserialize, Serialize};

/// Keyword values that mean "nothing declared" in imported directories
const KEYWORD_SENTINELS: &[&str] = &["n/a", "na", "none", "null", "-"];

/// Identifier of a faculty record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacultyId {
    Integer(u64),
    String(String),
}

impl std::fmt::Display for FacultyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacultyId::Integer(i) => write!(f, "{}", i),
            FacultyId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for FacultyId {
    fn from(s: String) -> Self {
        FacultyId::String(s)
    }
}

impl From<&str> for FacultyId {
    fn from(s: &str) -> Self {
        FacultyId::String(s.to_string())
    }
}

impl From<u64> for FacultyId {
    fn from(i: u64) -> Self {
        FacultyId::Integer(i)
    }
}

/// A researcher as stored by the directory.
///
/// The embedding, when present, is persisted at storage dimensionality and
/// must go through [`crate::EmbeddingLayout::extract_native`] before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacultyRecord {
    pub id: FacultyId,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl FacultyRecord {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<FacultyId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            title: String::new(),
            school: String::new(),
            department: String::new(),
            keywords: String::new(),
            embedding: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_school(mut self, school: impl Into<String>) -> Self {
        self.school = school.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Declared research text, or `None` when the keywords are blank or a
    /// placeholder such as "N/A".
    pub fn research_text(&self) -> Option<&str> {
        let trimmed = self.keywords.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lowered = trimmed.to_lowercase();
        if KEYWORD_SENTINELS.contains(&lowered.as_str()) {
            return None;
        }
        Some(trimmed)
    }

    #[inline]
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }
}

/// School/department restriction applied by the storage collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl RecordFilter {
    #[inline]
    #[must_use]
    pub fn new(school: Option<String>, department: Option<String>) -> Self {
        Self { school, department }
    }

    #[inline]
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, record: &FacultyRecord) -> bool {
        let school_ok = self
            .school
            .as_ref()
            .map(|s| *s == record.school)
            .unwrap_or(true);
        let department_ok = self
            .department
            .as_ref()
            .map(|d| *d == record.department)
            .unwrap_or(true);
        school_ok && department_ok
    }
}
