use serde::{Deserialize, Serialize};

/// Placeholder used wherever a person name, article, or interview title is
/// missing from the research payload.
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

/// One (company, position, person) combination with its collected links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub company: String,
    pub position: String,
    pub person_name: String,
    pub articles: Vec<String>,
    pub interviews: Vec<Interview>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub url: String,
    pub title: String,
}
