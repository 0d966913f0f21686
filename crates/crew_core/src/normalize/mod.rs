//! Reduces a loosely shaped research result to [`CanonicalRecord`]s.
//!
//! Accepted inputs:
//! - an object whose `result` field is a string holding (possibly fenced) JSON,
//! - a bare string holding (possibly fenced) JSON,
//! - an already structured `company -> position -> person data` mapping.
//!
//! Normalization is total: malformed input yields an empty list.

mod fence;
mod payload;

use serde_json::Value;

use crew_logging::{crew_debug, crew_warn};

use crate::{CanonicalRecord, Interview, UNKNOWN_PLACEHOLDER};
pub use fence::{strip_json_fence, JSON_FENCE_CLOSE, JSON_FENCE_OPEN};
use payload::{ArticleRef, LinkRef, PersonData, ResearchPayload};

/// Normalizes a raw `result` value from a completed job.
pub fn normalize_result(raw: &Value) -> Vec<CanonicalRecord> {
    match raw {
        Value::String(text) => normalize_text(text),
        Value::Object(object) => match object.get("result") {
            Some(Value::String(text)) => normalize_text(text),
            _ => extract(&ResearchPayload::from_value(raw)),
        },
        Value::Null => Vec::new(),
        _ => {
            crew_debug!("Unsupported result payload type; no records extracted");
            Vec::new()
        }
    }
}

/// Normalizes a JSON document given as text, optionally wrapped in a
/// markdown JSON fence.
pub fn normalize_text(text: &str) -> Vec<CanonicalRecord> {
    match serde_json::from_str::<Value>(strip_json_fence(text)) {
        Ok(value) => extract(&ResearchPayload::from_value(&value)),
        Err(err) => {
            crew_warn!("Failed to parse research result ({} bytes): {}", text.len(), err);
            Vec::new()
        }
    }
}

fn extract(payload: &ResearchPayload) -> Vec<CanonicalRecord> {
    payload
        .companies
        .iter()
        .flat_map(|company| {
            company.positions.iter().flat_map(move |position| {
                position
                    .holders
                    .people()
                    .iter()
                    .map(move |person| to_record(&company.company, &position.position, person))
            })
        })
        .collect()
}

fn to_record(company: &str, position: &str, person: &PersonData) -> CanonicalRecord {
    CanonicalRecord {
        company: company.to_string(),
        position: position.to_string(),
        person_name: person
            .name
            .clone()
            .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string()),
        articles: person.articles.iter().map(article_text).collect(),
        interviews: person.interviews.iter().map(to_interview).collect(),
    }
}

fn article_text(article: &ArticleRef) -> String {
    match article {
        ArticleRef::Plain(text) => text.clone(),
        ArticleRef::Link(link) => link
            .url
            .as_ref()
            .or(link.title.as_ref())
            .cloned()
            .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string()),
        ArticleRef::Unrecognized => UNKNOWN_PLACEHOLDER.to_string(),
    }
}

fn to_interview(link: &LinkRef) -> Interview {
    Interview {
        url: link.url.clone().unwrap_or_default(),
        title: link
            .title
            .clone()
            .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string()),
    }
}
