//! Validated, tagged view of a research payload.
//!
//! The raw JSON is walked exactly once here. Shapes that cannot hold research
//! data are dropped, so extraction never inspects JSON types itself.

use serde_json::{Map, Value};

use crew_logging::crew_debug;

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct ResearchPayload {
    pub companies: Vec<CompanyEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompanyEntry {
    pub company: String,
    pub positions: Vec<PositionEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PositionEntry {
    pub position: String,
    pub holders: PositionHolders,
}

/// People holding one position at one company.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PositionHolders {
    Single(PersonData),
    Many(Vec<PersonData>),
}

impl PositionHolders {
    pub fn people(&self) -> &[PersonData] {
        match self {
            PositionHolders::Single(person) => std::slice::from_ref(person),
            PositionHolders::Many(people) => people,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct PersonData {
    pub name: Option<String>,
    pub articles: Vec<ArticleRef>,
    pub interviews: Vec<LinkRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ArticleRef {
    Plain(String),
    Link(LinkRef),
    Unrecognized,
}

/// A `{url, title}` pair; empty strings are stored as `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct LinkRef {
    pub url: Option<String>,
    pub title: Option<String>,
}

impl ResearchPayload {
    pub fn from_value(value: &Value) -> Self {
        let Some(companies) = value.as_object() else {
            crew_debug!("Research payload is not an object; nothing to extract");
            return Self::default();
        };

        let companies = companies
            .iter()
            .filter_map(|(company, positions)| {
                let Some(positions) = positions.as_object() else {
                    crew_debug!("Skipping company {:?}: positions are not an object", company);
                    return None;
                };
                Some(CompanyEntry {
                    company: company.clone(),
                    positions: parse_positions(company, positions),
                })
            })
            .collect();

        Self { companies }
    }
}

fn parse_positions(company: &str, positions: &Map<String, Value>) -> Vec<PositionEntry> {
    positions
        .iter()
        .filter_map(|(position, holders)| {
            let holders = match holders {
                Value::Object(person) => PositionHolders::Single(PersonData::from_map(person)),
                Value::Array(people) => PositionHolders::Many(
                    people
                        .iter()
                        .filter_map(Value::as_object)
                        .map(PersonData::from_map)
                        .collect(),
                ),
                _ => {
                    crew_debug!(
                        "Skipping {:?} at {:?}: person data is neither object nor array",
                        position,
                        company
                    );
                    return None;
                }
            };
            Some(PositionEntry {
                position: position.clone(),
                holders,
            })
        })
        .collect()
}

impl PersonData {
    fn from_map(person: &Map<String, Value>) -> Self {
        Self {
            name: non_empty_str(person.get("name")),
            articles: list_field(person, "blog_articles")
                .map(ArticleRef::from_value)
                .collect(),
            interviews: list_field(person, "youtube_interviews")
                .map(LinkRef::from_value)
                .collect(),
        }
    }
}

impl ArticleRef {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(text) => ArticleRef::Plain(text.clone()),
            Value::Object(_) => ArticleRef::Link(LinkRef::from_value(value)),
            _ => ArticleRef::Unrecognized,
        }
    }
}

impl LinkRef {
    fn from_value(value: &Value) -> Self {
        Self {
            url: non_empty_str(value.get("url")),
            title: non_empty_str(value.get("title")),
        }
    }
}

/// Elements of an array field; anything else counts as an empty list.
fn list_field<'a>(
    object: &'a Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Value> + 'a {
    object
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
