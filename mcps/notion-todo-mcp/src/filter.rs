//! Filter builder
//!
//! Turns tag/priority/status criteria into Notion's filter tree. Databases in
//! the wild use either English or French tag names, so every tag criterion
//! matches all known spellings.

use serde_json::{json, Map, Value};

pub const TAGS_PROPERTY: &str = "Tags";
pub const STATUS_PROPERTY: &str = "Status";

/// Priority may live under either name depending on the database's language
pub const PRIORITY_PROPERTIES: [&str; 2] = ["Priority", "Priorité"];

/// Statuses hidden unless explicitly asked for
pub const TERMINAL_STATUSES: [&str; 2] = ["Done", "Killed"];

/// Canonical tag name paired with its French alias
pub const TAG_SYNONYMS: [(&str, &str); 7] = [
    ("Administrative", "Administratif"),
    ("Family", "Famille"),
    ("IT", "Informatique"),
    ("Productivity", "Productivité"),
    ("Project", "Projet"),
    ("Quick to finish", "Rapide à terminer"),
    ("Work", "Travaux"),
];

/// A leaf test on one property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    MultiSelectContains(String),
    SelectEquals(String),
    StatusEquals(String),
    StatusDoesNotEqual(String),
}

/// Boolean filter tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Property { property: String, condition: Condition },
}

impl Filter {
    pub fn property(property: &str, condition: Condition) -> Self {
        Filter::Property {
            property: property.to_string(),
            condition,
        }
    }

    /// Serialize to Notion's native filter JSON
    pub fn to_notion(&self) -> Value {
        match self {
            Filter::And(children) => {
                json!({ "and": children.iter().map(Filter::to_notion).collect::<Vec<_>>() })
            }
            Filter::Or(children) => {
                json!({ "or": children.iter().map(Filter::to_notion).collect::<Vec<_>>() })
            }
            Filter::Property {
                property,
                condition,
            } => {
                let (kind, op, value) = match condition {
                    Condition::MultiSelectContains(v) => ("multi_select", "contains", v),
                    Condition::SelectEquals(v) => ("select", "equals", v),
                    Condition::StatusEquals(v) => ("status", "equals", v),
                    Condition::StatusDoesNotEqual(v) => ("status", "does_not_equal", v),
                };
                let mut test = Map::new();
                test.insert(op.to_string(), json!(value));
                let mut leaf = Map::new();
                leaf.insert("property".to_string(), json!(property));
                leaf.insert(kind.to_string(), Value::Object(test));
                Value::Object(leaf)
            }
        }
    }

    /// Every value tested by a `MultiSelectContains` leaf, in tree order
    #[cfg(test)]
    fn tag_variants(&self) -> Vec<&str> {
        match self {
            Filter::And(children) | Filter::Or(children) => {
                children.iter().flat_map(Filter::tag_variants).collect()
            }
            Filter::Property {
                condition: Condition::MultiSelectContains(v),
                ..
            } => vec![v.as_str()],
            Filter::Property { .. } => vec![],
        }
    }
}

/// All accepted spellings of a tag, the given one first
///
/// Unknown tags come back alone; the store decides whether they match.
pub fn tag_synonyms(tag: &str) -> Vec<String> {
    let mut variants = vec![tag.to_string()];
    for (canonical, alias) in TAG_SYNONYMS {
        let other = if tag == canonical {
            alias
        } else if tag == alias {
            canonical
        } else {
            continue;
        };
        if !variants.iter().any(|v| v == other) {
            variants.push(other.to_string());
        }
    }
    variants
}

/// `Status != Done AND Status != Killed`, as separate AND branches
fn default_status_exclusion() -> Vec<Filter> {
    TERMINAL_STATUSES
        .iter()
        .map(|s| {
            Filter::property(
                STATUS_PROPERTY,
                Condition::StatusDoesNotEqual(s.to_string()),
            )
        })
        .collect()
}

fn tags_branch<S: AsRef<str>>(tags: &[S]) -> Filter {
    let mut variants: Vec<String> = Vec::new();
    for tag in tags {
        for variant in tag_synonyms(tag.as_ref()) {
            if !variants.contains(&variant) {
                variants.push(variant);
            }
        }
    }
    Filter::Or(
        variants
            .into_iter()
            .map(|v| Filter::property(TAGS_PROPERTY, Condition::MultiSelectContains(v)))
            .collect(),
    )
}

fn priorities_branch<S: AsRef<str>>(priorities: &[S]) -> Filter {
    Filter::Or(
        PRIORITY_PROPERTIES
            .iter()
            .flat_map(|property| {
                priorities.iter().map(move |p| {
                    Filter::property(property, Condition::SelectEquals(p.as_ref().to_string()))
                })
            })
            .collect(),
    )
}

fn statuses_branch<S: AsRef<str>>(statuses: &[S]) -> Filter {
    Filter::Or(
        statuses
            .iter()
            .map(|s| {
                Filter::property(
                    STATUS_PROPERTY,
                    Condition::StatusEquals(s.as_ref().to_string()),
                )
            })
            .collect(),
    )
}

/// Open tasks carrying `tag` under any of its spellings
pub fn by_tag(tag: &str) -> Filter {
    let mut branches = vec![tags_branch(&[tag])];
    branches.extend(default_status_exclusion());
    Filter::And(branches)
}

/// Open tasks whose priority is one of `priorities`
pub fn by_priority<S: AsRef<str>>(priorities: &[S]) -> Filter {
    let mut branches = vec![priorities_branch(priorities)];
    branches.extend(default_status_exclusion());
    Filter::And(branches)
}

/// AND of every supplied criterion
///
/// Supplying `statuses` replaces the default Done/Killed exclusion with an
/// exact match on those statuses. Empty slices count as not supplied.
pub fn combined(
    tags: Option<&[String]>,
    priorities: Option<&[String]>,
    statuses: Option<&[String]>,
) -> Filter {
    let mut branches = Vec::new();

    if let Some(tags) = tags.filter(|t| !t.is_empty()) {
        branches.push(tags_branch(tags));
    }
    if let Some(priorities) = priorities.filter(|p| !p.is_empty()) {
        branches.push(priorities_branch(priorities));
    }
    match statuses.filter(|s| !s.is_empty()) {
        Some(statuses) => branches.push(statuses_branch(statuses)),
        None => branches.extend(default_status_exclusion()),
    }

    Filter::And(branches)
}
