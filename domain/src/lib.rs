use chrono::{DateTime, Utc}; // Document timestamps
use serde::{Deserialize, Serialize}; // For JSON input/output of documents & requests
use std::fmt;
use thiserror::Error; // For domain-specific errors

// --- Domain Errors ---
#[derive(Error, Debug, PartialEq)]
pub enum DomainError {
    #[error("Missing required field '{0}'")]
    MissingField(String),
}

// --- Document ID ---
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
impl From<DocumentId> for String {
    fn from(doc_id: DocumentId) -> Self {
        doc_id.0
    }
}
impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Author ---

/// The author a document is attributed to. Owned by the caller, copied into each document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub name: String,
}

impl Author {
    /// Creates an author, rejecting an empty id (author ids are what searches filter on).
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self, DomainError> {
        let author = Self {
            id: id.into(),
            name: name.into(),
        };
        author.validate()?;
        Ok(author)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::MissingField("author.id".to_string()));
        }
        Ok(())
    }
}

// --- Document ---

/// A stored document. `id` and `created` stay unset until the document is first saved.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub title: String,
    pub content: String,
    pub author: Author,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl Document {
    /// Creates an unsaved document (no id, no creation time).
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: Author) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            author,
            created: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<DocumentId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Checks the invariants a document must hold before it can be stored.
    /// Documents built through `Author::new` always pass; deserialized ones may not.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.author.validate()
    }

    /// The assigned id, treating an empty id the same as none.
    pub fn assigned_id(&self) -> Option<&DocumentId> {
        self.id.as_ref().filter(|id| !id.is_empty())
    }
}

// --- Search Request ---

/// Filter specification for a search. Every field is optional; a missing field
/// (or an empty list) places no constraint on its dimension.
/// Populated dimensions are combined with AND, list entries within one dimension with OR.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub title_prefixes: Option<Vec<String>>,
    #[serde(default)]
    pub contains_contents: Option<Vec<String>>,
    #[serde(default)]
    pub author_ids: Option<Vec<String>>,
    #[serde(default)]
    pub created_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_to: Option<DateTime<Utc>>,
}

impl SearchRequest {
    /// A request without constraints; matches every document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.title_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn contains_contents<I, S>(mut self, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contains_contents = Some(contents.into_iter().map(Into::into).collect());
        self
    }

    pub fn author_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.author_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn created_from(mut self, from: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self
    }

    pub fn created_to(mut self, to: DateTime<Utc>) -> Self {
        self.created_to = Some(to);
        self
    }

    /// True when `created_from` lies after `created_to`, so nothing can match.
    pub fn has_inverted_range(&self) -> bool {
        matches!((self.created_from, self.created_to), (Some(from), Some(to)) if from > to)
    }

    /// Checks a single document against every populated dimension of the request.
    pub fn matches(&self, doc: &Document) -> bool {
        any_or_unconstrained(&self.title_prefixes, |prefix| {
            doc.title.starts_with(prefix)
        }) && any_or_unconstrained(&self.contains_contents, |needle| {
            doc.content.contains(needle)
        }) && any_or_unconstrained(&self.author_ids, |id| doc.author.id == *id)
            && self.matches_created(doc.created)
    }

    // Both bounds are inclusive. A document that was never saved has no
    // creation time and cannot satisfy a bound.
    fn matches_created(&self, created: Option<DateTime<Utc>>) -> bool {
        if self.created_from.is_none() && self.created_to.is_none() {
            return true;
        }
        let Some(created) = created else {
            return false;
        };
        self.created_from.is_none_or(|from| created >= from)
            && self.created_to.is_none_or(|to| created <= to)
    }
}

/// Absent and empty lists both mean "no constraint".
fn any_or_unconstrained(values: &Option<Vec<String>>, predicate: impl Fn(&str) -> bool) -> bool {
    match values {
        Some(values) if !values.is_empty() => values.iter().any(|v| predicate(v)),
        _ => true,
    }
}
