//! Persisted form documents.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BuilderError, BuilderResult, Tree};

/// Identifier of a saved form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(Uuid);

impl FormId {
    /// Generate a new random form ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a form ID from a string.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::NotFound`] if the string is not a valid UUID.
    pub fn parse(input: &str) -> BuilderResult<Self> {
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|_| BuilderError::NotFound(format!("form {input}")))
    }
}

impl Default for FormId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A saved form: its tree plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    /// Form identifier.
    pub id: FormId,
    /// Display name.
    pub name: String,
    /// Component tree, never holding a hint.
    pub tree: Tree,
    /// Last modification, in milliseconds since the Unix epoch.
    #[serde(default)]
    pub updated_at: u64,
}

impl FormDocument {
    /// Create an empty form.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_tree(FormId::new(), name, &Tree::new())
    }

    /// Build a document from an editor tree. The hint, if any, is dropped.
    #[must_use]
    pub fn from_tree(id: FormId, name: impl Into<String>, tree: &Tree) -> Self {
        Self {
            id,
            name: name.into(),
            tree: tree.without_hint(),
            updated_at: current_timestamp_ms(),
        }
    }

    /// Replace the tree and bump the modification time.
    pub fn set_tree(&mut self, tree: &Tree) {
        self.tree = tree.without_hint();
        self.updated_at = current_timestamp_ms();
    }

    /// Check structural invariants: node ids are unique and no hint is stored.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidDocument`] on the first violation.
    pub fn validate(&self) -> BuilderResult<()> {
        self.tree.validate_ids()?;
        match self.tree.hint() {
            Some(hint) => Err(BuilderError::InvalidDocument(format!(
                "node {} is a drag hint",
                hint.id
            ))),
            None => Ok(()),
        }
    }

    /// Parse and validate a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::Serialization`] for malformed JSON and
    /// [`BuilderError::InvalidDocument`] for a structurally invalid tree.
    pub fn from_json(json: &str) -> BuilderResult<Self> {
        let doc: Self = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> BuilderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Get the current Unix timestamp in milliseconds.
pub(crate) fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}
