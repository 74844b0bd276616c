//! Form repository.
//!
//! The editor never persists anything itself. Saving, listing and loading
//! forms go through a [`FormRepository`]; [`FormStore`] is the provided
//! implementation, in memory with optional JSON files on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::schema::{current_timestamp_ms, FormDocument, FormId};
use crate::{BuilderError, Tree};

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested form does not exist.
    #[error("Form not found: {0}")]
    NotFound(FormId),
    /// A form with this id already exists.
    #[error("Form already exists: {0}")]
    AlreadyExists(FormId),
    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A stored document is invalid.
    #[error("Invalid document: {0}")]
    Document(#[from] BuilderError),
}

/// Summary row returned by [`FormRepository::list`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    /// Form identifier.
    pub id: FormId,
    /// Display name.
    pub name: String,
    /// Number of nodes in the tree.
    pub node_count: usize,
    /// Last modification in milliseconds since the Unix epoch.
    pub updated_at: u64,
}

impl From<&FormDocument> for FormSummary {
    fn from(doc: &FormDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name.clone(),
            node_count: doc.tree.count_nodes(),
            updated_at: doc.updated_at,
        }
    }
}

/// Create/read/update/delete access to saved forms, keyed by [`FormId`].
pub trait FormRepository {
    /// Store a new form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if the id is taken.
    fn create(&self, doc: FormDocument) -> Result<FormId, StoreError>;

    /// Fetch a form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the form does not exist.
    fn read(&self, id: FormId) -> Result<FormDocument, StoreError>;

    /// Replace a form's tree.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the form does not exist.
    fn update(&self, id: FormId, tree: &Tree) -> Result<(), StoreError>;

    /// Delete a form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the form does not exist.
    fn delete(&self, id: FormId) -> Result<(), StoreError>;

    /// All forms, most recently updated first.
    fn list(&self) -> Vec<FormSummary>;
}

/// Thread-safe form storage with optional filesystem persistence.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    forms: Arc<RwLock<HashMap<FormId, FormDocument>>>,
    data_dir: Option<PathBuf>,
}

impl FormStore {
    /// Create an in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store persisting each form as `<id>.json` in `data_dir`.
    ///
    /// The directory is created if it doesn't exist. Existing forms are not
    /// loaded; call [`FormStore::load_all`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            forms: Arc::default(),
            data_dir: Some(data_dir),
        })
    }

    /// Data directory, if persistence is enabled.
    #[must_use]
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Load every `*.json` form in the data directory into memory.
    ///
    /// Files that fail to parse or validate are skipped with a warning.
    /// Returns the ids loaded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory can't be read.
    pub fn load_all(&self) -> Result<Vec<FormId>, StoreError> {
        let Some(data_dir) = self.data_dir.as_ref() else {
            return Ok(Vec::new());
        };
        let mut loaded = Vec::new();
        for entry in std::fs::read_dir(data_dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match read_document(&path) {
                Ok(doc) => {
                    loaded.push(doc.id);
                    self.write_lock().insert(doc.id, doc);
                }
                Err(e) => tracing::warn!("Skipping {}: {e}", path.display()),
            }
        }
        tracing::info!("Loaded {} forms from {}", loaded.len(), data_dir.display());
        Ok(loaded)
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, HashMap<FormId, FormDocument>> {
        self.forms
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<FormId, FormDocument>> {
        self.forms
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn path_for(data_dir: &Path, id: FormId) -> PathBuf {
        data_dir.join(format!("{id}.json"))
    }

    fn persist(&self, doc: &FormDocument) -> Result<(), StoreError> {
        let Some(ref data_dir) = self.data_dir else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(doc)?;
        let path = Self::path_for(data_dir, doc.id);
        std::fs::write(&path, json)?;
        tracing::debug!("Persisted form {} to {}", doc.id, path.display());
        Ok(())
    }
}

fn read_document(path: &Path) -> Result<FormDocument, StoreError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(FormDocument::from_json(&contents)?)
}

impl FormRepository for FormStore {
    fn create(&self, doc: FormDocument) -> Result<FormId, StoreError> {
        let id = doc.id;
        if self.read_lock().contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        doc.validate()?;
        self.persist(&doc)?;
        tracing::info!("Created form {id} ({})", doc.name);
        self.write_lock().insert(id, doc);
        Ok(id)
    }

    fn read(&self, id: FormId) -> Result<FormDocument, StoreError> {
        self.read_lock()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn update(&self, id: FormId, tree: &Tree) -> Result<(), StoreError> {
        tree.validate_ids()?;
        let doc = {
            let mut forms = self.write_lock();
            let doc = forms.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            doc.tree = tree.without_hint();
            doc.updated_at = current_timestamp_ms();
            doc.clone()
        };
        self.persist(&doc)?;
        tracing::info!("Updated form {id}");
        Ok(())
    }

    fn delete(&self, id: FormId) -> Result<(), StoreError> {
        self.write_lock()
            .remove(&id)
            .ok_or(StoreError::NotFound(id))?;
        if let Some(ref data_dir) = self.data_dir {
            let path = Self::path_for(data_dir, id);
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        tracing::info!("Deleted form {id}");
        Ok(())
    }

    fn list(&self) -> Vec<FormSummary> {
        let mut summaries: Vec<_> = self.read_lock().values().map(FormSummary::from).collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.name.cmp(&b.name)));
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentNode, Tag};

    fn section_tree() -> Tree {
        Tree::from_roots([ComponentNode::new(Tag::Section)])
    }

    #[test]
    fn test_create_and_read() {
        let store = FormStore::new();
        let doc = FormDocument::new("Contact");
        let id = store.create(doc.clone()).expect("create");
        assert_eq!(store.read(id).expect("read"), doc);
    }

    #[test]
    fn test_create_duplicate_fails() {
        let store = FormStore::new();
        let doc = FormDocument::new("Contact");
        store.create(doc.clone()).expect("create");
        assert!(matches!(store.create(doc), Err(StoreError::AlreadyExists(_))));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let store = FormStore::new();
        let result = store.update(FormId::new(), &section_tree());
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_update_with_duplicate_ids_is_rejected() {
        let store = FormStore::new();
        let doc = FormDocument::new("Contact");
        let id = store.create(doc.clone()).expect("create");
        let div = ComponentNode::new(Tag::Div);
        let tree = Tree::from_roots([ComponentNode::new(Tag::Section)
            .with_child(div.clone())
            .with_child(div)]);

        let result = store.update(id, &tree);
        assert!(matches!(result, Err(StoreError::Document(_))));
        assert_eq!(store.read(id).expect("read").tree, doc.tree);
    }

    #[test]
    fn test_update_strips_hint() {
        let store = FormStore::new();
        let id = store.create(FormDocument::new("x")).expect("create");
        let tree = section_tree();
        let root = tree.roots().next().expect("root").id;
        let with_hint = tree.insert(Some(root), ComponentNode::hint(Tag::Div, crate::Style::new()));
        store.update(id, &with_hint).expect("update");
        assert_eq!(store.read(id).expect("read").tree, tree);
    }

    #[test]
    fn test_delete() {
        let store = FormStore::new();
        let id = store.create(FormDocument::new("x")).expect("create");
        store.delete(id).expect("delete");
        assert!(matches!(store.read(id), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete(id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_persistence_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FormStore::with_data_dir(dir.path()).expect("store");
        let id = store.create(FormDocument::new("Saved")).expect("create");
        store.update(id, &section_tree()).expect("update");

        let reopened = FormStore::with_data_dir(dir.path()).expect("store");
        assert_eq!(reopened.load_all().expect("load"), vec![id]);
        let doc = reopened.read(id).expect("read");
        assert_eq!(doc.name, "Saved");
        assert_eq!(doc.tree.count_nodes(), 1);
    }

    #[test]
    fn test_load_all_skips_invalid_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("broken.json"), "{").expect("write");
        std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write");
        let store = FormStore::with_data_dir(dir.path()).expect("store");
        assert!(store.load_all().expect("load").is_empty());
    }

    #[test]
    fn test_delete_removes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FormStore::with_data_dir(dir.path()).expect("store");
        let id = store.create(FormDocument::new("gone")).expect("create");
        let path = dir.path().join(format!("{id}.json"));
        assert!(path.exists());
        store.delete(id).expect("delete");
        assert!(!path.exists());
    }

    #[test]
    fn test_list_summaries() {
        let store = FormStore::new();
        let mut doc = FormDocument::new("with section");
        doc.set_tree(&section_tree());
        store.create(doc).expect("create");
        let list = store.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].node_count, 1);
    }
}
