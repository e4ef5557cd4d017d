use crate::key::derive_key;
use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DOCUMENT_PREFIX: &str = "contexts_";
const DOCUMENT_EXT: &str = "json";

/// File-backed storage for per-tenant record collections.
///
/// One JSON document per tenant under the base directory, named from the
/// derived tenant key so operators can enumerate and back up tenant documents
/// without ever learning a workspace key. Loads and saves always cover the
/// whole collection; there is no partial write.
pub struct TenantStore {
    base_dir: PathBuf,
}

impl TenantStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the tenant's backing document. Deterministic per workspace key.
    pub fn document_path(&self, workspace_key: &str) -> Result<PathBuf> {
        let key = derive_key(workspace_key)?;
        Ok(self
            .base_dir
            .join(format!("{DOCUMENT_PREFIX}{key}.{DOCUMENT_EXT}")))
    }

    /// Load the tenant's full collection.
    ///
    /// A missing document means the tenant has never saved: empty collection.
    /// A document that fails to parse (corrupted or half-written) is also
    /// treated as empty rather than fatal, so the caller can keep working and
    /// repair it with the next save; the event is logged since it can mean
    /// data loss. Other read failures propagate.
    pub fn load<T: DeserializeOwned>(&self, workspace_key: &str) -> Result<BTreeMap<String, T>> {
        let path = self.document_path(workspace_key)?;
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                log::warn!(
                    "tenant document {} is not valid JSON ({e}); treating as empty",
                    path.display()
                );
                Ok(BTreeMap::new())
            }
        }
    }

    /// Replace the tenant's document with the given collection.
    ///
    /// Creates the base directory on first use. The document is written to a
    /// temporary sibling and renamed into place, so readers never observe a
    /// torn write. Storage-medium failures propagate; the operation is
    /// idempotent and safe for the caller to retry.
    pub fn save<T: Serialize>(
        &self,
        workspace_key: &str,
        records: &BTreeMap<String, T>,
    ) -> Result<()> {
        let path = self.document_path(workspace_key)?;
        std::fs::create_dir_all(&self.base_dir)?;

        let bytes = serde_json::to_vec_pretty(records)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        log::debug!("saved {} record(s) to {}", records.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TenantStoreError;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
    struct Note {
        body: String,
    }

    fn note(body: &str) -> Note {
        Note { body: body.into() }
    }

    fn store() -> (tempfile::TempDir, TenantStore) {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let store = TenantStore::new(dir.path().join("tenants"));
        (dir, store)
    }

    #[test]
    fn load_before_any_save_is_empty() {
        let (_dir, store) = store();
        let records: BTreeMap<String, Note> = store.load("alice").expect("load");
        assert_eq!(records, BTreeMap::new());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = store();
        let mut records = BTreeMap::new();
        records.insert("first".to_string(), note("hello"));
        store.save("alice", &records).expect("save");

        let loaded: BTreeMap<String, Note> = store.load("alice").expect("load");
        assert_eq!(loaded, records);
    }

    #[test]
    fn save_creates_base_dir_lazily() {
        let (_dir, store) = store();
        assert!(!store.base_dir().exists());
        store
            .save("alice", &BTreeMap::from([("a".to_string(), note("x"))]))
            .expect("save");
        assert!(store.base_dir().exists());
    }

    #[test]
    fn tenants_are_isolated() {
        let (_dir, store) = store();
        store
            .save("alice", &BTreeMap::from([("a".to_string(), note("x"))]))
            .expect("save");

        let bob: BTreeMap<String, Note> = store.load("bob").expect("load");
        assert_eq!(bob, BTreeMap::new());
    }

    #[test]
    fn document_name_is_derived_not_plaintext() {
        let (_dir, store) = store();
        let path = store.document_path("alice").expect("path");
        let name = path.file_name().and_then(|s| s.to_str()).expect("name");
        assert_eq!(name, "contexts_2bd806c97f0e00af.json");
        assert!(!name.contains("alice"));
    }

    #[test]
    fn corrupted_document_loads_as_empty() {
        let (_dir, store) = store();
        store
            .save("alice", &BTreeMap::from([("a".to_string(), note("x"))]))
            .expect("save");
        let path = store.document_path("alice").expect("path");
        std::fs::write(&path, "{ truncated").expect("corrupt");

        let loaded: BTreeMap<String, Note> = store.load("alice").expect("load");
        assert_eq!(loaded, BTreeMap::new());
    }

    #[test]
    fn resave_repairs_corrupted_document() {
        let (_dir, store) = store();
        let path = store.document_path("alice").expect("path");
        std::fs::create_dir_all(store.base_dir()).expect("mkdir");
        std::fs::write(&path, "not json at all").expect("corrupt");

        store
            .save("alice", &BTreeMap::from([("a".to_string(), note("x"))]))
            .expect("save");
        let loaded: BTreeMap<String, Note> = store.load("alice").expect("load");
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn save_replaces_the_whole_document() {
        let (_dir, store) = store();
        let mut records = BTreeMap::new();
        records.insert("first".to_string(), note("one"));
        records.insert("second".to_string(), note("two"));
        store.save("alice", &records).expect("save");

        records.remove("first");
        store.save("alice", &records).expect("save");

        let loaded: BTreeMap<String, Note> = store.load("alice").expect("load");
        assert_eq!(loaded.keys().collect::<Vec<_>>(), vec!["second"]);
    }

    #[test]
    fn empty_workspace_key_is_refused() {
        let (_dir, store) = store();
        assert!(matches!(
            store.load::<Note>(""),
            Err(TenantStoreError::EmptyWorkspaceKey)
        ));
        assert!(matches!(
            store.save("", &BTreeMap::from([("a".to_string(), note("x"))])),
            Err(TenantStoreError::EmptyWorkspaceKey)
        ));
    }
}
