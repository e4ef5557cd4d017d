use crate::record::{now_rfc3339, ContextRecord};
use crate::Result;
use grantdesk_tenant_store::TenantStore;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Name given to an imported record when the payload names no company and the
/// caller supplies no explicit name.
pub const IMPORTED_CONTEXT_NAME: &str = "Imported Context";

/// Record-level API over the tenant store: the surface a front-end calls.
///
/// Reads with an empty workspace key degrade to empty/absent results and
/// writes no-op, so a front-end can render a signed-out state without special
/// casing; the strict empty-key refusal lives in the tenant store itself.
/// Every mutation is a full load, in-memory change, full save. Last writer
/// wins; there is no cross-operation locking.
pub struct ContextRepository {
    store: TenantStore,
}

impl ContextRepository {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            store: TenantStore::new(base_dir),
        }
    }

    #[must_use]
    pub fn store(&self) -> &TenantStore {
        &self.store
    }

    fn load(&self, workspace_key: &str) -> Result<BTreeMap<String, ContextRecord>> {
        Ok(self.store.load(workspace_key)?)
    }

    /// Names of every record in the workspace, lexicographically ordered.
    /// An empty workspace key yields an empty list, never an error.
    pub fn list_names(&self, workspace_key: &str) -> Result<Vec<String>> {
        if workspace_key.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.load(workspace_key)?.into_keys().collect())
    }

    /// Look up one record by exact name.
    pub fn get(&self, name: &str, workspace_key: &str) -> Result<Option<ContextRecord>> {
        if workspace_key.is_empty() {
            return Ok(None);
        }
        let mut records = self.load(workspace_key)?;
        Ok(records.remove(name))
    }

    /// Insert or fully replace the record stored under `name`.
    ///
    /// `last_updated` is stamped with the current time; `created` is stamped
    /// too when the record does not carry one (records arriving via import).
    /// A prior record under the same name is overwritten unconditionally.
    pub fn save(&self, name: &str, mut record: ContextRecord, workspace_key: &str) -> Result<()> {
        if workspace_key.is_empty() {
            return Ok(());
        }
        let mut records = self.load(workspace_key)?;
        record.last_updated = now_rfc3339();
        if record.created.is_empty() {
            record.created = record.last_updated.clone();
        }
        records.insert(name.to_string(), record);
        self.store.save(workspace_key, &records)?;
        Ok(())
    }

    /// Remove the record stored under `name`. Deleting a name that does not
    /// exist is a no-op, as is an empty workspace key.
    pub fn delete(&self, name: &str, workspace_key: &str) -> Result<()> {
        if workspace_key.is_empty() {
            return Ok(());
        }
        let mut records = self.load(workspace_key)?;
        if records.remove(name).is_some() {
            self.store.save(workspace_key, &records)?;
            log::debug!("deleted context '{name}'");
        }
        Ok(())
    }

    /// Pretty-printed JSON rendering of one record, suitable for download or
    /// re-import elsewhere. `None` when the name is unknown.
    pub fn export(&self, name: &str, workspace_key: &str) -> Result<Option<String>> {
        match self.get(name, workspace_key)? {
            Some(record) => Ok(Some(serde_json::to_string_pretty(&record)?)),
            None => Ok(None),
        }
    }

    /// Import a single-record JSON document.
    ///
    /// Returns `Ok(false)` without touching any stored state when the
    /// workspace key is empty or the payload is not a valid record document.
    /// The stored name is `explicit_name` when given, else the payload's
    /// non-empty `company_name`, else [`IMPORTED_CONTEXT_NAME`]. A name
    /// collision overwrites the existing record, exactly like `save`.
    pub fn import(
        &self,
        json: &str,
        workspace_key: &str,
        explicit_name: Option<&str>,
    ) -> Result<bool> {
        if workspace_key.is_empty() {
            return Ok(false);
        }
        let record: ContextRecord = match serde_json::from_str(json) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("import payload is not a valid context document: {e}");
                return Ok(false);
            }
        };
        let name = match explicit_name {
            Some(name) => name.to_string(),
            None if !record.company_name.is_empty() => record.company_name.clone(),
            None => IMPORTED_CONTEXT_NAME.to_string(),
        };
        self.save(&name, record, workspace_key)?;
        Ok(true)
    }

    /// Blank record populated with fresh default criteria and both
    /// timestamps set to now. See [`ContextRecord::new_default`].
    #[must_use]
    pub fn create_default(&self) -> ContextRecord {
        ContextRecord::new_default()
    }
}
