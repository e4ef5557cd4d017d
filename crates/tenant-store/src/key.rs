use crate::{Result, TenantStoreError};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex length of a tenant key: 16 characters, the first 8 bytes of a SHA-256
/// digest. Short enough for readable file names, long enough that collisions
/// between distinct workspace keys are not a practical concern.
pub const TENANT_KEY_HEX_LEN: usize = 16;

/// Deterministic, non-reversible storage key for one workspace.
///
/// Derived from the caller's opaque workspace key; the plaintext key itself is
/// never persisted or used as a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantKey(String);

impl TenantKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the tenant key for a workspace key.
///
/// Pure: identical inputs always produce identical keys. An empty workspace
/// key is a caller bug, not a recoverable state, and is refused here — this is
/// the strict validation boundary for the storage layer.
pub fn derive_key(workspace_key: &str) -> Result<TenantKey> {
    if workspace_key.is_empty() {
        return Err(TenantStoreError::EmptyWorkspaceKey);
    }
    let digest = Sha256::digest(workspace_key.as_bytes());
    Ok(TenantKey(hex_encode_lower(&digest[..TENANT_KEY_HEX_LEN / 2])))
}

fn hex_encode_lower(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}
