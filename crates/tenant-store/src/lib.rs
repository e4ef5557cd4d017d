//! # Grantdesk Tenant Store
//!
//! Workspace-isolated durable storage. A caller-supplied opaque workspace key
//! is hashed into a fixed-length tenant key; each tenant's records live in a
//! single JSON document named from that key, so distinct workspaces can never
//! contend for or read each other's data and the plaintext key never touches
//! the filesystem.

mod error;
mod key;
mod store;

pub use error::{Result, TenantStoreError};
pub use key::{derive_key, TenantKey, TENANT_KEY_HEX_LEN};
pub use store::TenantStore;
