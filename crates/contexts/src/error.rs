use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContextsError>;

#[derive(Error, Debug)]
pub enum ContextsError {
    #[error("Tenant store error: {0}")]
    TenantStoreError(#[from] grantdesk_tenant_store::TenantStoreError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
