use thiserror::Error;

pub type Result<T> = std::result::Result<T, TenantStoreError>;

#[derive(Error, Debug)]
pub enum TenantStoreError {
    #[error("workspace key must not be empty")]
    EmptyWorkspaceKey,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
