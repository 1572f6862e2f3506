use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockStoreError {
    #[error("Block {0} already exists")]
    AlreadyExists(String),
    #[error("Block {0} not found")]
    NotFound(String),
    #[error("Block {0} could not be serialized")]
    Serialization(String),
}

/// Named configuration records, stored as JSON documents.
#[async_trait::async_trait]
pub trait BlockStore: Send + Sync {
    async fn load(&self, name: &str) -> error_stack::Result<Option<Value>, BlockStoreError>;

    /// Stores `value` under `name`. An existing block is only replaced when `overwrite` is set.
    async fn save(
        &self,
        name: &str,
        value: Value,
        overwrite: bool,
    ) -> error_stack::Result<(), BlockStoreError>;
}
