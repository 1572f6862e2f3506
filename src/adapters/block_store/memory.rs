use std::collections::HashMap;

use error_stack::report;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::ports::block_store::{BlockStore, BlockStoreError};

#[derive(Debug, Default)]
pub struct InMemoryBlockStore {
    blocks: RwLock<HashMap<String, Value>>,
}

impl InMemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BlockStore for InMemoryBlockStore {
    async fn load(&self, name: &str) -> error_stack::Result<Option<Value>, BlockStoreError> {
        Ok(self.blocks.read().await.get(name).cloned())
    }

    #[instrument(skip(self, value))]
    async fn save(
        &self,
        name: &str,
        value: Value,
        overwrite: bool,
    ) -> error_stack::Result<(), BlockStoreError> {
        let mut blocks = self.blocks.write().await;
        if !overwrite && blocks.contains_key(name) {
            return Err(report!(BlockStoreError::AlreadyExists(name.to_string())));
        }
        blocks.insert(name.to_string(), value);
        debug!("Saved block");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_save_and_load() {
        let store = InMemoryBlockStore::new();
        assert_eq!(store.load("missing").await.unwrap(), None);

        store.save("block", json!({ "a": 1 }), false).await.unwrap();
        assert_eq!(store.load("block").await.unwrap(), Some(json!({ "a": 1 })));
    }

    #[tokio::test]
    async fn test_save_refuses_silent_overwrite() {
        let store = InMemoryBlockStore::new();
        store.save("block", json!(1), false).await.unwrap();

        let report = store.save("block", json!(2), false).await.unwrap_err();
        assert_eq!(
            report.current_context(),
            &BlockStoreError::AlreadyExists("block".to_string())
        );

        store.save("block", json!(2), true).await.unwrap();
        assert_eq!(store.load("block").await.unwrap(), Some(json!(2)));
    }
}
