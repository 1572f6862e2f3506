use error_stack::{report, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::sheets::read_options::OnBadLines;
use crate::domain::task_params::SheetTaskParams;
use crate::ports::block_store::{BlockStore, BlockStoreError};

use super::tasks::{
    read_google_sheet_as_dict_of_lists, read_google_sheet_as_list_of_lists,
    read_google_sheet_as_table,
};

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Block {0} could not be loaded")]
    BlockUnavailable(String),
    #[error("The sheet task failed")]
    TaskFailed,
    #[error("The task result could not be serialized")]
    Serialization,
}

/// Sheet coordinates and credentials persisted under a name, so flows only carry the name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleSheetsBlock {
    #[serde(default)]
    pub is_public_sheet: bool,
    #[serde(default)]
    pub google_service_account: Option<Value>,
    pub google_sheet_key: String,
    pub google_sheet_name: String,
}

impl GoogleSheetsBlock {
    pub async fn save(
        &self,
        store: &dyn BlockStore,
        name: &str,
        overwrite: bool,
    ) -> error_stack::Result<(), BlockStoreError> {
        let value = serde_json::to_value(self)
            .change_context_lazy(|| BlockStoreError::Serialization(name.to_string()))?;
        store.save(name, value, overwrite).await
    }

    pub async fn load(
        store: &dyn BlockStore,
        name: &str,
    ) -> error_stack::Result<Self, BlockStoreError> {
        let value = store
            .load(name)
            .await?
            .ok_or_else(|| report!(BlockStoreError::NotFound(name.to_string())))?;
        serde_json::from_value(value)
            .change_context_lazy(|| BlockStoreError::Serialization(name.to_string()))
    }

    pub fn task_params(&self, settings: &ReadSettings) -> SheetTaskParams {
        SheetTaskParams {
            is_public_sheet: self.is_public_sheet,
            google_service_account: self.google_service_account.clone(),
            google_sheet_key: Some(self.google_sheet_key.clone()),
            google_sheet_name: Some(self.google_sheet_name.clone()),
            first_row_header: settings.first_row_header,
            on_bad_lines: settings.on_bad_lines,
            clean: settings.clean,
        }
    }
}

/// Per-run read settings, kept apart from the stored block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReadSettings {
    pub first_row_header: bool,
    pub on_bad_lines: OnBadLines,
    pub clean: bool,
}

impl Default for ReadSettings {
    fn default() -> Self {
        ReadSettings {
            first_row_header: true,
            on_bad_lines: OnBadLines::default(),
            clean: false,
        }
    }
}

/// Which read task a flow runs, i.e. the shape of its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FlowShape {
    #[default]
    Table,
    Rows,
    Columns,
}

/// Loads the block named `block_name` and runs the read task matching `shape`.
#[instrument(skip(store))]
pub async fn read_sheet_flow(
    store: &dyn BlockStore,
    block_name: &str,
    shape: FlowShape,
    settings: ReadSettings,
) -> error_stack::Result<Value, FlowError> {
    let block = GoogleSheetsBlock::load(store, block_name)
        .await
        .change_context_lazy(|| FlowError::BlockUnavailable(block_name.to_string()))?;
    let params = block.task_params(&settings);

    let value = match shape {
        FlowShape::Table => read_google_sheet_as_table(&params)
            .await
            .change_context(FlowError::TaskFailed)
            .and_then(|table| serde_json::to_value(table).change_context(FlowError::Serialization)),
        FlowShape::Rows => read_google_sheet_as_list_of_lists(&params)
            .await
            .change_context(FlowError::TaskFailed)
            .and_then(|rows| serde_json::to_value(rows).change_context(FlowError::Serialization)),
        FlowShape::Columns => read_google_sheet_as_dict_of_lists(&params)
            .await
            .change_context(FlowError::TaskFailed)
            .and_then(|columns| {
                serde_json::to_value(columns).change_context(FlowError::Serialization)
            }),
    }?;

    info!(%shape, "Flow finished");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::block_store::memory::InMemoryBlockStore;
    use crate::domain::error::{SheetsError, MISSING_SERVICE_ACCOUNT};
    use serde_json::json;
    use std::str::FromStr;

    fn block() -> GoogleSheetsBlock {
        GoogleSheetsBlock {
            is_public_sheet: false,
            google_service_account: Some(json!({ "client_email": "robot@example.com" })),
            google_sheet_key: "key".to_string(),
            google_sheet_name: "Sheet1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_block_round_trips_through_store() {
        let store = InMemoryBlockStore::new();
        block().save(&store, "sample-block", false).await.unwrap();

        let loaded = GoogleSheetsBlock::load(&store, "sample-block").await.unwrap();
        assert_eq!(loaded, block());

        let report = block().save(&store, "sample-block", false).await.unwrap_err();
        assert!(matches!(
            report.current_context(),
            BlockStoreError::AlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_missing_block() {
        let store = InMemoryBlockStore::new();
        let report = GoogleSheetsBlock::load(&store, "nope").await.unwrap_err();
        assert_eq!(
            report.current_context(),
            &BlockStoreError::NotFound("nope".to_string())
        );

        let report = read_sheet_flow(&store, "nope", FlowShape::Rows, ReadSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(
            report.current_context(),
            FlowError::BlockUnavailable(name) if name == "nope"
        ));
    }

    #[test]
    fn test_task_params_from_block() {
        let settings = ReadSettings {
            first_row_header: false,
            on_bad_lines: OnBadLines::Skip,
            clean: true,
        };
        let params = block().task_params(&settings);

        assert_eq!(params.google_sheet_key.as_deref(), Some("key"));
        assert!(!params.first_row_header);
        assert_eq!(params.on_bad_lines, OnBadLines::Skip);
        assert!(params.clean);
    }

    #[tokio::test]
    async fn test_task_failure_keeps_sheets_error_in_report() {
        let store = InMemoryBlockStore::new();
        GoogleSheetsBlock {
            google_service_account: None,
            ..block()
        }
        .save(&store, "no-credentials", false)
        .await
        .unwrap();

        let report = read_sheet_flow(
            &store,
            "no-credentials",
            FlowShape::Table,
            ReadSettings::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(report.current_context(), FlowError::TaskFailed));
        assert_eq!(
            report.downcast_ref::<SheetsError>(),
            Some(&SheetsError::configuration(MISSING_SERVICE_ACCOUNT))
        );
    }

    #[test]
    fn test_flow_shape_from_str() {
        assert_eq!(FlowShape::from_str("columns").unwrap(), FlowShape::Columns);
        assert_eq!(FlowShape::Rows.to_string(), "rows");
        assert!(FlowShape::from_str("cells").is_err());
    }
}
