pub mod error;
pub mod sheets;
pub mod task_params;
