pub mod block_store;
pub mod config;
pub mod sheets;
