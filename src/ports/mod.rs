pub mod block_store;
pub mod worksheet;
