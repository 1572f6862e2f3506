pub mod reader;
pub mod resolve;
pub mod writer;
