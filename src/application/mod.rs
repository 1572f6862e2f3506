pub mod flows;
pub mod sheets;
pub mod tasks;
