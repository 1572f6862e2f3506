pub mod auth;
pub mod csv_export;
pub mod google_worksheet;
pub mod http_client;
pub mod memory_worksheet;
pub mod value_range_factory;
