pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod service;
pub mod source;

pub use config::AppConfig;
pub use error::{ProcurementError, Result};
pub use service::ProcurementStore;
pub use source::{CsvRowSource, MemoryRowSource, RowSource};
