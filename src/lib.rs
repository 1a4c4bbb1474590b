pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod extraction;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::{open_store, RecordStore};
pub use error::AppError;
pub use service::{AzureDocumentAnalyzer, ReceiptExtractor};
