pub mod config;
pub mod error;

pub use config::{LogConfig, ServiceConfig, StorageConfig};
pub use error::ServiceError;
