//! # relay-common
//!
//! Shared utilities including configuration, error handling, authentication,
//! telemetry, and attachment storage.

pub mod auth;
pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, JwtService};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    RateLimitConfig, ServerConfig, SnowflakeConfig, StorageConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use storage::FsAttachmentStore;
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
