//! # HostelHub Config
//!
//! Configuration types for the HostelHub API, loaded from environment
//! variables at startup and passed explicitly into the components that need
//! them:
//!
//! - [`jwt`]: session token signing secret and lifetime
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: listen address
//!
//! Every loader also has a `from_lookup` form that takes a key lookup
//! closure instead of reading the process environment.
//!
//! # Example
//!
//! ```ignore
//! use hostelhub_config::{CorsConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env()?;
//! ```

pub mod cors;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

/// Invalid or missing configuration. Startup aborts on any of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}
