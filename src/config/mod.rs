//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (env overrides for secrets)
//!     → validation.rs (semantic checks)
//!     → LedgerConfig (validated, immutable)
//!     → ClientConfig handed to LedgerClient by value
//! ```
//!
//! # Design Decisions
//! - The client core never reads files or the environment itself
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{config_from_env, load_config, ConfigError};
pub use schema::{ClientConfig, LedgerConfig, ObservabilityConfig, ReceiverConfig};
pub use validation::{validate_config, ValidationError};
