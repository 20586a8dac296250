//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ExecutorConfig (validated, immutable)
//!     → policies handed to each execute call
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{check_config, load_config, parse_config, read_config, ConfigError};
pub use schema::ExecutorConfig;
pub use schema::ObservabilityConfig;
pub use validation::{validate_policies, PolicyError, ValidationError};
