//! Configuration
//!
//! Two levels:
//! - Preset: `DisposeConfig::from_preset(Preset::Fast)`
//! - YAML: `DisposeConfig::from_yaml("dispose.yaml")?`, validated on load
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_dispose::config::{DisposeConfig, Preset};
//!
//! let config = DisposeConfig::from_preset(Preset::Thorough)
//!     .max_call_chain_depth(4)
//!     .with_ownership_transfer_type("MyCompany.IO.Channel");
//! ```

pub mod dispose_config;
pub mod error;
pub mod preset;
pub mod validation;

pub use dispose_config::{
    DisposeConfig, DisposeConfigFile, InterproceduralMode, WellKnownTypeNames,
    SUPPORTED_SCHEMA_VERSIONS,
};
pub use error::{ConfigError, ConfigResult};
pub use preset::Preset;
pub use validation::Validatable;
