//! Configuration loading, env substitution, env overrides and validation.
//!
//! Config files: `reelbridge.toml`, `reelbridge.yaml`, or `reelbridge.json`,
//! searched in `./` then `~/.config/reelbridge/`.
//!
//! Supports `${ENV_VAR}` substitution in the raw file and the classic
//! `SESSION_ID` / `RAPIDAPI_*` / `WA_API_*` environment variables as
//! overrides on top of whatever the file provides.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{
        apply_env_overrides, config_dir, discover_and_load, find_config_file, load_config,
        load_effective,
    },
    schema::{
        GatewayConfig, HttpConfig, LookupConfig, MetricsConfig, ReelbridgeConfig, RelayConfig,
        ServerConfig, SessionConfig,
    },
    validate::{Diagnostic, Severity, ValidationResult, validate, validate_all},
};
