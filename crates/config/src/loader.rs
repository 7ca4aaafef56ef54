use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{
    env_subst::substitute_env,
    error::{Context, Error, Result},
    schema::ReelbridgeConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "reelbridge.toml",
    "reelbridge.yaml",
    "reelbridge.yml",
    "reelbridge.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<ReelbridgeConfig> {
    let raw = read_substituted(path)?;
    parse_config(&raw, path)
}

/// Load the raw config tree, used by validation to spot unknown fields.
pub fn load_config_value(path: &Path) -> Result<serde_json::Value> {
    let raw = read_substituted(path)?;
    parse_config_value(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./reelbridge.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/reelbridge/reelbridge.{toml,yaml,yml,json}` (user-global)
///
/// Returns `ReelbridgeConfig::default()` if no usable config file is found.
pub fn discover_and_load() -> ReelbridgeConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    ReelbridgeConfig::default()
}

/// Load the config the process runs with: an explicit file (must load) or
/// the discovered one, with environment overrides applied on top.
pub fn load_effective(explicit: Option<&Path>) -> Result<ReelbridgeConfig> {
    let mut config = match explicit {
        Some(path) => load_config(path)?,
        None => discover_and_load(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/reelbridge/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "reelbridge").map(|d| d.config_dir().to_path_buf())
}

/// Apply the process environment on top of file-provided settings.
pub fn apply_env_overrides(config: &mut ReelbridgeConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

/// Environment overrides with an injectable lookup.
///
/// `RAPIDAPI_KEYS` is comma-separated; entries are trimmed and blanks dropped,
/// order preserved.
pub fn apply_env_overrides_with(
    config: &mut ReelbridgeConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(session) = lookup("SESSION_ID") {
        config.session.id = session;
    }
    if let Some(host) = lookup("RAPIDAPI_HOST") {
        config.lookup.host = host;
    }
    if let Some(keys) = lookup("RAPIDAPI_KEYS") {
        config.lookup.keys = split_keys(&keys);
    }
    if let Some(url) = lookup("WA_API_URL") {
        config.gateway.api_url = url;
    }
    if let Some(key) = lookup("WA_API_KEY") {
        config.gateway.api_key = (!key.is_empty()).then(|| Secret::new(key));
    }
    if let Some(bind) = lookup("REELBRIDGE_BIND") {
        config.server.bind = bind;
    }
    if let Some(port) = lookup("REELBRIDGE_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(e) => warn!(%port, error = %e, "ignoring invalid REELBRIDGE_PORT"),
        }
    }
}

fn split_keys(raw: &str) -> Vec<Secret<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(|key| Secret::new(key.to_string()))
        .collect()
}

fn read_substituted(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(substitute_env(&raw))
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("toml")
}

fn parse_config(raw: &str, path: &Path) -> Result<ReelbridgeConfig> {
    let ctx = || format!("failed to parse {}", path.display());
    match extension(path) {
        "toml" => toml::from_str(raw).with_context(ctx),
        "yaml" | "yml" => serde_yaml::from_str(raw).with_context(ctx),
        "json" => serde_json::from_str(raw).with_context(ctx),
        other => Err(Error::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

fn parse_config_value(raw: &str, path: &Path) -> Result<serde_json::Value> {
    let ctx = || format!("failed to parse {}", path.display());
    match extension(path) {
        "toml" => {
            let v: toml::Value = toml::from_str(raw).with_context(ctx)?;
            serde_json::to_value(v).with_context(ctx)
        },
        "yaml" | "yml" => {
            let v: serde_yaml::Value = serde_yaml::from_str(raw).with_context(ctx)?;
            serde_json::to_value(v).with_context(ctx)
        },
        "json" => serde_json::from_str(raw).with_context(ctx),
        other => Err(Error::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}
