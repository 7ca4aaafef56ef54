//! Configuration validation.
//!
//! Flags unknown or misspelled fields in the config file and checks the
//! effective config for settings the pipeline needs at request time.

use std::path::{Path, PathBuf};

use url::Url;

use crate::{loader, schema::ReelbridgeConfig};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "lookup.keys"
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn new(severity: Severity, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Known fields per section. Top-level keys are the section names.
const SECTIONS: &[(&str, &[&str])] = &[
    ("server", &["bind", "port", "shutdown_grace_secs"]),
    ("http", &["timeout_secs"]),
    ("session", &["id"]),
    ("lookup", &["host", "keys", "endpoint"]),
    ("gateway", &["api_url", "api_key"]),
    ("relay", &["caption_prefix"]),
    ("metrics", &["enabled"]),
];

/// Validate the config file at `path` (if any) plus the effective config.
#[must_use]
pub fn validate_all(path: Option<&Path>, effective: &ReelbridgeConfig) -> ValidationResult {
    let mut result = ValidationResult {
        config_path: path.map(Path::to_path_buf),
        ..Default::default()
    };

    match path {
        Some(path) => match loader::load_config_value(path) {
            Ok(tree) => check_unknown_fields(&tree, &mut result.diagnostics),
            Err(e) => result
                .diagnostics
                .push(Diagnostic::new(Severity::Error, "", e.to_string())),
        },
        None => result.diagnostics.push(Diagnostic::new(
            Severity::Info,
            "",
            "no config file found; using defaults and environment",
        )),
    }

    result.diagnostics.extend(validate(effective).diagnostics);
    result
}

/// Semantic checks on an effective (file + env) config.
#[must_use]
pub fn validate(config: &ReelbridgeConfig) -> ValidationResult {
    let mut diagnostics = Vec::new();

    if config.session.id.is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "session.id",
            "empty: every inbound session is accepted and media relay cannot run",
        ));
    }
    if config.lookup.host.is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "lookup.host",
            "video lookup host is not set (RAPIDAPI_HOST)",
        ));
    }
    if config.lookup.keys.is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "lookup.keys",
            "no lookup credentials configured (RAPIDAPI_KEYS)",
        ));
    }
    if let Some(endpoint) = config.lookup.endpoint.as_deref()
        && !endpoint.is_empty()
        && Url::parse(endpoint).is_err()
    {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "lookup.endpoint",
            format!("not a valid URL: {endpoint}"),
        ));
    }

    if config.gateway.api_url.is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "gateway.api_url",
            "messaging gateway URL is not set (WA_API_URL)",
        ));
    } else if let Err(e) = Url::parse(&config.gateway.api_url) {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "gateway.api_url",
            format!("not a valid URL: {e}"),
        ));
    }
    if config.gateway.api_key.is_none() {
        diagnostics.push(Diagnostic::new(
            Severity::Info,
            "gateway.api_key",
            "no API key; gateway requests are sent without x-api-key",
        ));
    }

    if config.http.timeout_secs == 0 {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "http.timeout_secs",
            "must be greater than zero",
        ));
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

fn check_unknown_fields(tree: &serde_json::Value, diagnostics: &mut Vec<Diagnostic>) {
    let Some(root) = tree.as_object() else {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "",
            "config root must be a table",
        ));
        return;
    };
    let section_names: Vec<&str> = SECTIONS.iter().map(|(name, _)| *name).collect();

    for (key, value) in root {
        let Some((_, fields)) = SECTIONS.iter().find(|(name, _)| *name == key.as_str()) else {
            diagnostics.push(unknown_field(key, key, &section_names));
            continue;
        };
        let Some(table) = value.as_object() else {
            continue;
        };
        for field in table.keys().filter(|f| !fields.contains(&f.as_str())) {
            diagnostics.push(unknown_field(&format!("{key}.{field}"), field, fields));
        }
    }
}

fn unknown_field(path: &str, key: &str, candidates: &[&str]) -> Diagnostic {
    let message = match suggest(key, candidates) {
        Some(s) => format!("unknown field (did you mean \"{s}\"?)"),
        None => "unknown field".to_string(),
    };
    Diagnostic::new(Severity::Error, path, message)
}

/// Closest candidate within an edit distance of 3.
fn suggest<'a>(needle: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (*c, levenshtein(needle, c)))
        .filter(|(_, d)| (1..=3).contains(d))
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut curr = Vec::with_capacity(b.len() + 1);
        curr.push(i + 1);
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr.push((prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1));
        }
        prev = curr;
    }
    prev[b.len()]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, secrecy::Secret};

    fn complete_config() -> ReelbridgeConfig {
        let mut cfg = ReelbridgeConfig::default();
        cfg.session.id = "ruli2".into();
        cfg.lookup.host = "scraper.p.rapidapi.com".into();
        cfg.lookup.keys = vec![Secret::new("k1".into())];
        cfg.gateway.api_url = "https://wa.example.com".into();
        cfg.gateway.api_key = Some(Secret::new("wa".into()));
        cfg
    }

    #[test]
    fn complete_config_is_clean() {
        let result = validate(&complete_config());
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn default_config_reports_missing_outbound_settings() {
        let result = validate(&ReelbridgeConfig::default());
        let paths: Vec<&str> = result.diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert!(paths.contains(&"lookup.host"));
        assert!(paths.contains(&"lookup.keys"));
        assert!(paths.contains(&"gateway.api_url"));
        assert!(result.has_errors());
        assert_eq!(result.count(Severity::Warning), 1);
    }

    #[test]
    fn malformed_gateway_url_is_error() {
        let mut cfg = complete_config();
        cfg.gateway.api_url = "not a url".into();
        let result = validate(&cfg);
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].path, "gateway.api_url");
    }

    #[test]
    fn unknown_fields_get_suggestions() {
        let tree = serde_json::json!({
            "lookup": { "hots": "x", "keys": [] },
            "gatway": {},
        });
        let mut diagnostics = Vec::new();
        check_unknown_fields(&tree, &mut diagnostics);
        assert_eq!(diagnostics.len(), 2);
        assert!(
            diagnostics
                .iter()
                .any(|d| d.path == "lookup.hots" && d.message.contains("\"host\""))
        );
        assert!(
            diagnostics
                .iter()
                .any(|d| d.path == "gatway" && d.message.contains("\"gateway\""))
        );
    }

    #[test]
    fn validate_all_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reelbridge.toml");
        std::fs::write(&path, "[server]\nprot = 1\n").unwrap();
        let result = validate_all(Some(&path), &complete_config());
        assert_eq!(result.config_path.as_deref(), Some(path.as_path()));
        assert!(result.diagnostics.iter().any(|d| d.path == "server.prot"));
    }

    #[test]
    fn levenshtein_distances() {
        assert_eq!(levenshtein("host", "host"), 0);
        assert_eq!(levenshtein("hots", "host"), 2);
        assert_eq!(levenshtein("", "abc"), 3);
    }
}
