//! Configuration file loading and merging with command-line flags.
//!
//! Search order for the file: `--config`, then `./.gh-sweep.toml`, then
//! `<config_dir>/gh-sweep/config.toml`. A missing file is not an error unless
//! it was named with `--config`.
//!
//! Precedence for each setting: flag, then file, then built-in default.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use github::{ClientConfig, DEFAULT_API_URL};
use serde::Deserialize;
use sweep::{Namespace, ScanOptions};

use crate::args::Args;
use crate::report::ReportFormat;
use crate::telemetry::LogFormat;

const LOCAL_CONFIG: &str = ".gh-sweep.toml";
const GLOBAL_CONFIG_DIR: &str = "gh-sweep";
const GLOBAL_CONFIG: &str = "config.toml";

// ============================================================================
// File format
// ============================================================================

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub default_namespace: Option<String>,
    #[serde(default)]
    pub github: GitHubSection,
    #[serde(default)]
    pub orphans: OrphansSection,
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitHubSection {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    pub token: Option<String>,
}

impl Default for GitHubSection {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
        }
    }
}

/// Unset keys defer to [`ScanOptions::default`].
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrphansSection {
    pub stale_days_threshold: Option<u32>,
    pub include_recent_no_pr: Option<bool>,
    /// Replaces the built-in patterns when set.
    pub exclude_patterns: Option<Vec<String>>,
    pub include_protected: Option<bool>,
    pub concurrency: Option<usize>,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    pub otlp_endpoint: Option<String>,
    pub log_format: Option<LogFormat>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl FileConfig {
    /// Loads the explicit file, or the first file found on the search path.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        match find_config_file(&cwd, dirs::config_dir()) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}

fn find_config_file(cwd: &Path, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    let local = cwd.join(LOCAL_CONFIG);
    if local.is_file() {
        return Some(local);
    }
    config_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG))
        .filter(|global| global.is_file())
}

// ============================================================================
// Resolved settings
// ============================================================================

/// Everything the binary needs, after merging flags over the file.
#[derive(Debug)]
pub struct Settings {
    /// `None` when neither the flag nor the file names one; the binary then
    /// scans the authenticated user's namespace.
    pub namespace: Option<Namespace>,
    pub options: ScanOptions,
    pub client: ClientConfig,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub log_format: LogFormat,
    pub otlp_endpoint: Option<String>,
}

impl Settings {
    /// `fallback_token` is consulted last, after the flag and the file.
    pub fn resolve(args: &Args, file: FileConfig, fallback_token: Option<String>) -> Result<Self> {
        let namespace = match args.namespace.clone().or(file.default_namespace) {
            Some(name) => {
                Some(Namespace::new(name).ok_or_else(|| anyhow!("namespace must not be empty"))?)
            }
            None => None,
        };

        let defaults = ScanOptions::default();
        let orphans = file.orphans;
        let mut exclude_patterns = orphans
            .exclude_patterns
            .unwrap_or(defaults.exclude_patterns);
        exclude_patterns.extend(args.exclude.iter().cloned());

        let options = ScanOptions {
            stale_days_threshold: args
                .stale_days
                .or(orphans.stale_days_threshold)
                .unwrap_or(defaults.stale_days_threshold),
            include_recent_no_pr: args.include_recent
                || orphans
                    .include_recent_no_pr
                    .unwrap_or(defaults.include_recent_no_pr),
            exclude_patterns,
            include_protected: args.include_protected
                || orphans
                    .include_protected
                    .unwrap_or(defaults.include_protected),
            concurrency: args
                .concurrency
                .or(orphans.concurrency)
                .unwrap_or(defaults.concurrency),
        };
        options.validate()?;

        let client = ClientConfig {
            api_url: args.api_url.clone().unwrap_or(file.github.api_url),
            token: args
                .token
                .clone()
                .or(file.github.token)
                .or(fallback_token),
        };

        Ok(Self {
            namespace,
            options,
            client,
            format: args.format,
            output: args.output.clone(),
            log_format: args
                .log_format
                .or(file.telemetry.log_format)
                .unwrap_or_default(),
            otlp_endpoint: args
                .otlp_endpoint
                .clone()
                .or(file.telemetry.otlp_endpoint),
        })
    }
}
