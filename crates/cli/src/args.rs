//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::report::ReportFormat;
use crate::telemetry::LogFormat;

/// Every flag is optional; unset flags fall back to the config file, then to
/// built-in defaults.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "gh-sweep")]
#[command(about = "Find orphaned branches across a GitHub organization or user account")]
#[command(version)]
pub struct Args {
    /// Organization or user to scan [default: the authenticated user]
    #[arg(short = 'n', long, visible_alias = "org", value_name = "NAMESPACE")]
    pub namespace: Option<String>,

    /// Days without commits before a branch without a PR is stale
    #[arg(long, value_name = "DAYS")]
    pub stale_days: Option<u32>,

    /// Also report branches without a PR that are not yet stale
    #[arg(long)]
    pub include_recent: bool,

    /// Also classify protected branches
    #[arg(long)]
    pub include_protected: bool,

    /// Extra branch patterns to exclude, added to the configured ones
    #[arg(long = "exclude", value_name = "PATTERN", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Repositories scanned in parallel
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
    pub format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log output format (logs go to stderr)
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub REST API root, for GitHub Enterprise Server
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// OTLP collector endpoint for trace export
    #[arg(long, value_name = "URL")]
    pub otlp_endpoint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn org_is_an_alias_for_namespace() {
        let args = Args::try_parse_from(["gh-sweep", "--org", "acme"]).unwrap();
        assert_eq!(args.namespace.as_deref(), Some("acme"));
    }

    #[test]
    fn exclude_accepts_repeats_and_commas() {
        let args = Args::try_parse_from([
            "gh-sweep",
            "-n",
            "acme",
            "--exclude",
            "wip/*,keep-me",
            "--exclude",
            "gh-pages",
        ])
        .unwrap();
        assert_eq!(args.exclude, vec!["wip/*", "keep-me", "gh-pages"]);
    }

    #[test]
    fn scan_flags() {
        let args = Args::try_parse_from([
            "gh-sweep",
            "--namespace",
            "octocat",
            "--stale-days",
            "30",
            "--include-recent",
            "--concurrency",
            "8",
            "--format",
            "markdown",
            "-o",
            "report.md",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.stale_days, Some(30));
        assert!(args.include_recent);
        assert!(!args.include_protected);
        assert_eq!(args.concurrency, Some(8));
        assert_eq!(args.format, ReportFormat::Markdown);
        assert_eq!(args.output, Some(PathBuf::from("report.md")));
        assert_eq!(args.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn defaults_to_table_format() {
        let args = Args::try_parse_from(["gh-sweep"]).unwrap();
        assert_eq!(args.format, ReportFormat::Table);
        assert!(args.exclude.is_empty());
        assert!(args.namespace.is_none());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["gh-sweep", "--format", "csv"]).is_err());
    }
}
