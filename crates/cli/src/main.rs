//! gh-sweep CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Resolve configuration**: parse flags, load the TOML config file and
//!    merge them into [`config::Settings`].
//! 2. **Wire observability**: install the `tracing-subscriber` stack on stderr,
//!    plus an OTLP exporter when an endpoint is configured.
//! 3. **Construct infrastructure**: build the [`github::GitHubClient`] and
//!    inject it into a [`scanner::NamespaceScanner`]. Without a configured
//!    namespace, the authenticated user's login is scanned.
//! 4. **Scan and report**: run the scan with progress logging, cancel it on
//!    Ctrl-C, and render the chosen report to stdout or a file.
//!
//! The process exits non-zero only when the scan cannot start or the
//! namespace's repositories cannot be listed. Per-repository failures are part
//! of the report.

mod args;
mod config;
mod report;
mod telemetry;

use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use github::GitHubClient;
use scanner::{CancellationToken, NamespaceScanner};
use sweep::{Namespace, ScanProgress};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::args::Args;
use crate::config::{FileConfig, Settings};

const PROGRESS_BUFFER: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let file = FileConfig::load(args.config.as_deref())?;
    let settings = Settings::resolve(&args, file, std::env::var("GH_TOKEN").ok())?;

    let telemetry = telemetry::init(settings.log_format, settings.otlp_endpoint.as_deref())?;
    let outcome = run(&settings).await;
    if let Err(e) = &outcome {
        tracing::error!(error = %e, "Scan failed");
    }
    telemetry.shutdown();
    outcome
}

async fn run(settings: &Settings) -> anyhow::Result<()> {
    let client =
        GitHubClient::new(settings.client.clone()).context("failed to build GitHub client")?;
    let namespace = match &settings.namespace {
        Some(namespace) => namespace.clone(),
        None => authenticated_namespace(&client).await?,
    };
    let scanner = NamespaceScanner::new(Arc::new(client), settings.options.clone())?;

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; finishing with the repositories scanned so far");
                cancel.cancel();
            }
        })
    };

    let (tx, rx) = mpsc::channel(PROGRESS_BUFFER);
    let progress = tokio::spawn(log_progress(rx));

    let scanned = scanner
        .scan_with_progress(&cancel, &namespace, Some(tx))
        .await;
    interrupt.abort();
    let _ = progress.await;
    let result = scanned?;

    let report = report::render(&result, settings.format)?;
    match &settings.output {
        Some(path) => {
            std::fs::write(path, report)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(report.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write report to stdout")?;
        }
    }
    Ok(())
}

async fn authenticated_namespace(client: &GitHubClient) -> anyhow::Result<Namespace> {
    let login = client
        .authenticated_login()
        .await
        .context("no namespace given and the authenticated user could not be looked up; pass --namespace")?;
    info!(namespace = %login, "Scanning the authenticated user's namespace");
    Namespace::new(login).ok_or_else(|| anyhow!("GitHub returned an empty login; pass --namespace"))
}

async fn log_progress(mut rx: mpsc::Receiver<ScanProgress>) {
    while let Some(p) = rx.recv().await {
        info!(
            scanned = p.scanned,
            total = p.total,
            repository = %p.repository,
            orphans = p.orphans,
            "Progress"
        );
    }
}
