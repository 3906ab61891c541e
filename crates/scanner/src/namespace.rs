//! Namespace-wide scan: bounded fan-out over repositories, single aggregator.

use std::sync::Arc;

use sweep::{
    BranchClassifier, GitHubApi, Namespace, NamespaceScanResult, ScanError, ScanOptions,
    ScanProgress, ScanRunId,
};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, Instrument};

use crate::progress::ProgressReporter;
use crate::RepositoryScanner;

/// Scans every non-archived repository of a namespace.
///
/// At most [`ScanOptions::concurrency`] repositories are scanned at once. The
/// remaining repositories wait for a free slot.
pub struct NamespaceScanner {
    client: Arc<dyn GitHubApi>,
    options: Arc<ScanOptions>,
    repositories: RepositoryScanner,
}

impl NamespaceScanner {
    /// Builds a scanner, rejecting options a scan cannot run with.
    pub fn new(client: Arc<dyn GitHubApi>, options: ScanOptions) -> Result<Self, ScanError> {
        options.validate()?;
        let classifier = Arc::new(BranchClassifier::new(options.clone()));
        Ok(Self {
            repositories: RepositoryScanner::new(Arc::clone(&client), classifier),
            client,
            options: Arc::new(options),
        })
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scans `namespace` without progress reporting.
    pub async fn scan(
        &self,
        cancel: &CancellationToken,
        namespace: &Namespace,
    ) -> Result<NamespaceScanResult, ScanError> {
        self.scan_with_progress(cancel, namespace, None).await
    }

    /// Scans `namespace`, offering a [`ScanProgress`] snapshot to `progress`
    /// after each repository finishes.
    ///
    /// Snapshots are sent with `try_send`: when the channel is full the
    /// snapshot is dropped and the scan carries on.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ListRepositories`] when the namespace's
    /// repositories cannot be listed. Per-repository failures are recorded in
    /// the returned result instead.
    pub async fn scan_with_progress(
        &self,
        cancel: &CancellationToken,
        namespace: &Namespace,
        progress: Option<mpsc::Sender<ScanProgress>>,
    ) -> Result<NamespaceScanResult, ScanError> {
        let span = info_span!(
            "scan_namespace",
            %namespace,
            scan_run_id = %ScanRunId::new_random()
        );
        self.run(cancel, namespace, progress).instrument(span).await
    }

    async fn run(
        &self,
        cancel: &CancellationToken,
        namespace: &Namespace,
        progress: Option<mpsc::Sender<ScanProgress>>,
    ) -> Result<NamespaceScanResult, ScanError> {
        let listing = self
            .client
            .list_namespace_repositories(namespace)
            .await
            .map_err(|source| ScanError::ListRepositories {
                namespace: namespace.clone(),
                source,
            })?;

        let listed = listing.repositories.len();
        let repositories: Vec<_> = listing
            .repositories
            .into_iter()
            .filter(|r| !r.archived)
            .collect();
        let total = repositories.len();
        info!(
            is_organization = listing.is_organization,
            repositories = total,
            archived = listed - total,
            concurrency = self.options.concurrency,
            "Scanning namespace"
        );

        let mut aggregate = NamespaceScanResult::new(namespace.clone(), listing.is_organization, total);
        if total == 0 {
            return Ok(aggregate);
        }

        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.min(total)));
        let reporter = progress.map(|sink| ProgressReporter::new(sink, total));
        // Sized so a worker never waits on the aggregator.
        let (tx, mut rx) = mpsc::channel(total);
        let mut workers = JoinSet::new();

        for repository in repositories {
            let cancel = cancel.clone();
            let scanner = self.repositories.clone();
            let semaphore = Arc::clone(&semaphore);
            let reporter = reporter.clone();
            let tx = tx.clone();

            workers.spawn(
                async move {
                    if cancel.is_cancelled() {
                        return;
                    }
                    let _permit = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return,
                        permit = semaphore.acquire_owned() => match permit {
                            Ok(permit) => permit,
                            Err(_) => return,
                        },
                    };

                    let result = scanner.scan(&cancel, repository).await;
                    if let Some(reporter) = &reporter {
                        reporter.record(&result);
                    }
                    let _ = tx.send(result).await;
                }
                .in_current_span(),
            );
        }
        drop(tx);

        while let Some(result) = rx.recv().await {
            aggregate.push(result);
        }
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Repository worker panicked");
            }
        }

        if cancel.is_cancelled() {
            debug!(
                scanned = aggregate.results().len(),
                "Scan cancelled; returning partial result"
            );
        }
        info!(
            scanned = aggregate.results().len(),
            failed = aggregate.failed_results().count(),
            orphans = aggregate.total_orphans(),
            "Namespace scan complete"
        );
        Ok(aggregate)
    }
}
