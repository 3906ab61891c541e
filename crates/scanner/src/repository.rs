//! Scans a single repository.

use std::sync::Arc;

use sweep::{
    BranchClassifier, GitHubApi, PullRequestStateFilter, Repository, ScanResult, Timestamp,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Lists a repository's branches and pull requests and classifies each
/// non-default branch.
///
/// Cheap to clone; one instance is shared by every worker of a namespace scan.
#[derive(Clone)]
pub struct RepositoryScanner {
    client: Arc<dyn GitHubApi>,
    classifier: Arc<BranchClassifier>,
}

impl RepositoryScanner {
    pub fn new(client: Arc<dyn GitHubApi>, classifier: Arc<BranchClassifier>) -> Self {
        Self { client, classifier }
    }

    /// Scans `repository`.
    ///
    /// Never fails: a listing error is returned inside the [`ScanResult`]. When
    /// `cancel` fires, branches not yet classified are skipped and the orphans
    /// found so far are returned.
    #[tracing::instrument(
        name = "scan_repository",
        skip_all,
        fields(repository = %repository.full_name)
    )]
    pub async fn scan(&self, cancel: &CancellationToken, repository: Repository) -> ScanResult {
        let branches = match self
            .client
            .list_branches(&repository.owner, &repository.name)
            .await
        {
            Ok(branches) => branches,
            Err(error) => {
                warn!(%error, "Failed to list branches");
                return ScanResult::failed(repository, error);
            }
        };

        let pull_requests = match self
            .client
            .list_pull_requests(
                &repository.owner,
                &repository.name,
                PullRequestStateFilter::All,
            )
            .await
        {
            Ok(pull_requests) => pull_requests,
            Err(error) => {
                warn!(%error, "Failed to list pull requests");
                return ScanResult::failed(repository, error);
            }
        };

        let now = Timestamp::now();
        let mut orphans = Vec::new();
        for branch in branches
            .iter()
            .filter(|b| b.name != repository.default_branch)
        {
            if cancel.is_cancelled() {
                debug!("Scan cancelled; remaining branches skipped");
                break;
            }

            match self
                .classifier
                .classify_at(&repository, branch, &pull_requests, now)
            {
                Some(orphan) => {
                    trace!(branch = %branch.name, orphan_type = %orphan.orphan_type, "Orphan");
                    orphans.push(orphan);
                }
                None => trace!(branch = %branch.name, "Not an orphan"),
            }
        }

        debug!(
            branches = branches.len(),
            pull_requests = pull_requests.len(),
            orphans = orphans.len(),
            "Repository scanned"
        );
        ScanResult::completed(repository, orphans)
    }
}
