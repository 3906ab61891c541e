//! Scan outcome types: classified orphans, per-repository and per-namespace results.

use serde::{Deserialize, Serialize};

use crate::{
    BranchName, CommitSha, GitHubError, Namespace, PullRequestNumber, Repository,
    RepositoryName, Timestamp,
};

// ---------------------------------------------------------------------------
// Orphan classification
// ---------------------------------------------------------------------------

/// Why a branch is considered a cleanup candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanType {
    /// The branch's pull request was merged but the branch was not deleted.
    MergedPr,
    /// The branch's pull request was closed without merging.
    ClosedPr,
    /// No pull request, and no commit for at least the stale threshold.
    Stale,
    /// No pull request, active more recently than the stale threshold.
    RecentNoPr,
}

impl OrphanType {
    /// Every category, in report order.
    pub const ALL: [OrphanType; 4] = [
        OrphanType::MergedPr,
        OrphanType::ClosedPr,
        OrphanType::Stale,
        OrphanType::RecentNoPr,
    ];

    /// Wire value, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MergedPr => "merged_pr",
            Self::ClosedPr => "closed_pr",
            Self::Stale => "stale",
            Self::RecentNoPr => "recent_no_pr",
        }
    }

    /// Human-readable label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::MergedPr => "Merged PR",
            Self::ClosedPr => "Closed PR",
            Self::Stale => "Stale",
            Self::RecentNoPr => "Recent (no PR)",
        }
    }
}

impl std::fmt::Display for OrphanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A branch the classifier flagged as a cleanup candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedBranch {
    pub repository: RepositoryName,
    pub branch_name: BranchName,
    pub sha: CommitSha,
    pub last_commit_date: Timestamp,
    #[serde(rename = "type")]
    pub orphan_type: OrphanType,
    /// Set for [`OrphanType::MergedPr`] and [`OrphanType::ClosedPr`].
    pub pr_number: Option<PullRequestNumber>,
    pub pr_title: Option<String>,
    /// Whole days since the last commit at classification time.
    pub days_since_activity: i64,
    pub protected: bool,
}

impl OrphanedBranch {
    /// Stable identity: `"<owner>/<repo>/<branch>"`.
    pub fn key(&self) -> String {
        format!("{}/{}", self.repository, self.branch_name)
    }
}

// ---------------------------------------------------------------------------
// Per-repository result
// ---------------------------------------------------------------------------

/// Outcome of scanning a single repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub repository: Repository,
    pub default_branch: BranchName,
    /// In branch-listing order. Always empty when `error` is set.
    pub orphans: Vec<OrphanedBranch>,
    /// Why branch or pull request listing failed for this repository.
    pub error: Option<GitHubError>,
}

impl ScanResult {
    /// A repository that was listed and classified.
    pub fn completed(repository: Repository, orphans: Vec<OrphanedBranch>) -> Self {
        let default_branch = repository.default_branch.clone();
        Self {
            repository,
            default_branch,
            orphans,
            error: None,
        }
    }

    /// A repository whose branch or pull request listing failed.
    pub fn failed(repository: Repository, error: GitHubError) -> Self {
        let default_branch = repository.default_branch.clone();
        Self {
            repository,
            default_branch,
            orphans: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

// ---------------------------------------------------------------------------
// Namespace-wide result
// ---------------------------------------------------------------------------

/// Aggregate of every repository scanned in a namespace.
///
/// `results` is unordered: repositories appear in the order their scans
/// finished. `total_orphans` is maintained by [`NamespaceScanResult::push`] and
/// always equals the sum of `orphans.len()` over `results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceScanResult {
    namespace: Namespace,
    is_organization: bool,
    results: Vec<ScanResult>,
    total_repos: usize,
    total_orphans: usize,
}

impl NamespaceScanResult {
    /// Creates an empty result for `total_repos` repositories awaiting scan.
    pub fn new(namespace: Namespace, is_organization: bool, total_repos: usize) -> Self {
        Self {
            namespace,
            is_organization,
            results: Vec::with_capacity(total_repos),
            total_repos,
            total_orphans: 0,
        }
    }

    /// Records one repository's outcome.
    pub fn push(&mut self, result: ScanResult) {
        self.total_orphans += result.orphans.len();
        self.results.push(result);
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn is_organization(&self) -> bool {
        self.is_organization
    }

    pub fn results(&self) -> &[ScanResult] {
        &self.results
    }

    /// Number of non-archived repositories in the namespace.
    pub fn total_repos(&self) -> usize {
        self.total_repos
    }

    pub fn total_orphans(&self) -> usize {
        self.total_orphans
    }

    /// Every orphan of every repository, flattened.
    pub fn all_orphans(&self) -> impl Iterator<Item = &OrphanedBranch> + '_ {
        self.results.iter().flat_map(|r| r.orphans.iter())
    }

    /// Orphans of a single category.
    pub fn orphans_by_type(
        &self,
        orphan_type: OrphanType,
    ) -> impl Iterator<Item = &OrphanedBranch> + '_ {
        self.all_orphans()
            .filter(move |o| o.orphan_type == orphan_type)
    }

    pub fn count_by_type(&self, orphan_type: OrphanType) -> usize {
        self.orphans_by_type(orphan_type).count()
    }

    /// Repositories whose listing failed.
    pub fn failed_results(&self) -> impl Iterator<Item = &ScanResult> + '_ {
        self.results.iter().filter(|r| r.is_failed())
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Snapshot emitted after each repository finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanProgress {
    /// Repositories finished so far, including `repository`.
    pub scanned: usize,
    /// Non-archived repositories in the namespace.
    pub total: usize,
    /// The repository that just finished.
    pub repository: RepositoryName,
    /// Orphans found so far across all finished repositories.
    pub orphans: usize,
}
