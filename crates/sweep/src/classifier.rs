//! The branch classifier: decides whether one branch is an orphan.
//!
//! Classification is a pure function of the branch, its repository, the
//! repository's pull requests, the [`ScanOptions`] and the evaluation instant.
//! The steps run in a fixed order and the first decisive one wins:
//!
//! 1. exclusion patterns (exact name or glob),
//! 2. branch protection,
//! 3. associated pull requests, with any open one vetoing classification,
//! 4. merged PR, closed PR, staleness, and finally the recent-branch opt-in.

use glob::{MatchOptions, Pattern};

use crate::{
    Branch, OrphanType, OrphanedBranch, PullRequest, PullRequestState, Repository, ScanOptions,
    Timestamp,
};

/// `*` and `?` stay within one path segment, so `release/*` matches
/// `release/v1.0` but not `release/v1/rc`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One entry of [`ScanOptions::exclude_patterns`], compiled once.
#[derive(Debug, Clone)]
struct ExcludePattern {
    raw: String,
    /// `None` when `raw` is not a valid glob; it then only matches exactly.
    glob: Option<Pattern>,
}

impl ExcludePattern {
    fn compile(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            glob: Pattern::new(raw).ok(),
        }
    }

    fn matches(&self, branch: &str) -> bool {
        self.glob
            .as_ref()
            .is_some_and(|g| g.matches_with(branch, MATCH_OPTIONS))
            || self.raw == branch
    }
}

/// Pull requests whose head is the branch under classification, bucketed by state.
///
/// Within a bucket the last pull request in listing order is kept.
#[derive(Debug, Default)]
struct AssociatedPullRequests<'a> {
    merged: Option<&'a PullRequest>,
    closed: Option<&'a PullRequest>,
    open: Option<&'a PullRequest>,
}

impl<'a> AssociatedPullRequests<'a> {
    fn collect(branch: &Branch, pull_requests: &'a [PullRequest]) -> Self {
        let mut found = Self::default();
        for pr in pull_requests.iter().filter(|pr| pr.head_ref == branch.name) {
            if pr.is_merged() {
                found.merged = Some(pr);
            } else if pr.state == PullRequestState::Closed {
                found.closed = Some(pr);
            } else if pr.state == PullRequestState::Open {
                found.open = Some(pr);
            }
        }
        found
    }
}

/// Classifies branches against a fixed set of [`ScanOptions`].
#[derive(Debug, Clone)]
pub struct BranchClassifier {
    options: ScanOptions,
    exclude: Vec<ExcludePattern>,
}

impl BranchClassifier {
    pub fn new(options: ScanOptions) -> Self {
        let exclude = options
            .exclude_patterns
            .iter()
            .map(|p| ExcludePattern::compile(p))
            .collect();
        Self { options, exclude }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Returns `true` if `branch_name` matches any exclude pattern.
    pub fn is_excluded(&self, branch_name: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(branch_name))
    }

    /// Classifies `branch` as of now.
    pub fn classify(
        &self,
        repository: &Repository,
        branch: &Branch,
        pull_requests: &[PullRequest],
    ) -> Option<OrphanedBranch> {
        self.classify_at(repository, branch, pull_requests, Timestamp::now())
    }

    /// Classifies `branch` as of `now`.
    ///
    /// Returns `None` when the branch is excluded, protected (unless
    /// protected branches are included), has an open pull request, or has no
    /// pull request and is neither stale nor covered by the recent-branch
    /// opt-in.
    pub fn classify_at(
        &self,
        repository: &Repository,
        branch: &Branch,
        pull_requests: &[PullRequest],
        now: Timestamp,
    ) -> Option<OrphanedBranch> {
        if self.is_excluded(branch.name.as_str()) {
            return None;
        }

        if branch.protected && !self.options.include_protected {
            return None;
        }

        let associated = AssociatedPullRequests::collect(branch, pull_requests);
        if associated.open.is_some() {
            return None;
        }

        let days_since_activity = branch.last_commit_date.whole_days_until(now);

        let (orphan_type, pr) = if let Some(pr) = associated.merged {
            (OrphanType::MergedPr, Some(pr))
        } else if let Some(pr) = associated.closed {
            (OrphanType::ClosedPr, Some(pr))
        } else if days_since_activity >= i64::from(self.options.stale_days_threshold) {
            (OrphanType::Stale, None)
        } else if self.options.include_recent_no_pr {
            (OrphanType::RecentNoPr, None)
        } else {
            return None;
        };

        Some(OrphanedBranch {
            repository: repository.full_name.clone(),
            branch_name: branch.name.clone(),
            sha: branch.sha.clone(),
            last_commit_date: branch.last_commit_date,
            orphan_type,
            pr_number: pr.map(|p| p.number),
            pr_title: pr.map(|p| p.title.clone()),
            days_since_activity,
            protected: branch.protected,
        })
    }
}
