//! In-memory [`GitHubApi`] for scanner tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sweep::{
    Branch, BranchName, CommitSha, GitHubApi, GitHubError, Namespace, NamespaceListing,
    PullRequest, PullRequestNumber, PullRequestState, PullRequestStateFilter, Repository,
    RepositoryName, Timestamp,
};

pub(crate) fn repo(name: &str) -> Repository {
    Repository {
        owner: "acme".into(),
        name: name.into(),
        full_name: RepositoryName::new(format!("acme/{name}")).unwrap(),
        default_branch: BranchName::new("main").unwrap(),
        archived: false,
        private: false,
    }
}

pub(crate) fn archived(name: &str) -> Repository {
    Repository {
        archived: true,
        ..repo(name)
    }
}

pub(crate) fn branch(name: &str, days_ago: i64) -> Branch {
    Branch {
        name: BranchName::new(name).unwrap(),
        sha: CommitSha::new(format!("sha-{name}")).unwrap(),
        protected: false,
        last_commit_date: Timestamp::from_utc(Utc::now() - chrono::Duration::days(days_ago)),
    }
}

fn pull(number: u64, head: &str, state: PullRequestState, merged: bool) -> PullRequest {
    let closed = (state == PullRequestState::Closed).then(Timestamp::now);
    PullRequest {
        number: PullRequestNumber::new(number),
        title: format!("PR {number}"),
        state,
        head_ref: BranchName::new(head).unwrap(),
        merged_at: if merged { closed } else { None },
        closed_at: closed,
    }
}

pub(crate) fn merged_pr(number: u64, head: &str) -> PullRequest {
    pull(number, head, PullRequestState::Closed, true)
}

pub(crate) fn closed_pr(number: u64, head: &str) -> PullRequest {
    pull(number, head, PullRequestState::Closed, false)
}

pub(crate) fn open_pr(number: u64, head: &str) -> PullRequest {
    pull(number, head, PullRequestState::Open, false)
}

/// Canned responses keyed by `"owner/repo"`, plus call accounting.
///
/// Repositories without canned data have no branches and no pull requests.
/// With a delay set, every branch listing sleeps for it, which makes
/// concurrent scans overlap under a paused tokio clock.
pub(crate) struct FakeGitHub {
    listing: Result<NamespaceListing, GitHubError>,
    branches: HashMap<String, Result<Vec<Branch>, GitHubError>>,
    pulls: HashMap<String, Result<Vec<PullRequest>, GitHubError>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    branch_calls: AtomicUsize,
}

impl FakeGitHub {
    fn with_listing(listing: Result<NamespaceListing, GitHubError>) -> Self {
        Self {
            listing,
            branches: HashMap::new(),
            pulls: HashMap::new(),
            delay: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            branch_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn organization(repositories: Vec<Repository>) -> Self {
        Self::with_listing(Ok(NamespaceListing {
            repositories,
            is_organization: true,
        }))
    }

    pub(crate) fn user(repositories: Vec<Repository>) -> Self {
        Self::with_listing(Ok(NamespaceListing {
            repositories,
            is_organization: false,
        }))
    }

    pub(crate) fn unlistable(error: GitHubError) -> Self {
        Self::with_listing(Err(error))
    }

    pub(crate) fn with_branches(mut self, full_name: &str, branches: Vec<Branch>) -> Self {
        self.branches.insert(full_name.to_string(), Ok(branches));
        self
    }

    pub(crate) fn failing_branches(mut self, full_name: &str, error: GitHubError) -> Self {
        self.branches.insert(full_name.to_string(), Err(error));
        self
    }

    pub(crate) fn with_pulls(mut self, full_name: &str, pulls: Vec<PullRequest>) -> Self {
        self.pulls.insert(full_name.to_string(), Ok(pulls));
        self
    }

    pub(crate) fn failing_pulls(mut self, full_name: &str, error: GitHubError) -> Self {
        self.pulls.insert(full_name.to_string(), Err(error));
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Highest number of branch listings observed running at once.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn branch_calls(&self) -> usize {
        self.branch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn list_namespace_repositories(
        &self,
        _namespace: &Namespace,
    ) -> Result<NamespaceListing, GitHubError> {
        self.listing.clone()
    }

    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, GitHubError> {
        self.branch_calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.branches
            .get(&format!("{owner}/{repo}"))
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        _state: PullRequestStateFilter,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        self.pulls
            .get(&format!("{owner}/{repo}"))
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn delete_branch(
        &self,
        _owner: &str,
        _repo: &str,
        _branch: &BranchName,
    ) -> Result<(), GitHubError> {
        Ok(())
    }
}
