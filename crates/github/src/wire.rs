//! REST payload shapes and their conversion into `sweep` types.
//!
//! Only the fields the scanner reads are modelled; serde ignores the rest.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sweep::{
    Branch, BranchName, CommitSha, GitHubError, PullRequest, PullRequestNumber,
    PullRequestState, Repository, RepositoryName, Timestamp,
};

fn missing(field: &str) -> GitHubError {
    GitHubError::Decode {
        message: format!("empty `{field}`"),
    }
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryPayload {
    name: String,
    full_name: String,
    owner: OwnerPayload,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct OwnerPayload {
    login: String,
}

impl RepositoryPayload {
    pub(crate) fn into_repository(self) -> Result<Repository, GitHubError> {
        Ok(Repository {
            full_name: RepositoryName::new(self.full_name).ok_or_else(|| missing("full_name"))?,
            default_branch: BranchName::new(self.default_branch)
                .ok_or_else(|| missing("default_branch"))?,
            owner: self.owner.login,
            name: self.name,
            archived: self.archived,
            private: self.private,
        })
    }
}

/// Body of `user`.
#[derive(Debug, Deserialize)]
pub(crate) struct UserPayload {
    pub(crate) login: String,
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

/// Entry of `repos/{o}/{r}/branches`. Carries no commit date.
#[derive(Debug, Deserialize)]
pub(crate) struct BranchPayload {
    pub(crate) name: String,
    pub(crate) commit: BranchCommitRef,
    #[serde(default)]
    pub(crate) protected: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BranchCommitRef {
    pub(crate) sha: String,
}

impl BranchPayload {
    pub(crate) fn into_branch(self, last_commit_date: Timestamp) -> Result<Branch, GitHubError> {
        Ok(Branch {
            name: BranchName::new(self.name).ok_or_else(|| missing("name"))?,
            sha: CommitSha::new(self.commit.sha).ok_or_else(|| missing("commit.sha"))?,
            protected: self.protected,
            last_commit_date,
        })
    }
}

/// Body of `repos/{o}/{r}/commits/{sha}`.
#[derive(Debug, Deserialize)]
pub(crate) struct CommitPayload {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    committer: Option<Signature>,
    author: Option<Signature>,
}

#[derive(Debug, Deserialize)]
struct Signature {
    date: DateTime<Utc>,
}

impl CommitPayload {
    /// Committer date, or author date when the committer is absent.
    pub(crate) fn date(&self) -> Result<Timestamp, GitHubError> {
        self.commit
            .committer
            .as_ref()
            .or(self.commit.author.as_ref())
            .map(|s| Timestamp::from_utc(s.date))
            .ok_or_else(|| missing("commit.committer.date"))
    }
}

// ---------------------------------------------------------------------------
// Pull requests
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestPayload {
    number: u64,
    #[serde(default)]
    title: String,
    state: PullRequestState,
    head: HeadRef,
    merged_at: Option<Timestamp>,
    closed_at: Option<Timestamp>,
}

#[derive(Debug, Deserialize)]
struct HeadRef {
    #[serde(rename = "ref")]
    name: String,
}

impl PullRequestPayload {
    pub(crate) fn into_pull_request(self) -> Result<PullRequest, GitHubError> {
        Ok(PullRequest {
            number: PullRequestNumber::new(self.number),
            title: self.title,
            state: self.state,
            head_ref: BranchName::new(self.head.name).ok_or_else(|| missing("head.ref"))?,
            merged_at: self.merged_at,
            closed_at: self.closed_at,
        })
    }
}
