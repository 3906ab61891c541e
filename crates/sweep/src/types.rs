//! Snapshot value types fetched from GitHub.
//!
//! These mirror the subset of the GitHub REST model the scanner needs. They are
//! fetched once per scan and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BranchName, CommitSha, PullRequestNumber, RepositoryName};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Number of whole 24-hour periods between `self` and `later`.
    ///
    /// Truncates toward zero, so a timestamp in the future of `later` yields a
    /// non-positive count.
    pub fn whole_days_until(self, later: Timestamp) -> i64 {
        (later.0 - self.0).num_days()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// A repository owned by the scanned namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Login of the owning organization or user.
    pub owner: String,
    /// Repository name without the owner prefix.
    pub name: String,
    /// `"owner/name"`.
    pub full_name: RepositoryName,
    /// The repository's primary branch; never classified.
    pub default_branch: BranchName,
    /// Archived repositories are read-only and skipped by the scanner.
    pub archived: bool,
    pub private: bool,
}

/// Repositories of a namespace together with the kind of account that owns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceListing {
    pub repositories: Vec<Repository>,
    /// `true` when the namespace resolved as an organization, `false` for a user.
    pub is_organization: bool,
}

// ---------------------------------------------------------------------------
// Branch
// ---------------------------------------------------------------------------

/// A branch head as reported by the branch listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: BranchName,
    pub sha: CommitSha,
    pub protected: bool,
    /// Date of the commit the branch currently points at.
    pub last_commit_date: Timestamp,
}

// ---------------------------------------------------------------------------
// Pull request
// ---------------------------------------------------------------------------

/// Lifecycle state reported by GitHub for a pull request.
///
/// A merged pull request is reported as `Closed`; merging is signalled by
/// [`PullRequest::merged_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestState {
    Open,
    Closed,
    /// Any state string this client does not recognise.
    #[serde(other)]
    Unknown,
}

/// The `state` filter accepted by the pull request listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PullRequestStateFilter {
    Open,
    Closed,
    All,
}

impl PullRequestStateFilter {
    /// Query-string value understood by the GitHub API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

/// A pull request of a repository, open or historical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: PullRequestNumber,
    pub title: String,
    pub state: PullRequestState,
    /// Name of the branch the pull request was opened from.
    pub head_ref: BranchName,
    pub merged_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
}

impl PullRequest {
    /// Returns `true` if the pull request was merged.
    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }
}
