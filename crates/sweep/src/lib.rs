//! Core domain for gh-sweep.
//!
//! This crate contains the snapshot types fetched from GitHub, the scan result
//! types, the scan options, the branch classifier, and the [`GitHubApi`] port
//! the scanners are written against. Infrastructure crates implement the port;
//! they never add classification rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`BranchName`, `RepositoryName`, `ScanRunId`, ...) |
//! | [`types`] | GitHub snapshot types (`Repository`, `Branch`, `PullRequest`, `Timestamp`) |
//! | [`results`] | `OrphanType`, `OrphanedBranch`, `ScanResult`, `NamespaceScanResult`, `ScanProgress` |
//! | [`options`] | `ScanOptions` and its defaults |
//! | [`classifier`] | `BranchClassifier` |
//! | [`ports`] | The `GitHubApi` trait |
//! | [`errors`] | `GitHubError` and `ScanError` |

pub mod classifier;
pub mod errors;
pub mod identifiers;
pub mod options;
pub mod ports;
pub mod results;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use classifier::BranchClassifier;
pub use errors::{GitHubError, ScanError};
pub use identifiers::{
    BranchName, CommitSha, Namespace, PullRequestNumber, RepositoryName, ScanRunId,
};
pub use options::{
    ScanOptions, DEFAULT_CONCURRENCY, DEFAULT_EXCLUDE_PATTERNS, DEFAULT_STALE_DAYS_THRESHOLD,
    MAX_CONCURRENCY,
};
pub use ports::GitHubApi;
pub use results::{NamespaceScanResult, OrphanType, OrphanedBranch, ScanProgress, ScanResult};
pub use types::{
    Branch, NamespaceListing, PullRequest, PullRequestState, PullRequestStateFilter, Repository,
    Timestamp,
};
