//! gh-sweep scan orchestration.
//!
//! [`RepositoryScanner`] lists one repository's branches and pull requests and
//! runs the [`sweep::BranchClassifier`] over every non-default branch.
//! [`NamespaceScanner`] fans that out over every non-archived repository of a
//! namespace, at most [`sweep::ScanOptions::concurrency`] at a time, and folds
//! the per-repository results into a [`sweep::NamespaceScanResult`].
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The scanners sequence calls between the classifier
//! in the [`sweep`] crate and the [`sweep::GitHubApi`] port. They contain no
//! classification rules of their own.
//!
//! ## Failure isolation
//!
//! Only the namespace's repository listing can fail a scan. A repository whose
//! branches or pull requests cannot be listed is recorded with its error and
//! contributes no orphans.
//!
//! ## Cancellation
//!
//! A [`CancellationToken`] is checked before a worker takes a concurrency slot
//! and before each branch is classified. Results produced before cancellation
//! are kept.

mod namespace;
mod progress;
mod repository;

#[cfg(test)]
mod testing;

pub use namespace::NamespaceScanner;
pub use repository::RepositoryScanner;
pub use tokio_util::sync::CancellationToken;
