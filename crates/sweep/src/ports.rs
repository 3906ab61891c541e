//! The GitHub port: everything the scanner needs from GitHub.
//!
//! The `github` crate implements this over the REST API; tests implement it in
//! memory. Pagination, authentication headers and host selection are the
//! implementation's concern and never leak into this trait.

use async_trait::async_trait;

use crate::{
    Branch, BranchName, GitHubError, Namespace, NamespaceListing, PullRequest,
    PullRequestStateFilter,
};

/// Read access to repositories, branches and pull requests, plus branch deletion.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Lists every repository of `namespace`, archived ones included.
    ///
    /// The implementation decides whether `namespace` is an organization or a
    /// user and reports it in [`NamespaceListing::is_organization`].
    async fn list_namespace_repositories(
        &self,
        namespace: &Namespace,
    ) -> Result<NamespaceListing, GitHubError>;

    /// Lists every branch of `owner/repo`, in API order.
    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, GitHubError>;

    /// Lists the pull requests of `owner/repo` matching `state`, in API order.
    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        state: PullRequestStateFilter,
    ) -> Result<Vec<PullRequest>, GitHubError>;

    /// Deletes `branch` from `owner/repo`.
    ///
    /// Never called by the scanner; exposed for callers acting on scan results.
    async fn delete_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &BranchName,
    ) -> Result<(), GitHubError>;
}
