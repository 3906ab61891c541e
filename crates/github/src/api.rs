//! [`GitHubApi`] implementation for [`GitHubClient`].

use async_trait::async_trait;
use sweep::{
    Branch, BranchName, GitHubApi, GitHubError, Namespace, NamespaceListing, PullRequest,
    PullRequestStateFilter, Repository,
};
use tracing::{debug, instrument};

use crate::wire::{BranchPayload, CommitPayload, PullRequestPayload, RepositoryPayload};
use crate::GitHubClient;

fn require(value: &str, what: &str) -> Result<(), GitHubError> {
    if value.is_empty() {
        return Err(GitHubError::InvalidInput {
            message: format!("{what} must not be empty"),
        });
    }
    Ok(())
}

impl GitHubClient {
    /// `kind` is `orgs` or `users`.
    async fn list_repositories(
        &self,
        kind: &str,
        namespace: &Namespace,
    ) -> Result<Vec<Repository>, GitHubError> {
        self.get_all::<RepositoryPayload>(&[kind, namespace.as_str(), "repos"], &[])
            .await?
            .into_iter()
            .map(RepositoryPayload::into_repository)
            .collect()
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    #[instrument(skip_all, fields(namespace = %namespace))]
    async fn list_namespace_repositories(
        &self,
        namespace: &Namespace,
    ) -> Result<NamespaceListing, GitHubError> {
        match self.list_repositories("orgs", namespace).await {
            Ok(repositories) => Ok(NamespaceListing {
                repositories,
                is_organization: true,
            }),
            Err(e) if e.is_not_found() => {
                debug!("Not an organization; listing user repositories");
                let repositories = self.list_repositories("users", namespace).await?;
                Ok(NamespaceListing {
                    repositories,
                    is_organization: false,
                })
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, GitHubError> {
        require(owner, "owner")?;
        require(repo, "repo")?;

        let payloads: Vec<BranchPayload> = self
            .get_all(&["repos", owner, repo, "branches"], &[])
            .await?;

        let mut branches = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let commit: CommitPayload = self
                .get(&["repos", owner, repo, "commits", payload.commit.sha.as_str()], &[])
                .await?;
            branches.push(payload.into_branch(commit.date()?)?);
        }
        debug!(count = branches.len(), "Branches listed");
        Ok(branches)
    }

    #[instrument(skip(self))]
    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        state: PullRequestStateFilter,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        require(owner, "owner")?;
        require(repo, "repo")?;

        self.get_all::<PullRequestPayload>(
            &["repos", owner, repo, "pulls"],
            &[("state", state.as_str())],
        )
        .await?
        .into_iter()
        .map(PullRequestPayload::into_pull_request)
        .collect()
    }

    #[instrument(skip_all, fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn delete_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &BranchName,
    ) -> Result<(), GitHubError> {
        require(owner, "owner")?;
        require(repo, "repo")?;

        // Slashes in a branch name separate ref path components.
        let mut segments = vec!["repos", owner, repo, "git", "refs", "heads"];
        segments.extend(branch.as_str().split('/'));
        self.delete(&segments).await
    }
}
