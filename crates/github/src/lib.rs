//! gh-sweep GitHub infrastructure adapter.
//!
//! Implements the [`sweep::GitHubApi`] port over the GitHub REST API v3 using
//! [`reqwest`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain classification rules.
//! Pagination, request headers, host selection and the organization/user
//! fallback are handled here; the [`sweep`] and `scanner` crates never see
//! them.
//!
//! ## Endpoints
//!
//! | Port method | Endpoint |
//! |-------------|----------|
//! | `list_namespace_repositories` | `GET orgs/{ns}/repos`, then `GET users/{ns}/repos` on 404 |
//! | `list_branches` | `GET repos/{o}/{r}/branches`, plus `GET repos/{o}/{r}/commits/{sha}` per branch |
//! | `list_pull_requests` | `GET repos/{o}/{r}/pulls?state=...` |
//! | `delete_branch` | `DELETE repos/{o}/{r}/git/refs/heads/{branch}` |
//!
//! Every path segment is percent-encoded on its own; a branch name keeps its
//! `/` separators but a `#` or `?` in it stays part of the path.
//! [`GitHubClient::authenticated_login`] (`GET user`) is outside the port and
//! serves the binary's namespace default.

mod api;
mod client;
mod wire;

#[cfg(test)]
mod test_server;

pub use client::{ClientConfig, GitHubClient, DEFAULT_API_URL};
