//! HTTP plumbing: headers, pagination and status mapping.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client as HttpClient, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sweep::GitHubError;
use tracing::debug;

use crate::wire::UserPayload;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = "gh-sweep";
const API_VERSION: &str = "2022-11-28";
pub(crate) const PER_PAGE: usize = 100;

/// Connection settings for [`GitHubClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST root, e.g. `https://api.github.com` or `https://ghe.example.com/api/v3`.
    pub api_url: String,
    /// Sent as a bearer token when present.
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
        }
    }
}

/// GitHub REST client implementing [`sweep::GitHubApi`].
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: HttpClient,
    api_url: Url,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Result<Self, GitHubError> {
        let api_url = Url::parse(&config.api_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| GitHubError::InvalidInput {
                message: format!("invalid API URL `{}`", config.api_url),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(API_VERSION),
        );

        let http = HttpClient::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(transport)?;

        Ok(Self {
            http,
            api_url,
            token: config.token.filter(|t| !t.is_empty()),
        })
    }

    /// Login of the user the token belongs to (`GET user`).
    pub async fn authenticated_login(&self) -> Result<String, GitHubError> {
        let user: UserPayload = self.get(&["user"], &[]).await?;
        Ok(user.login)
    }

    /// Appends `segments` to the API root, percent-encoding each one, so a
    /// `#` or `?` inside a branch name stays part of the path.
    pub(crate) fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, GitHubError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| GitHubError::InvalidInput {
                message: format!("invalid API URL `{}`", self.api_url),
            })?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Response, GitHubError> {
        let path = segments.join("/");
        let mut request = self.http.request(method.clone(), self.url(segments, query)?);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        debug!(%method, path = %path, "GitHub request");
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &path, &body))
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, GitHubError> {
        let response = self.send(Method::GET, segments, query).await?;
        let text = response.text().await.map_err(transport)?;
        decode(&segments.join("/"), &text)
    }

    /// Follows `per_page`/`page` until a page comes back short.
    pub(crate) async fn get_all<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, GitHubError> {
        let per_page = PER_PAGE.to_string();
        let mut items = Vec::new();
        for page in 1.. {
            let page = page.to_string();
            let mut paged = query.to_vec();
            paged.push(("per_page", &per_page));
            paged.push(("page", &page));

            let batch: Vec<T> = self.get(segments, &paged).await?;
            let len = batch.len();
            items.extend(batch);
            if len < PER_PAGE {
                break;
            }
        }
        Ok(items)
    }

    pub(crate) async fn delete(&self, segments: &[&str]) -> Result<(), GitHubError> {
        self.send(Method::DELETE, segments, &[]).await.map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn transport(err: reqwest::Error) -> GitHubError {
    GitHubError::Transport {
        message: err.to_string(),
    }
}

fn decode<T: DeserializeOwned>(path: &str, text: &str) -> Result<T, GitHubError> {
    serde_json::from_str(text).map_err(|e| GitHubError::Decode {
        message: format!("{path}: {e}"),
    })
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maps a non-success response to the port error.
pub(crate) fn status_error(status: StatusCode, path: &str, body: &str) -> GitHubError {
    if status == StatusCode::NOT_FOUND {
        return GitHubError::NotFound {
            resource: path.to_string(),
        };
    }
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string(),
        Err(_) => body.trim().to_string(),
    };
    GitHubError::Api {
        status: status.as_u16(),
        message,
    }
}
