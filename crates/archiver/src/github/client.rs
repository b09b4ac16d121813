//! GitHub API client.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, LINK, USER_AGENT as USER_AGENT_HEADER};

use super::convert::{owned_by, to_platform_repo};
use super::error::{GitHubError, status_code};
use super::types::{GitHubRepo, GitHubUser, PER_PAGE, USER_AGENT};
use crate::platform::{self, PlatformClient, PlatformError, RepoPage, UserInfo};

fn owned_repos_url(api_url: &str) -> String {
    format!("{}/user/repos", api_url.trim_end_matches('/'))
}

/// Pagination information extracted from GitHub's Link header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPagination {
    /// The last page number (from rel="last" link).
    pub last_page: Option<u32>,
    /// The next page number (from rel="next" link).
    pub next_page: Option<u32>,
}

/// Parse the Link header to extract pagination info.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/user/1/repos?per_page=100&page=2>; rel="next", <...&page=3>; rel="last"`
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.split(';').map(str::trim) {
            if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                url = Some(inner);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel)) = (url, rel)
            && let Some(page) = extract_page_from_url(url)
        {
            match rel {
                "last" => info.last_page = Some(page),
                "next" => info.next_page = Some(page),
                _ => {}
            }
        }
    }

    info
}

/// Extract the `page` query parameter from a URL.
fn extract_page_from_url(url: &str) -> Option<u32> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .find_map(|param| param.strip_prefix("page="))
        .and_then(|value| value.parse().ok())
}

/// Reset time from GitHub's rate limit headers, if the budget is exhausted.
fn exhausted_rate_limit(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    let remaining: u64 = header("x-ratelimit-remaining")?.parse().ok()?;
    if remaining > 0 {
        return None;
    }
    let reset: i64 = header("x-ratelimit-reset")?.parse().ok()?;
    DateTime::from_timestamp(reset, 0)
}

/// Create an authenticated Octocrab instance.
pub fn create_client(token: &str, api_url: &str) -> Result<Octocrab, GitHubError> {
    Ok(Octocrab::builder()
        .personal_token(token.to_string())
        .base_uri(api_url)?
        .build()?)
}

/// GitHub client implementing [`PlatformClient`].
///
/// Identity and archive calls go through octocrab. Listing uses a plain
/// reqwest request so the `Link` header is available for pagination.
/// Cloning is cheap; clones share the connection pools.
#[derive(Clone)]
pub struct GitHubClient {
    inner: Arc<Octocrab>,
    token: Arc<String>,
    http_client: reqwest::Client,
    api_url: Arc<String>,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Create a client against an API root: [`DEFAULT_API_URL`](super::DEFAULT_API_URL) for
    /// github.com, or a GitHub Enterprise `/api/v3` root.
    pub fn with_api_url(token: &str, api_url: &str) -> Result<Self, GitHubError> {
        let api_url = api_url.trim_end_matches('/');
        let client = create_client(token, api_url)?;
        Ok(Self {
            inner: Arc::new(client),
            token: Arc::new(token.to_string()),
            http_client: reqwest::Client::new(),
            api_url: Arc::new(api_url.to_string()),
        })
    }

    /// Fetch one page of the repositories the token holder owns.
    ///
    /// `/users/{owner}/repos` only ever returns public repositories, so the
    /// listing goes through `/user/repos`. `owner` must be the authenticated
    /// login; repositories owned by anyone else are dropped.
    pub async fn list_user_repos_page(&self, owner: &str, page: u32) -> Result<RepoPage, GitHubError> {
        let url = owned_repos_url(&self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("affiliation", "owner".to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ])
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT_HEADER, USER_AGENT)
            .header(AUTHORIZATION, format!("Bearer {}", self.token.as_str()))
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();

        match status {
            StatusCode::OK => {
                let pagination = headers
                    .get(LINK)
                    .and_then(|v| v.to_str().ok())
                    .map(parse_link_header)
                    .unwrap_or_default();

                let repos: Vec<GitHubRepo> = response
                    .json()
                    .await
                    .map_err(|e| GitHubError::Internal(format!("JSON parse error: {e}")))?;

                tracing::debug!(
                    owner,
                    page,
                    count = repos.len(),
                    next = ?pagination.next_page,
                    "Fetched repository page"
                );

                Ok(RepoPage {
                    repos: repos
                        .into_iter()
                        .filter(|repo| owned_by(repo, owner))
                        .map(|repo| to_platform_repo(repo, owner))
                        .collect(),
                    next_page: pagination.next_page,
                    last_page: pagination.last_page,
                })
            }
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                match exhausted_rate_limit(&headers) {
                    Some(reset_at) => Err(GitHubError::RateLimited { reset_at }),
                    None => Err(GitHubError::AuthRequired),
                }
            }
            StatusCode::UNAUTHORIZED => Err(GitHubError::AuthRequired),
            StatusCode::NOT_FOUND => Err(GitHubError::NotFound(url)),
            _ => Err(GitHubError::Internal(format!("Unexpected HTTP status: {status}"))),
        }
    }
}

#[async_trait]
impl PlatformClient for GitHubClient {
    async fn get_authenticated_user(&self) -> platform::Result<UserInfo> {
        let user: GitHubUser = self
            .inner
            .get("/user", None::<&()>)
            .await
            .map_err(|e| match status_code(&e) {
                Some(401 | 403) => GitHubError::AuthRequired,
                _ => GitHubError::Api(e),
            })?;

        Ok(UserInfo {
            username: user.login,
            name: user.name,
        })
    }

    async fn list_repos_page(&self, owner: &str, page: u32) -> platform::Result<RepoPage> {
        self.list_user_repos_page(owner, page)
            .await
            .map_err(PlatformError::from)
    }

    async fn set_archived(&self, owner: &str, name: &str, archived: bool) -> platform::Result<()> {
        let route = format!("/repos/{owner}/{name}");
        let _: serde_json::Value = self
            .inner
            .patch(route, Some(&serde_json::json!({ "archived": archived })))
            .await
            .map_err(GitHubError::Api)?;
        tracing::debug!(owner, name, archived, "Updated repository");
        Ok(())
    }
}
