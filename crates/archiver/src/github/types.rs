//! Wire types for the GitHub REST endpoints the archiver calls.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Default REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size used for repository listings (GitHub's maximum).
pub const PER_PAGE: u32 = 100;

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("gh-archiver/", env!("CARGO_PKG_VERSION"));

/// Subset of `GET /user`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Owner object embedded in a repository.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubOwner {
    pub login: String,
}

/// Subset of a repository object from `GET /user/repos`.
///
/// Everything except `name` is optional so that partial payloads from
/// GitHub Enterprise or older API versions still deserialize.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub owner: Option<GitHubOwner>,
    #[serde(default)]
    pub private: Option<bool>,
    #[serde(default)]
    pub fork: Option<bool>,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default)]
    pub disabled: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}
