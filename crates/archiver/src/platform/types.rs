use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::Result;

/// Repository visibility as reported by the platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoVisibility {
    #[default]
    Public,
    Private,
}

impl std::fmt::Display for RepoVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoVisibility::Public => write!(f, "public"),
            RepoVisibility::Private => write!(f, "private"),
        }
    }
}

/// A repository snapshot from any platform.
///
/// One value is produced per listing record and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformRepo {
    /// Repository owner (user or org).
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Full name as reported by the platform (usually `owner/name`).
    pub full_name: String,
    /// Repository visibility.
    pub visibility: RepoVisibility,
    /// Whether the repository is a fork.
    pub is_fork: bool,
    /// Whether the repository is already archived.
    pub is_archived: bool,
    /// Whether the repository has been disabled by the platform.
    pub is_disabled: bool,
    /// When the repo was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the repo was last updated.
    pub updated_at: Option<DateTime<Utc>>,
    /// When code was last pushed.
    pub pushed_at: Option<DateTime<Utc>>,
}

impl PlatformRepo {
    #[inline]
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.visibility == RepoVisibility::Private
    }
}

/// Owner and name of a repository, enough to address it in write calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoIdentity {
    pub owner: String,
    pub name: String,
}

impl std::fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Information about the authenticated user.
#[derive(Debug, Clone)]
pub struct UserInfo {
    /// Username/login.
    pub username: String,
    /// Display name (if available).
    pub name: Option<String>,
}

/// One page of a repository listing.
#[derive(Debug, Clone, Default)]
pub struct RepoPage {
    /// Repositories on this page, in platform order.
    pub repos: Vec<PlatformRepo>,
    /// The next page number, or `None` when this was the last page.
    pub next_page: Option<u32>,
    /// Total page count, when the platform advertises it.
    pub last_page: Option<u32>,
}

/// Trait for code hosting platform clients.
///
/// The archive engine only needs three capabilities from a platform:
/// resolving the authenticated identity, listing that identity's repositories
/// one page at a time, and flipping a repository's archived flag.
///
/// # Implementation Notes
///
/// Implementors should:
/// - Return exactly one page per `list_repos_page` call (no internal draining)
/// - Never retry on their own; the engine decides what is fatal
/// - Convert platform-specific errors to `PlatformError`
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Get information about the authenticated user.
    async fn get_authenticated_user(&self) -> Result<UserInfo>;

    /// Fetch a single page (1-indexed) of repositories owned by `owner`.
    async fn list_repos_page(&self, owner: &str, page: u32) -> Result<RepoPage>;

    /// Set the archived flag of `owner/name`.
    async fn set_archived(&self, owner: &str, name: &str, archived: bool) -> Result<()>;
}
