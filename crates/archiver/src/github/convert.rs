//! Conversion from GitHub API types to platform types.

use super::types::GitHubRepo;
use crate::platform::{PlatformRepo, RepoVisibility};

fn github_visibility(repo: &GitHubRepo) -> RepoVisibility {
    if repo.private.unwrap_or(false) {
        RepoVisibility::Private
    } else {
        RepoVisibility::Public
    }
}

/// Whether `repo` belongs to `login`. GitHub logins are case-insensitive;
/// a payload without an owner object is taken as the caller's.
pub(crate) fn owned_by(repo: &GitHubRepo, login: &str) -> bool {
    repo.owner
        .as_ref()
        .is_none_or(|owner| owner.login.eq_ignore_ascii_case(login))
}

/// Convert a GitHub repository to a platform-agnostic [`PlatformRepo`].
///
/// `listed_owner` is used when the payload carries no owner object.
pub fn to_platform_repo(repo: GitHubRepo, listed_owner: &str) -> PlatformRepo {
    let owner = repo
        .owner
        .as_ref()
        .map(|o| o.login.clone())
        .unwrap_or_else(|| listed_owner.to_string());
    let full_name = repo
        .full_name
        .clone()
        .unwrap_or_else(|| format!("{owner}/{}", repo.name));

    PlatformRepo {
        visibility: github_visibility(&repo),
        is_fork: repo.fork.unwrap_or(false),
        is_archived: repo.archived.unwrap_or(false),
        is_disabled: repo.disabled.unwrap_or(false),
        created_at: repo.created_at,
        updated_at: repo.updated_at,
        pushed_at: repo.pushed_at,
        owner,
        name: repo.name,
        full_name,
    }
}
