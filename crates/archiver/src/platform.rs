//! Platform-agnostic trait for code forge clients.
//!
//! This module defines the `PlatformClient` trait the archive engine is
//! written against, together with the repository snapshot type it consumes.
//!
//! # Example
//!
//! ```ignore
//! use archiver::platform::{PlatformClient, PlatformError};
//!
//! async fn first_page<C: PlatformClient>(client: &C) -> Result<(), PlatformError> {
//!     let me = client.get_authenticated_user().await?;
//!     let page = client.list_repos_page(&me.username, 1).await?;
//!     for repo in page.repos {
//!         println!("{}", repo.full_name);
//!     }
//!     Ok(())
//! }
//! ```

mod errors;
mod types;

pub use errors::{PlatformError, Result, short_error_message};
pub use types::{PlatformClient, PlatformRepo, RepoIdentity, RepoPage, RepoVisibility, UserInfo};

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn repo(visibility: RepoVisibility) -> PlatformRepo {
        PlatformRepo {
            owner: "octocat".to_string(),
            name: "hello-world".to_string(),
            full_name: "octocat/hello-world".to_string(),
            visibility,
            is_fork: false,
            is_archived: false,
            is_disabled: false,
            created_at: Some(Utc::now()),
            updated_at: None,
            pushed_at: None,
        }
    }

    #[test]
    fn test_platform_error_api() {
        let err = PlatformError::api("Something went wrong");
        assert!(err.to_string().contains("API error"));
        assert!(err.to_string().contains("Something went wrong"));
    }

    #[test]
    fn test_platform_error_not_found() {
        let err = PlatformError::not_found("octocat/hello-world");
        assert!(err.to_string().contains("Not found"));
        assert!(err.to_string().contains("octocat/hello-world"));
    }

    #[test]
    fn test_platform_error_is_auth_error() {
        assert!(PlatformError::AuthRequired.is_auth_error());
        assert!(!PlatformError::network("connection refused").is_auth_error());
        assert!(
            !PlatformError::RateLimited {
                reset_at: Utc::now()
            }
            .is_auth_error()
        );
    }

    #[test]
    fn test_platform_repo_private_flag() {
        assert!(repo(RepoVisibility::Private).is_private());
        assert!(!repo(RepoVisibility::Public).is_private());
    }

    #[test]
    fn test_repo_identity_display() {
        let identity = RepoIdentity {
            owner: "octocat".to_string(),
            name: "hello-world".to_string(),
        };
        assert_eq!(identity.to_string(), "octocat/hello-world");
    }

    #[test]
    fn test_visibility_display() {
        assert_eq!(RepoVisibility::Public.to_string(), "public");
        assert_eq!(RepoVisibility::Private.to_string(), "private");
        assert_eq!(RepoVisibility::default(), RepoVisibility::Public);
    }

    #[test]
    fn test_short_error_message_multiline() {
        let err = std::io::Error::other("first line\nsecond line\nthird line");
        assert_eq!(short_error_message(&err), "first line");
    }
}
