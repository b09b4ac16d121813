//! GitHub implementation of [`PlatformClient`](crate::platform::PlatformClient).
//!
//! # Module Structure
//!
//! - [`error`] - Error types for GitHub API operations
//! - [`types`] - Wire types and constants
//! - [`client`] - The client and Link header pagination
//! - [`convert`] - Conversion into platform types
//!
//! ```ignore
//! use archiver::github::{DEFAULT_API_URL, GitHubClient};
//!
//! let client = GitHubClient::with_api_url(&token, DEFAULT_API_URL)?;
//! let outcome = archiver::run_archiver(&client, &spec, mode, &options, None).await?;
//! ```

mod client;
mod convert;
mod error;
mod types;

pub use client::{GitHubClient, LinkPagination, create_client, parse_link_header};
pub use convert::to_platform_repo;
pub use error::GitHubError;
pub use types::{DEFAULT_API_URL, GitHubRepo, GitHubUser, PER_PAGE};
