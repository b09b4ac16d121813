//! Archiver - find stale repositories and archive them in bulk.
//!
//! The crate is split along the life of a run:
//!
//! 1. [`filter::FilterConfig`] validates raw criteria into a
//!    [`filter::FilterSpec`] before anything touches the network.
//! 2. [`stream::collect_candidates`] walks the owner's listing page by page
//!    and keeps what [`filter::select`] accepts.
//! 3. [`archive::archive_candidates`] confirms (interactive), reports (dry
//!    run) or archives the candidate set concurrently.
//!
//! [`run_archiver`] chains the three against any [`PlatformClient`].
//!
//! # Features
//!
//! - `github` (default) - [`github::GitHubClient`], backed by octocrab and
//!   reqwest.
//!
//! # Example
//!
//! ```ignore
//! use archiver::{ArchiveMode, ArchiveOptions, FilterConfig, run_archiver};
//! use archiver::github::GitHubClient;
//!
//! let validated = FilterConfig::scheduled(None).validate(chrono::Utc::now())?;
//! let client = GitHubClient::with_api_url(&validated.token, archiver::github::DEFAULT_API_URL)?;
//! let outcome = run_archiver(
//!     &client,
//!     &validated.spec,
//!     ArchiveMode::Scheduled { dry_run: true },
//!     &ArchiveOptions::default(),
//!     None,
//! )
//! .await?;
//! ```

pub mod archive;
pub mod duration;
pub mod filter;
pub mod platform;
pub mod progress;
pub mod stream;

#[cfg(feature = "github")]
pub mod github;

pub use archive::{
    ArchiveError, ArchiveMode, ArchiveOptions, ArchiveOutcome, ArchiveReport, ConfirmationGate,
    RunOutcome, archive_candidates, run_archiver,
};
pub use duration::{DurationParseError, parse_relative_duration};
pub use filter::{
    AgeBounds, CompareField, ConfigurationError, FilterConfig, FilterSpec, RepoTypeFilter,
    ValidatedFilter, select,
};
pub use platform::{PlatformClient, PlatformError, PlatformRepo};
pub use progress::{ArchiveProgress, ProgressCallback};
pub use stream::{RepositoryStream, Selection, collect_candidates};
