//! Progress reporting for archive runs.
//!
//! The engine never prints. It emits [`ArchiveProgress`] events through an
//! optional callback, and the front end decides how to render them.

use crate::filter::ExclusionReason;

/// Progress events emitted during an archive run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ArchiveProgress {
    /// Resolved the identity whose repositories will be listed.
    Authenticated {
        /// Login of the authenticated user.
        username: String,
    },

    /// Starting to list repositories.
    FetchingRepos {
        /// Owner whose repositories are listed.
        owner: String,
    },

    /// Fetched a page of repositories.
    FetchedPage {
        /// Page number (1-indexed).
        page: u32,
        /// Number of repos on this page.
        count: usize,
        /// Running total of repos fetched so far.
        total_so_far: usize,
        /// Expected total pages (if the platform advertised it).
        expected_pages: Option<u32>,
    },

    /// Finished listing.
    FetchComplete {
        /// Total repositories listed.
        total: usize,
    },

    /// A repository matched the filter.
    CandidateFound {
        /// `owner/name` of the repository.
        full_name: String,
    },

    /// A repository was left out.
    RepoSkipped {
        /// `owner/name` of the repository.
        full_name: String,
        /// Why it was skipped.
        reason: ExclusionReason,
    },

    /// Selection finished.
    SelectionComplete {
        /// Number of candidates.
        matched: usize,
        /// Number of repositories looked at.
        processed: usize,
    },

    /// Nothing to archive.
    NoCandidates,

    /// Waiting for the user to confirm.
    AwaitingConfirmation {
        /// Number of candidates awaiting confirmation.
        count: usize,
    },

    /// The user declined.
    Cancelled,

    /// Dry run: this repository would be archived.
    WouldArchive {
        /// `owner/name` of the repository.
        full_name: String,
    },

    /// Starting archive requests.
    ArchivingRepos {
        /// Number of repositories to archive.
        count: usize,
        /// In-flight bound, `None` when unbounded.
        max_in_flight: Option<usize>,
    },

    /// Archived a repository.
    ArchivedRepo {
        /// Repository owner.
        owner: String,
        /// Repository name.
        name: String,
    },

    /// Failed to archive a repository.
    ArchiveFailed {
        /// Repository owner.
        owner: String,
        /// Repository name.
        name: String,
        /// Error message.
        error: String,
    },

    /// All archive requests settled.
    ArchivingComplete {
        /// Number of repositories archived.
        archived: usize,
        /// Number of failures.
        failed: usize,
    },
}

/// Callback for progress updates.
pub type ProgressCallback = Box<dyn Fn(ArchiveProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: ArchiveProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}
