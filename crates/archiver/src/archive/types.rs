use thiserror::Error;

use crate::filter::ConfigurationError;
use crate::platform::{PlatformError, PlatformRepo, RepoIdentity};

use super::confirm::ConfirmationGate;

/// How the orchestrator treats a non-empty candidate set.
pub enum ArchiveMode<'a> {
    /// Ask a human first; anything but a "yes" cancels.
    Interactive { gate: &'a dyn ConfirmationGate },
    /// Unattended. A dry run reports candidates without archiving them.
    Scheduled { dry_run: bool },
}

impl std::fmt::Debug for ArchiveMode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveMode::Interactive { .. } => f.write_str("Interactive"),
            ArchiveMode::Scheduled { dry_run } => f
                .debug_struct("Scheduled")
                .field("dry_run", dry_run)
                .finish(),
        }
    }
}

/// Tuning for the archive phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Upper bound on simultaneous archive requests. `None` (or zero) sends
    /// every request at once.
    pub max_in_flight: Option<usize>,
}

impl ArchiveOptions {
    pub(crate) fn effective_max_in_flight(&self) -> Option<usize> {
        self.max_in_flight.filter(|n| *n > 0)
    }
}

/// Result of one archive request.
#[derive(Debug)]
pub struct ArchiveOutcome {
    pub repo: RepoIdentity,
    pub result: Result<(), PlatformError>,
}

impl ArchiveOutcome {
    #[inline]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Every outcome of an archive phase, one per candidate.
#[derive(Debug, Default)]
pub struct ArchiveReport {
    pub outcomes: Vec<ArchiveOutcome>,
}

impl ArchiveReport {
    pub fn archived_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.archived_count()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.is_success())
    }
}

/// How a run ended. Every variant is a successful termination.
#[derive(Debug)]
pub enum RunOutcome {
    /// Nothing matched; no prompt was shown and no request was made.
    NoCandidates,
    /// The user declined the confirmation prompt.
    Cancelled { candidates: Vec<PlatformRepo> },
    /// Dry run: these would have been archived.
    DryRun { candidates: Vec<PlatformRepo> },
    /// Archive requests were sent; see the report for per-item results.
    Archived(ArchiveReport),
}

/// Fatal errors that abort a run.
///
/// Individual archive failures are not errors at this level; they are
/// recorded in [`ArchiveReport`].
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Authentication failed: {0}")]
    Auth(#[source] PlatformError),

    #[error("Failed to list repositories: {0}")]
    Listing(#[source] PlatformError),

    #[error("Failed to read confirmation: {0}")]
    Confirmation(#[from] std::io::Error),
}
