//! Deciding whether to archive a candidate set, and doing it.
//!
//! [`run_archiver`] is the end-to-end entry point. [`archive_candidates`]
//! takes over once the candidate set is known.

mod confirm;
mod engine;
mod types;

pub use confirm::{ConfirmationGate, confirmation_prompt, is_affirmative};
pub use engine::{archive_candidates, run_archiver};
pub use types::{ArchiveError, ArchiveMode, ArchiveOptions, ArchiveOutcome, ArchiveReport, RunOutcome};
