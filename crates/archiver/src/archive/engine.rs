//! Archive orchestration.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::filter::FilterSpec;
use crate::platform::{PlatformClient, PlatformError, PlatformRepo, RepoIdentity, short_error_message};
use crate::progress::{ArchiveProgress, ProgressCallback, emit};
use crate::stream::collect_candidates;

use super::confirm::{confirmation_prompt, is_affirmative};
use super::types::{ArchiveError, ArchiveMode, ArchiveOptions, ArchiveOutcome, ArchiveReport, RunOutcome};

/// Decide what to do with `candidates` and, if warranted, archive them.
///
/// An empty candidate set ends the run before any prompt or request. In
/// interactive mode the gate is asked once; a non-affirmative answer
/// cancels with zero requests. Otherwise one archive request per candidate
/// is issued concurrently and every request is allowed to settle; a failed
/// request is recorded in the report and never aborts its siblings.
pub async fn archive_candidates<C: PlatformClient + Clone + 'static>(
    client: &C,
    owner: &str,
    candidates: Vec<PlatformRepo>,
    mode: ArchiveMode<'_>,
    options: &ArchiveOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<RunOutcome, ArchiveError> {
    if candidates.is_empty() {
        emit(on_progress, ArchiveProgress::NoCandidates);
        return Ok(RunOutcome::NoCandidates);
    }

    match mode {
        ArchiveMode::Interactive { gate } => {
            emit(
                on_progress,
                ArchiveProgress::AwaitingConfirmation {
                    count: candidates.len(),
                },
            );
            let answer = gate.ask(&confirmation_prompt(candidates.len())).await?;
            if !is_affirmative(answer.trim_end_matches(['\r', '\n'])) {
                tracing::info!(count = candidates.len(), "Archive cancelled by user");
                emit(on_progress, ArchiveProgress::Cancelled);
                return Ok(RunOutcome::Cancelled { candidates });
            }
        }
        ArchiveMode::Scheduled { dry_run: true } => {
            for repo in &candidates {
                emit(
                    on_progress,
                    ArchiveProgress::WouldArchive {
                        full_name: repo.full_name.clone(),
                    },
                );
            }
            return Ok(RunOutcome::DryRun { candidates });
        }
        ArchiveMode::Scheduled { dry_run: false } => {}
    }

    let report = archive_concurrent(client, owner, candidates, options, on_progress).await;
    Ok(RunOutcome::Archived(report))
}

async fn archive_concurrent<C: PlatformClient + Clone + 'static>(
    client: &C,
    owner: &str,
    candidates: Vec<PlatformRepo>,
    options: &ArchiveOptions,
    on_progress: Option<&ProgressCallback>,
) -> ArchiveReport {
    let max_in_flight = options.effective_max_in_flight();
    let semaphore = max_in_flight.map(|n| Arc::new(Semaphore::new(n)));

    emit(
        on_progress,
        ArchiveProgress::ArchivingRepos {
            count: candidates.len(),
            max_in_flight,
        },
    );

    let mut handles = Vec::with_capacity(candidates.len());

    for repo in candidates {
        let client = client.clone();
        let semaphore = semaphore.clone();
        let identity = RepoIdentity {
            owner: owner.to_string(),
            name: repo.name,
        };
        let target = identity.clone();

        let handle = tokio::spawn(async move {
            let _permit = match semaphore {
                Some(semaphore) => Some(
                    semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| PlatformError::internal("Semaphore closed unexpectedly"))?,
                ),
                None => None,
            };
            client.set_archived(&target.owner, &target.name, true).await
        });

        handles.push((identity, handle));
    }

    let mut report = ArchiveReport {
        outcomes: Vec::with_capacity(handles.len()),
    };

    for (repo, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(PlatformError::internal(format!("Archive task failed: {e}"))),
        };

        match &result {
            Ok(()) => emit(
                on_progress,
                ArchiveProgress::ArchivedRepo {
                    owner: repo.owner.clone(),
                    name: repo.name.clone(),
                },
            ),
            Err(e) => {
                tracing::warn!(repo = %repo, error = %e, "Failed to archive repository");
                emit(
                    on_progress,
                    ArchiveProgress::ArchiveFailed {
                        owner: repo.owner.clone(),
                        name: repo.name.clone(),
                        error: short_error_message(e),
                    },
                );
            }
        }

        report.outcomes.push(ArchiveOutcome { repo, result });
    }

    emit(
        on_progress,
        ArchiveProgress::ArchivingComplete {
            archived: report.archived_count(),
            failed: report.failed_count(),
        },
    );

    report
}

/// Run the whole pipeline for the authenticated user: resolve the identity,
/// drain the listing through the selector, then archive.
///
/// Authentication and listing failures abort the run before any archive
/// request is sent.
pub async fn run_archiver<C: PlatformClient + Clone + 'static>(
    client: &C,
    spec: &FilterSpec,
    mode: ArchiveMode<'_>,
    options: &ArchiveOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<RunOutcome, ArchiveError> {
    let user = client
        .get_authenticated_user()
        .await
        .map_err(ArchiveError::Auth)?;

    tracing::debug!(username = %user.username, "Authenticated");
    emit(
        on_progress,
        ArchiveProgress::Authenticated {
            username: user.username.clone(),
        },
    );

    let selection = collect_candidates(client, &user.username, spec, on_progress)
        .await
        .map_err(ArchiveError::Listing)?;

    tracing::info!(
        matched = selection.candidates.len(),
        processed = selection.processed,
        "Selection complete"
    );

    archive_candidates(
        client,
        &user.username,
        selection.candidates,
        mode,
        options,
        on_progress,
    )
    .await
}
