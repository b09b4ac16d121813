use archiver::ArchiveProgress;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: ArchiveProgress) {
        match event {
            ArchiveProgress::Authenticated { username } => {
                tracing::info!(username = %username, "Authenticated");
            }

            ArchiveProgress::FetchingRepos { owner } => {
                tracing::info!(owner = %owner, "Fetching repositories");
            }

            ArchiveProgress::FetchedPage {
                page,
                count,
                total_so_far,
                expected_pages,
            } => {
                tracing::debug!(page, count, total_so_far, expected_pages = ?expected_pages, "Fetched page");
            }

            ArchiveProgress::FetchComplete { total } => {
                tracing::info!(total, "Fetch complete");
            }

            ArchiveProgress::CandidateFound { full_name } => {
                tracing::info!(repo = %full_name, "Found");
            }

            ArchiveProgress::RepoSkipped { full_name, reason } => {
                tracing::debug!(repo = %full_name, reason = %reason, "Skipped");
            }

            ArchiveProgress::SelectionComplete { matched, processed } => {
                tracing::info!(matched, processed, "Selection complete");
            }

            ArchiveProgress::NoCandidates => {
                tracing::info!("No target repositories");
            }

            ArchiveProgress::AwaitingConfirmation { count } => {
                tracing::info!(count, "Awaiting confirmation");
            }

            ArchiveProgress::Cancelled => {
                tracing::info!("Cancel archiving");
            }

            ArchiveProgress::WouldArchive { full_name } => {
                tracing::info!(repo = %full_name, "Would archive");
            }

            ArchiveProgress::ArchivingRepos {
                count,
                max_in_flight,
            } => {
                tracing::info!(count, max_in_flight = ?max_in_flight, "Archiving repositories");
            }

            ArchiveProgress::ArchivedRepo { owner, name } => {
                tracing::info!(repo = %format!("{}/{}", owner, name), "Archived");
            }

            ArchiveProgress::ArchiveFailed { owner, name, error } => {
                tracing::error!(repo = %format!("{}/{}", owner, name), error = %error, "Failed to archive");
            }

            ArchiveProgress::ArchivingComplete { archived, failed } => {
                tracing::info!(archived, failed, "Archiving complete");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
