use std::sync::Mutex;
use std::time::Duration;

use archiver::ArchiveProgress;
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Mutable progress state, kept under a single lock.
#[derive(Default)]
struct ProgressState {
    /// Listing spinner, upgraded to a bar once the page count is known.
    fetch_bar: Option<ProgressBar>,
    /// Bar for archive requests.
    archive_bar: Option<ProgressBar>,
}

/// Interactive progress reporter using indicatif.
pub struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            state: Mutex::new(ProgressState::default()),
        }
    }

    /// Print a line above any active bars.
    fn println(&self, line: impl AsRef<str>) {
        if self.multi.println(line).is_err() {
            tracing::debug!("Failed to write progress line");
        }
    }

    pub fn handle(&self, event: ArchiveProgress) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        match event {
            ArchiveProgress::Authenticated { username } => {
                self.println(format!(
                    "{} Authenticated as {}",
                    style("✓").green(),
                    style(username).bold()
                ));
            }

            ArchiveProgress::FetchingRepos { owner } => {
                let bar = self.multi.add(ProgressBar::new_spinner());
                bar.set_style(Self::spinner_style());
                bar.enable_steady_tick(Duration::from_millis(100));
                bar.set_prefix(format!("{:12}", owner));
                bar.set_message("Fetching repositories...");
                state.fetch_bar = Some(bar);
            }

            ArchiveProgress::FetchedPage {
                page,
                total_so_far,
                expected_pages,
                ..
            } => {
                if let Some(bar) = &state.fetch_bar {
                    if let Some(pages) = expected_pages {
                        if bar.length() != Some(pages as u64) {
                            bar.set_style(Self::bar_style());
                            bar.set_length(pages as u64);
                        }
                        bar.set_position(page as u64);
                    }
                    bar.set_message(format!("{} repos", total_so_far));
                }
            }

            ArchiveProgress::CandidateFound { full_name } => {
                self.println(format!("Found {}", style(full_name).cyan()));
            }

            ArchiveProgress::SelectionComplete { matched, processed } => {
                if let Some(bar) = state.fetch_bar.take() {
                    bar.finish_with_message(format!("{} of {} repos match", matched, processed));
                }
            }

            ArchiveProgress::NoCandidates => {
                self.println(format!("{}", style("No target repositories :)").green()));
            }

            ArchiveProgress::Cancelled => {
                self.println(format!("{}", style("Cancel archiving").yellow()));
            }

            ArchiveProgress::WouldArchive { full_name } => {
                self.println(format!(
                    "{} {}",
                    style("Would archive").dim(),
                    style(full_name).cyan()
                ));
            }

            ArchiveProgress::ArchivingRepos { count, .. } => {
                let bar = self.multi.add(ProgressBar::new(count as u64));
                bar.set_style(Self::bar_style());
                bar.set_prefix(format!("{:12}", "archive"));
                bar.set_message("Archiving...");
                state.archive_bar = Some(bar);
            }

            ArchiveProgress::ArchivedRepo { .. } => {
                if let Some(bar) = &state.archive_bar {
                    bar.inc(1);
                }
            }

            ArchiveProgress::ArchiveFailed { owner, name, error } => {
                self.println(format!(
                    "{} {}/{}: {}",
                    style("✗").red(),
                    owner,
                    name,
                    style(error).red()
                ));
                if let Some(bar) = &state.archive_bar {
                    bar.inc(1);
                }
            }

            ArchiveProgress::ArchivingComplete { archived, failed } => {
                if let Some(bar) = state.archive_bar.take() {
                    let msg = if failed == 0 {
                        format!("{} archived", style(archived).green())
                    } else {
                        format!(
                            "{} archived, {} failed",
                            style(archived).green(),
                            style(failed).red()
                        )
                    };
                    bar.finish_with_message(msg);
                }
            }

            _ => {}
        }
    }

    /// Finish any bar still running, e.g. after a fatal error.
    pub fn finish(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        for bar in [state.fetch_bar.take(), state.archive_bar.take()]
            .into_iter()
            .flatten()
        {
            bar.abandon();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden() -> InteractiveReporter {
        InteractiveReporter {
            multi: MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden()),
            state: Mutex::new(ProgressState::default()),
        }
    }

    #[test]
    fn test_fetch_bar_lifecycle() {
        let reporter = hidden();

        reporter.handle(ArchiveProgress::FetchingRepos {
            owner: "octocat".to_string(),
        });
        reporter.handle(ArchiveProgress::FetchedPage {
            page: 1,
            count: 100,
            total_so_far: 100,
            expected_pages: Some(3),
        });
        {
            let state = reporter.state.lock().unwrap();
            let bar = state.fetch_bar.as_ref().unwrap();
            assert_eq!(bar.length(), Some(3));
            assert_eq!(bar.position(), 1);
        }

        reporter.handle(ArchiveProgress::SelectionComplete {
            matched: 2,
            processed: 250,
        });
        assert!(reporter.state.lock().unwrap().fetch_bar.is_none());
    }

    #[test]
    fn test_archive_bar_counts_failures() {
        let reporter = hidden();

        reporter.handle(ArchiveProgress::ArchivingRepos {
            count: 2,
            max_in_flight: None,
        });
        reporter.handle(ArchiveProgress::ArchivedRepo {
            owner: "octocat".to_string(),
            name: "a".to_string(),
        });
        reporter.handle(ArchiveProgress::ArchiveFailed {
            owner: "octocat".to_string(),
            name: "b".to_string(),
            error: "API error: Forbidden".to_string(),
        });
        {
            let state = reporter.state.lock().unwrap();
            assert_eq!(state.archive_bar.as_ref().unwrap().position(), 2);
        }

        reporter.handle(ArchiveProgress::ArchivingComplete {
            archived: 1,
            failed: 1,
        });
        assert!(reporter.state.lock().unwrap().archive_bar.is_none());
    }

    #[test]
    fn test_finish_abandons_running_bars() {
        let reporter = hidden();
        reporter.handle(ArchiveProgress::FetchingRepos {
            owner: "octocat".to_string(),
        });

        reporter.finish();

        assert!(reporter.state.lock().unwrap().fetch_bar.is_none());
    }
}
