use std::sync::Arc;

use archiver::github::GitHubClient;
use archiver::{
    ArchiveError, ArchiveMode, ArchiveOptions, ArchiveReport, FilterSpec, RunOutcome,
    ValidatedFilter, run_archiver,
};
use console::{Term, style};

use crate::config::Config;
use crate::progress::ProgressReporter;

/// One line per criterion, e.g. `Repository Types public, fork`.
pub(crate) fn describe_criteria(spec: &FilterSpec) -> Vec<(&'static str, String)> {
    let types = spec
        .type_filters()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let compare = spec
        .compare_fields()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![("Repository Types", types), ("Compare to", compare)];
    if let Some(after) = spec.bounds().after() {
        lines.push(("After", after.to_rfc3339()));
    }
    if let Some(before) = spec.bounds().before() {
        lines.push(("Before", before.to_rfc3339()));
    }
    if spec.excludes_forks() {
        lines.push(("Forks", "excluded".to_string()));
    }
    lines
}

fn print_criteria(spec: &FilterSpec, is_tty: bool) {
    for (label, value) in describe_criteria(spec) {
        if is_tty {
            println!("{} {}", style(label).bold(), value);
        } else {
            tracing::info!(criterion = label, value = %value, "Filter");
        }
    }
}

/// Connect to GitHub and run one profile to completion.
///
/// Per-repository archive failures are reported but do not fail the run.
pub(crate) async fn run_profile(
    validated: ValidatedFilter,
    mode: ArchiveMode<'_>,
    options: ArchiveOptions,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let is_tty = Term::stdout().is_term();
    print_criteria(&validated.spec, is_tty);

    let client = GitHubClient::with_api_url(&validated.token, &config.github_api_url())?;

    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();

    let result = run_archiver(&client, &validated.spec, mode, &options, Some(&callback)).await;
    reporter.finish();

    match result? {
        RunOutcome::NoCandidates | RunOutcome::Cancelled { .. } => {}
        RunOutcome::DryRun { candidates } => {
            if is_tty {
                println!(
                    "\n{} {} repositories would be archived",
                    style("Dry run:").yellow().bold(),
                    candidates.len()
                );
            } else {
                tracing::info!(count = candidates.len(), "Dry run complete");
            }
        }
        RunOutcome::Archived(report) => print_summary(&report, is_tty),
    }

    Ok(())
}

/// Closing count lines. Each failure was already printed as it settled.
fn summary_lines(report: &ArchiveReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} archived",
        style("✓").green(),
        style(report.archived_count()).bold()
    )];
    if report.has_failures() {
        lines.push(format!(
            "{} {} failed",
            style("✗").red(),
            style(report.failed_count()).bold()
        ));
    }
    lines
}

fn print_summary(report: &ArchiveReport, is_tty: bool) {
    if !is_tty {
        return;
    }

    println!();
    for line in summary_lines(report) {
        println!("{line}");
    }
}

/// Extra advice for a fatal error caused by a rejected token.
pub(crate) fn auth_hint(err: &ArchiveError) -> Option<&'static str> {
    match err {
        ArchiveError::Auth(e) | ArchiveError::Listing(e) if e.is_auth_error() => Some(
            "the token was rejected; pass a valid one with --token or set GITHUB_TOKEN \
             (it needs the repo scope to archive)",
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use archiver::platform::RepoIdentity;
    use archiver::{AgeBounds, ArchiveOutcome, CompareField, PlatformError, RepoTypeFilter};
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_describe_criteria_lists_fields_in_priority_order() {
        let spec = FilterSpec::new(
            AgeBounds::Before(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            [CompareField::PushedAt, CompareField::CreatedAt],
            [RepoTypeFilter::Fork, RepoTypeFilter::Public],
        )
        .unwrap();

        let lines = describe_criteria(&spec);

        assert_eq!(lines[0], ("Repository Types", "public, fork".to_string()));
        assert_eq!(lines[1], ("Compare to", "createdAt, pushedAt".to_string()));
        assert_eq!(lines[2].0, "Before");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_describe_criteria_scheduled_mentions_forks() {
        let spec = FilterSpec::new(
            AgeBounds::Before(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            [CompareField::UpdatedAt],
            [RepoTypeFilter::Public],
        )
        .unwrap()
        .with_exclude_forks(true);

        let lines = describe_criteria(&spec);
        assert!(lines.contains(&("Forks", "excluded".to_string())));
    }

    fn outcome(name: &str, result: Result<(), PlatformError>) -> ArchiveOutcome {
        ArchiveOutcome {
            repo: RepoIdentity {
                owner: "octocat".to_string(),
                name: name.to_string(),
            },
            result,
        }
    }

    #[test]
    fn test_summary_counts_without_repeating_failures() {
        console::set_colors_enabled(false);
        let report = ArchiveReport {
            outcomes: vec![
                outcome("kept-going", Ok(())),
                outcome("blocked", Err(PlatformError::api("Repository was blocked"))),
            ],
        };

        let lines = summary_lines(&report);

        assert_eq!(lines, vec!["✓ 1 archived", "✗ 1 failed"]);
        assert!(lines.iter().all(|line| !line.contains("blocked")));
    }

    #[test]
    fn test_summary_omits_failed_line_when_all_succeed() {
        console::set_colors_enabled(false);
        let report = ArchiveReport {
            outcomes: vec![outcome("a", Ok(())), outcome("b", Ok(()))],
        };

        assert_eq!(summary_lines(&report), vec!["✓ 2 archived"]);
    }

    #[test]
    fn test_auth_hint_only_for_rejected_tokens() {
        assert!(auth_hint(&ArchiveError::Auth(PlatformError::AuthRequired)).is_some());
        assert!(auth_hint(&ArchiveError::Listing(PlatformError::AuthRequired)).is_some());
        assert!(auth_hint(&ArchiveError::Listing(PlatformError::network("reset"))).is_none());
        assert!(auth_hint(&ArchiveError::Auth(PlatformError::network("reset"))).is_none());
    }
}
