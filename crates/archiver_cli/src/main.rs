//! gh-archiver - archive stale GitHub repositories in bulk.

mod commands;
mod config;
mod confirm;
mod progress;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::{Term, style};
use tracing_subscriber::EnvFilter;

pub(crate) const BIN_NAME: &str = "gh-archiver";

#[derive(Parser)]
#[command(name = "gh-archiver")]
#[command(version)]
#[command(about = "Archive stale GitHub repositories in bulk")]
#[command(
    long_about = "gh-archiver lists the repositories of the authenticated GitHub user, \
selects those whose activity falls outside a time window, and archives them. \
The interactive profile asks for confirmation first; the scheduled profile is \
meant for cron and archives public, non-fork repositories untouched for a year."
)]
#[command(after_long_help = r#"EXAMPLES
    Archive public repositories not updated for two years:
        $ gh-archiver archive --before "2 years"

    Archive private forks not pushed to since last summer:
        $ gh-archiver archive -b "300 days" --type private --type fork -c pushedAt

    See what the scheduled profile would archive:
        $ gh-archiver scheduled --dry-run

    Generate shell completions:
        $ gh-archiver completions bash > ~/.local/share/bash-completion/completions/gh-archiver

DURATIONS
    A number followed by a unit: "90 days", "1.5y", "2 weeks", "36h".
    Units: ms, s, m, h, d, w, y (and their long forms). A bare number is
    milliseconds.

CONFIGURATION
    gh-archiver reads configuration from:
      1. ~/.config/gh-archiver/config.toml (or $XDG_CONFIG_HOME/gh-archiver/config.toml)
      2. ./gh-archiver.toml
      3. Environment variables (GH_ARCHIVER_ prefix, sections split by "__")
      4. .env file in current directory

ENVIRONMENT VARIABLES
    GITHUB_TOKEN                         Fallback personal access token
    GH_ARCHIVER_GITHUB__TOKEN            Personal access token
    GH_ARCHIVER_GITHUB__API_URL          REST API root (GitHub Enterprise)
    GH_ARCHIVER_ARCHIVE__MAX_IN_FLIGHT   Simultaneous archive requests (0 = unbounded)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select repositories by age and type, confirm, then archive them
    Archive(ArchiveArgs),
    /// Archive public, non-fork repositories not updated for a year, without prompting
    Scheduled(ScheduledArgs),
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Options for the interactive profile.
#[derive(Debug, Clone, clap::Args)]
struct ArchiveArgs {
    /// Select repositories active more recently than this long ago (e.g. "26 weeks")
    #[arg(short = 'a', long, value_name = "DURATION")]
    after: Option<String>,

    /// Select repositories inactive for longer than this (e.g. "2 years")
    #[arg(short = 'b', long, value_name = "DURATION")]
    before: Option<String>,

    /// Personal access token (default from config, then GITHUB_TOKEN)
    #[arg(short = 't', long)]
    token: Option<String>,

    /// Timestamp to compare: createdAt, updatedAt, pushedAt (default updatedAt)
    #[arg(short = 'c', long = "compare", value_name = "FIELD", value_delimiter = ',')]
    compare: Vec<String>,

    /// Required repository type: public, private, fork (default public)
    #[arg(long = "type", value_name = "TYPE", value_delimiter = ',')]
    types: Vec<String>,

    /// Maximum simultaneous archive requests, 0 for unbounded (default from config)
    #[arg(short = 'j', long, value_name = "N")]
    max_in_flight: Option<usize>,
}

/// Options for the scheduled profile.
#[derive(Debug, Clone, clap::Args)]
struct ScheduledArgs {
    /// Report what would be archived without archiving anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Personal access token (default from config, then GITHUB_TOKEN)
    #[arg(short = 't', long)]
    token: Option<String>,

    /// Maximum simultaneous archive requests, 0 for unbounded (default from config)
    #[arg(short = 'j', long, value_name = "N")]
    max_in_flight: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Structured logging only when not attached to a terminal
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("archiver=info,archiver_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Completions { shell } => commands::meta::handle_completions(shell),
        Commands::Man { output } => commands::meta::handle_man(output),
        Commands::Archive(args) => {
            let config = config::Config::load();
            commands::archive::handle_archive(args, &config).await
        }
        Commands::Scheduled(args) => {
            let config = config::Config::load();
            commands::scheduled::handle_scheduled(args, &config).await
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Run failed");
        eprintln!("{} {}", style("error:").red().bold(), e);
        if let Some(hint) = e
            .downcast_ref::<archiver::ArchiveError>()
            .and_then(commands::shared::auth_hint)
        {
            eprintln!("{} {}", style("hint:").cyan().bold(), hint);
        }
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_archive_flags_parse() {
        let cli = Cli::try_parse_from([
            "gh-archiver",
            "archive",
            "-b",
            "2 years",
            "-c",
            "createdAt,pushedAt",
            "--type",
            "private",
            "--type",
            "fork",
            "-t",
            "ghp_flag",
        ])
        .unwrap();

        let Commands::Archive(args) = cli.command else {
            panic!("expected the archive command");
        };
        assert_eq!(args.before.as_deref(), Some("2 years"));
        assert!(args.after.is_none());
        assert_eq!(args.compare, vec!["createdAt", "pushedAt"]);
        assert_eq!(args.types, vec!["private", "fork"]);
        assert_eq!(args.token.as_deref(), Some("ghp_flag"));
    }

    #[test]
    fn test_scheduled_flags_parse() {
        let cli = Cli::try_parse_from(["gh-archiver", "scheduled", "--dry-run", "-j", "4"]).unwrap();

        let Commands::Scheduled(args) = cli.command else {
            panic!("expected the scheduled command");
        };
        assert!(args.dry_run);
        assert_eq!(args.max_in_flight, Some(4));
    }
}
