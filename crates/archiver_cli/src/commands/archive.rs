use archiver::{ArchiveMode, ArchiveOptions, FilterConfig};
use chrono::Utc;

use crate::ArchiveArgs;
use crate::commands::shared::run_profile;
use crate::config::Config;
use crate::confirm::TerminalGate;

/// Merge flags over config defaults. Flags win; list flags replace rather
/// than extend the configured lists.
pub(crate) fn filter_config(args: ArchiveArgs, config: &Config) -> FilterConfig {
    FilterConfig {
        after: args.after,
        before: args.before,
        compare: if args.compare.is_empty() {
            config.filter.compare.clone()
        } else {
            args.compare
        },
        types: if args.types.is_empty() {
            config.filter.types.clone()
        } else {
            args.types
        },
        token: args.token.or_else(|| config.github_token()),
        exclude_forks: false,
    }
}

pub(crate) async fn handle_archive(
    args: ArchiveArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ArchiveOptions {
        max_in_flight: args.max_in_flight.or(config.max_in_flight()),
    };
    let validated = filter_config(args, config).validate(Utc::now())?;

    run_profile(
        validated,
        ArchiveMode::Interactive { gate: &TerminalGate },
        options,
        config,
    )
    .await
}

#[cfg(test)]
mod tests {
    use crate::config::{FilterDefaults, GitHubConfig};

    use super::*;

    fn args() -> ArchiveArgs {
        ArchiveArgs {
            after: None,
            before: Some("1 year".to_string()),
            token: None,
            compare: Vec::new(),
            types: Vec::new(),
            max_in_flight: None,
        }
    }

    fn configured() -> Config {
        Config {
            github: GitHubConfig {
                token: Some("ghp_config".to_string()),
                api_url: None,
            },
            filter: FilterDefaults {
                compare: vec!["pushedAt".to_string()],
                types: vec!["private".to_string()],
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_config_fills_missing_flags() {
        let filter = filter_config(args(), &configured());

        assert_eq!(filter.token.as_deref(), Some("ghp_config"));
        assert_eq!(filter.compare, vec!["pushedAt"]);
        assert_eq!(filter.types, vec!["private"]);
        assert!(!filter.exclude_forks);
    }

    #[test]
    fn test_flags_override_config() {
        let mut args = args();
        args.token = Some("ghp_flag".to_string());
        args.types = vec!["fork".to_string()];

        let filter = filter_config(args, &configured());

        assert_eq!(filter.token.as_deref(), Some("ghp_flag"));
        assert_eq!(filter.types, vec!["fork"]);
        assert_eq!(filter.compare, vec!["pushedAt"]);
    }

    #[test]
    fn test_no_config_leaves_defaults_to_validation() {
        let filter = filter_config(args(), &Config::default());

        assert!(filter.token.is_none());
        assert!(filter.compare.is_empty());
        assert!(filter.types.is_empty());
    }
}
