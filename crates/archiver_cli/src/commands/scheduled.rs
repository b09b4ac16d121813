use archiver::{ArchiveMode, ArchiveOptions, FilterConfig};
use chrono::Utc;

use crate::ScheduledArgs;
use crate::commands::shared::run_profile;
use crate::config::Config;

/// Unattended run with the fixed scheduled criteria. Filter defaults from
/// the config file do not apply here.
pub(crate) async fn handle_scheduled(
    args: ScheduledArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let token = args.token.or_else(|| config.github_token());
    let validated = FilterConfig::scheduled(token).validate(Utc::now())?;

    if args.dry_run {
        tracing::info!("Dry run: no repository will be archived");
    }

    let options = ArchiveOptions {
        max_in_flight: args.max_in_flight.or(config.max_in_flight()),
    };

    run_profile(
        validated,
        ArchiveMode::Scheduled {
            dry_run: args.dry_run,
        },
        options,
        config,
    )
    .await
}
