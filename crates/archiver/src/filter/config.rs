use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::duration::{DurationParseError, instant_before};

use super::spec::{AgeBounds, CompareField, FilterSpec, RepoTypeFilter};

/// Environment variable consulted when no token is configured explicitly.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Compare fields used when none are given.
pub const DEFAULT_COMPARE: &[&str] = &["updatedAt"];

/// Type filters used when none are given.
pub const DEFAULT_TYPES: &[&str] = &["public"];

/// Inactivity threshold of the scheduled profile.
pub const SCHEDULED_BEFORE: &str = "1 year";

/// Invalid or missing filter/credential input.
///
/// Always fatal, and always raised before any provider call is made.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Must use either the \"--before\" or \"--after\" flag.")]
    MissingBound,

    #[error("Invalid value for \"--{flag}\": {source}")]
    InvalidDuration {
        flag: &'static str,
        #[source]
        source: DurationParseError,
    },

    #[error("The value passed to \"--type\" must be \"public\", \"private\", \"fork\".")]
    InvalidType { value: String },

    #[error(
        "The value passed to \"--compare\" must be \"createdAt\", \"updatedAt\", \"pushedAt\"."
    )]
    InvalidCompare { value: String },

    #[error("Please pass a personal access token using \"--token\".")]
    MissingToken,
}

/// Raw filter and credential values, as collected from flags and config files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Relative duration: select repositories newer than `now - after`.
    pub after: Option<String>,
    /// Relative duration: select repositories older than `now - before`.
    pub before: Option<String>,
    /// Compare field names; empty means [`DEFAULT_COMPARE`].
    pub compare: Vec<String>,
    /// Type filter names; empty means [`DEFAULT_TYPES`].
    pub types: Vec<String>,
    /// Explicit token, taking precedence over [`TOKEN_ENV_VAR`].
    pub token: Option<String>,
    /// Never select forks, regardless of `types`.
    pub exclude_forks: bool,
}

/// A filter that passed validation, plus the credential it will run with.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidatedFilter {
    pub spec: FilterSpec,
    pub token: String,
}

impl std::fmt::Debug for ValidatedFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatedFilter")
            .field("spec", &self.spec)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl FilterConfig {
    /// Fixed settings of the unattended profile: public, non-fork repositories
    /// not updated for a year.
    pub fn scheduled(token: Option<String>) -> Self {
        Self {
            after: None,
            before: Some(SCHEDULED_BEFORE.to_string()),
            compare: DEFAULT_COMPARE.iter().map(|s| s.to_string()).collect(),
            types: DEFAULT_TYPES.iter().map(|s| s.to_string()).collect(),
            token,
            exclude_forks: true,
        }
    }

    /// Validate against the process environment.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<ValidatedFilter, ConfigurationError> {
        self.validate_with(now, |name| std::env::var(name).ok())
    }

    /// Validate, resolving the token fallback through `env`.
    ///
    /// Rules are checked in a fixed order and the first violation wins:
    /// bounds, then types, then compare fields, then the token.
    pub fn validate_with<F>(
        &self,
        now: DateTime<Utc>,
        env: F,
    ) -> Result<ValidatedFilter, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bounds = self.resolve_bounds(now)?;

        let types = with_default(&self.types, DEFAULT_TYPES)
            .map(|value| {
                value
                    .parse::<RepoTypeFilter>()
                    .map_err(|_| ConfigurationError::InvalidType {
                        value: value.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let compare = with_default(&self.compare, DEFAULT_COMPARE)
            .map(|value| {
                value
                    .parse::<CompareField>()
                    .map_err(|_| ConfigurationError::InvalidCompare {
                        value: value.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let token = self
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| env(TOKEN_ENV_VAR).filter(|t| !t.is_empty()))
            .ok_or(ConfigurationError::MissingToken)?;

        // Both sets are non-empty here: defaults fill in empty input.
        let spec = FilterSpec::new(bounds, compare, types)
            .ok_or(ConfigurationError::MissingBound)?
            .with_exclude_forks(self.exclude_forks);

        Ok(ValidatedFilter { spec, token })
    }

    fn resolve_bounds(&self, now: DateTime<Utc>) -> Result<AgeBounds, ConfigurationError> {
        let after = non_empty(&self.after);
        let before = non_empty(&self.before);
        if after.is_none() && before.is_none() {
            return Err(ConfigurationError::MissingBound);
        }

        let resolve = |flag: &'static str, value: Option<&str>| {
            value
                .map(|v| instant_before(now, v))
                .transpose()
                .map_err(|source| ConfigurationError::InvalidDuration { flag, source })
        };
        let after = resolve("after", after)?;
        let before = resolve("before", before)?;

        AgeBounds::from_parts(after, before).ok_or(ConfigurationError::MissingBound)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn with_default<'a>(
    values: &'a [String],
    default: &'static [&'static str],
) -> Box<dyn Iterator<Item = &'a str> + 'a> {
    if values.is_empty() {
        Box::new(default.iter().copied())
    } else {
        Box::new(values.iter().map(String::as_str))
    }
}
