use chrono::{DateTime, Utc};

use crate::platform::PlatformRepo;

use super::spec::{CompareField, FilterSpec, RepoTypeFilter};

/// Why a repository was left out of the candidate set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExclusionReason {
    /// Disabled by the platform.
    Disabled,
    /// Already archived.
    Archived,
    /// Failed the `public` or `private` requirement.
    Visibility,
    /// Failed the `fork` requirement.
    NotFork,
    /// Is a fork while forks are excluded.
    Fork,
    /// The evaluated timestamp fell outside the age bounds.
    OutOfRange(CompareField),
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::Disabled => write!(f, "disabled"),
            ExclusionReason::Archived => write!(f, "already archived"),
            ExclusionReason::Visibility => write!(f, "visibility does not match"),
            ExclusionReason::NotFork => write!(f, "not a fork"),
            ExclusionReason::Fork => write!(f, "is a fork"),
            ExclusionReason::OutOfRange(field) => write!(f, "{} out of range", field),
        }
    }
}

/// Selector verdict for a single repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Include,
    Exclude(ExclusionReason),
}

impl Decision {
    #[inline]
    pub fn is_include(&self) -> bool {
        matches!(self, Decision::Include)
    }
}

fn timestamp(repo: &PlatformRepo, field: CompareField) -> Option<DateTime<Utc>> {
    match field {
        CompareField::CreatedAt => repo.created_at,
        CompareField::UpdatedAt => repo.updated_at,
        CompareField::PushedAt => repo.pushed_at,
    }
}

/// The single timestamp the date rule evaluates for `repo`.
///
/// Compare fields form an ordered fallback list: the highest-priority field
/// that is both requested and populated is chosen, and no other field is
/// looked at.
pub fn evaluated_timestamp(
    repo: &PlatformRepo,
    spec: &FilterSpec,
) -> Option<(CompareField, DateTime<Utc>)> {
    spec.compare_fields()
        .find_map(|field| timestamp(repo, field).map(|t| (field, t)))
}

fn type_requirements(repo: &PlatformRepo, spec: &FilterSpec) -> Result<(), ExclusionReason> {
    // Every active filter is a separate requirement, so asking for more
    // types narrows the selection.
    if spec.requires(RepoTypeFilter::Public) && repo.is_private() {
        return Err(ExclusionReason::Visibility);
    }
    if spec.requires(RepoTypeFilter::Private) && !repo.is_private() {
        return Err(ExclusionReason::Visibility);
    }
    if spec.requires(RepoTypeFilter::Fork) && !repo.is_fork {
        return Err(ExclusionReason::NotFork);
    }
    if spec.excludes_forks() && repo.is_fork {
        return Err(ExclusionReason::Fork);
    }
    Ok(())
}

/// Decide whether `repo` belongs in the archive candidate set.
pub fn select(repo: &PlatformRepo, spec: &FilterSpec) -> Decision {
    if repo.is_disabled {
        return Decision::Exclude(ExclusionReason::Disabled);
    }
    if repo.is_archived {
        return Decision::Exclude(ExclusionReason::Archived);
    }
    if let Err(reason) = type_requirements(repo, spec) {
        return Decision::Exclude(reason);
    }
    match evaluated_timestamp(repo, spec) {
        Some((field, t)) if !spec.in_range(t) => {
            Decision::Exclude(ExclusionReason::OutOfRange(field))
        }
        _ => Decision::Include,
    }
}
