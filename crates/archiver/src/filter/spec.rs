use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Repository timestamp a bound can be compared against.
///
/// The declaration order is the evaluation priority: `CreatedAt` is consulted
/// first, `PushedAt` last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompareField {
    CreatedAt,
    UpdatedAt,
    PushedAt,
}

impl CompareField {
    /// All fields in evaluation priority order.
    pub const PRIORITY: [CompareField; 3] = [
        CompareField::CreatedAt,
        CompareField::UpdatedAt,
        CompareField::PushedAt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompareField::CreatedAt => "createdAt",
            CompareField::UpdatedAt => "updatedAt",
            CompareField::PushedAt => "pushedAt",
        }
    }
}

impl fmt::Display for CompareField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompareField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(CompareField::CreatedAt),
            "updatedAt" => Ok(CompareField::UpdatedAt),
            "pushedAt" => Ok(CompareField::PushedAt),
            _ => Err(()),
        }
    }
}

/// Visibility/origin class a repository is required to belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RepoTypeFilter {
    Public,
    Private,
    Fork,
}

impl RepoTypeFilter {
    pub const ALL: [RepoTypeFilter; 3] = [
        RepoTypeFilter::Public,
        RepoTypeFilter::Private,
        RepoTypeFilter::Fork,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RepoTypeFilter::Public => "public",
            RepoTypeFilter::Private => "private",
            RepoTypeFilter::Fork => "fork",
        }
    }
}

impl fmt::Display for RepoTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepoTypeFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(RepoTypeFilter::Public),
            "private" => Ok(RepoTypeFilter::Private),
            "fork" => Ok(RepoTypeFilter::Fork),
            _ => Err(()),
        }
    }
}

/// Age bounds of a filter. At least one side is always present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgeBounds {
    /// Only repositories newer than the instant.
    After(DateTime<Utc>),
    /// Only repositories older than the instant.
    Before(DateTime<Utc>),
    /// Repositories older than `before` OR newer than `after`.
    Either {
        after: DateTime<Utc>,
        before: DateTime<Utc>,
    },
}

impl AgeBounds {
    /// Build bounds from the optional sides, `None` when both are missing.
    pub fn from_parts(after: Option<DateTime<Utc>>, before: Option<DateTime<Utc>>) -> Option<Self> {
        match (after, before) {
            (Some(after), Some(before)) => Some(AgeBounds::Either { after, before }),
            (Some(after), None) => Some(AgeBounds::After(after)),
            (None, Some(before)) => Some(AgeBounds::Before(before)),
            (None, None) => None,
        }
    }

    pub fn after(&self) -> Option<DateTime<Utc>> {
        match self {
            AgeBounds::After(after) | AgeBounds::Either { after, .. } => Some(*after),
            AgeBounds::Before(_) => None,
        }
    }

    pub fn before(&self) -> Option<DateTime<Utc>> {
        match self {
            AgeBounds::Before(before) | AgeBounds::Either { before, .. } => Some(*before),
            AgeBounds::After(_) => None,
        }
    }

    /// Whether `t` falls inside the bounds.
    ///
    /// With both sides set this is a union, not a window: a timestamp passes
    /// when it is older than `before` or newer than `after`.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        match *self {
            AgeBounds::Either { after, before } => t < before || t > after,
            AgeBounds::After(after) => t > after,
            AgeBounds::Before(before) => t < before,
        }
    }
}

/// Validated, immutable selection criteria.
///
/// Built once per run through [`super::FilterConfig::validate`] (or
/// [`FilterSpec::new`] when the typed values are already at hand).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterSpec {
    bounds: AgeBounds,
    compare: BTreeSet<CompareField>,
    types: BTreeSet<RepoTypeFilter>,
    exclude_forks: bool,
}

impl FilterSpec {
    /// Create a spec from typed parts.
    ///
    /// Returns `None` if `compare` or `types` is empty.
    pub fn new(
        bounds: AgeBounds,
        compare: impl IntoIterator<Item = CompareField>,
        types: impl IntoIterator<Item = RepoTypeFilter>,
    ) -> Option<Self> {
        let compare: BTreeSet<_> = compare.into_iter().collect();
        let types: BTreeSet<_> = types.into_iter().collect();
        if compare.is_empty() || types.is_empty() {
            return None;
        }
        Some(Self {
            bounds,
            compare,
            types,
            exclude_forks: false,
        })
    }

    /// Additionally require repositories not to be forks.
    #[must_use]
    pub fn with_exclude_forks(mut self, exclude: bool) -> Self {
        self.exclude_forks = exclude;
        self
    }

    pub fn bounds(&self) -> &AgeBounds {
        &self.bounds
    }

    /// Compare fields in evaluation priority order.
    pub fn compare_fields(&self) -> impl Iterator<Item = CompareField> + '_ {
        self.compare.iter().copied()
    }

    pub fn compares(&self, field: CompareField) -> bool {
        self.compare.contains(&field)
    }

    pub fn type_filters(&self) -> impl Iterator<Item = RepoTypeFilter> + '_ {
        self.types.iter().copied()
    }

    pub fn requires(&self, filter: RepoTypeFilter) -> bool {
        self.types.contains(&filter)
    }

    pub fn excludes_forks(&self) -> bool {
        self.exclude_forks
    }

    /// Range test used by the selector.
    #[inline]
    pub fn in_range(&self, t: DateTime<Utc>) -> bool {
        self.bounds.contains(t)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_compare_field_priority_order() {
        let mut fields = vec![
            CompareField::PushedAt,
            CompareField::CreatedAt,
            CompareField::UpdatedAt,
        ];
        fields.sort();
        assert_eq!(fields, CompareField::PRIORITY.to_vec());
    }

    #[test]
    fn test_compare_field_round_trips_names() {
        for field in CompareField::PRIORITY {
            assert_eq!(field.as_str().parse::<CompareField>(), Ok(field));
        }
        assert!("UpdatedAt".parse::<CompareField>().is_err());
    }

    #[test]
    fn test_type_filter_names() {
        for filter in RepoTypeFilter::ALL {
            assert_eq!(filter.to_string().parse::<RepoTypeFilter>(), Ok(filter));
        }
        assert!("internal".parse::<RepoTypeFilter>().is_err());
    }

    #[test]
    fn test_bounds_require_one_side() {
        assert_eq!(AgeBounds::from_parts(None, None), None);
        assert_eq!(
            AgeBounds::from_parts(Some(at(1)), None),
            Some(AgeBounds::After(at(1)))
        );
    }

    #[test]
    fn test_after_only() {
        let bounds = AgeBounds::After(at(10));
        assert!(bounds.contains(at(11)));
        assert!(!bounds.contains(at(10)));
        assert!(!bounds.contains(at(9)));
    }

    #[test]
    fn test_before_only() {
        let bounds = AgeBounds::Before(at(10));
        assert!(bounds.contains(at(9)));
        assert!(!bounds.contains(at(10)));
        assert!(!bounds.contains(at(11)));
    }

    #[test]
    fn test_both_bounds_are_a_union() {
        // before is later than after: every timestamp is older than before
        // or newer than after.
        let bounds = AgeBounds::Either {
            after: at(10),
            before: at(20),
        };
        assert!(bounds.contains(at(5)));
        assert!(bounds.contains(at(15)));
        assert!(bounds.contains(at(25)));

        // before is earlier than after: only the window between them fails.
        let bounds = AgeBounds::Either {
            after: at(20),
            before: at(10),
        };
        assert!(bounds.contains(at(5)));
        assert!(!bounds.contains(at(15)));
        assert!(bounds.contains(at(25)));
    }

    #[test]
    fn test_one_nanosecond_past_after_is_in_range() {
        let after = at(20);
        let before = at(10);
        let bounds = AgeBounds::Either { after, before };
        let t = after + Duration::nanoseconds(1);
        assert!(t > before);
        assert!(bounds.contains(t));
        assert!(!bounds.contains(after));
    }

    #[test]
    fn test_spec_rejects_empty_sets() {
        let bounds = AgeBounds::Before(at(1));
        assert!(FilterSpec::new(bounds, [], [RepoTypeFilter::Public]).is_none());
        assert!(FilterSpec::new(bounds, [CompareField::UpdatedAt], []).is_none());
    }

    #[test]
    fn test_spec_iterates_compare_fields_in_priority_order() {
        let spec = FilterSpec::new(
            AgeBounds::Before(at(1)),
            [CompareField::PushedAt, CompareField::CreatedAt],
            [RepoTypeFilter::Public],
        )
        .unwrap();
        let fields: Vec<_> = spec.compare_fields().collect();
        assert_eq!(fields, vec![CompareField::CreatedAt, CompareField::PushedAt]);
        assert!(!spec.compares(CompareField::UpdatedAt));
        assert!(!spec.excludes_forks());
        assert!(spec.with_exclude_forks(true).excludes_forks());
    }
}
