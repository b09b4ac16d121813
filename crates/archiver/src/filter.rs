//! Repository selection: filter criteria, their validation, and the selector.
//!
//! - [`FilterConfig`] holds raw strings as they arrive from flags or config
//!   files and validates them into a [`FilterSpec`].
//! - [`select`] is the pure per-repository decision.
//!
//! Three behaviors here are deliberate and covered by tests:
//!
//! - type filters are conjunctive requirements, so `public` + `fork` selects
//!   only public forks;
//! - compare fields are a priority list, only the first populated one is
//!   checked;
//! - with both age bounds the range test is a union (`older than before` OR
//!   `newer than after`).

mod config;
mod select;
mod spec;

pub use config::{
    ConfigurationError, DEFAULT_COMPARE, DEFAULT_TYPES, FilterConfig, SCHEDULED_BEFORE,
    TOKEN_ENV_VAR, ValidatedFilter,
};
pub use select::{Decision, ExclusionReason, evaluated_timestamp, select};
pub use spec::{AgeBounds, CompareField, FilterSpec, RepoTypeFilter};
