//! `sysprobe-platform` – Platform Identity & Support Matching
//!
//! Answers one question for an inspection session: does the machine being
//! examined satisfy a declared set of platform constraints?
//!
//! # Modules
//!
//! - [`identity`] – [`PlatformIdentity`][identity::PlatformIdentity]: a
//!   read-only view over the detected
//!   [`PlatformDescriptor`][sysprobe_types::PlatformDescriptor] with name,
//!   family and release queries.
//! - [`name`] – name normalization for legacy mixed-case or space-separated
//!   names, and the [`DeprecationSink`][name::DeprecationSink] side channel
//!   that reports them.
//! - [`release`] – [`ReleasePattern`][release::ReleasePattern]: exact or
//!   `*`-wildcard release matching.
//! - [`constraint`] – [`ConstraintGroup`][constraint::ConstraintGroup] and
//!   [`SupportSpecification`][constraint::SupportSpecification], including
//!   deserialization from configuration data.
//! - [`matcher`] – [`SupportMatcher`][matcher::SupportMatcher]: the
//!   OR-of-ANDs evaluation.

pub mod constraint;
pub mod identity;
pub mod matcher;
pub mod name;
pub mod release;

pub use constraint::{ConstraintGroup, SupportSpecification};
pub use identity::PlatformIdentity;
pub use matcher::SupportMatcher;
pub use name::{DeprecationNotice, DeprecationSink, TracingSink};
pub use release::ReleasePattern;
