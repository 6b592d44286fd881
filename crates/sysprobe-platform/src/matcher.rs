//! [`SupportMatcher`] – decides whether a [`SupportSpecification`] accepts a
//! [`PlatformIdentity`].
//!
//! Evaluation is an OR across groups of an AND within each group, both
//! short-circuiting:
//!
//! 1. An empty specification is always supported.
//! 2. Within a group, pairs are checked in order and the first failing pair
//!    ends the group.  `inspec` pairs are skipped.  Unknown keys fail.
//! 3. The first satisfied group returns `true`.
//! 4. If no group returned, the status of the last evaluated group is the
//!    result.

use sysprobe_types::ConstraintKey;
use tracing::{debug, trace};

use crate::constraint::{ConstraintGroup, SupportSpecification};
use crate::identity::PlatformIdentity;

/// Stateless evaluator for support specifications.
///
/// # Example
///
/// ```
/// use sysprobe_platform::{ConstraintGroup, PlatformIdentity, SupportMatcher, SupportSpecification};
/// use sysprobe_types::PlatformDescriptor;
///
/// let platform = PlatformIdentity::new(PlatformDescriptor {
///     name: "redhat".into(),
///     family_hierarchy: vec!["redhat".into(), "fedora".into(), "linux".into(), "unix".into()],
///     release: Some("7.4".into()),
///     arch: "x86_64".into(),
/// });
///
/// let spec = SupportSpecification::from(vec![
///     ConstraintGroup::new().with("os_name", "centos"),
///     ConstraintGroup::new().with("os_family", "unix"),
/// ]);
/// assert!(SupportMatcher::evaluate(&spec, &platform));
/// ```
pub struct SupportMatcher;

impl SupportMatcher {
    pub fn evaluate(spec: &SupportSpecification, platform: &PlatformIdentity) -> bool {
        if spec.is_empty() {
            trace!("empty support specification; supported");
            return true;
        }

        let mut status = true;
        for (index, group) in spec.groups().iter().enumerate() {
            status = Self::group_status(group, platform);
            debug!(group = index, satisfied = status, "evaluated constraint group");
            if status {
                return true;
            }
        }

        status
    }

    /// `None` is an absent specification and is supported.
    pub fn evaluate_optional(spec: Option<&SupportSpecification>, platform: &PlatformIdentity) -> bool {
        spec.is_none_or(|spec| Self::evaluate(spec, platform))
    }

    fn group_status(group: &ConstraintGroup, platform: &PlatformIdentity) -> bool {
        let mut status = true;
        for (key, value) in group.pairs() {
            status = match key {
                ConstraintKey::Inspec => continue,
                ConstraintKey::Family => platform.is_in_family(value),
                ConstraintKey::Platform => platform.is_platform(value),
                ConstraintKey::Name => platform.name_eq(value),
                ConstraintKey::Release => platform.release_matches(value),
                ConstraintKey::Unknown(_) => false,
            };
            trace!(%key, %value, satisfied = status, "checked constraint");
            if !status {
                break;
            }
        }
        status
    }
}
