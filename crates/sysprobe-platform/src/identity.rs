//! [`PlatformIdentity`] – read-only view over the detected platform.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use sysprobe_types::{AttributeValue, PlatformDescriptor};

use crate::constraint::SupportSpecification;
use crate::matcher::SupportMatcher;
use crate::name::{DeprecationSink, TracingSink, normalize_name};
use crate::release::ReleasePattern;

/// The platform being inspected, built once per session from the detection
/// backend's [`PlatformDescriptor`] and never mutated afterwards.
///
/// # Example
///
/// ```
/// use sysprobe_platform::PlatformIdentity;
/// use sysprobe_types::PlatformDescriptor;
///
/// let platform = PlatformIdentity::new(PlatformDescriptor {
///     name: "redhat".into(),
///     family_hierarchy: vec!["redhat".into(), "fedora".into(), "linux".into(), "unix".into()],
///     release: Some("7.4".into()),
///     arch: "x86_64".into(),
/// });
///
/// assert!(platform.is_in_family("unix"));
/// assert!(platform.is_platform("redhat"));
/// assert!(platform.release_matches("7.*"));
/// ```
#[derive(Clone)]
pub struct PlatformIdentity {
    descriptor: PlatformDescriptor,
    sink: Arc<dyn DeprecationSink>,
}

impl PlatformIdentity {
    /// Wrap `descriptor`, routing deprecation notices to `tracing`.
    pub fn new(descriptor: PlatformDescriptor) -> Self {
        Self::with_sink(descriptor, Arc::new(TracingSink))
    }

    pub fn with_sink(descriptor: PlatformDescriptor, sink: Arc<dyn DeprecationSink>) -> Self {
        Self { descriptor, sink }
    }

    /// Normalize a name that takes part in a comparison, reporting legacy
    /// spellings to the sink.
    fn normalize_compared<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        let normalized = normalize_name(raw);
        if let Some(notice) = &normalized.notice {
            self.sink.notify(notice);
        }
        normalized.value
    }

    /// Canonical (lowercase, underscore-separated) platform name.  Reading
    /// the name never emits a notice; only comparisons do.
    pub fn name(&self) -> Cow<'_, str> {
        normalize_name(&self.descriptor.name).value
    }

    /// Compare the platform name against `other`, normalizing legacy-shaped
    /// spellings on either side first.  Use this instead of comparing raw
    /// strings.
    pub fn name_eq(&self, other: &str) -> bool {
        let other = self.normalize_compared(other);
        self.normalize_compared(&self.descriptor.name) == other
    }

    /// `true` when `family` appears anywhere in the family hierarchy.
    /// Case-sensitive; the platform's own name does not count.
    pub fn is_in_family(&self, family: &str) -> bool {
        self.descriptor.family_hierarchy.iter().any(|f| f == family)
    }

    /// `true` when `id` is this platform's name or one of its families.
    pub fn is_platform(&self, id: &str) -> bool {
        self.normalize_compared(&self.descriptor.name) == id || self.is_in_family(id)
    }

    /// Exact comparison, or full-string wildcard match when `pattern`
    /// contains `*`.
    pub fn release_matches(&self, pattern: &str) -> bool {
        ReleasePattern::parse(pattern).matches(self.release())
    }

    pub fn release(&self) -> Option<&str> {
        self.descriptor.release.as_deref()
    }

    pub fn arch(&self) -> &str {
        &self.descriptor.arch
    }

    /// Family hierarchy, most specific first.
    pub fn families(&self) -> &[String] {
        &self.descriptor.family_hierarchy
    }

    /// Most specific family, if the hierarchy is non-empty.
    pub fn family(&self) -> Option<&str> {
        self.descriptor.family_hierarchy.first().map(String::as_str)
    }

    pub fn descriptor(&self) -> &PlatformDescriptor {
        &self.descriptor
    }

    /// Key lookup over the platform attributes.
    ///
    /// `name` yields the normalized name; `family`, `families`
    /// (or `family_hierarchy`), `release` and `arch` yield the raw attribute.
    /// Unknown keys and absent attributes yield `None`.
    pub fn attribute(&self, key: &str) -> Option<AttributeValue> {
        match key {
            "name" => Some(AttributeValue::Text(self.name().into_owned())),
            "family" => self.family().map(|f| AttributeValue::Text(f.to_string())),
            "families" | "family_hierarchy" => Some(AttributeValue::List(self.families().to_vec())),
            "release" => self.release().map(|r| AttributeValue::Text(r.to_string())),
            "arch" => Some(AttributeValue::Text(self.arch().to_string())),
            _ => None,
        }
    }

    /// Shorthand for [`SupportMatcher::evaluate`].
    pub fn supports(&self, spec: &SupportSpecification) -> bool {
        SupportMatcher::evaluate(spec, self)
    }
}

impl fmt::Debug for PlatformIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformIdentity")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PlatformIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Platform Detection")
    }
}
