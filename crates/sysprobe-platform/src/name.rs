//! Platform name normalization and the deprecation side channel.
//!
//! Legacy detection backends and constraint authors may spell a platform name
//! as `"RedHat"` or `"Mac OS X"`.  Canonical names are lowercase with
//! underscores (`"redhat"`, `"mac_os_x"`).  [`normalize_name`] performs that
//! conversion and reports a [`DeprecationNotice`] whenever it had to change
//! something; the notice is routed to a [`DeprecationSink`] and never affects
//! the outcome of a comparison.

use std::borrow::Cow;
use std::fmt;

use tracing::warn;

/// A legacy-shaped name was seen and normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationNotice {
    pub original: String,
    pub normalized: String,
}

impl fmt::Display for DeprecationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[DEPRECATED] Platform names are lowercase. Please match on '{}' instead of '{}'",
            self.normalized, self.original
        )
    }
}

/// Receives deprecation notices.  Implementations must not panic.
pub trait DeprecationSink: Send + Sync {
    fn notify(&self, notice: &DeprecationNotice);
}

/// Default sink: one `warn!` event per notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DeprecationSink for TracingSink {
    fn notify(&self, notice: &DeprecationNotice) {
        warn!(
            original = %notice.original,
            normalized = %notice.normalized,
            "{notice}"
        );
    }
}

/// Result of [`normalize_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName<'a> {
    pub value: Cow<'a, str>,
    pub notice: Option<DeprecationNotice>,
}

fn is_legacy_shaped(raw: &str) -> bool {
    raw.chars().any(|c| c.is_ascii_uppercase() || c == ' ')
}

/// Lowercase `raw` and replace spaces with underscores when it contains an
/// ASCII uppercase letter or a space.  Already-canonical names are borrowed
/// back unchanged and produce no notice.
///
/// ```
/// use sysprobe_platform::name::normalize_name;
///
/// let n = normalize_name("Mac OS X");
/// assert_eq!(n.value, "mac_os_x");
/// assert!(n.notice.is_some());
///
/// let n = normalize_name("redhat");
/// assert_eq!(n.value, "redhat");
/// assert!(n.notice.is_none());
/// ```
pub fn normalize_name(raw: &str) -> NormalizedName<'_> {
    if !is_legacy_shaped(raw) {
        return NormalizedName {
            value: Cow::Borrowed(raw),
            notice: None,
        };
    }

    let normalized = raw.to_lowercase().replace(' ', "_");
    NormalizedName {
        notice: Some(DeprecationNotice {
            original: raw.to_string(),
            normalized: normalized.clone(),
        }),
        value: Cow::Owned(normalized),
    }
}
