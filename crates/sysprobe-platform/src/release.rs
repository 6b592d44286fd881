//! [`ReleasePattern`] – exact or `*`-wildcard matching of release strings.

use regex::{Regex, RegexBuilder};
use tracing::warn;

const WILDCARD: char = '*';

/// Compiled-program budget per byte of escaped pattern.  Literal-only
/// expressions stay well below this, so long patterns never hit the limit.
const SIZE_LIMIT_PER_BYTE: usize = 64;
const MIN_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A compiled release constraint.
///
/// Without a `*` the pattern is compared for exact equality.  With one, every
/// literal segment is escaped, each `*` becomes `.*` and the whole expression
/// is anchored, so `"7.*"` accepts `"7.4"` but not `"17.4"`.
#[derive(Debug, Clone)]
pub enum ReleasePattern {
    Exact(String),
    Wildcard(Regex),
    /// Literal segments between `*`s, matched in order.  Same semantics as
    /// [`ReleasePattern::Wildcard`]; used only if the regex cannot be built.
    Segments(Vec<String>),
}

impl ReleasePattern {
    pub fn parse(pattern: &str) -> Self {
        if !pattern.contains(WILDCARD) {
            return Self::Exact(pattern.to_string());
        }

        let body = pattern
            .split(WILDCARD)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let size_limit = body
            .len()
            .saturating_mul(SIZE_LIMIT_PER_BYTE)
            .max(MIN_SIZE_LIMIT);

        match RegexBuilder::new(&format!("(?s)^{body}$"))
            .size_limit(size_limit)
            .build()
        {
            Ok(re) => Self::Wildcard(re),
            Err(e) => {
                warn!(len = pattern.len(), error = %e, "release pattern not compiled; matching segments");
                Self::Segments(pattern.split(WILDCARD).map(String::from).collect())
            }
        }
    }

    /// Absent releases never match.
    pub fn matches(&self, release: Option<&str>) -> bool {
        let Some(release) = release else {
            return false;
        };
        match self {
            Self::Exact(expected) => expected == release,
            Self::Wildcard(re) => re.is_match(release),
            Self::Segments(segments) => segments_match(segments, release),
        }
    }
}

/// Anchored glob match: the first segment is a prefix, the last a suffix of
/// what remains, and the middle ones appear in order between them.
fn segments_match(segments: &[String], release: &str) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return release.is_empty();
    };
    let Some(mut tail) = release.strip_prefix(first.as_str()) else {
        return false;
    };
    let Some((last, middle)) = rest.split_last() else {
        return tail.is_empty();
    };
    for segment in middle {
        match tail.find(segment.as_str()) {
            Some(at) => tail = &tail[at + segment.len()..],
            None => return false,
        }
    }
    tail.ends_with(last.as_str())
}
