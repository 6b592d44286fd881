//! Declarative support constraints.
//!
//! A [`ConstraintGroup`] is an ordered list of `(key, value)` pairs that must
//! all hold; a [`SupportSpecification`] is an ordered list of groups of which
//! at least one must hold.  Keys are resolved to [`ConstraintKey`] as soon as
//! they enter a group, so string spellings and pre-resolved keys behave
//! identically during evaluation.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use sysprobe_types::ConstraintKey;

/// One AND-combined set of conditions.
///
/// ```
/// use sysprobe_platform::ConstraintGroup;
/// use sysprobe_types::ConstraintKey;
///
/// let a = ConstraintGroup::new().with("os-family", "unix");
/// let b = ConstraintGroup::new().with(ConstraintKey::Family, "unix");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintGroup {
    pairs: Vec<(ConstraintKey, String)>,
}

impl ConstraintGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint.  Pairs are evaluated in insertion order.
    pub fn with(mut self, key: impl Into<ConstraintKey>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// A key already present (after alias resolution) keeps its position and
    /// takes the new value, so a group behaves as a mapping.
    pub fn push(&mut self, key: impl Into<ConstraintKey>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<ConstraintKey>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        pairs.into_iter().collect()
    }

    pub fn pairs(&self) -> &[(ConstraintKey, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl<K, V> FromIterator<(K, V)> for ConstraintGroup
where
    K: Into<ConstraintKey>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut group = Self::new();
        for (k, v) in iter {
            group.push(k, v);
        }
        group
    }
}

/// Ordered OR-combination of [`ConstraintGroup`]s.  Empty means "supported
/// everywhere".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportSpecification {
    groups: Vec<ConstraintGroup>,
}

impl SupportSpecification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, group: ConstraintGroup) {
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[ConstraintGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl From<Vec<ConstraintGroup>> for SupportSpecification {
    fn from(groups: Vec<ConstraintGroup>) -> Self {
        Self { groups }
    }
}

impl FromIterator<ConstraintGroup> for SupportSpecification {
    fn from_iter<I: IntoIterator<Item = ConstraintGroup>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Deserialization
// ────────────────────────────────────────────────────────────────────────────

/// Constraint values are strings; integers are accepted and rendered in
/// decimal so that `release = 10` in TOML reads the same as `"10"`.
struct ConstraintValue(String);

impl<'de> Deserialize<'de> for ConstraintValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl Visitor<'_> for ValueVisitor {
            type Value = ConstraintValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer constraint value")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(ConstraintValue(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(ConstraintValue(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ConstraintValue(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ConstraintValue(v.to_string()))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl<'de> Deserialize<'de> for ConstraintGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GroupVisitor;

        impl<'de> Visitor<'de> for GroupVisitor {
            type Value = ConstraintGroup;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of constraint keys to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut group = ConstraintGroup::new();
                while let Some((key, value)) = map.next_entry::<String, ConstraintValue>()? {
                    group.push(key, value.0);
                }
                Ok(group)
            }
        }

        deserializer.deserialize_map(GroupVisitor)
    }
}

impl<'de> Deserialize<'de> for SupportSpecification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpecVisitor;

        impl<'de> Visitor<'de> for SpecVisitor {
            type Value = SupportSpecification;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of constraint groups")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(SupportSpecification::new())
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut spec = SupportSpecification::new();
                while let Some(group) = seq.next_element::<ConstraintGroup>()? {
                    spec.push(group);
                }
                Ok(spec)
            }
        }

        deserializer.deserialize_any(SpecVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_and_resolved_keys_are_equivalent() {
        let strings = ConstraintGroup::from_pairs([("os_name", "centos"), ("release", "7.*")]);
        let resolved = ConstraintGroup::new()
            .with(ConstraintKey::Name, "centos")
            .with(ConstraintKey::Release, "7.*");
        assert_eq!(strings, resolved);
    }

    #[test]
    fn insertion_order_is_kept() {
        let group = ConstraintGroup::new()
            .with("release", "7.4")
            .with("platform", "linux")
            .with("bogus", "x");
        let keys: Vec<_> = group.pairs().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["release", "platform", "bogus"]);
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn deserialize_from_json_in_document_order() {
        let json = r#"[{"platform-name": "ubuntu", "release": "18.*"}, {"os": "windows"}]"#;
        let spec: SupportSpecification = serde_json::from_str(json).unwrap();
        assert_eq!(spec.groups().len(), 2);
        assert_eq!(
            spec.groups()[0].pairs(),
            &[
                (ConstraintKey::Name, "ubuntu".to_string()),
                (ConstraintKey::Release, "18.*".to_string()),
            ]
        );
        assert_eq!(
            spec.groups()[1].pairs(),
            &[(ConstraintKey::Platform, "windows".to_string())]
        );
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let spec: SupportSpecification =
            serde_json::from_str(r#"[{"release": "6.*", "os": "linux", "release": "7.*"}]"#).unwrap();
        assert_eq!(
            spec.groups()[0].pairs(),
            &[
                (ConstraintKey::Release, "7.*".to_string()),
                (ConstraintKey::Platform, "linux".to_string()),
            ]
        );
    }

    #[test]
    fn aliased_keys_share_one_slot() {
        let group = ConstraintGroup::new()
            .with("os_family", "windows")
            .with("platform-family", "unix");
        assert_eq!(group.pairs(), &[(ConstraintKey::Family, "unix".to_string())]);

        let group = ConstraintGroup::from_pairs([("kernel", "4"), ("kernel", "5")]);
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn integer_values_become_strings() {
        let group: ConstraintGroup = serde_json::from_str(r#"{"release": 10}"#).unwrap();
        assert_eq!(group.pairs(), &[(ConstraintKey::Release, "10".to_string())]);
    }

    #[test]
    fn non_scalar_value_is_rejected() {
        assert!(serde_json::from_str::<ConstraintGroup>(r#"{"os": ["linux"]}"#).is_err());
        assert!(serde_json::from_str::<ConstraintGroup>(r#"{"release": 7.4}"#).is_err());
    }

    #[test]
    fn null_and_empty_specifications() {
        let spec: SupportSpecification = serde_json::from_str("null").unwrap();
        assert!(spec.is_empty());
        let spec: SupportSpecification = serde_json::from_str("[]").unwrap();
        assert!(spec.is_empty());
        let spec: SupportSpecification = serde_json::from_str("[{}]").unwrap();
        assert!(spec.groups()[0].is_empty());
    }

    #[test]
    fn unknown_keys_survive_ingestion() {
        let group: ConstraintGroup = serde_json::from_str(r#"{"kernel": "4.19"}"#).unwrap();
        assert_eq!(group.pairs()[0].0, ConstraintKey::Unknown("kernel".into()));
    }
}
