//! Case-insensitive ordered slot map and the memoized structural hash.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::AbsObject;

/// Ordered mapping from slot name to value.
///
/// Names are unique under ASCII case-insensitive comparison. Insertion
/// order is kept for enumeration and display; it is not significant for
/// equality or hashing.
#[derive(Debug, Clone, Default)]
pub struct Slots {
    entries: Vec<(String, AbsObject)>,
}

impl Slots {
    /// Create an empty slot map.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    /// Value of a slot, matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&AbsObject> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Mutable value of a slot, matched case-insensitively.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut AbsObject> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Whether a slot with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Insert or replace a slot value, returning the previous value.
    ///
    /// A replaced slot keeps its original position and spelling.
    pub fn insert(&mut self, name: impl Into<String>, value: AbsObject) -> Option<AbsObject> {
        let name = name.into();
        match self.position(&name).and_then(|idx| self.entries.get_mut(idx)) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Remove a slot, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<AbsObject> {
        self.position(name).map(|idx| self.entries.remove(idx).1)
    }

    /// Slot names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AbsObject)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Mutable `(name, value)` pairs in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut AbsObject)> {
        self.entries
            .iter_mut()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Keep only the slots for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &AbsObject) -> bool) {
        self.entries.retain(|(key, value)| keep(key, value));
    }

    /// Number of slots.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no slots.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Feed the slots into a hasher in an order-independent way.
    ///
    /// Names are lowercased and sorted before folding, so two maps that are
    /// equal under [`PartialEq`] always hash identically.
    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        let mut keyed: Vec<(String, &AbsObject)> = self
            .entries
            .iter()
            .map(|(key, value)| (key.to_ascii_lowercase(), value))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.len().hash(state);
        for (key, value) in keyed {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl PartialEq for Slots {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl Eq for Slots {}

impl Serialize for Slots {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Slots {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SlotsVisitor;

        impl<'de> Visitor<'de> for SlotsVisitor {
            type Value = Slots;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of slot names to abstract values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Slots, A::Error> {
                let mut slots = Slots::new();
                while let Some((name, value)) = access.next_entry::<String, AbsObject>()? {
                    slots.insert(name, value);
                }
                Ok(slots)
            }
        }

        deserializer.deserialize_map(SlotsVisitor)
    }
}

/// Lazily computed structural hash of one node.
///
/// Computing twice yields the same value, so concurrent first reads are
/// harmless. Every mutating accessor of the owning node calls
/// [`HashCache::invalidate`].
#[derive(Debug, Clone, Default)]
pub(crate) struct HashCache(OnceLock<u64>);

impl HashCache {
    pub(crate) fn get_or_compute(&self, compute: impl FnOnce(&mut DefaultHasher)) -> u64 {
        *self.0.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            compute(&mut hasher);
            hasher.finish()
        })
    }

    pub(crate) fn invalidate(&mut self) {
        self.0 = OnceLock::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let mut slots = Slots::new();
        slots.insert("Name", AbsObject::from("Alice"));
        assert!(slots.contains("name"));
        assert!(slots.contains("NAME"));
        assert_eq!(slots.get("nAmE"), Some(&AbsObject::from("Alice")));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut slots = Slots::new();
        slots.insert("a", AbsObject::from(1_i64));
        slots.insert("b", AbsObject::from(2_i64));
        let previous = slots.insert("A", AbsObject::from(3_i64));
        assert_eq!(previous, Some(AbsObject::from(1_i64)));
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(slots.get("a"), Some(&AbsObject::from(3_i64)));
    }

    #[test]
    fn equality_ignores_order_and_case() {
        let mut left = Slots::new();
        left.insert("x", AbsObject::from(1_i64));
        left.insert("y", AbsObject::from(2_i64));
        let mut right = Slots::new();
        right.insert("Y", AbsObject::from(2_i64));
        right.insert("X", AbsObject::from(1_i64));
        assert_eq!(left, right);

        let mut lh = DefaultHasher::new();
        left.hash_into(&mut lh);
        let mut rh = DefaultHasher::new();
        right.hash_into(&mut rh);
        assert_eq!(lh.finish(), rh.finish());
    }

    #[test]
    fn swapped_values_hash_differently() {
        let mut left = Slots::new();
        left.insert("x", AbsObject::from(1_i64));
        left.insert("y", AbsObject::from(2_i64));
        let mut right = Slots::new();
        right.insert("x", AbsObject::from(2_i64));
        right.insert("y", AbsObject::from(1_i64));
        assert_ne!(left, right);

        let mut lh = DefaultHasher::new();
        left.hash_into(&mut lh);
        let mut rh = DefaultHasher::new();
        right.hash_into(&mut rh);
        assert_ne!(lh.finish(), rh.finish());
    }

    #[test]
    fn remove_returns_value() {
        let mut slots = Slots::new();
        slots.insert("x", AbsObject::from(true));
        assert_eq!(slots.remove("X"), Some(AbsObject::from(true)));
        assert!(slots.is_empty());
        assert_eq!(slots.remove("x"), None);
    }
}
