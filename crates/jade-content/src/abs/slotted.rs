//! Concepts, agent actions and predicates.
//!
//! The three share one shape (a type name plus named slots) and differ only
//! in which positions of a sentence they may occupy, so they are generated
//! from a single macro.

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AbsObject, AbsType, HashCache, Slots, fmt_slots};

macro_rules! define_slotted {
    (
        $(#[$meta:meta])*
        $name:ident, $abs_type:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct $name {
            #[serde(rename = "type")]
            type_name: String,
            #[serde(default)]
            slots: Slots,
            #[serde(skip)]
            hash: HashCache,
        }

        impl $name {
            /// Create a node with the given type name and no slots.
            pub fn new(type_name: impl Into<String>) -> Self {
                Self {
                    type_name: type_name.into(),
                    slots: Slots::new(),
                    hash: HashCache::default(),
                }
            }

            /// Builder form of [`Self::set`].
            #[must_use]
            pub fn with(mut self, name: impl Into<String>, value: impl Into<AbsObject>) -> Self {
                self.set(name, value);
                self
            }

            /// The type name.
            pub fn type_name(&self) -> &str {
                &self.type_name
            }

            /// Rename the type.
            pub fn set_type_name(&mut self, type_name: impl Into<String>) {
                self.type_name = type_name.into();
                self.hash.invalidate();
            }

            /// Set a slot, replacing any previous value.
            pub fn set(&mut self, name: impl Into<String>, value: impl Into<AbsObject>) {
                self.slots.insert(name, value.into());
                self.hash.invalidate();
            }

            /// Set a slot, or remove it when `value` is `None`.
            pub fn set_option(&mut self, name: impl Into<String>, value: Option<AbsObject>) {
                let name = name.into();
                match value {
                    Some(value) => self.set(name, value),
                    None => {
                        self.remove(&name);
                    }
                }
            }

            /// Set a string slot.
            pub fn set_str(&mut self, name: impl Into<String>, value: impl Into<String>) {
                self.set(name, AbsObject::from(value.into()));
            }

            /// Set an integer slot.
            pub fn set_int(&mut self, name: impl Into<String>, value: i64) {
                self.set(name, value);
            }

            /// Set a boolean slot.
            pub fn set_bool(&mut self, name: impl Into<String>, value: bool) {
                self.set(name, value);
            }

            /// Set a float slot.
            pub fn set_float(&mut self, name: impl Into<String>, value: f64) {
                self.set(name, value);
            }

            /// Set a date slot.
            pub fn set_date(&mut self, name: impl Into<String>, value: DateTime<Utc>) {
                self.set(name, value);
            }

            /// Remove a slot, returning its value.
            pub fn remove(&mut self, name: &str) -> Option<AbsObject> {
                let removed = self.slots.remove(name);
                if removed.is_some() {
                    self.hash.invalidate();
                }
                removed
            }

            /// Value of a slot, matched case-insensitively.
            pub fn abs_object(&self, name: &str) -> Option<&AbsObject> {
                self.slots.get(name)
            }

            /// Mutable value of a slot.
            pub fn abs_object_mut(&mut self, name: &str) -> Option<&mut AbsObject> {
                self.hash.invalidate();
                self.slots.get_mut(name)
            }

            /// String value of a slot.
            pub fn get_string(&self, name: &str) -> Option<&str> {
                self.slots.get(name).and_then(AbsObject::as_str)
            }

            /// Integer value of a slot.
            pub fn get_integer(&self, name: &str) -> Option<i64> {
                self.primitive(name).and_then(super::AbsPrimitive::as_integer)
            }

            /// Boolean value of a slot.
            pub fn get_boolean(&self, name: &str) -> Option<bool> {
                self.primitive(name).and_then(super::AbsPrimitive::as_boolean)
            }

            /// Float value of a slot; integers widen.
            pub fn get_float(&self, name: &str) -> Option<f64> {
                self.primitive(name).and_then(super::AbsPrimitive::as_float)
            }

            /// Date value of a slot.
            pub fn get_date(&self, name: &str) -> Option<DateTime<Utc>> {
                self.primitive(name).and_then(super::AbsPrimitive::as_date)
            }

            /// Byte-sequence value of a slot.
            pub fn get_byte_sequence(&self, name: &str) -> Option<&[u8]> {
                self.primitive(name).and_then(super::AbsPrimitive::as_bytes)
            }

            fn primitive(&self, name: &str) -> Option<&super::AbsPrimitive> {
                self.slots.get(name).and_then(AbsObject::as_primitive)
            }

            /// All slots.
            pub const fn slots(&self) -> &Slots {
                &self.slots
            }

            /// All slots, mutably. Invalidates the memoized hash.
            pub fn slots_mut(&mut self) -> &mut Slots {
                self.hash.invalidate();
                &mut self.slots
            }

            /// Number of slots holding a value.
            pub const fn count(&self) -> usize {
                self.slots.len()
            }

            /// True when no slot value contains a variable.
            pub fn is_grounded(&self) -> bool {
                self.slots.iter().all(|(_, value)| value.is_grounded())
            }

            pub(crate) fn structural_hash(&self) -> u64 {
                self.hash.get_or_compute(|hasher| {
                    $abs_type.hash(hasher);
                    self.type_name.hash(hasher);
                    self.slots.hash_into(hasher);
                })
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.type_name == other.type_name && self.slots == other.slots
            }
        }

        impl Eq for $name {}

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt_slots(f, &self.type_name, &self.slots)
            }
        }
    };
}

define_slotted! {
    /// An entity of the domain, such as a person or a book.
    AbsConcept, AbsType::Concept
}

define_slotted! {
    /// An action an agent can perform. Usable both as a term and as
    /// message content.
    AbsAgentAction, AbsType::AgentAction
}

define_slotted! {
    /// A proposition about the domain that is either true or false.
    AbsPredicate, AbsType::Predicate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters() {
        let mut book = AbsConcept::new("Book");
        book.set_str("title", "Dune");
        book.set_int("pages", 412);
        book.set_bool("hardcover", false);
        book.set_float("price", 9.5);
        assert_eq!(book.get_string("TITLE"), Some("Dune"));
        assert_eq!(book.get_integer("pages"), Some(412));
        assert_eq!(book.get_boolean("hardcover"), Some(false));
        assert_eq!(book.get_float("price"), Some(9.5));
        assert_eq!(book.get_float("pages"), Some(412.0));
        assert_eq!(book.get_string("pages"), None);
        assert_eq!(book.count(), 4);
    }

    #[test]
    fn setting_none_removes_the_slot() {
        let mut book = AbsConcept::new("Book").with("title", "Dune");
        book.set_option("title", None);
        assert!(book.abs_object("title").is_none());
        assert_eq!(book.count(), 0);
        book.set_option("title", Some(AbsObject::from("Emma")));
        assert_eq!(book.get_string("title"), Some("Emma"));
    }

    #[test]
    fn renaming_changes_equality() {
        let a = AbsPredicate::new("owns");
        let mut b = AbsPredicate::new("owns");
        assert_eq!(a, b);
        b.set_type_name("sells");
        assert_ne!(a, b);
        assert_ne!(a.structural_hash(), b.structural_hash());
    }
}
