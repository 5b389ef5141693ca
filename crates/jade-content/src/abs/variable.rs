//! Variables.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{AbsObject, Slots};
use crate::schema::VARIABLE_BASE;

/// Slot holding the variable name.
pub const NAME: &str = "Name";
/// Slot holding the declared value type.
pub const VALUE_TYPE: &str = "ValueType";

/// A named placeholder for a term, written `?name` (or `??name` for a
/// meta-variable).
///
/// The name and the declared value type are exposed as the string slots
/// [`NAME`] and [`VALUE_TYPE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsVariable {
    slots: Slots,
    #[serde(default)]
    meta: bool,
}

impl AbsVariable {
    /// A variable with the given name and no declared type.
    pub fn new(name: impl Into<String>) -> Self {
        let mut slots = Slots::new();
        slots.insert(NAME, AbsObject::from(name.into()));
        Self { slots, meta: false }
    }

    /// A variable with a declared value type.
    pub fn typed(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        let mut var = Self::new(name);
        var.set_value_type(Some(value_type.into()));
        var
    }

    /// A meta-variable, which stands for a schema element rather than a
    /// value.
    pub fn meta(name: impl Into<String>) -> Self {
        let mut var = Self::new(name);
        var.meta = true;
        var
    }

    /// Always `Variable`.
    pub const fn type_name(&self) -> &'static str {
        VARIABLE_BASE
    }

    /// The variable name.
    pub fn name(&self) -> &str {
        self.slots
            .get(NAME)
            .and_then(AbsObject::as_str)
            .unwrap_or_default()
    }

    /// Rename the variable.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.slots.insert(NAME, AbsObject::from(name.into()));
    }

    /// Declared value type, if any.
    pub fn value_type(&self) -> Option<&str> {
        self.slots.get(VALUE_TYPE).and_then(AbsObject::as_str)
    }

    /// Set or clear the declared value type.
    pub fn set_value_type(&mut self, value_type: Option<String>) {
        match value_type {
            Some(value_type) => {
                self.slots.insert(VALUE_TYPE, AbsObject::from(value_type));
            }
            None => {
                self.slots.remove(VALUE_TYPE);
            }
        }
    }

    /// Whether this is a meta-variable.
    pub const fn is_meta(&self) -> bool {
        self.meta
    }

    /// Slot view (`Name`, `ValueType`).
    pub fn abs_object(&self, name: &str) -> Option<&AbsObject> {
        self.slots.get(name)
    }

    pub(crate) const fn slots(&self) -> &Slots {
        &self.slots
    }

    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        self.meta.hash(state);
        self.slots.hash_into(state);
    }
}

impl fmt::Display for AbsVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.meta { "??" } else { "?" };
        write!(f, "{marker}{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_name_and_type_as_slots() {
        let var = AbsVariable::typed("x", "Person");
        assert_eq!(var.name(), "x");
        assert_eq!(var.value_type(), Some("Person"));
        assert_eq!(var.abs_object("name"), Some(&AbsObject::from("x")));
        assert_eq!(var.abs_object("valuetype"), Some(&AbsObject::from("Person")));
    }

    #[test]
    fn display_marks_meta_variables() {
        assert_eq!(AbsVariable::new("x").to_string(), "?x");
        assert_eq!(AbsVariable::meta("t").to_string(), "??t");
    }

    #[test]
    fn clearing_value_type() {
        let mut var = AbsVariable::typed("x", "Person");
        var.set_value_type(None);
        assert_eq!(var.value_type(), None);
        assert_eq!(AbsObject::from(var).names(), vec!["Name"]);
    }
}
