//! Aggregates: ordered collections of terms.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::{AbsObject, AbsType, HashCache};
use crate::onto::basic;

/// Prefix of the positional slot names an aggregate exposes.
pub const ELEMENT_PREFIX: char = '#';

/// An ordered collection of terms, typed `sequence`, `set` or a custom
/// aggregate type.
///
/// The optional element template describes what elements should look like;
/// it is produced by template generation and is not part of equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbsAggregate {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    elements: Vec<AbsObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    element_template: Option<Box<AbsObject>>,
    #[serde(skip)]
    hash: HashCache,
}

impl AbsAggregate {
    /// An empty aggregate of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            elements: Vec::new(),
            element_template: None,
            hash: HashCache::default(),
        }
    }

    /// An empty `sequence`.
    pub fn sequence() -> Self {
        Self::new(basic::SEQUENCE)
    }

    /// An empty `set`.
    pub fn set() -> Self {
        Self::new(basic::SET)
    }

    /// Builder form of [`Self::add`].
    #[must_use]
    pub fn with(mut self, element: impl Into<AbsObject>) -> Self {
        self.add(element);
        self
    }

    /// The aggregate type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Rename the aggregate type.
    pub fn set_type_name(&mut self, type_name: impl Into<String>) {
        self.type_name = type_name.into();
        self.hash.invalidate();
    }

    /// Append an element.
    pub fn add(&mut self, element: impl Into<AbsObject>) {
        self.elements.push(element.into());
        self.hash.invalidate();
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Option<&AbsObject> {
        self.elements.get(index)
    }

    /// Remove and return the element at `index`.
    pub fn remove(&mut self, index: usize) -> Option<AbsObject> {
        if index >= self.elements.len() {
            return None;
        }
        self.hash.invalidate();
        Some(self.elements.remove(index))
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.hash.invalidate();
    }

    /// Whether an equal element is present.
    pub fn contains(&self, element: &AbsObject) -> bool {
        self.elements.contains(element)
    }

    /// Number of elements.
    pub const fn size(&self) -> usize {
        self.elements.len()
    }

    /// Whether there are no elements.
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in order.
    pub fn elements(&self) -> &[AbsObject] {
        &self.elements
    }

    /// Elements in order, mutably. Invalidates the memoized hash.
    pub fn elements_mut(&mut self) -> &mut Vec<AbsObject> {
        self.hash.invalidate();
        &mut self.elements
    }

    /// Template describing the expected elements.
    pub fn element_template(&self) -> Option<&AbsObject> {
        self.element_template.as_deref()
    }

    /// Set or clear the element template.
    pub fn set_element_template(&mut self, template: Option<AbsObject>) {
        self.element_template = template.map(Box::new);
    }

    /// Element behind a positional slot name such as `#2`.
    pub fn abs_object(&self, name: &str) -> Option<&AbsObject> {
        element_index(name).and_then(|idx| self.elements.get(idx))
    }

    /// Positional slot names `#0`, `#1`, ...
    pub fn names(&self) -> Vec<String> {
        positional_names(self.elements.len())
    }

    /// True when neither the elements nor the element template contain a
    /// variable.
    pub fn is_grounded(&self) -> bool {
        self.elements.iter().all(AbsObject::is_grounded)
            && self
                .element_template
                .as_deref()
                .is_none_or(AbsObject::is_grounded)
    }

    pub(crate) fn structural_hash(&self) -> u64 {
        self.hash.get_or_compute(|hasher| {
            AbsType::Aggregate.hash(hasher);
            self.type_name.hash(hasher);
            self.elements.hash(hasher);
        })
    }
}

impl PartialEq for AbsAggregate {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.elements == other.elements
    }
}

impl Eq for AbsAggregate {}

impl fmt::Display for AbsAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.type_name)?;
        for element in &self.elements {
            write!(f, " {element}")?;
        }
        f.write_str(")")
    }
}

/// Parse a positional slot name (`#3` -> 3).
pub(crate) fn element_index(name: &str) -> Option<usize> {
    name.strip_prefix(ELEMENT_PREFIX)?.parse().ok()
}

pub(crate) fn positional_names(len: usize) -> Vec<String> {
    (0..len).map(|idx| format!("{ELEMENT_PREFIX}{idx}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_slots() {
        let agg = AbsAggregate::sequence().with("a").with("b");
        assert_eq!(agg.names(), vec!["#0", "#1"]);
        assert_eq!(agg.abs_object("#1"), Some(&AbsObject::from("b")));
        assert_eq!(agg.abs_object("#2"), None);
        assert_eq!(agg.abs_object("1"), None);
    }

    #[test]
    fn order_matters_for_equality() {
        let ab = AbsAggregate::sequence().with(1_i64).with(2_i64);
        let ba = AbsAggregate::sequence().with(2_i64).with(1_i64);
        assert_ne!(ab, ba);
        assert_ne!(ab.structural_hash(), ba.structural_hash());
    }

    #[test]
    fn template_is_not_part_of_equality() {
        let mut with_template = AbsAggregate::sequence();
        with_template.set_element_template(Some(AbsObject::from("x")));
        assert_eq!(with_template, AbsAggregate::sequence());
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut agg = AbsAggregate::set().with(true);
        assert_eq!(agg.remove(3), None);
        assert_eq!(agg.remove(0), Some(AbsObject::from(true)));
        assert!(agg.is_empty());
    }
}
