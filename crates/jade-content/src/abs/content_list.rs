//! Lists of content elements.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::aggregate::{element_index, positional_names};
use super::{AbsObject, AbsType, HashCache};
use crate::schema::CONTENT_ELEMENT_LIST_BASE;

/// Several content elements sent together in one message, such as the
/// actions of a `request` or the results of an `inform`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbsContentElementList {
    #[serde(default)]
    elements: Vec<AbsObject>,
    #[serde(skip)]
    hash: HashCache,
}

impl AbsContentElementList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::add`].
    #[must_use]
    pub fn with(mut self, element: impl Into<AbsObject>) -> Self {
        self.add(element);
        self
    }

    /// Always `ContentElementList`.
    pub const fn type_name(&self) -> &'static str {
        CONTENT_ELEMENT_LIST_BASE
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

    /// Element behind a positional slot name such as `#0`.
    pub fn abs_object(&self, name: &str) -> Option<&AbsObject> {
        element_index(name).and_then(|idx| self.elements.get(idx))
    }

    /// Positional slot names.
    pub fn names(&self) -> Vec<String> {
        positional_names(self.elements.len())
    }

    /// True when no element contains a variable.
    pub fn is_grounded(&self) -> bool {
        self.elements.iter().all(AbsObject::is_grounded)
    }

    pub(crate) fn structural_hash(&self) -> u64 {
        self.hash.get_or_compute(|hasher| {
            AbsType::ContentElementList.hash(hasher);
            self.elements.hash(hasher);
        })
    }
}

impl PartialEq for AbsContentElementList {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl Eq for AbsContentElementList {}

impl fmt::Display for AbsContentElementList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (idx, element) in self.elements.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{element}")?;
        }
        f.write_str(")")
    }
}
