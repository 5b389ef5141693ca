//! Identifying referential expressions.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::AbsObject;

/// Slot holding the referenced term.
pub const VARIABLE: &str = "Variable";
/// Slot holding the constraining proposition.
pub const PROPOSITION: &str = "Proposition";

/// An expression that refers to the object(s) satisfying a proposition,
/// e.g. `(iota ?x (owns Alice ?x))`.
///
/// The type name is the referential operator (`iota`, `any`, `all`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsIre {
    #[serde(rename = "type")]
    type_name: String,
    variable: Box<AbsObject>,
    proposition: Box<AbsObject>,
}

impl AbsIre {
    /// Build an IRE from its operator, referenced term and proposition.
    pub fn new(
        type_name: impl Into<String>,
        variable: impl Into<AbsObject>,
        proposition: impl Into<AbsObject>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            variable: Box::new(variable.into()),
            proposition: Box::new(proposition.into()),
        }
    }

    /// The referential operator.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Change the referential operator.
    pub fn set_type_name(&mut self, type_name: impl Into<String>) {
        self.type_name = type_name.into();
    }

    /// The referenced term, usually a variable.
    pub fn variable(&self) -> &AbsObject {
        &self.variable
    }

    /// Replace the referenced term.
    pub fn set_variable(&mut self, variable: impl Into<AbsObject>) {
        self.variable = Box::new(variable.into());
    }

    /// The constraining proposition.
    pub fn proposition(&self) -> &AbsObject {
        &self.proposition
    }

    /// Replace the constraining proposition.
    pub fn set_proposition(&mut self, proposition: impl Into<AbsObject>) {
        self.proposition = Box::new(proposition.into());
    }

    pub(crate) fn variable_mut(&mut self) -> &mut AbsObject {
        &mut self.variable
    }

    pub(crate) fn proposition_mut(&mut self) -> &mut AbsObject {
        &mut self.proposition
    }

    /// Slot view (`Variable`, `Proposition`).
    pub fn abs_object(&self, name: &str) -> Option<&AbsObject> {
        if name.eq_ignore_ascii_case(VARIABLE) {
            Some(&self.variable)
        } else if name.eq_ignore_ascii_case(PROPOSITION) {
            Some(&self.proposition)
        } else {
            None
        }
    }

    /// Slot names.
    pub fn names(&self) -> Vec<String> {
        vec![VARIABLE.to_owned(), PROPOSITION.to_owned()]
    }

    /// True when neither part contains a variable.
    pub fn is_grounded(&self) -> bool {
        self.variable.is_grounded() && self.proposition.is_grounded()
    }

    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        self.variable.hash(state);
        self.proposition.hash(state);
    }
}

impl fmt::Display for AbsIre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} {} {})",
            self.type_name, self.variable, self.proposition
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abs::{AbsPredicate, AbsVariable};

    #[test]
    fn display_and_slots() {
        let ire = AbsIre::new(
            "iota",
            AbsVariable::new("x"),
            AbsPredicate::new("owns").with("owner", "Alice"),
        );
        assert_eq!(ire.to_string(), "(iota ?x (owns :owner \"Alice\"))");
        assert!(ire.abs_object("variable").is_some());
        assert!(ire.abs_object("PROPOSITION").is_some());
        assert!(ire.abs_object("other").is_none());
        assert!(!ire.is_grounded());
    }
}
