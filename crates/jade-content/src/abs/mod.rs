//! Abstract content model.
//!
//! An [`AbsObject`] is the generic tree every piece of message content passes
//! through: codecs decode payloads into it, ontologies convert application
//! values to and from it, and schemas validate it. The kind set is closed,
//! so every traversal matches exhaustively on the enum.
//!
//! Equality and hashing are structural. Slot order never matters; the hash
//! of a slot-bearing node folds over its slot names sorted
//! case-insensitively and is memoized until the node is mutated.

mod aggregate;
mod content_list;
mod ire;
mod primitive;
mod slots;
mod slotted;
mod variable;

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use aggregate::AbsAggregate;
pub use content_list::AbsContentElementList;
pub use ire::AbsIre;
pub use primitive::{AbsPrimitive, PrimitiveValue};
pub use slots::Slots;
pub use slotted::{AbsAgentAction, AbsConcept, AbsPredicate};
pub use variable::AbsVariable;

pub(crate) use slots::HashCache;

/// Kind of an abstract node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsType {
    /// A primitive leaf.
    Primitive,
    /// A concept.
    Concept,
    /// An agent action.
    AgentAction,
    /// A predicate.
    Predicate,
    /// An aggregate of terms.
    Aggregate,
    /// A variable.
    Variable,
    /// An identifying referential expression.
    Ire,
    /// A list of content elements.
    ContentElementList,
}

impl fmt::Display for AbsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Primitive => "primitive",
            Self::Concept => "concept",
            Self::AgentAction => "agent-action",
            Self::Predicate => "predicate",
            Self::Aggregate => "aggregate",
            Self::Variable => "variable",
            Self::Ire => "ire",
            Self::ContentElementList => "content-element-list",
        };
        f.write_str(label)
    }
}

/// A node of the abstract content tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbsObject {
    /// A primitive value.
    Primitive(AbsPrimitive),
    /// A concept.
    Concept(AbsConcept),
    /// An agent action.
    AgentAction(AbsAgentAction),
    /// A predicate.
    Predicate(AbsPredicate),
    /// An aggregate.
    Aggregate(AbsAggregate),
    /// A variable.
    Variable(AbsVariable),
    /// An identifying referential expression.
    Ire(AbsIre),
    /// A list of content elements.
    ContentElementList(AbsContentElementList),
}

impl AbsObject {
    /// Type name of the node, resolved against an ontology during
    /// validation.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Primitive(p) => p.type_name(),
            Self::Concept(c) => c.type_name(),
            Self::AgentAction(a) => a.type_name(),
            Self::Predicate(p) => p.type_name(),
            Self::Aggregate(a) => a.type_name(),
            Self::Variable(v) => v.type_name(),
            Self::Ire(i) => i.type_name(),
            Self::ContentElementList(l) => l.type_name(),
        }
    }

    /// Kind of the node.
    pub const fn abs_type(&self) -> AbsType {
        match self {
            Self::Primitive(_) => AbsType::Primitive,
            Self::Concept(_) => AbsType::Concept,
            Self::AgentAction(_) => AbsType::AgentAction,
            Self::Predicate(_) => AbsType::Predicate,
            Self::Aggregate(_) => AbsType::Aggregate,
            Self::Variable(_) => AbsType::Variable,
            Self::Ire(_) => AbsType::Ire,
            Self::ContentElementList(_) => AbsType::ContentElementList,
        }
    }

    /// Child value of a named slot.
    ///
    /// Aggregates and content element lists answer `#0`, `#1`, ...;
    /// variables answer `Name` and `ValueType`; IREs answer `Variable` and
    /// `Proposition`. Primitives have no slots.
    pub fn abs_object(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Primitive(_) => None,
            Self::Concept(c) => c.abs_object(name),
            Self::AgentAction(a) => a.abs_object(name),
            Self::Predicate(p) => p.abs_object(name),
            Self::Aggregate(a) => a.abs_object(name),
            Self::Variable(v) => v.abs_object(name),
            Self::Ire(i) => i.abs_object(name),
            Self::ContentElementList(l) => l.abs_object(name),
        }
    }

    /// Names of the slots that currently hold a value.
    pub fn names(&self) -> Vec<String> {
        match self {
            Self::Primitive(_) => Vec::new(),
            Self::Concept(c) => c.slots().names().map(String::from).collect(),
            Self::AgentAction(a) => a.slots().names().map(String::from).collect(),
            Self::Predicate(p) => p.slots().names().map(String::from).collect(),
            Self::Aggregate(a) => a.names(),
            Self::Variable(v) => v.slots().names().map(String::from).collect(),
            Self::Ire(i) => i.names(),
            Self::ContentElementList(l) => l.names(),
        }
    }

    /// Number of slots that currently hold a value.
    pub fn count(&self) -> usize {
        match self {
            Self::Primitive(_) => 0,
            Self::Concept(c) => c.count(),
            Self::AgentAction(a) => a.count(),
            Self::Predicate(p) => p.count(),
            Self::Aggregate(a) => a.size(),
            Self::Variable(v) => v.slots().len(),
            Self::Ire(_) => 2,
            Self::ContentElementList(l) => l.size(),
        }
    }

    /// True when no node of the tree is a variable.
    pub fn is_grounded(&self) -> bool {
        match self {
            Self::Primitive(_) => true,
            Self::Variable(_) => false,
            Self::Concept(c) => c.is_grounded(),
            Self::AgentAction(a) => a.is_grounded(),
            Self::Predicate(p) => p.is_grounded(),
            Self::Aggregate(a) => a.is_grounded(),
            Self::Ire(i) => i.is_grounded(),
            Self::ContentElementList(l) => l.is_grounded(),
        }
    }

    /// Whether the node may be used as message content on its own.
    pub const fn is_content_element(&self) -> bool {
        matches!(
            self,
            Self::Predicate(_) | Self::AgentAction(_) | Self::Ire(_) | Self::ContentElementList(_)
        )
    }

    /// Whether the node may fill a term slot.
    pub const fn is_term(&self) -> bool {
        matches!(
            self,
            Self::Primitive(_)
                | Self::Concept(_)
                | Self::AgentAction(_)
                | Self::Aggregate(_)
                | Self::Variable(_)
                | Self::Ire(_)
        )
    }

    /// Named slots of a concept, agent action or predicate.
    pub const fn slots(&self) -> Option<&Slots> {
        match self {
            Self::Concept(c) => Some(c.slots()),
            Self::AgentAction(a) => Some(a.slots()),
            Self::Predicate(p) => Some(p.slots()),
            _ => None,
        }
    }

    /// Mutable named slots of a concept, agent action or predicate.
    pub fn slots_mut(&mut self) -> Option<&mut Slots> {
        match self {
            Self::Concept(c) => Some(c.slots_mut()),
            Self::AgentAction(a) => Some(a.slots_mut()),
            Self::Predicate(p) => Some(p.slots_mut()),
            _ => None,
        }
    }

    /// Rename the node's type. Primitives and variables keep theirs.
    pub fn set_type_name(&mut self, type_name: impl Into<String>) {
        match self {
            Self::Concept(c) => c.set_type_name(type_name),
            Self::AgentAction(a) => a.set_type_name(type_name),
            Self::Predicate(p) => p.set_type_name(type_name),
            Self::Aggregate(a) => a.set_type_name(type_name),
            Self::Ire(i) => i.set_type_name(type_name),
            Self::Primitive(_) | Self::Variable(_) | Self::ContentElementList(_) => {}
        }
    }

    /// The primitive, if this node is one.
    pub const fn as_primitive(&self) -> Option<&AbsPrimitive> {
        match self {
            Self::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// The aggregate, if this node is one.
    pub const fn as_aggregate(&self) -> Option<&AbsAggregate> {
        match self {
            Self::Aggregate(a) => Some(a),
            _ => None,
        }
    }

    /// The variable, if this node is one.
    pub const fn as_variable(&self) -> Option<&AbsVariable> {
        match self {
            Self::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// The concept, if this node is a plain concept.
    pub const fn as_concept(&self) -> Option<&AbsConcept> {
        match self {
            Self::Concept(c) => Some(c),
            _ => None,
        }
    }

    /// String value, if this node is a string primitive.
    pub fn as_str(&self) -> Option<&str> {
        self.as_primitive().and_then(AbsPrimitive::as_str)
    }

    /// Order-independent structural hash, memoized on slot-bearing nodes.
    pub fn structural_hash(&self) -> u64 {
        match self {
            Self::Concept(c) => c.structural_hash(),
            Self::AgentAction(a) => a.structural_hash(),
            Self::Predicate(p) => p.structural_hash(),
            Self::Aggregate(a) => a.structural_hash(),
            Self::ContentElementList(l) => l.structural_hash(),
            Self::Primitive(_) | Self::Variable(_) | Self::Ire(_) => {
                let mut hasher = std::collections::hash_map::DefaultHasher::new();
                self.abs_type().hash(&mut hasher);
                match self {
                    Self::Primitive(p) => p.hash(&mut hasher),
                    Self::Variable(v) => v.hash_into(&mut hasher),
                    Self::Ire(i) => i.hash_into(&mut hasher),
                    _ => {}
                }
                hasher.finish()
            }
        }
    }
}

impl Hash for AbsObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl fmt::Display for AbsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => p.fmt(f),
            Self::Concept(c) => c.fmt(f),
            Self::AgentAction(a) => a.fmt(f),
            Self::Predicate(p) => p.fmt(f),
            Self::Aggregate(a) => a.fmt(f),
            Self::Variable(v) => v.fmt(f),
            Self::Ire(i) => i.fmt(f),
            Self::ContentElementList(l) => l.fmt(f),
        }
    }
}

/// Write `(head :name value ...)`.
pub(crate) fn fmt_slots(f: &mut fmt::Formatter<'_>, head: &str, slots: &Slots) -> fmt::Result {
    write!(f, "({head}")?;
    for (name, value) in slots.iter() {
        write!(f, " :{name} {value}")?;
    }
    f.write_str(")")
}

macro_rules! from_primitive {
    ($($ty:ty => $ctor:ident),* $(,)?) => {
        $(
            impl From<$ty> for AbsObject {
                fn from(value: $ty) -> Self {
                    Self::Primitive(AbsPrimitive::$ctor(value))
                }
            }
        )*
    };
}

from_primitive! {
    &str => string,
    String => string,
    bool => boolean,
    i64 => integer,
    f64 => float,
    DateTime<Utc> => date,
    Vec<u8> => byte_sequence,
}

impl From<i32> for AbsObject {
    fn from(value: i32) -> Self {
        Self::Primitive(AbsPrimitive::integer(i64::from(value)))
    }
}

macro_rules! from_node {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for AbsObject {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

from_node! {
    AbsPrimitive => Primitive,
    AbsConcept => Concept,
    AbsAgentAction => AgentAction,
    AbsPredicate => Predicate,
    AbsAggregate => Aggregate,
    AbsVariable => Variable,
    AbsIre => Ire,
    AbsContentElementList => ContentElementList,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn person(name: &str) -> AbsConcept {
        AbsConcept::new("Person").with("name", name).with("age", 30_i64)
    }

    #[test]
    fn equality_ignores_slot_order() {
        let a = AbsConcept::new("Person").with("name", "Alice").with("age", 30_i64);
        let b = AbsConcept::new("Person").with("age", 30_i64).with("Name", "Alice");
        assert_eq!(AbsObject::from(a.clone()), AbsObject::from(b.clone()));
        assert_eq!(
            AbsObject::from(a).structural_hash(),
            AbsObject::from(b).structural_hash()
        );
    }

    #[test]
    fn variant_matters_for_equality() {
        let concept = AbsObject::from(AbsConcept::new("Sell"));
        let action = AbsObject::from(AbsAgentAction::new("Sell"));
        assert_ne!(concept, action);
    }

    #[test]
    fn hash_changes_after_mutation() {
        let mut obj = AbsObject::from(person("Alice"));
        let before = obj.structural_hash();
        obj.slots_mut().unwrap().insert("name", AbsObject::from("Bob"));
        assert_ne!(obj.structural_hash(), before);
        assert_eq!(obj.structural_hash(), AbsObject::from(person("Bob")).structural_hash());
    }

    #[test]
    fn usable_as_set_key() {
        let mut set = HashSet::new();
        set.insert(AbsObject::from(person("Alice")));
        assert!(set.contains(&AbsObject::from(person("Alice"))));
        assert!(!set.contains(&AbsObject::from(person("Bob"))));
    }

    #[test]
    fn grounded_detection_reaches_nested_variables() {
        let grounded = AbsObject::from(
            AbsPredicate::new("owns")
                .with("owner", person("Alice"))
                .with("items", AbsAggregate::sequence().with(1_i64).with(2_i64)),
        );
        assert!(grounded.is_grounded());

        let nested = AbsObject::from(
            AbsPredicate::new("owns")
                .with("owner", person("Alice"))
                .with("items", AbsAggregate::sequence().with(AbsVariable::new("x"))),
        );
        assert!(!nested.is_grounded());
        assert!(!AbsObject::from(AbsVariable::new("y")).is_grounded());
    }

    #[test]
    fn categories() {
        assert!(AbsObject::from(AbsPredicate::new("p")).is_content_element());
        assert!(AbsObject::from(AbsAgentAction::new("a")).is_content_element());
        assert!(AbsObject::from(AbsAgentAction::new("a")).is_term());
        assert!(!AbsObject::from(AbsConcept::new("c")).is_content_element());
        assert!(!AbsObject::from(AbsPredicate::new("p")).is_term());
        assert!(!AbsObject::from("text").is_content_element());
    }

    #[test]
    fn display_is_compact() {
        let obj = AbsObject::from(AbsConcept::new("Person").with("name", "Alice"));
        assert_eq!(obj.to_string(), "(Person :name \"Alice\")");
    }

    #[test]
    fn serde_shape_is_tagged() {
        let obj = AbsObject::from(AbsConcept::new("Person").with("name", "Alice"));
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["kind"], "concept");
        assert_eq!(json["type"], "Person");
        assert_eq!(json["slots"]["name"]["kind"], "primitive");
        let back: AbsObject = serde_json::from_value(json).unwrap();
        assert_eq!(back, obj);
    }
}
