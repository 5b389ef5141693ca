//! The basic ontology every application ontology extends.
//!
//! It defines the root schema of every kind, the primitive types, the
//! `sequence` and `set` aggregates, agent identifiers and the generic
//! action/result vocabulary of FIPA content.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use jade_types::Aid;

use super::Ontology;
use crate::schema::{
    AGENT_ACTION_BASE, ObjectSchema, Optionality, PREDICATE_BASE, SchemaKind, TERM_BASE,
};

/// Name of the basic ontology.
pub const BASIC_ONTOLOGY_NAME: &str = "BASIC_ONTOLOGY";

/// String primitive.
pub const STRING: &str = "BO_String";
/// Float primitive.
pub const FLOAT: &str = "BO_Float";
/// Integer primitive.
pub const INTEGER: &str = "BO_Integer";
/// Boolean primitive.
pub const BOOLEAN: &str = "BO_Boolean";
/// Date primitive.
pub const DATE: &str = "BO_Date";
/// Byte-sequence primitive.
pub const BYTE_SEQUENCE: &str = "BO_Byte-sequence";

/// Ordered aggregate.
pub const SEQUENCE: &str = "sequence";
/// Unordered aggregate.
pub const SET: &str = "set";

/// Agent identifier concept.
pub const AID: &str = "agent-identifier";
/// Agent name slot.
pub const AID_NAME: &str = "name";
/// Transport addresses slot.
pub const AID_ADDRESSES: &str = "addresses";
/// Naming resolvers slot.
pub const AID_RESOLVERS: &str = "resolvers";

/// The `action` agent action: an actor performing an action.
pub const ACTION: &str = "action";
/// Performing agent.
pub const ACTION_ACTOR: &str = "actor";
/// Performed action.
pub const ACTION_ACTION: &str = "action";

/// The `done` predicate.
pub const DONE: &str = "done";
/// Completed action.
pub const DONE_ACTION: &str = "action";
/// Condition under which it was done.
pub const DONE_CONDITION: &str = "condition";

/// The `result` predicate.
pub const RESULT: &str = "result";
/// Action producing the result.
pub const RESULT_ACTION: &str = "action";
/// Produced value.
pub const RESULT_VALUE: &str = "value";

/// The `=` predicate.
pub const EQUALS: &str = "=";
/// Left operand.
pub const EQUALS_LEFT: &str = "left";
/// Right operand.
pub const EQUALS_RIGHT: &str = "right";

/// The always-true proposition.
pub const TRUE_PROPOSITION: &str = "true";
/// The always-false proposition.
pub const FALSE_PROPOSITION: &str = "false";

/// Definite description: the one object satisfying a proposition.
pub const IOTA: &str = "iota";
/// Any object satisfying a proposition.
pub const ANY: &str = "any";
/// All objects satisfying a proposition.
pub const ALL: &str = "all";

/// Builder for the basic ontology.
#[derive(Debug, Clone, Copy)]
pub struct BasicOntology;

impl BasicOntology {
    /// Build a fresh basic ontology.
    pub fn build() -> Ontology {
        let mut onto = Ontology::new(BASIC_ONTOLOGY_NAME);

        for kind in SchemaKind::ALL {
            onto.insert(ObjectSchema::base(kind));
        }
        for primitive in [STRING, FLOAT, INTEGER, BOOLEAN, DATE, BYTE_SEQUENCE] {
            onto.insert(ObjectSchema::primitive(primitive));
        }
        onto.insert(ObjectSchema::aggregate(SEQUENCE));
        onto.insert(ObjectSchema::aggregate(SET));

        let mut aid = ObjectSchema::concept(AID);
        aid.add_mandatory(AID_NAME, STRING)
            .add_aggregate(AID_ADDRESSES, STRING, 0, None)
            .add_aggregate(AID_RESOLVERS, AID, 0, None);
        onto.insert(aid);

        let mut action = ObjectSchema::agent_action(ACTION);
        action
            .add_mandatory(ACTION_ACTOR, AID)
            .add_mandatory(ACTION_ACTION, TERM_BASE);
        onto.insert(action);

        let mut done = ObjectSchema::predicate(DONE);
        done.add_mandatory(DONE_ACTION, AGENT_ACTION_BASE)
            .add(DONE_CONDITION, PREDICATE_BASE, Optionality::Optional);
        onto.insert(done);

        let mut result = ObjectSchema::predicate(RESULT);
        result
            .add_mandatory(RESULT_ACTION, AGENT_ACTION_BASE)
            .add_mandatory(RESULT_VALUE, TERM_BASE);
        onto.insert(result);

        let mut equals = ObjectSchema::predicate(EQUALS);
        equals
            .add_mandatory(EQUALS_LEFT, TERM_BASE)
            .add_mandatory(EQUALS_RIGHT, TERM_BASE);
        onto.insert(equals);

        onto.insert(ObjectSchema::predicate(TRUE_PROPOSITION));
        onto.insert(ObjectSchema::predicate(FALSE_PROPOSITION));

        for ire in [IOTA, ANY, ALL] {
            onto.insert(ObjectSchema::ire(ire));
        }

        onto.bind_class::<String>(STRING);
        onto.bind_class::<bool>(BOOLEAN);
        onto.bind_class::<i64>(INTEGER);
        onto.bind_class::<i32>(INTEGER);
        onto.bind_class::<f64>(FLOAT);
        onto.bind_class::<DateTime<Utc>>(DATE);
        onto.bind_class::<Vec<u8>>(BYTE_SEQUENCE);
        onto.bind_class::<Aid>(AID);
        onto
    }
}

/// The process-wide basic ontology, built on first use.
pub fn basic_ontology() -> Arc<Ontology> {
    static BASIC: OnceLock<Arc<Ontology>> = OnceLock::new();
    Arc::clone(BASIC.get_or_init(|| Arc::new(BasicOntology::build())))
}

/// Whether a type name is one of the primitive types.
pub fn is_primitive(type_name: &str) -> bool {
    [STRING, FLOAT, INTEGER, BOOLEAN, DATE, BYTE_SEQUENCE]
        .iter()
        .any(|p| p.eq_ignore_ascii_case(type_name))
}
