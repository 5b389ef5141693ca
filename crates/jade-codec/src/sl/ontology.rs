//! Vocabulary of the SL language itself.
//!
//! Logical connectives, quantifiers and modal operators are predicates
//! like any other; the SL codec merges this ontology into every ontology
//! it is used with.

use std::sync::{Arc, OnceLock};

use jade_content::onto::basic;
use jade_content::schema::{PREDICATE_BASE, VARIABLE_BASE};
use jade_content::{ObjectSchema, Ontology, basic_ontology};

/// Name of the SL ontology.
pub const SL_ONTOLOGY_NAME: &str = "FIPA-SL-ontology";

/// Conjunction.
pub const AND: &str = "and";
/// Disjunction.
pub const OR: &str = "or";
/// Negation.
pub const NOT: &str = "not";
/// Implication.
pub const IMPLIES: &str = "implies";
/// Equivalence.
pub const EQUIV: &str = "equiv";
/// Universal quantifier.
pub const FORALL: &str = "forall";
/// Existential quantifier.
pub const EXISTS: &str = "exists";
/// Belief.
pub const BELIEF: &str = "B";
/// Uncertainty.
pub const UNCERTAINTY: &str = "U";
/// Intention.
pub const INTENTION: &str = "I";
/// Persistent goal.
pub const PERSISTENT_GOAL: &str = "PG";

/// Left operand of a binary connective.
pub const LEFT: &str = "left";
/// Right operand of a binary connective.
pub const RIGHT: &str = "right";
/// Operand of `not`.
pub const WHAT: &str = "what";
/// Quantified variable.
pub const VARIABLE: &str = "variable";
/// Quantified or modal proposition.
pub const CONDITION: &str = "condition";
/// Agent holding a modal attitude.
pub const AGENT: &str = "agent";

/// Operators and basic-ontology elements written with positional
/// arguments rather than `:slot` keywords.
const POSITIONAL: [&str; 15] = [
    AND,
    OR,
    NOT,
    IMPLIES,
    EQUIV,
    FORALL,
    EXISTS,
    BELIEF,
    UNCERTAINTY,
    INTENTION,
    PERSISTENT_GOAL,
    basic::ACTION,
    basic::DONE,
    basic::RESULT,
    basic::EQUALS,
];

/// Builder for the SL ontology.
#[derive(Debug, Clone, Copy)]
pub struct SlOntology;

impl SlOntology {
    /// Build a fresh SL ontology on top of the shared basic ontology.
    ///
    /// # Errors
    ///
    /// Only fails if two operators collide, which would be a bug here.
    pub fn build() -> jade_content::OntologyResult<Ontology> {
        let mut onto = Ontology::compose(SL_ONTOLOGY_NAME, [basic_ontology()]);

        for connective in [AND, OR, IMPLIES, EQUIV] {
            let mut schema = ObjectSchema::predicate(connective);
            schema
                .add_mandatory(LEFT, PREDICATE_BASE)
                .add_mandatory(RIGHT, PREDICATE_BASE);
            onto.add(schema)?;
        }

        let mut not = ObjectSchema::predicate(NOT);
        not.add_mandatory(WHAT, PREDICATE_BASE);
        onto.add(not)?;

        for quantifier in [FORALL, EXISTS] {
            let mut schema = ObjectSchema::predicate(quantifier);
            schema
                .add_mandatory(VARIABLE, VARIABLE_BASE)
                .add_mandatory(CONDITION, PREDICATE_BASE);
            onto.add(schema)?;
        }

        for modal in [BELIEF, UNCERTAINTY, INTENTION, PERSISTENT_GOAL] {
            let mut schema = ObjectSchema::predicate(modal);
            schema
                .add_mandatory(AGENT, basic::AID)
                .add_mandatory(CONDITION, PREDICATE_BASE);
            onto.add(schema)?;
        }

        Ok(onto)
    }
}

/// The shared SL ontology, built on first successful use.
///
/// # Errors
///
/// Returns the [`OntologyError`](jade_content::OntologyError) raised while
/// building the operator schemas.
pub fn sl_ontology() -> jade_content::OntologyResult<Arc<Ontology>> {
    static SL: OnceLock<Arc<Ontology>> = OnceLock::new();
    if let Some(onto) = SL.get() {
        return Ok(Arc::clone(onto));
    }
    let built = Arc::new(SlOntology::build()?);
    Ok(Arc::clone(SL.get_or_init(|| built)))
}

/// Whether elements of this type are written with positional arguments.
pub fn is_positional(type_name: &str) -> bool {
    POSITIONAL
        .iter()
        .any(|name| name.eq_ignore_ascii_case(type_name))
}
