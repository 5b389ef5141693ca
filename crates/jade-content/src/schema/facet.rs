//! Slot facets: extra constraints checked after type compatibility.

use std::fmt;
use std::sync::Arc;

use crate::abs::{AbsObject, PrimitiveValue};
use crate::error::{OntologyError, OntologyResult};
use crate::onto::Ontology;

/// A user-supplied slot constraint.
pub trait CustomFacet: fmt::Debug + Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Check a slot value.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the value is rejected.
    fn check(&self, value: &AbsObject, onto: &Ontology) -> Result<(), String>;
}

/// A constraint attached to one slot of one schema.
///
/// Facets never reject variables or IREs: both stand for a value that is
/// not known yet.
#[derive(Debug, Clone)]
pub enum Facet {
    /// Element count bounds of an aggregate slot. `max` of `None` means
    /// unbounded.
    Cardinality {
        /// Minimum number of elements.
        min: usize,
        /// Maximum number of elements.
        max: Option<usize>,
    },
    /// Every element of an aggregate slot must be compatible with a schema.
    TypedAggregate {
        /// Type name of the element schema.
        element_schema: String,
    },
    /// The primitive value must be one of a fixed set.
    PermittedValues(Vec<PrimitiveValue>),
    /// The string value must match a regular expression.
    Regex(regex::Regex),
    /// A pluggable check.
    Custom(Arc<dyn CustomFacet>),
}

impl Facet {
    /// A regular-expression facet.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::Invalid`] if the pattern does not compile.
    pub fn regex(pattern: &str) -> OntologyResult<Self> {
        regex::Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| OntologyError::Invalid {
                schema: "Regex".into(),
                value: pattern.into(),
                reason: e.to_string(),
            })
    }

    /// Check the value of `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::FacetViolation`] describing the violated
    /// constraint, or [`OntologyError::SchemaNotFound`] if an element type
    /// cannot be resolved.
    pub fn validate(&self, slot: &str, value: &AbsObject, onto: &Ontology) -> OntologyResult<()> {
        if matches!(value, AbsObject::Variable(_) | AbsObject::Ire(_)) {
            return Ok(());
        }
        let violation = |reason: String| OntologyError::FacetViolation {
            slot: slot.to_owned(),
            reason,
        };
        match self {
            Self::Cardinality { min, max } => {
                let Some(aggregate) = value.as_aggregate() else {
                    return Err(violation(format!("{value} is not an aggregate")));
                };
                let size = aggregate.size();
                if size < *min {
                    return Err(violation(format!("{size} elements, at least {min} required")));
                }
                if let Some(max) = max
                    && size > *max
                {
                    return Err(violation(format!("{size} elements, at most {max} allowed")));
                }
                Ok(())
            }
            Self::TypedAggregate { element_schema } => {
                let Some(aggregate) = value.as_aggregate() else {
                    return Err(violation(format!("{value} is not an aggregate")));
                };
                let expected = onto.schema(element_schema)?;
                for element in aggregate.elements() {
                    if matches!(element, AbsObject::Variable(_) | AbsObject::Ire(_)) {
                        continue;
                    }
                    let actual = onto.schema(element.type_name())?;
                    if !actual.is_compatible_with(expected, onto) {
                        return Err(violation(format!(
                            "element {element} of type {} is not a {element_schema}",
                            element.type_name()
                        )));
                    }
                }
                Ok(())
            }
            Self::PermittedValues(allowed) => match value.as_primitive() {
                Some(primitive) if allowed.contains(primitive.value()) => Ok(()),
                _ => Err(violation(format!("{value} is not a permitted value"))),
            },
            Self::Regex(pattern) => match value.as_str() {
                Some(text) if pattern.is_match(text) => Ok(()),
                _ => Err(violation(format!("{value} does not match {}", pattern.as_str()))),
            },
            Self::Custom(custom) => custom
                .check(value, onto)
                .map_err(|reason| violation(format!("{}: {reason}", custom.name()))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::abs::{AbsAggregate, AbsIre, AbsPredicate, AbsVariable};
    use crate::onto::basic::basic_ontology;

    fn seq(len: usize) -> AbsObject {
        let mut agg = AbsAggregate::sequence();
        for idx in 0..len {
            agg.add(i64::try_from(idx).unwrap());
        }
        agg.into()
    }

    #[test]
    fn cardinality_bounds() {
        let onto = basic_ontology();
        let facet = Facet::Cardinality { min: 1, max: Some(3) };
        assert!(facet.validate("items", &seq(0), &onto).is_err());
        for len in 1..=3 {
            facet.validate("items", &seq(len), &onto).unwrap();
        }
        assert!(facet.validate("items", &seq(4), &onto).is_err());
    }

    #[test]
    fn unbounded_cardinality() {
        let onto = basic_ontology();
        let facet = Facet::Cardinality { min: 0, max: None };
        facet.validate("items", &seq(100), &onto).unwrap();
    }

    #[test]
    fn variables_pass_every_facet() {
        let onto = basic_ontology();
        let var = AbsObject::from(AbsVariable::new("x"));
        Facet::Cardinality { min: 1, max: Some(1) }
            .validate("items", &var, &onto)
            .unwrap();
        Facet::regex("^a+$").unwrap().validate("name", &var, &onto).unwrap();
    }

    #[test]
    fn queries_pass_aggregate_facets() {
        let onto = basic_ontology();
        let query = AbsObject::from(AbsIre::new(
            crate::onto::basic::ALL,
            AbsVariable::new("x"),
            AbsPredicate::new("owns").with("item", AbsVariable::new("x")),
        ));
        Facet::Cardinality { min: 1, max: Some(2) }
            .validate("items", &query, &onto)
            .unwrap();
        Facet::TypedAggregate {
            element_schema: crate::onto::basic::STRING.into(),
        }
        .validate("items", &query, &onto)
        .unwrap();
        let mixed = AbsObject::from(AbsAggregate::sequence().with("a").with(query));
        Facet::TypedAggregate {
            element_schema: crate::onto::basic::STRING.into(),
        }
        .validate("items", &mixed, &onto)
        .unwrap();
    }

    #[test]
    fn permitted_values_and_regex() {
        let onto = basic_ontology();
        let colors = Facet::PermittedValues(vec![
            PrimitiveValue::String("red".into()),
            PrimitiveValue::String("blue".into()),
        ]);
        colors.validate("color", &AbsObject::from("red"), &onto).unwrap();
        assert!(colors.validate("color", &AbsObject::from("green"), &onto).is_err());

        let code = Facet::regex("^[A-Z]{3}$").unwrap();
        code.validate("code", &AbsObject::from("EUR"), &onto).unwrap();
        let err = code.validate("code", &AbsObject::from("euro"), &onto).unwrap_err();
        assert!(err.to_string().contains("code"));
        assert!(Facet::regex("(").is_err());
    }

    #[derive(Debug)]
    struct Positive;

    impl CustomFacet for Positive {
        fn name(&self) -> &str {
            "positive"
        }

        fn check(&self, value: &AbsObject, _onto: &Ontology) -> Result<(), String> {
            match value.as_primitive().and_then(crate::abs::AbsPrimitive::as_integer) {
                Some(n) if n > 0 => Ok(()),
                _ => Err(format!("{value} is not positive")),
            }
        }
    }

    #[test]
    fn custom_facet() {
        let onto = basic_ontology();
        let facet = Facet::Custom(Arc::new(Positive));
        facet.validate("age", &AbsObject::from(3_i64), &onto).unwrap();
        let err = facet.validate("age", &AbsObject::from(-3_i64), &onto).unwrap_err();
        assert!(err.to_string().contains("positive"));
    }
}
