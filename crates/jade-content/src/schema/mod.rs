//! Object schemas: declarative descriptions of content types.
//!
//! A schema names a type, lists its slots with the type each slot expects,
//! and may extend any number of super-schemas. Schemas never hold pointers
//! to each other: slot types and super-schemas are type names resolved
//! through the [`Ontology`] doing the validation, which makes recursive and
//! mutually recursive types straightforward to declare.
//!
//! Every schema belongs to a [`SchemaKind`]. The basic ontology registers one
//! root schema per kind (named after the kind), and a value of some kind is
//! always compatible with the root schema of every category that kind
//! belongs to.

mod facet;

use std::collections::HashSet;
use std::fmt;

use tracing::trace;

pub use facet::{CustomFacet, Facet};

use crate::abs::AbsObject;
use crate::error::{OntologyError, OntologyResult};
use crate::onto::Ontology;
use crate::onto::basic;

/// Root of every schema.
pub const OBJECT_BASE: &str = "Object";
/// Root of everything that may be sent as message content.
pub const CONTENT_ELEMENT_BASE: &str = "ContentElement";
/// Root of everything that may fill a slot.
pub const TERM_BASE: &str = "Term";
/// Root of concepts.
pub const CONCEPT_BASE: &str = "Concept";
/// Root of agent actions.
pub const AGENT_ACTION_BASE: &str = "AgentAction";
/// Root of predicates.
pub const PREDICATE_BASE: &str = "Predicate";
/// Root of primitives.
pub const PRIMITIVE_BASE: &str = "Primitive";
/// Root of aggregates.
pub const AGGREGATE_BASE: &str = "Aggregate";
/// Root of variables, and the type name of every variable.
pub const VARIABLE_BASE: &str = "Variable";
/// Root of identifying referential expressions.
pub const IRE_BASE: &str = "IRE";
/// Root of content element lists, and their type name.
pub const CONTENT_ELEMENT_LIST_BASE: &str = "ContentElementList";

/// Category of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// The universal root.
    Object,
    /// Anything usable as message content.
    ContentElement,
    /// Anything usable as a slot value.
    Term,
    /// Primitive types.
    Primitive,
    /// Concepts.
    Concept,
    /// Agent actions (both concepts and content elements).
    AgentAction,
    /// Predicates.
    Predicate,
    /// Aggregates.
    Aggregate,
    /// Variables.
    Variable,
    /// Identifying referential expressions.
    Ire,
    /// Content element lists.
    ContentElementList,
}

impl SchemaKind {
    /// Every kind, in registration order of the root schemas.
    pub const ALL: [Self; 11] = [
        Self::Object,
        Self::ContentElement,
        Self::Term,
        Self::Primitive,
        Self::Concept,
        Self::AgentAction,
        Self::Predicate,
        Self::Aggregate,
        Self::Variable,
        Self::Ire,
        Self::ContentElementList,
    ];

    /// Name of the root schema of this kind.
    pub const fn base_name(self) -> &'static str {
        match self {
            Self::Object => OBJECT_BASE,
            Self::ContentElement => CONTENT_ELEMENT_BASE,
            Self::Term => TERM_BASE,
            Self::Primitive => PRIMITIVE_BASE,
            Self::Concept => CONCEPT_BASE,
            Self::AgentAction => AGENT_ACTION_BASE,
            Self::Predicate => PREDICATE_BASE,
            Self::Aggregate => AGGREGATE_BASE,
            Self::Variable => VARIABLE_BASE,
            Self::Ire => IRE_BASE,
            Self::ContentElementList => CONTENT_ELEMENT_LIST_BASE,
        }
    }

    /// Whether a schema of kind `other` falls under the root of `self`.
    pub fn accepts(self, other: Self) -> bool {
        match self {
            Self::Object => true,
            Self::ContentElement => matches!(
                other,
                Self::ContentElement
                    | Self::Predicate
                    | Self::AgentAction
                    | Self::Ire
                    | Self::ContentElementList
            ),
            Self::Term => other.is_term(),
            Self::Concept => matches!(other, Self::Concept | Self::AgentAction),
            Self::Primitive
            | Self::AgentAction
            | Self::Predicate
            | Self::Aggregate
            | Self::Variable
            | Self::Ire
            | Self::ContentElementList => self == other,
        }
    }

    /// Whether values of this kind can fill slots.
    pub const fn is_term(self) -> bool {
        matches!(
            self,
            Self::Term
                | Self::Primitive
                | Self::Concept
                | Self::AgentAction
                | Self::Aggregate
                | Self::Variable
                | Self::Ire
        )
    }

    /// Whether schemas of this kind declare named slots.
    pub const fn has_named_slots(self) -> bool {
        matches!(self, Self::Concept | Self::AgentAction | Self::Predicate)
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_name())
    }
}

/// Whether a slot must hold a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Optionality {
    /// The slot must be present.
    #[default]
    Mandatory,
    /// The slot may be absent.
    Optional,
}

/// One declared slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDescriptor {
    /// Slot name.
    pub name: String,
    /// Type name of the schema the slot value must be compatible with.
    pub schema: String,
    /// Whether the slot may be absent.
    pub optionality: Optionality,
}

impl SlotDescriptor {
    /// Whether the slot may be absent.
    pub fn is_optional(&self) -> bool {
        self.optionality == Optionality::Optional
    }
}

/// Declarative description of a content type.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    type_name: String,
    kind: SchemaKind,
    slots: Vec<SlotDescriptor>,
    supers: Vec<String>,
    facets: Vec<(String, Facet)>,
    pending_aggregates: Vec<String>,
    is_abstract: bool,
}

impl ObjectSchema {
    /// A schema of the given kind with no slots.
    pub fn new(kind: SchemaKind, type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
            slots: Vec::new(),
            supers: Vec::new(),
            facets: Vec::new(),
            pending_aggregates: Vec::new(),
            is_abstract: false,
        }
    }

    /// A concept schema.
    pub fn concept(type_name: impl Into<String>) -> Self {
        Self::new(SchemaKind::Concept, type_name)
    }

    /// An agent action schema.
    pub fn agent_action(type_name: impl Into<String>) -> Self {
        Self::new(SchemaKind::AgentAction, type_name)
    }

    /// A predicate schema.
    pub fn predicate(type_name: impl Into<String>) -> Self {
        Self::new(SchemaKind::Predicate, type_name)
    }

    /// A primitive schema.
    pub fn primitive(type_name: impl Into<String>) -> Self {
        Self::new(SchemaKind::Primitive, type_name)
    }

    /// An aggregate schema.
    pub fn aggregate(type_name: impl Into<String>) -> Self {
        Self::new(SchemaKind::Aggregate, type_name)
    }

    /// An IRE schema for one referential operator.
    pub fn ire(type_name: impl Into<String>) -> Self {
        Self::new(SchemaKind::Ire, type_name)
    }

    /// The root schema of a kind.
    pub fn base(kind: SchemaKind) -> Self {
        let mut schema = Self::new(kind, kind.base_name());
        schema.is_abstract = !matches!(kind, SchemaKind::Variable | SchemaKind::ContentElementList);
        schema
    }

    /// Type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Kind.
    pub const fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// Whether this is the root schema of its kind.
    pub fn is_base(&self) -> bool {
        self.type_name == self.kind.base_name()
    }

    /// Whether the schema has no direct instances.
    pub const fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Mark the schema abstract (or concrete).
    pub const fn set_abstract(&mut self, is_abstract: bool) -> &mut Self {
        self.is_abstract = is_abstract;
        self
    }

    /// Declare a slot. Redeclaring a slot replaces the earlier descriptor.
    pub fn add(&mut self, name: impl Into<String>, schema: &str, optionality: Optionality) -> &mut Self {
        let name = name.into();
        let descriptor = SlotDescriptor {
            schema: schema.to_owned(),
            optionality,
            name,
        };
        match self
            .slots
            .iter_mut()
            .find(|slot| slot.name.eq_ignore_ascii_case(&descriptor.name))
        {
            Some(existing) => *existing = descriptor,
            None => self.slots.push(descriptor),
        }
        self
    }

    /// Declare a mandatory slot.
    pub fn add_mandatory(&mut self, name: impl Into<String>, schema: &str) -> &mut Self {
        self.add(name, schema, Optionality::Mandatory)
    }

    /// Declare an optional slot.
    pub fn add_optional(&mut self, name: impl Into<String>, schema: &str) -> &mut Self {
        self.add(name, schema, Optionality::Optional)
    }

    /// Declare a `sequence` slot of `elements` with cardinality bounds.
    pub fn add_aggregate(
        &mut self,
        name: impl Into<String>,
        elements: &str,
        card_min: usize,
        card_max: Option<usize>,
    ) -> &mut Self {
        self.add_aggregate_as(name, elements, card_min, card_max, basic::SEQUENCE)
    }

    /// Declare an aggregate slot of a given aggregate type.
    ///
    /// The slot is optional when `card_min` is zero. The aggregate type is
    /// registered by the ontology this schema is added to if it is not
    /// already known there. A typed-aggregate facet and a cardinality facet
    /// are attached to the slot.
    pub fn add_aggregate_as(
        &mut self,
        name: impl Into<String>,
        elements: &str,
        card_min: usize,
        card_max: Option<usize>,
        aggregate_type: &str,
    ) -> &mut Self {
        let name = name.into();
        let optionality = if card_min == 0 {
            Optionality::Optional
        } else {
            Optionality::Mandatory
        };
        self.add(name.clone(), aggregate_type, optionality);
        if !self
            .pending_aggregates
            .iter()
            .any(|pending| pending.eq_ignore_ascii_case(aggregate_type))
        {
            self.pending_aggregates.push(aggregate_type.to_owned());
        }
        self.add_facet(
            name.clone(),
            Facet::TypedAggregate {
                element_schema: elements.to_owned(),
            },
        );
        self.add_facet(
            name,
            Facet::Cardinality {
                min: card_min,
                max: card_max,
            },
        );
        self
    }

    /// Attach a facet to a slot.
    pub fn add_facet(&mut self, slot: impl Into<String>, facet: Facet) -> &mut Self {
        self.facets.push((slot.into(), facet));
        self
    }

    /// Append a super-schema. Earlier super-schemas win when slots collide.
    pub fn add_super_schema(&mut self, schema: &Self) -> &mut Self {
        self.add_super_schema_name(schema.type_name())
    }

    /// Append a super-schema by type name.
    pub fn add_super_schema_name(&mut self, type_name: &str) -> &mut Self {
        if !self.supers.iter().any(|s| s.eq_ignore_ascii_case(type_name)) {
            self.supers.push(type_name.to_owned());
        }
        self
    }

    /// Names of the direct super-schemas, in declaration order.
    pub fn super_schemas(&self) -> &[String] {
        &self.supers
    }

    /// Slots declared by this schema alone.
    pub fn own_slots(&self) -> &[SlotDescriptor] {
        &self.slots
    }

    pub(crate) fn take_pending_aggregates(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_aggregates)
    }

    /// Own and inherited slots.
    ///
    /// Inherited slots come first, in super-schema order, followed by own
    /// slots. A name appears once, carrying the descriptor that
    /// [`Self::slot`] resolves for it.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::SchemaNotFound`] if a super-schema is not
    /// known to `onto`.
    pub fn slots(&self, onto: &Ontology) -> OntologyResult<Vec<SlotDescriptor>> {
        let mut order: Vec<String> = Vec::new();
        let mut visited = HashSet::new();
        self.collect_slot_names(onto, &mut order, &mut visited)?;
        let mut out = Vec::with_capacity(order.len());
        for name in order {
            if let Some(descriptor) = self.slot(&name, onto)? {
                out.push(descriptor);
            }
        }
        Ok(out)
    }

    fn collect_slot_names(
        &self,
        onto: &Ontology,
        order: &mut Vec<String>,
        visited: &mut HashSet<String>,
    ) -> OntologyResult<()> {
        if !visited.insert(self.type_name.to_ascii_lowercase()) {
            return Ok(());
        }
        for parent in &self.supers {
            onto.schema(parent)?
                .collect_slot_names(onto, order, visited)?;
        }
        for slot in &self.slots {
            if !order.iter().any(|n| n.eq_ignore_ascii_case(&slot.name)) {
                order.push(slot.name.clone());
            }
        }
        Ok(())
    }

    /// Names of own and inherited slots, inherited first.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::SchemaNotFound`] if a super-schema is not
    /// known to `onto`.
    pub fn names(&self, onto: &Ontology) -> OntologyResult<Vec<String>> {
        Ok(self.slots(onto)?.into_iter().map(|slot| slot.name).collect())
    }

    /// Resolve a slot descriptor: own slots first, then super-schemas
    /// depth-first in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::SchemaNotFound`] if a super-schema is not
    /// known to `onto`.
    pub fn slot(&self, name: &str, onto: &Ontology) -> OntologyResult<Option<SlotDescriptor>> {
        let mut visited = HashSet::new();
        self.find_slot(name, onto, &mut visited)
    }

    fn find_slot(
        &self,
        name: &str,
        onto: &Ontology,
        visited: &mut HashSet<String>,
    ) -> OntologyResult<Option<SlotDescriptor>> {
        if !visited.insert(self.type_name.to_ascii_lowercase()) {
            return Ok(None);
        }
        if let Some(slot) = self.slots.iter().find(|s| s.name.eq_ignore_ascii_case(name)) {
            return Ok(Some(slot.clone()));
        }
        for parent in &self.supers {
            if let Some(slot) = onto.schema(parent)?.find_slot(name, onto, visited)? {
                return Ok(Some(slot));
            }
        }
        Ok(None)
    }

    /// Whether a slot is declared anywhere in the schema chain.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::SchemaNotFound`] if a super-schema is not
    /// known to `onto`.
    pub fn contains_slot(&self, name: &str, onto: &Ontology) -> OntologyResult<bool> {
        Ok(self.slot(name, onto)?.is_some())
    }

    /// Facets attached to a slot by this schema and all of its ancestors.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::SchemaNotFound`] if a super-schema is not
    /// known to `onto`.
    pub fn facets<'o>(&'o self, slot: &str, onto: &'o Ontology) -> OntologyResult<Vec<&'o Facet>> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        self.collect_facets(slot, onto, &mut out, &mut visited)?;
        Ok(out)
    }

    fn collect_facets<'o>(
        &'o self,
        slot: &str,
        onto: &'o Ontology,
        out: &mut Vec<&'o Facet>,
        visited: &mut HashSet<String>,
    ) -> OntologyResult<()> {
        if !visited.insert(self.type_name.to_ascii_lowercase()) {
            return Ok(());
        }
        out.extend(
            self.facets
                .iter()
                .filter(|(name, _)| name.eq_ignore_ascii_case(slot))
                .map(|(_, facet)| facet),
        );
        for parent in &self.supers {
            onto.schema(parent)?
                .collect_facets(slot, onto, out, visited)?;
        }
        Ok(())
    }

    /// Element schema declared for an aggregate slot, if any.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::SchemaNotFound`] if a super-schema is not
    /// known to `onto`.
    pub fn element_schema<'o>(&'o self, slot: &str, onto: &'o Ontology) -> OntologyResult<Option<&'o str>> {
        Ok(self.facets(slot, onto)?.into_iter().find_map(|facet| match facet {
            Facet::TypedAggregate { element_schema } => Some(element_schema.as_str()),
            _ => None,
        }))
    }

    /// Whether `ancestor` is this schema or one of its direct or indirect
    /// super-schemas.
    pub fn descends_from(&self, ancestor: &str, onto: &Ontology) -> bool {
        let mut visited = HashSet::new();
        self.descends(ancestor, onto, &mut visited)
    }

    fn descends(&self, ancestor: &str, onto: &Ontology, visited: &mut HashSet<String>) -> bool {
        if self.type_name.eq_ignore_ascii_case(ancestor) {
            return true;
        }
        if !visited.insert(self.type_name.to_ascii_lowercase()) {
            return false;
        }
        self.supers.iter().any(|parent| {
            onto.find_schema(parent)
                .is_some_and(|schema| schema.descends(ancestor, onto, visited))
        })
    }

    /// Whether a value described by this schema may fill a slot declared
    /// with `other`.
    ///
    /// True when the schemas are the same, when `other` is an ancestor of
    /// this schema, or when `other` is the root of a category this schema's
    /// kind belongs to. Variables and IREs stand in for any term.
    pub fn is_compatible_with(&self, other: &Self, onto: &Ontology) -> bool {
        if self.type_name.eq_ignore_ascii_case(&other.type_name) {
            return true;
        }
        if other.is_base() && other.kind.accepts(self.kind) {
            return true;
        }
        if matches!(self.kind, SchemaKind::Variable | SchemaKind::Ire) && other.kind.is_term() {
            return true;
        }
        self.descends_from(&other.type_name, onto)
    }

    /// Whether values of `source` can be used where this schema is
    /// expected.
    ///
    /// Beyond compatibility this is a structural check: every slot of this
    /// schema is either optional or present, and itself assignable, in
    /// `source`.
    pub fn is_assignable_from(&self, source: &Self, onto: &Ontology) -> bool {
        let mut assumed = HashSet::new();
        self.assignable(source, onto, &mut assumed)
    }

    fn assignable(&self, source: &Self, onto: &Ontology, assumed: &mut HashSet<(String, String)>) -> bool {
        if source.is_compatible_with(self, onto) {
            return true;
        }
        if !(self.kind.has_named_slots() && source.kind.has_named_slots()) {
            return false;
        }
        // A pair already under examination is assumed assignable; recursive
        // schemas would otherwise never terminate.
        let key = (
            self.type_name.to_ascii_lowercase(),
            source.type_name.to_ascii_lowercase(),
        );
        if !assumed.insert(key) {
            return true;
        }
        let Ok(dest_slots) = self.slots(onto) else {
            return false;
        };
        dest_slots.iter().all(|dest_slot| match source.slot(&dest_slot.name, onto) {
            Ok(Some(source_slot)) => {
                match (onto.find_schema(&dest_slot.schema), onto.find_schema(&source_slot.schema)) {
                    (Some(dest), Some(src)) => dest.assignable(src, onto, assumed),
                    _ => false,
                }
            }
            Ok(None) => dest_slot.is_optional(),
            Err(_) => false,
        })
    }

    /// Check a value against this schema.
    ///
    /// Every declared slot (own and inherited) is checked: an absent value
    /// is only allowed for optional slots; a present value must have a
    /// schema compatible with the slot's, must itself validate, and must
    /// satisfy every facet attached to the slot along the schema chain.
    /// Slots the schema does not declare are not inspected here; see
    /// [`Self::check_undeclared_slots`].
    ///
    /// # Errors
    ///
    /// Returns the first [`OntologyError`] found, naming the offending
    /// schema, slot and value.
    pub fn validate(&self, abs: &AbsObject, onto: &Ontology) -> OntologyResult<()> {
        trace!(schema = %self.type_name, value = %abs.type_name(), "validating");
        match abs {
            AbsObject::Variable(var) => match var.value_type() {
                Some(value_type) if self.kind != SchemaKind::Variable => {
                    let declared = onto.schema(value_type)?;
                    if declared.is_compatible_with(self, onto) {
                        Ok(())
                    } else {
                        Err(self.invalid(abs, format!("variable declared as {value_type}")))
                    }
                }
                _ => Ok(()),
            },
            AbsObject::Primitive(primitive) => {
                let own = onto.schema(primitive.type_name())?;
                if own.is_compatible_with(self, onto) {
                    Ok(())
                } else {
                    Err(self.invalid(abs, format!("primitive of type {}", primitive.type_name())))
                }
            }
            AbsObject::Aggregate(aggregate) => {
                if self.kind.has_named_slots() {
                    return Err(self.invalid(abs, "expected a slotted value".into()));
                }
                for element in aggregate.elements() {
                    onto.schema(element.type_name())?.validate(element, onto)?;
                }
                Ok(())
            }
            AbsObject::ContentElementList(list) => {
                for element in list.elements() {
                    if !element.is_content_element() {
                        return Err(OntologyError::NotContentElement(element.to_string()));
                    }
                    onto.schema(element.type_name())?.validate(element, onto)?;
                }
                Ok(())
            }
            AbsObject::Ire(ire) => {
                if !ire.proposition().is_content_element() {
                    return Err(self.invalid(abs, "proposition is not a content element".into()));
                }
                for part in [ire.variable(), ire.proposition()] {
                    onto.schema(part.type_name())?.validate(part, onto)?;
                }
                Ok(())
            }
            AbsObject::Concept(_) | AbsObject::AgentAction(_) | AbsObject::Predicate(_) => {
                self.validate_slots(abs, onto)
            }
        }
    }

    fn validate_slots(&self, abs: &AbsObject, onto: &Ontology) -> OntologyResult<()> {
        for slot in self.slots(onto)? {
            let Some(value) = abs.abs_object(&slot.name) else {
                if slot.is_optional() {
                    continue;
                }
                return Err(OntologyError::MissingMandatorySlot {
                    schema: self.type_name.clone(),
                    slot: slot.name,
                });
            };
            let expected = onto.schema(&slot.schema)?;
            let actual = onto.schema(value.type_name())?;
            if !actual.is_compatible_with(expected, onto) {
                return Err(OntologyError::IncompatibleSchema {
                    schema: actual.type_name.clone(),
                    value: value.to_string(),
                    expected: expected.type_name.clone(),
                    slot: slot.name,
                });
            }
            if let AbsObject::Variable(var) = value
                && let Some(value_type) = var.value_type()
                && !onto.schema(value_type)?.is_compatible_with(expected, onto)
            {
                return Err(OntologyError::IncompatibleSchema {
                    schema: value_type.to_owned(),
                    value: value.to_string(),
                    expected: expected.type_name.clone(),
                    slot: slot.name,
                });
            }
            actual.validate(value, onto)?;
            for facet in self.facets(&slot.name, onto)? {
                facet.validate(&slot.name, value, onto)?;
            }
        }
        Ok(())
    }

    /// Report the first slot of `abs` that no schema in the chain declares.
    ///
    /// Recurses into slot values, aggregate elements and content element
    /// lists.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::UndeclaredSlot`] for the first undeclared
    /// slot, or [`OntologyError::SchemaNotFound`] if a type cannot be
    /// resolved.
    pub fn check_undeclared_slots(&self, abs: &AbsObject, onto: &Ontology) -> OntologyResult<()> {
        match abs {
            AbsObject::Concept(_) | AbsObject::AgentAction(_) | AbsObject::Predicate(_) => {
                let Some(slots) = abs.slots() else {
                    return Ok(());
                };
                for (name, value) in slots.iter() {
                    if !self.contains_slot(name, onto)? {
                        return Err(OntologyError::UndeclaredSlot {
                            schema: self.type_name.clone(),
                            slot: name.to_owned(),
                        });
                    }
                    check_nested(value, onto)?;
                }
                Ok(())
            }
            AbsObject::Aggregate(aggregate) => {
                aggregate.elements().iter().try_for_each(|e| check_nested(e, onto))
            }
            AbsObject::ContentElementList(list) => {
                list.elements().iter().try_for_each(|e| check_nested(e, onto))
            }
            AbsObject::Ire(ire) => check_nested(ire.proposition(), onto),
            AbsObject::Primitive(_) | AbsObject::Variable(_) => Ok(()),
        }
    }

    fn invalid(&self, abs: &AbsObject, reason: String) -> OntologyError {
        OntologyError::Invalid {
            schema: self.type_name.clone(),
            value: abs.to_string(),
            reason,
        }
    }
}

fn check_nested(value: &AbsObject, onto: &Ontology) -> OntologyResult<()> {
    onto.schema(value.type_name())?
        .check_undeclared_slots(value, onto)
}

impl PartialEq for ObjectSchema {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.type_name.eq_ignore_ascii_case(&other.type_name)
    }
}

impl fmt::Display for ObjectSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.type_name, self.kind)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::abs::{AbsAggregate, AbsConcept, AbsVariable};

    fn onto() -> Ontology {
        let mut onto = Ontology::with_basic("test");
        let mut shape = ObjectSchema::concept("Shape");
        shape.add_mandatory("color", basic::STRING).set_abstract(true);
        onto.add(shape).unwrap();

        let mut circle = ObjectSchema::concept("Circle");
        circle
            .add_super_schema_name("Shape")
            .add_mandatory("radius", basic::FLOAT);
        onto.add(circle).unwrap();

        let mut drawing = ObjectSchema::concept("Drawing");
        drawing
            .add_mandatory("main", "Shape")
            .add_aggregate("extras", "Shape", 0, Some(2));
        onto.add(drawing).unwrap();
        onto
    }

    fn circle(color: &str) -> AbsConcept {
        AbsConcept::new("Circle").with("color", color).with("radius", 1.5)
    }

    #[test]
    fn names_put_inherited_slots_first() {
        let onto = onto();
        let circle = onto.schema("Circle").unwrap();
        assert_eq!(circle.names(&onto).unwrap(), vec!["color", "radius"]);
    }

    #[test]
    fn shadowed_slot_resolves_to_own_declaration() {
        let mut onto = onto();
        let mut tinted = ObjectSchema::concept("Tinted");
        tinted
            .add_super_schema_name("Circle")
            .add_optional("color", basic::STRING);
        onto.add(tinted).unwrap();
        let tinted = onto.schema("Tinted").unwrap();
        assert_eq!(tinted.names(&onto).unwrap(), vec!["color", "radius"]);
        assert!(tinted.slot("COLOR", &onto).unwrap().unwrap().is_optional());
    }

    #[test]
    fn subtype_fills_supertype_slot() {
        let onto = onto();
        let drawing = AbsObject::from(AbsConcept::new("Drawing").with("main", circle("red")));
        onto.schema("Drawing").unwrap().validate(&drawing, &onto).unwrap();
    }

    #[test]
    fn unrelated_type_is_rejected() {
        let onto = onto();
        let drawing = AbsObject::from(AbsConcept::new("Drawing").with("main", "red"));
        let err = onto.schema("Drawing").unwrap().validate(&drawing, &onto).unwrap_err();
        assert!(matches!(err, OntologyError::IncompatibleSchema { ref slot, .. } if slot == "main"));
    }

    #[test]
    fn variables_fill_any_term_slot() {
        let onto = onto();
        let drawing = AbsObject::from(AbsConcept::new("Drawing").with("main", AbsVariable::new("s")));
        onto.schema("Drawing").unwrap().validate(&drawing, &onto).unwrap();

        let typed = AbsObject::from(
            AbsConcept::new("Drawing").with("main", AbsVariable::typed("s", basic::INTEGER)),
        );
        assert!(onto.schema("Drawing").unwrap().validate(&typed, &onto).is_err());
    }

    #[test]
    fn inherited_mandatory_slot_is_enforced() {
        let onto = onto();
        let no_color = AbsObject::from(AbsConcept::new("Circle").with("radius", 2.0));
        let err = onto.schema("Circle").unwrap().validate(&no_color, &onto).unwrap_err();
        assert!(matches!(err, OntologyError::MissingMandatorySlot { ref slot, .. } if slot == "color"));
    }

    #[test]
    fn aggregate_cardinality_and_element_types() {
        let onto = onto();
        let schema = onto.schema("Drawing").unwrap();
        let with_extras = |extras: AbsAggregate| {
            AbsObject::from(
                AbsConcept::new("Drawing")
                    .with("main", circle("red"))
                    .with("extras", extras),
            )
        };
        schema
            .validate(&with_extras(AbsAggregate::sequence().with(circle("b"))), &onto)
            .unwrap();
        let too_many = AbsAggregate::sequence()
            .with(circle("a"))
            .with(circle("b"))
            .with(circle("c"));
        assert!(matches!(
            schema.validate(&with_extras(too_many), &onto),
            Err(OntologyError::FacetViolation { .. })
        ));
        let wrong_element = AbsAggregate::sequence().with(5_i64);
        assert!(matches!(
            schema.validate(&with_extras(wrong_element), &onto),
            Err(OntologyError::FacetViolation { .. })
        ));
    }

    #[test]
    fn compatibility_with_category_roots() {
        let onto = onto();
        let circle = onto.schema("Circle").unwrap();
        for root in [OBJECT_BASE, TERM_BASE, CONCEPT_BASE] {
            assert!(circle.is_compatible_with(onto.schema(root).unwrap(), &onto), "{root}");
        }
        assert!(!circle.is_compatible_with(onto.schema(PREDICATE_BASE).unwrap(), &onto));
        assert!(!circle.is_compatible_with(onto.schema(CONTENT_ELEMENT_BASE).unwrap(), &onto));
    }

    #[test]
    fn structural_assignability() {
        let mut onto = onto();
        let mut disc = ObjectSchema::concept("Disc");
        disc.add_mandatory("color", basic::STRING)
            .add_mandatory("radius", basic::FLOAT)
            .add_optional("label", basic::STRING);
        onto.add(disc).unwrap();
        let disc = onto.schema("Disc").unwrap();
        let circle = onto.schema("Circle").unwrap();
        assert!(disc.is_assignable_from(circle, &onto));
        assert!(!circle.is_compatible_with(disc, &onto));

        let mut needs_more = ObjectSchema::concept("Needy");
        needs_more.add_mandatory("weight", basic::FLOAT);
        onto.add(needs_more).unwrap();
        assert!(
            !onto
                .schema("Needy")
                .unwrap()
                .is_assignable_from(onto.schema("Circle").unwrap(), &onto)
        );
    }

    #[test]
    fn recursive_schema_assignability_terminates() {
        let mut onto = Ontology::with_basic("lists");
        for name in ["NodeA", "NodeB"] {
            let mut node = ObjectSchema::concept(name);
            node.add_mandatory("value", basic::INTEGER)
                .add_optional("next", name);
            onto.add(node).unwrap();
        }
        let a = onto.schema("NodeA").unwrap();
        let b = onto.schema("NodeB").unwrap();
        assert!(a.is_assignable_from(b, &onto));
    }

    #[test]
    fn undeclared_slots_are_reported() {
        let onto = onto();
        let extra = AbsObject::from(circle("red").with("weight", 3_i64));
        let schema = onto.schema("Circle").unwrap();
        schema.validate(&extra, &onto).unwrap();
        let err = schema.check_undeclared_slots(&extra, &onto).unwrap_err();
        assert!(matches!(err, OntologyError::UndeclaredSlot { ref slot, .. } if slot == "weight"));
    }
}
