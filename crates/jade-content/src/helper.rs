//! Structural algorithms over abstract content.
//!
//! Templates mirror a schema with variables at the leaves; default values
//! fill a template in; nullification strips variables back out; prefix
//! rewriting moves application types in and out of a namespace. The AID and
//! list helpers convert between carrier types and their abstract form
//! without going through an ontology.

use jade_types::Aid;
use tracing::trace;

use crate::abs::{AbsAggregate, AbsConcept, AbsObject, AbsType, AbsVariable, PrimitiveValue};
use crate::error::{OntologyError, OntologyResult};
use crate::onto::{Ontology, basic};
use crate::schema::{ObjectSchema, SchemaKind};

/// Build a template mirroring `schema`.
///
/// Every primitive or generic term slot gets a fresh variable (`v0`, `v1`,
/// ... numbered within this call) typed with the slot's schema; aggregate
/// slots get an empty aggregate whose element template describes the
/// elements; concept slots get a nested template. A schema that is already
/// being expanded further up the tree, or is abstract, gets a variable.
///
/// # Errors
///
/// Returns [`OntologyError::SchemaNotFound`] if a slot type is unknown to
/// `onto`.
pub fn create_abs_template(schema: &ObjectSchema, onto: &Ontology) -> OntologyResult<AbsObject> {
    let mut builder = TemplateBuilder::default();
    let template = builder.build(schema, onto)?;
    trace!(schema = %schema.type_name(), variables = builder.counter, "created template");
    Ok(template)
}

#[derive(Debug, Default)]
struct TemplateBuilder {
    counter: usize,
    path: Vec<String>,
}

impl TemplateBuilder {
    fn build(&mut self, schema: &ObjectSchema, onto: &Ontology) -> OntologyResult<AbsObject> {
        match schema.kind() {
            SchemaKind::Concept | SchemaKind::AgentAction | SchemaKind::Predicate => {
                let on_path = self
                    .path
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(schema.type_name()));
                if on_path || schema.is_abstract() {
                    return Ok(self.variable(schema));
                }
                self.path.push(schema.type_name().to_owned());
                let node = self.slotted(schema, onto);
                self.path.pop();
                node
            }
            SchemaKind::Aggregate => Ok(AbsAggregate::new(schema.type_name()).into()),
            SchemaKind::ContentElementList => {
                Ok(crate::abs::AbsContentElementList::new().into())
            }
            SchemaKind::Object
            | SchemaKind::ContentElement
            | SchemaKind::Term
            | SchemaKind::Primitive
            | SchemaKind::Variable
            | SchemaKind::Ire => Ok(self.variable(schema)),
        }
    }

    fn slotted(&mut self, schema: &ObjectSchema, onto: &Ontology) -> OntologyResult<AbsObject> {
        let mut node: AbsObject = match schema.kind() {
            SchemaKind::AgentAction => crate::abs::AbsAgentAction::new(schema.type_name()).into(),
            SchemaKind::Predicate => crate::abs::AbsPredicate::new(schema.type_name()).into(),
            _ => AbsObject::from(AbsConcept::new(schema.type_name())),
        };
        let mut children = Vec::new();
        for slot in schema.slots(onto)? {
            let slot_schema = onto.schema(&slot.schema)?;
            let child = if slot_schema.kind() == SchemaKind::Aggregate {
                let mut aggregate = AbsAggregate::new(slot_schema.type_name());
                if let Some(element) = schema.element_schema(&slot.name, onto)? {
                    let element_template = self.build(onto.schema(element)?, onto)?;
                    aggregate.set_element_template(Some(element_template));
                }
                aggregate.into()
            } else {
                self.build(slot_schema, onto)?
            };
            children.push((slot.name, child));
        }
        if let Some(slots) = node.slots_mut() {
            for (name, child) in children {
                slots.insert(name, child);
            }
        }
        Ok(node)
    }

    fn variable(&mut self, schema: &ObjectSchema) -> AbsObject {
        let name = format!("v{}", self.counter);
        self.counter = self.counter.saturating_add(1);
        AbsVariable::typed(name, schema.type_name()).into()
    }
}

/// Whether a value is a template: it contains a variable and its root is a
/// variable, a slotted node (concept, agent action or predicate) or an
/// aggregate.
pub fn is_abs_template(abs: &AbsObject) -> bool {
    !abs.is_grounded()
        && matches!(
            abs,
            AbsObject::Variable(_)
                | AbsObject::Concept(_)
                | AbsObject::AgentAction(_)
                | AbsObject::Predicate(_)
                | AbsObject::Aggregate(_)
        )
}

/// Fill a template in with default values.
///
/// A slot that is absent from the template, or holds a variable, takes the
/// default. Nested concepts are unified slot by slot. A non-empty grounded
/// aggregate in the template is kept as is.
///
/// # Errors
///
/// Returns [`OntologyError::TemplateMismatch`] when the template expects a
/// concept or aggregate where the defaults hold something else.
pub fn apply_default_values(template: &mut AbsObject, defaults: &AbsObject) -> OntologyResult<()> {
    let root = template.type_name().to_owned();
    unify(template, defaults, &root)
}

fn unify(template: &mut AbsObject, defaults: &AbsObject, slot: &str) -> OntologyResult<()> {
    let mismatch = |reason: String| OntologyError::TemplateMismatch {
        slot: slot.to_owned(),
        reason,
    };
    match template.abs_type() {
        AbsType::Variable => {
            *template = defaults.clone();
            Ok(())
        }
        AbsType::Aggregate => {
            let explicit = template
                .as_aggregate()
                .is_some_and(|aggregate| !aggregate.is_empty() && aggregate.is_grounded());
            if explicit || matches!(defaults, AbsObject::Variable(_)) {
                return Ok(());
            }
            if !matches!(defaults, AbsObject::Aggregate(_)) {
                return Err(mismatch(format!("expected an aggregate default, found {defaults}")));
            }
            *template = defaults.clone();
            Ok(())
        }
        AbsType::Concept | AbsType::AgentAction | AbsType::Predicate => {
            if matches!(defaults, AbsObject::Variable(_)) {
                return Ok(());
            }
            let Some(default_slots) = defaults.slots() else {
                return Err(mismatch(format!("expected a concept default, found {defaults}")));
            };
            let Some(slots) = template.slots_mut() else {
                return Ok(());
            };
            for (name, default) in default_slots.iter() {
                match slots.get_mut(name) {
                    Some(existing) => unify(existing, default, name)?,
                    None => {
                        slots.insert(name, default.clone());
                    }
                }
            }
            Ok(())
        }
        AbsType::Primitive | AbsType::Ire | AbsType::ContentElementList => Ok(()),
    }
}

/// Copy of `abs` with every variable removed.
///
/// Slots holding a variable disappear. With `remove_empty_aggregates`,
/// aggregates left without elements disappear too; concepts are kept even
/// when no slot remains. Returns `None` when `abs` itself goes away.
pub fn nullify_variables(abs: &AbsObject, remove_empty_aggregates: bool) -> Option<AbsObject> {
    match abs {
        AbsObject::Variable(_) => None,
        AbsObject::Primitive(_) | AbsObject::Ire(_) => Some(abs.clone()),
        AbsObject::Concept(_) | AbsObject::AgentAction(_) | AbsObject::Predicate(_) => {
            let mut node = abs.clone();
            if let Some(slots) = node.slots_mut() {
                let names: Vec<String> = slots.names().map(String::from).collect();
                for name in names {
                    let replacement = slots
                        .get(&name)
                        .and_then(|value| nullify_variables(value, remove_empty_aggregates));
                    match replacement {
                        Some(value) => {
                            slots.insert(name, value);
                        }
                        None => {
                            slots.remove(&name);
                        }
                    }
                }
            }
            Some(node)
        }
        AbsObject::Aggregate(aggregate) => {
            let mut out = AbsAggregate::new(aggregate.type_name());
            for element in aggregate.elements() {
                if let Some(element) = nullify_variables(element, remove_empty_aggregates) {
                    out.add(element);
                }
            }
            if remove_empty_aggregates && out.is_empty() {
                None
            } else {
                Some(out.into())
            }
        }
        AbsObject::ContentElementList(list) => {
            let mut out = crate::abs::AbsContentElementList::new();
            for element in list.elements() {
                if let Some(element) = nullify_variables(element, remove_empty_aggregates) {
                    out.add(element);
                }
            }
            Some(out.into())
        }
    }
}

/// Copy of `abs` with `prefix` prepended to every concept, agent action,
/// predicate and aggregate type name not defined in `base`.
pub fn add_prefix(abs: &AbsObject, prefix: &str, base: &Ontology) -> AbsObject {
    let mut out = abs.clone();
    rename_types(&mut out, base, &|name| Some(format!("{prefix}{name}")));
    out
}

/// Copy of `abs` with `prefix` stripped from every concept, agent action,
/// predicate and aggregate type name that carries it and is not defined in
/// `base`.
pub fn remove_prefix(abs: &AbsObject, prefix: &str, base: &Ontology) -> AbsObject {
    let mut out = abs.clone();
    rename_types(&mut out, base, &|name| name.strip_prefix(prefix).map(str::to_owned));
    out
}

fn rename_types(abs: &mut AbsObject, base: &Ontology, rename: &dyn Fn(&str) -> Option<String>) {
    let renamable = matches!(
        abs,
        AbsObject::Concept(_) | AbsObject::AgentAction(_) | AbsObject::Predicate(_) | AbsObject::Aggregate(_)
    );
    if renamable
        && !base.contains(abs.type_name())
        && let Some(renamed) = rename(abs.type_name())
    {
        abs.set_type_name(renamed);
    }
    match abs {
        AbsObject::Concept(_) | AbsObject::AgentAction(_) | AbsObject::Predicate(_) => {
            if let Some(slots) = abs.slots_mut() {
                for (_, value) in slots.iter_mut() {
                    rename_types(value, base, rename);
                }
            }
        }
        AbsObject::Aggregate(aggregate) => {
            for element in aggregate.elements_mut() {
                rename_types(element, base, rename);
            }
        }
        AbsObject::ContentElementList(list) => {
            for element in list.elements_mut() {
                rename_types(element, base, rename);
            }
        }
        AbsObject::Ire(ire) => {
            rename_types(ire.variable_mut(), base, rename);
            rename_types(ire.proposition_mut(), base, rename);
        }
        AbsObject::Primitive(_) | AbsObject::Variable(_) => {}
    }
}

/// Abstract form of an agent identifier.
///
/// Addresses and resolvers are only present when the identifier has some.
pub fn externalise_aid(aid: &Aid) -> AbsConcept {
    let mut abs = AbsConcept::new(basic::AID).with(basic::AID_NAME, aid.name.as_str());
    if !aid.addresses.is_empty() {
        abs.set(
            basic::AID_ADDRESSES,
            externalise_list(aid.addresses.iter().map(String::as_str), basic::SEQUENCE),
        );
    }
    if !aid.resolvers.is_empty() {
        let mut resolvers = AbsAggregate::sequence();
        for resolver in &aid.resolvers {
            resolvers.add(externalise_aid(resolver));
        }
        abs.set(basic::AID_RESOLVERS, resolvers);
    }
    abs
}

/// Agent identifier from its abstract form.
///
/// # Errors
///
/// Returns [`OntologyError::MissingMandatorySlot`] without a name, or
/// [`OntologyError::Invalid`] when an address is not a string or a resolver
/// is not an agent identifier.
pub fn internalise_aid(abs: &AbsConcept) -> OntologyResult<Aid> {
    let invalid = |reason: String| OntologyError::Invalid {
        schema: basic::AID.to_owned(),
        value: abs.to_string(),
        reason,
    };
    let name = abs
        .get_string(basic::AID_NAME)
        .ok_or_else(|| OntologyError::MissingMandatorySlot {
            schema: basic::AID.to_owned(),
            slot: basic::AID_NAME.to_owned(),
        })?;
    let mut aid = Aid::new(name);
    if let Some(addresses) = abs.abs_object(basic::AID_ADDRESSES) {
        let addresses = addresses
            .as_aggregate()
            .ok_or_else(|| invalid("addresses is not an aggregate".into()))?;
        for address in addresses.elements() {
            let address = address
                .as_str()
                .ok_or_else(|| invalid(format!("address {address} is not a string")))?;
            aid.addresses.push(address.to_owned());
        }
    }
    if let Some(resolvers) = abs.abs_object(basic::AID_RESOLVERS) {
        let resolvers = resolvers
            .as_aggregate()
            .ok_or_else(|| invalid("resolvers is not an aggregate".into()))?;
        for resolver in resolvers.elements() {
            let resolver = resolver
                .as_concept()
                .ok_or_else(|| invalid(format!("resolver {resolver} is not an agent identifier")))?;
            aid.resolvers.push(internalise_aid(resolver)?);
        }
    }
    Ok(aid)
}

/// Aggregate of the given type holding `items`.
pub fn externalise_list<T: Into<AbsObject>>(
    items: impl IntoIterator<Item = T>,
    aggregate_type: &str,
) -> AbsAggregate {
    let mut aggregate = AbsAggregate::new(aggregate_type);
    for item in items {
        aggregate.add(item);
    }
    aggregate
}

/// Primitive values of an aggregate, in order.
///
/// # Errors
///
/// Returns [`OntologyError::Invalid`] if an element is not a primitive.
pub fn internalise_list(aggregate: &AbsAggregate) -> OntologyResult<Vec<PrimitiveValue>> {
    aggregate
        .elements()
        .iter()
        .map(|element| {
            element
                .as_primitive()
                .map(|primitive| primitive.value().clone())
                .ok_or_else(|| OntologyError::Invalid {
                    schema: aggregate.type_name().to_owned(),
                    value: element.to_string(),
                    reason: "element is not a primitive".into(),
                })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::schema::Optionality;

    fn library() -> Ontology {
        let mut onto = Ontology::with_basic("library");
        let mut author = ObjectSchema::concept("Author");
        author
            .add_mandatory("name", basic::STRING)
            .add_optional("mentor", "Author");
        onto.add(author).unwrap();

        let mut book = ObjectSchema::concept("Book");
        book.add_mandatory("title", basic::STRING)
            .add("author", "Author", Optionality::Mandatory)
            .add_aggregate("tags", basic::STRING, 0, None);
        onto.add(book).unwrap();
        onto
    }

    #[test]
    fn template_mirrors_schema() {
        let onto = library();
        let template = create_abs_template(onto.schema("Book").unwrap(), &onto).unwrap();
        assert!(!template.is_grounded());
        assert!(is_abs_template(&template));
        assert_eq!(template.names(), vec!["title", "author", "tags"]);

        let title = template.abs_object("title").unwrap().as_variable().unwrap();
        assert_eq!(title.name(), "v0");
        assert_eq!(title.value_type(), Some(basic::STRING));

        let author = template.abs_object("author").unwrap();
        assert_eq!(author.type_name(), "Author");
        // The recursive mentor slot stops at a variable.
        assert!(author.abs_object("mentor").unwrap().as_variable().is_some());

        let tags = template.abs_object("tags").unwrap().as_aggregate().unwrap();
        assert!(tags.is_empty());
        assert!(tags.element_template().unwrap().as_variable().is_some());
    }

    #[test]
    fn variable_numbering_restarts_per_call() {
        let onto = library();
        let schema = onto.schema("Author").unwrap();
        let first = create_abs_template(schema, &onto).unwrap();
        let second = create_abs_template(schema, &onto).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn defaults_fill_variables_and_absent_slots() {
        let onto = library();
        let mut template = create_abs_template(onto.schema("Book").unwrap(), &onto).unwrap();
        let defaults = AbsObject::from(
            AbsConcept::new("Book")
                .with("title", "Untitled")
                .with("author", AbsConcept::new("Author").with("name", "Anon"))
                .with("tags", AbsAggregate::sequence().with("misc"))
                .with("edition", 1_i64),
        );
        apply_default_values(&mut template, &defaults).unwrap();
        assert_eq!(template.abs_object("title"), Some(&AbsObject::from("Untitled")));
        assert_eq!(template.abs_object("edition"), Some(&AbsObject::from(1_i64)));
        let author = template.abs_object("author").unwrap();
        assert_eq!(author.abs_object("name"), Some(&AbsObject::from("Anon")));
        assert!(author.abs_object("mentor").unwrap().as_variable().is_some());
        assert_eq!(
            template.abs_object("tags").unwrap().as_aggregate().unwrap().size(),
            1
        );
    }

    #[test]
    fn explicit_aggregates_are_kept() {
        let mut template = AbsObject::from(
            AbsConcept::new("Book").with("tags", AbsAggregate::sequence().with("kept")),
        );
        let defaults =
            AbsObject::from(AbsConcept::new("Book").with("tags", AbsAggregate::sequence().with("x")));
        apply_default_values(&mut template, &defaults).unwrap();
        let tags = template.abs_object("tags").unwrap().as_aggregate().unwrap();
        assert_eq!(tags.get(0), Some(&AbsObject::from("kept")));
    }

    #[test]
    fn shape_mismatch_fails() {
        let mut template = AbsObject::from(
            AbsConcept::new("Book").with("author", AbsConcept::new("Author").with("name", AbsVariable::new("n"))),
        );
        let defaults = AbsObject::from(AbsConcept::new("Book").with("author", "just a string"));
        let err = apply_default_values(&mut template, &defaults).unwrap_err();
        assert!(matches!(err, OntologyError::TemplateMismatch { ref slot, .. } if slot == "author"));
    }

    #[test]
    fn nullify_strips_variables() {
        let abs = AbsObject::from(
            AbsConcept::new("Book")
                .with("title", AbsVariable::new("t"))
                .with("author", AbsConcept::new("Author").with("name", AbsVariable::new("n")))
                .with("tags", AbsAggregate::sequence().with(AbsVariable::new("x"))),
        );
        let kept = nullify_variables(&abs, false).unwrap();
        assert_eq!(kept.names(), vec!["author", "tags"]);
        assert_eq!(kept.abs_object("author").unwrap().count(), 0);
        assert!(kept.is_grounded());

        let collapsed = nullify_variables(&abs, true).unwrap();
        assert_eq!(collapsed.names(), vec!["author"]);
        assert!(nullify_variables(&AbsVariable::new("x").into(), true).is_none());
    }

    #[test]
    fn prefixes_skip_base_types() {
        let base = basic::basic_ontology();
        let abs = AbsObject::from(
            AbsConcept::new("Book")
                .with("tags", AbsAggregate::sequence().with(AbsConcept::new("Tag")))
                .with("owner", AbsConcept::new(basic::AID).with("name", "a@p")),
        );
        let prefixed = add_prefix(&abs, "lib:", &base);
        assert_eq!(prefixed.type_name(), "lib:Book");
        let tags = prefixed.abs_object("tags").unwrap().as_aggregate().unwrap();
        assert_eq!(tags.type_name(), basic::SEQUENCE);
        assert_eq!(tags.get(0).unwrap().type_name(), "lib:Tag");
        assert_eq!(prefixed.abs_object("owner").unwrap().type_name(), basic::AID);

        assert_eq!(remove_prefix(&prefixed, "lib:", &base), abs);
    }

    #[test]
    fn aid_externalisation_keeps_resolvers() {
        let aid = Aid::new("buyer@p")
            .with_address("http://a")
            .with_address("http://b")
            .with_resolver(Aid::new("df@p").with_address("http://df"));
        let abs = externalise_aid(&aid);
        let resolvers = abs.abs_object(basic::AID_RESOLVERS).unwrap().as_aggregate().unwrap();
        assert_eq!(resolvers.size(), 1);
        let addresses = abs.abs_object(basic::AID_ADDRESSES).unwrap().as_aggregate().unwrap();
        assert_eq!(addresses.size(), 2);
        assert_eq!(internalise_aid(&abs).unwrap(), aid);

        let bare = externalise_aid(&Aid::new("solo@p"));
        assert_eq!(bare.count(), 1);
        assert!(basic::basic_ontology().validate(&AbsObject::from(abs)).is_ok());
    }

    #[test]
    fn lists() {
        let agg = externalise_list([1_i64, 2, 3], basic::SET);
        assert_eq!(agg.type_name(), basic::SET);
        assert_eq!(
            internalise_list(&agg).unwrap(),
            vec![
                PrimitiveValue::Integer(1),
                PrimitiveValue::Integer(2),
                PrimitiveValue::Integer(3)
            ]
        );
        let mixed = AbsAggregate::sequence().with(AbsConcept::new("x"));
        assert!(internalise_list(&mixed).is_err());
    }
}
