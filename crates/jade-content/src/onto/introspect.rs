//! Conversion between application values and abstract content.
//!
//! Application values reach the ontology through serde: [`Ontology`]
//! serializes them to a [`serde_json::Value`] and an [`Introspector`] maps
//! that value onto the shape its schema declares (and back). Struct fields
//! become slots, sequences become aggregates, `None` becomes an absent slot
//! and an externally tagged enum variant (`{"Circle": {...}}` or
//! `"Square"`) becomes a value of the sub-schema named by the tag.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};

use super::Ontology;
use super::basic;
use crate::abs::{
    AbsAgentAction, AbsAggregate, AbsConcept, AbsObject, AbsPredicate, AbsPrimitive, PrimitiveValue,
};
use crate::error::{OntologyError, OntologyResult};
use crate::schema::{ObjectSchema, SchemaKind};

/// Maps serde values to abstract content and back, guided by schemas.
pub trait Introspector: fmt::Debug + Send + Sync {
    /// Turn a serialized application value into abstract content described
    /// by `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::Introspection`] if the value does not have
    /// the shape the schema declares.
    fn externalise(&self, value: &Value, schema: &ObjectSchema, onto: &Ontology) -> OntologyResult<AbsObject>;

    /// Turn abstract content into a serialized value a `Deserialize` type
    /// described by `schema` accepts.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::Introspection`] if the content cannot be
    /// represented, e.g. because it still contains variables.
    fn internalise(&self, abs: &AbsObject, schema: &ObjectSchema, onto: &Ontology) -> OntologyResult<Value>;
}

/// The default introspector.
///
/// Slot names are matched against struct field names case-insensitively on
/// the way in; on the way out slots are emitted under the names their
/// schema declares.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeIntrospector;

impl Introspector for SerdeIntrospector {
    fn externalise(&self, value: &Value, schema: &ObjectSchema, onto: &Ontology) -> OntologyResult<AbsObject> {
        to_abs(value, schema, None, onto)
    }

    fn internalise(&self, abs: &AbsObject, schema: &ObjectSchema, onto: &Ontology) -> OntologyResult<Value> {
        to_json(abs, schema, None, onto)
    }
}

fn fail(type_name: &str, reason: impl Into<String>) -> OntologyError {
    OntologyError::Introspection {
        type_name: type_name.to_owned(),
        reason: reason.into(),
    }
}

fn to_abs(
    value: &Value,
    schema: &ObjectSchema,
    element_schema: Option<&str>,
    onto: &Ontology,
) -> OntologyResult<AbsObject> {
    match schema.kind() {
        SchemaKind::Primitive => primitive_from_json(value, schema.type_name()),
        SchemaKind::Aggregate => {
            let Value::Array(items) = value else {
                return Err(fail(schema.type_name(), format!("expected a list, found {value}")));
            };
            let aggregate_type = if schema.is_base() {
                basic::SEQUENCE
            } else {
                schema.type_name()
            };
            let element_schema = element_schema.map(|name| onto.schema(name)).transpose()?;
            let mut aggregate = AbsAggregate::new(aggregate_type);
            for item in items {
                aggregate.add(match element_schema {
                    Some(element_schema) => to_abs(item, element_schema, None, onto)?,
                    None => infer(item, schema.type_name())?,
                });
            }
            Ok(aggregate.into())
        }
        SchemaKind::Concept | SchemaKind::AgentAction | SchemaKind::Predicate => {
            match tagged_variant(value, schema, onto) {
                Some((sub, fields)) => slotted_from_json(fields, sub, onto),
                None => match value {
                    Value::Object(fields) => slotted_from_json(Some(fields), schema, onto),
                    other => Err(fail(
                        schema.type_name(),
                        format!("expected an object, found {other}"),
                    )),
                },
            }
        }
        SchemaKind::Object | SchemaKind::ContentElement | SchemaKind::Term => {
            match tagged_variant(value, schema, onto) {
                Some((sub, fields)) => slotted_from_json(fields, sub, onto),
                None => infer(value, schema.type_name()),
            }
        }
        SchemaKind::Variable | SchemaKind::Ire | SchemaKind::ContentElementList => Err(fail(
            schema.type_name(),
            format!("{} values cannot be built from application data", schema.kind()),
        )),
    }
}

/// Recognize an externally tagged enum variant naming a sub-schema of
/// `expected`.
fn tagged_variant<'v, 'o>(
    value: &'v Value,
    expected: &ObjectSchema,
    onto: &'o Ontology,
) -> Option<(&'o ObjectSchema, Option<&'v Map<String, Value>>)> {
    let accepts = |tag: &str| {
        onto.find_schema(tag).filter(|sub| {
            sub.kind().has_named_slots()
                && !sub.type_name().eq_ignore_ascii_case(expected.type_name())
                && sub.is_compatible_with(expected, onto)
        })
    };
    match value {
        Value::String(tag) => accepts(tag).map(|sub| (sub, None)),
        Value::Object(fields) if fields.len() == 1 => {
            let (tag, inner) = fields.iter().next()?;
            if expected.contains_slot(tag, onto).unwrap_or(false) {
                return None;
            }
            let sub = accepts(tag)?;
            match inner {
                Value::Object(inner) => Some((sub, Some(inner))),
                Value::Null => Some((sub, None)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn slotted_from_json(
    fields: Option<&Map<String, Value>>,
    schema: &ObjectSchema,
    onto: &Ontology,
) -> OntologyResult<AbsObject> {
    if schema.is_abstract() {
        return Err(OntologyError::AbstractSchema(schema.type_name().to_owned()));
    }
    let mut node = match schema.kind() {
        SchemaKind::AgentAction => AbsObject::from(AbsAgentAction::new(schema.type_name())),
        SchemaKind::Predicate => AbsObject::from(AbsPredicate::new(schema.type_name())),
        _ => AbsObject::from(AbsConcept::new(schema.type_name())),
    };
    let Some(fields) = fields else {
        return Ok(node);
    };
    let mut children = Vec::new();
    for slot in schema.slots(onto)? {
        let Some(value) = fields
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(&slot.name))
            .map(|(_, value)| value)
        else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let slot_schema = onto.schema(&slot.schema)?;
        let element_schema = schema.element_schema(&slot.name, onto)?;
        children.push((slot.name, to_abs(value, slot_schema, element_schema, onto)?));
    }
    if let Some(slots) = node.slots_mut() {
        for (name, child) in children {
            slots.insert(name, child);
        }
    }
    Ok(node)
}

fn primitive_from_json(value: &Value, type_name: &str) -> OntologyResult<AbsObject> {
    let mismatch = || fail(type_name, format!("unexpected value {value}"));
    let is = |name: &str| type_name.eq_ignore_ascii_case(name);
    let primitive = if is(basic::STRING) {
        AbsPrimitive::string(value.as_str().ok_or_else(mismatch)?)
    } else if is(basic::INTEGER) {
        AbsPrimitive::integer(value.as_i64().ok_or_else(mismatch)?)
    } else if is(basic::FLOAT) {
        AbsPrimitive::float(value.as_f64().ok_or_else(mismatch)?)
    } else if is(basic::BOOLEAN) {
        AbsPrimitive::boolean(value.as_bool().ok_or_else(mismatch)?)
    } else if is(basic::DATE) {
        let text = value.as_str().ok_or_else(mismatch)?;
        let date = DateTime::parse_from_rfc3339(text)
            .map_err(|e| fail(type_name, e.to_string()))?
            .with_timezone(&Utc);
        AbsPrimitive::date(date)
    } else if is(basic::BYTE_SEQUENCE) {
        let items = value.as_array().ok_or_else(mismatch)?;
        let bytes = items
            .iter()
            .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(mismatch)?;
        AbsPrimitive::byte_sequence(bytes)
    } else {
        return infer(value, type_name);
    };
    Ok(primitive.into())
}

/// Build content from a value whose schema gives no guidance.
fn infer(value: &Value, type_name: &str) -> OntologyResult<AbsObject> {
    match value {
        Value::Bool(b) => Ok(AbsObject::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(AbsObject::from(i)),
            None => n
                .as_f64()
                .map(AbsObject::from)
                .ok_or_else(|| fail(type_name, format!("number {n} is out of range"))),
        },
        Value::String(s) => Ok(AbsObject::from(s.as_str())),
        Value::Array(items) => {
            let mut aggregate = AbsAggregate::sequence();
            for item in items {
                aggregate.add(infer(item, type_name)?);
            }
            Ok(aggregate.into())
        }
        Value::Null | Value::Object(_) => Err(fail(
            type_name,
            format!("cannot infer a schema for {value}"),
        )),
    }
}

fn to_json(
    abs: &AbsObject,
    expected: &ObjectSchema,
    element_schema: Option<&ObjectSchema>,
    onto: &Ontology,
) -> OntologyResult<Value> {
    match abs {
        AbsObject::Primitive(primitive) => primitive_to_json(primitive),
        AbsObject::Aggregate(aggregate) => aggregate
            .elements()
            .iter()
            .map(|element| {
                let schema = match element_schema {
                    Some(schema) => schema,
                    None => onto.schema(element.type_name())?,
                };
                to_json(element, schema, None, onto)
            })
            .collect::<OntologyResult<Vec<_>>>()
            .map(Value::Array),
        AbsObject::Concept(_) | AbsObject::AgentAction(_) | AbsObject::Predicate(_) => {
            let own = onto.schema(abs.type_name())?;
            let mut fields = Map::new();
            for slot in own.slots(onto)? {
                let Some(value) = abs.abs_object(&slot.name) else {
                    continue;
                };
                let slot_schema = onto.schema(&slot.schema)?;
                let element_schema = own
                    .element_schema(&slot.name, onto)?
                    .map(|name| onto.schema(name))
                    .transpose()?;
                let json = to_json(value, slot_schema, element_schema, onto)?;
                fields.insert(slot.name, json);
            }
            if own.type_name().eq_ignore_ascii_case(expected.type_name()) {
                Ok(Value::Object(fields))
            } else if fields.is_empty() {
                Ok(Value::String(own.type_name().to_owned()))
            } else {
                let mut tagged = Map::new();
                tagged.insert(own.type_name().to_owned(), Value::Object(fields));
                Ok(Value::Object(tagged))
            }
        }
        AbsObject::Variable(var) => Err(fail(
            expected.type_name(),
            format!("unbound variable ?{}", var.name()),
        )),
        AbsObject::Ire(_) | AbsObject::ContentElementList(_) => Err(fail(
            expected.type_name(),
            format!("{} cannot be converted to application data", abs.abs_type()),
        )),
    }
}

fn primitive_to_json(primitive: &AbsPrimitive) -> OntologyResult<Value> {
    Ok(match primitive.value() {
        PrimitiveValue::String(s) => Value::String(s.clone()),
        PrimitiveValue::Boolean(b) => Value::Bool(*b),
        PrimitiveValue::Integer(i) => Value::Number((*i).into()),
        PrimitiveValue::Float(f) => Value::Number(
            Number::from_f64(*f).ok_or_else(|| fail(basic::FLOAT, format!("{f} is not finite")))?,
        ),
        PrimitiveValue::Date(d) => {
            serde_json::to_value(d).map_err(|e| fail(basic::DATE, e.to_string()))?
        }
        PrimitiveValue::ByteSequence(bytes) => {
            Value::Array(bytes.iter().map(|b| Value::Number((*b).into())).collect())
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::onto::basic::BasicOntology;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Circle {
        radius: f64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum Shape {
        Circle(Circle),
        Square { side: f64 },
        Dot,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Canvas {
        title: String,
        shapes: Vec<Shape>,
        #[serde(default)]
        background: Option<Shape>,
    }

    fn onto() -> Ontology {
        let mut onto = Ontology::compose("shapes", [std::sync::Arc::new(BasicOntology::build())]);
        let mut shape = ObjectSchema::concept("Shape");
        shape.set_abstract(true);
        onto.add_class::<Shape>(shape).unwrap();

        let mut circle = ObjectSchema::concept("Circle");
        circle
            .add_super_schema_name("Shape")
            .add_mandatory("radius", basic::FLOAT);
        onto.add_class::<Circle>(circle).unwrap();

        let mut square = ObjectSchema::concept("Square");
        square
            .add_super_schema_name("Shape")
            .add_mandatory("side", basic::FLOAT);
        onto.add(square).unwrap();

        let mut dot = ObjectSchema::concept("Dot");
        dot.add_super_schema_name("Shape");
        onto.add(dot).unwrap();

        let mut canvas = ObjectSchema::concept("Canvas");
        canvas
            .add_mandatory("title", basic::STRING)
            .add_aggregate("shapes", "Shape", 0, None)
            .add_optional("background", "Shape");
        onto.add_class::<Canvas>(canvas).unwrap();
        onto
    }

    #[test]
    fn polymorphic_slots_round_trip() {
        let onto = onto();
        let canvas = Canvas {
            title: "sketch".into(),
            shapes: vec![
                Shape::Circle(Circle { radius: 2.0 }),
                Shape::Square { side: 1.0 },
                Shape::Dot,
            ],
            background: None,
        };
        let abs = onto.from_object(&canvas).unwrap();
        onto.validate(&abs).unwrap();
        let shapes = abs.abs_object("shapes").unwrap().as_aggregate().unwrap();
        assert_eq!(shapes.get(0).unwrap().type_name(), "Circle");
        assert_eq!(shapes.get(2).unwrap().type_name(), "Dot");
        assert!(abs.abs_object("background").is_none());

        let back: Canvas = onto.to_object(&abs).unwrap();
        assert_eq!(back, canvas);
    }

    #[test]
    fn abstract_schema_cannot_be_instantiated() {
        let onto = onto();
        let err = to_abs(
            &serde_json::json!({}),
            onto.schema("Shape").unwrap(),
            None,
            &onto,
        )
        .unwrap_err();
        assert!(matches!(err, OntologyError::AbstractSchema(_)));
    }

    #[test]
    fn unbound_variables_do_not_convert() {
        let onto = onto();
        let abs = AbsObject::from(
            AbsConcept::new("Circle").with("radius", crate::abs::AbsVariable::new("r")),
        );
        let err = onto.to_object::<Circle>(&abs).unwrap_err();
        assert!(err.to_string().contains("?r"));
    }

    #[test]
    fn field_names_match_case_insensitively() {
        let onto = onto();
        let abs = to_abs(
            &serde_json::json!({"RADIUS": 3.5}),
            onto.schema("Circle").unwrap(),
            None,
            &onto,
        )
        .unwrap();
        assert_eq!(abs.abs_object("radius"), Some(&AbsObject::from(3.5)));
    }

    #[test]
    fn dates_and_bytes() {
        let onto = BasicOntology::build();
        let when: DateTime<Utc> = "2024-05-01T10:30:00Z".parse().unwrap();
        let abs = onto.from_object(&when).unwrap();
        assert_eq!(abs, AbsObject::from(when));
        assert_eq!(onto.to_object::<DateTime<Utc>>(&abs).unwrap(), when);

        let bytes = vec![0_u8, 7, 255];
        let abs = onto.from_object(&bytes).unwrap();
        assert_eq!(abs, AbsObject::from(bytes.clone()));
        assert_eq!(onto.to_object::<Vec<u8>>(&abs).unwrap(), bytes);
    }
}
