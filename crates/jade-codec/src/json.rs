//! The JSON content language.
//!
//! Content travels as the serde form of the abstract tree, in the
//! byte-sequence slot of the message. It needs no vocabulary of its own.

use jade_content::{AbsObject, ByteCodec, CodecError, CodecResult, Ontology, PrimitiveValue};
use tracing::debug;

/// Language name used in the `:language` message parameter.
pub const JSON_LANGUAGE: &str = "json";

/// The JSON byte codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact output.
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented output.
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ByteCodec for JsonCodec {
    fn name(&self) -> &str {
        JSON_LANGUAGE
    }

    fn encode(&self, onto: &Ontology, content: &AbsObject) -> CodecResult<Vec<u8>> {
        if let Some(float) = non_finite(content) {
            return Err(CodecError::Encode(format!("{float} has no JSON form")));
        }
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(content)?
        } else {
            serde_json::to_vec(content)?
        };
        debug!(ontology = %onto.name(), bytes = bytes.len(), "encoded JSON content");
        Ok(bytes)
    }

    fn decode(&self, onto: &Ontology, content: &[u8]) -> CodecResult<AbsObject> {
        let abs: AbsObject = serde_json::from_slice(content)?;
        debug!(ontology = %onto.name(), content = %abs.type_name(), "decoded JSON content");
        Ok(abs)
    }
}

/// First NaN or infinite float in the tree. serde_json writes those as
/// `null`, which does not decode back.
fn non_finite(abs: &AbsObject) -> Option<f64> {
    match abs {
        AbsObject::Primitive(primitive) => match primitive.value() {
            PrimitiveValue::Float(float) if !float.is_finite() => Some(*float),
            _ => None,
        },
        AbsObject::Concept(_) | AbsObject::AgentAction(_) | AbsObject::Predicate(_) => abs
            .slots()
            .and_then(|slots| slots.iter().find_map(|(_, value)| non_finite(value))),
        AbsObject::Aggregate(aggregate) => aggregate
            .elements()
            .iter()
            .chain(aggregate.element_template())
            .find_map(non_finite),
        AbsObject::Ire(ire) => non_finite(ire.variable()).or_else(|| non_finite(ire.proposition())),
        AbsObject::ContentElementList(list) => list.elements().iter().find_map(non_finite),
        AbsObject::Variable(_) => None,
    }
}
