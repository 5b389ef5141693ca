//! The FIPA-SL content language.
//!
//! Content is written as S-expressions inside an outer pair of
//! parentheses:
//!
//! ```text
//! ((owns :owner (person :name "Alice Smith") :item book))
//! ((action (agent-identifier :name seller@platform) (sell :item book)))
//! ((iota ?x (= ?x (price book))))
//! ```
//!
//! Concepts, predicates and agent actions use `:slot value` pairs; logical
//! operators and the basic `action`, `done`, `result` and `=` elements are
//! written positionally. Aggregates read `(sequence a b)`, variables `?x`
//! (`??x` for meta variables), dates `20240501T103000000Z` and byte
//! sequences `#<len>"<base64>`. Strings are quoted whenever the bare word
//! would read back as something else.

mod encoder;
mod lexer;
pub mod ontology;
mod parser;

use std::sync::Arc;

use jade_content::{AbsObject, CodecResult, Ontology, OntologyResult, StringCodec};
use tracing::debug;

pub use ontology::{SlOntology, sl_ontology};

/// Language name used in the `:language` message parameter.
pub const SL_LANGUAGE: &str = "fipa-sl";

/// The FIPA-SL string codec.
#[derive(Debug, Clone)]
pub struct SlCodec {
    ontology: Arc<Ontology>,
}

impl SlCodec {
    /// A codec backed by the shared SL ontology.
    ///
    /// # Errors
    ///
    /// Propagates the error if the SL ontology cannot be built.
    pub fn new() -> OntologyResult<Self> {
        Ok(Self::with_ontology(sl_ontology()?))
    }

    /// A codec merging `ontology` into the ontologies it is used with.
    pub const fn with_ontology(ontology: Arc<Ontology>) -> Self {
        Self { ontology }
    }
}

impl StringCodec for SlCodec {
    fn name(&self) -> &str {
        SL_LANGUAGE
    }

    fn inner_ontology(&self) -> Option<Arc<Ontology>> {
        Some(Arc::clone(&self.ontology))
    }

    fn encode(&self, onto: &Ontology, content: &AbsObject) -> CodecResult<String> {
        let text = encoder::encode_content(content, onto)?;
        debug!(ontology = %onto.name(), bytes = text.len(), "encoded SL content");
        Ok(text)
    }

    fn decode(&self, onto: &Ontology, content: &str) -> CodecResult<AbsObject> {
        let abs = parser::parse_content(content, onto)?;
        debug!(ontology = %onto.name(), content = %abs.type_name(), "decoded SL content");
        Ok(abs)
    }
}
