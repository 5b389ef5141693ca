//! Content handling for JADE agents.
//!
//! Agents exchange ACL messages whose content is expressed in a content
//! language (FIPA-SL, JSON, ...) over the vocabulary of an ontology. This
//! crate provides the pieces that sit between application values and the
//! string or byte payload of a message:
//!
//! # Modules
//!
//! - [`abs`] -- the language-neutral abstract content model ([`AbsObject`]
//!   and its node types).
//! - [`schema`] -- [`ObjectSchema`] type descriptors, slot optionality and
//!   [`Facet`] constraints.
//! - [`onto`] -- [`Ontology`] registries, the shared basic ontology and the
//!   serde-based introspector that converts application values.
//! - [`helper`] -- template generation, prefixing and AID/list conversions.
//! - [`codec`] -- the [`StringCodec`] and [`ByteCodec`] contracts content
//!   languages implement.
//! - [`manager`] -- the [`ContentManager`] that ties languages, ontologies
//!   and messages together.
//! - [`config`] -- YAML configuration for the manager and the inspector.
//! - [`error`] -- [`CodecError`], [`OntologyError`] and [`ContentError`].

pub mod abs;
pub mod codec;
pub mod config;
pub mod error;
pub mod helper;
pub mod manager;
pub mod onto;
pub mod schema;

pub use abs::{
    AbsAgentAction, AbsAggregate, AbsConcept, AbsContentElementList, AbsIre, AbsObject,
    AbsPredicate, AbsPrimitive, AbsType, AbsVariable, PrimitiveValue, Slots,
};
pub use codec::{ByteCodec, LanguageCodec, StringCodec};
pub use config::{ConfigError, ContentConfig, ContentManagerConfig, InspectConfig, LoggingConfig};
pub use error::{
    CodecError, CodecResult, ContentError, ContentResult, OntologyError, OntologyResult,
};
pub use manager::ContentManager;
pub use onto::basic::{BasicOntology, basic_ontology};
pub use onto::{Introspector, Ontology, SerdeIntrospector};
pub use schema::{CustomFacet, Facet, ObjectSchema, Optionality, SchemaKind, SlotDescriptor};
