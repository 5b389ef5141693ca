//! Error types for the `jade-content` crate.
//!
//! The taxonomy mirrors the two failure domains of content handling:
//! [`CodecError`] for everything the content language gets wrong (unknown
//! language, wrong content slot, malformed payload) and [`OntologyError`]
//! for everything the ontology rejects (unknown types, schema mismatches,
//! facet violations, conversion failures). [`ContentError`] wraps both for
//! the [`ContentManager`](crate::ContentManager) entry points.

/// Errors raised by content languages.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The message names a language that is not registered.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// The message does not declare a content language.
    #[error("message does not declare a content language")]
    MissingLanguage,

    /// The codec kind does not match the content slot of the message.
    #[error("language {language} expects {expected} content")]
    IncompatibleContent {
        /// The codec name.
        language: String,
        /// The content slot kind the codec works with.
        expected: &'static str,
    },

    /// The message carries no content to decode.
    #[error("message has no content")]
    MissingContent,

    /// The payload could not be parsed.
    #[error("parse error at offset {offset}: {message}")]
    Parse {
        /// Byte offset of the offending token.
        offset: usize,
        /// What went wrong.
        message: String,
    },

    /// The abstract content cannot be expressed in the language.
    #[error("encode error: {0}")]
    Encode(String),

    /// JSON (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while resolving, validating or converting content against
/// an ontology.
#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    /// The message names an ontology that is not registered.
    #[error("unknown ontology: {0}")]
    UnknownOntology(String),

    /// No schema for the type name anywhere in the ontology chain.
    #[error("no schema found for type {type_name} in ontology {ontology}")]
    SchemaNotFound {
        /// The requested type name.
        type_name: String,
        /// The ontology that was searched.
        ontology: String,
    },

    /// No schema is registered for the concrete Rust type.
    #[error("no schema registered for class {class} in ontology {ontology}")]
    ClassNotRegistered {
        /// The Rust type name.
        class: String,
        /// The ontology that was searched.
        ontology: String,
    },

    /// A value's schema cannot fill the declared slot schema.
    #[error("schema {schema} of value {value} is not compatible with schema {expected} of slot {slot}")]
    IncompatibleSchema {
        /// Schema resolved from the value's type name.
        schema: String,
        /// The offending value.
        value: String,
        /// Schema declared for the slot.
        expected: String,
        /// The slot name.
        slot: String,
    },

    /// A mandatory slot has no value.
    #[error("missing value for mandatory slot {slot} of schema {schema}")]
    MissingMandatorySlot {
        /// The schema declaring the slot.
        schema: String,
        /// The slot name.
        slot: String,
    },

    /// A value carries a slot its schema does not declare.
    #[error("slot {slot} is not declared by schema {schema}")]
    UndeclaredSlot {
        /// The schema of the value.
        schema: String,
        /// The undeclared slot name.
        slot: String,
    },

    /// A facet rejected a slot value.
    #[error("facet violation on slot {slot}: {reason}")]
    FacetViolation {
        /// The slot name.
        slot: String,
        /// Description of the violated constraint.
        reason: String,
    },

    /// A value is structurally not an instance of its schema.
    #[error("value {value} is not a valid {schema}: {reason}")]
    Invalid {
        /// The schema validated against.
        schema: String,
        /// The offending value.
        value: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Conversion between an application value and abstract content failed.
    #[error("introspection failed for {type_name}: {reason}")]
    Introspection {
        /// The schema or Rust type involved.
        type_name: String,
        /// What went wrong.
        reason: String,
    },

    /// A template and a defaults tree have incompatible shapes.
    #[error("template mismatch at slot {slot}: {reason}")]
    TemplateMismatch {
        /// The slot where the shapes diverge.
        slot: String,
        /// Description of the mismatch.
        reason: String,
    },

    /// A schema with the same type name is already registered locally.
    #[error("schema {type_name} is already defined in ontology {ontology}")]
    DuplicateSchema {
        /// The duplicated type name.
        type_name: String,
        /// The ontology being populated.
        ontology: String,
    },

    /// The value cannot be used as message content.
    #[error("{0} is not a content element")]
    NotContentElement(String),

    /// The schema is abstract and has no direct instances.
    #[error("schema {0} is abstract")]
    AbstractSchema(String),
}

/// Errors surfaced by the content manager.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// A content language failure.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// An ontology failure.
    #[error(transparent)]
    Ontology(#[from] OntologyError),

    /// A registration call received an unusable argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The registry lock was poisoned by a panicking thread.
    #[error("content manager registry is poisoned")]
    RegistryPoisoned,
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Result alias for ontology operations.
pub type OntologyResult<T> = Result<T, OntologyError>;

/// Result alias for content manager operations.
pub type ContentResult<T> = Result<T, ContentError>;
