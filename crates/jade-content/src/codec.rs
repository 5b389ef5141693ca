//! Content language contract.
//!
//! A content language turns abstract content into the payload carried by a
//! message and back. Text languages fill the string content slot of an
//! [`AclMessage`](jade_types::AclMessage), binary languages the
//! byte-sequence slot.

use std::fmt;
use std::sync::Arc;

use crate::abs::AbsObject;
use crate::error::CodecResult;
use crate::onto::Ontology;

/// A content language with a textual encoding.
pub trait StringCodec: fmt::Debug + Send + Sync {
    /// Language name, as declared in the `:language` message parameter.
    fn name(&self) -> &str;

    /// Vocabulary the language itself defines (logical operators and the
    /// like), merged into every ontology used with it.
    fn inner_ontology(&self) -> Option<Arc<Ontology>> {
        None
    }

    /// Encode content.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`](crate::CodecError::Encode) if the
    /// content cannot be expressed in the language.
    fn encode(&self, onto: &Ontology, content: &AbsObject) -> CodecResult<String>;

    /// Decode content.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Parse`](crate::CodecError::Parse) if the text
    /// is malformed.
    fn decode(&self, onto: &Ontology, content: &str) -> CodecResult<AbsObject>;
}

/// A content language with a binary encoding.
pub trait ByteCodec: fmt::Debug + Send + Sync {
    /// Language name, as declared in the `:language` message parameter.
    fn name(&self) -> &str;

    /// Vocabulary the language itself defines.
    fn inner_ontology(&self) -> Option<Arc<Ontology>> {
        None
    }

    /// Encode content.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`](crate::CodecError) if the content cannot be
    /// expressed in the language.
    fn encode(&self, onto: &Ontology, content: &AbsObject) -> CodecResult<Vec<u8>>;

    /// Decode content.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`](crate::CodecError) if the bytes are
    /// malformed.
    fn decode(&self, onto: &Ontology, content: &[u8]) -> CodecResult<AbsObject>;
}

/// A registered content language.
#[derive(Debug, Clone)]
pub enum LanguageCodec {
    /// Works with string content.
    Text(Arc<dyn StringCodec>),
    /// Works with byte-sequence content.
    Binary(Arc<dyn ByteCodec>),
}

impl LanguageCodec {
    /// Wrap a text codec.
    pub fn text(codec: impl StringCodec + 'static) -> Self {
        Self::Text(Arc::new(codec))
    }

    /// Wrap a binary codec.
    pub fn binary(codec: impl ByteCodec + 'static) -> Self {
        Self::Binary(Arc::new(codec))
    }

    /// Language name.
    pub fn name(&self) -> &str {
        match self {
            Self::Text(codec) => codec.name(),
            Self::Binary(codec) => codec.name(),
        }
    }

    /// Vocabulary the language itself defines.
    pub fn inner_ontology(&self) -> Option<Arc<Ontology>> {
        match self {
            Self::Text(codec) => codec.inner_ontology(),
            Self::Binary(codec) => codec.inner_ontology(),
        }
    }

    /// Which message content slot the language uses.
    pub const fn content_kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Binary(_) => "byte-sequence",
        }
    }
}
