//! Content languages for the JADE content manager.
//!
//! # Modules
//!
//! - [`sl`] -- the FIPA-SL string language and its operator ontology.
//! - [`json`] -- a byte language carrying the serde form of the tree.
//!
//! [`register_standard_languages`] installs both on a manager.

pub mod json;
pub mod sl;

pub use json::{JSON_LANGUAGE, JsonCodec};
pub use sl::{SL_LANGUAGE, SlCodec, SlOntology, sl_ontology};

use jade_content::{ContentManager, ContentResult, LanguageCodec};

/// Register the SL and JSON languages on `manager`.
///
/// # Errors
///
/// Propagates SL ontology build failures and registration failures from
/// the manager.
pub fn register_standard_languages(manager: &ContentManager) -> ContentResult<()> {
    manager.register_language(LanguageCodec::text(SlCodec::new()?))?;
    manager.register_language(LanguageCodec::binary(JsonCodec::new()))?;
    Ok(())
}
