//! The content manager: per-agent registry of languages and ontologies.
//!
//! Filling a message runs a fixed pipeline: resolve the language named by
//! the message, resolve its ontology, merge it with the language's own
//! vocabulary, validate the content, then encode it into the content slot
//! the language uses. Extraction runs the same steps in reverse.
//!
//! Registries sit behind a [`Mutex`] so that bootstrap code can register
//! languages and ontologies while the owning agent is already running. The
//! merged ontology of each (language, ontology) pair is cached until the
//! next registration.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use jade_types::{AclMessage, MessageContent};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::abs::AbsObject;
use crate::codec::LanguageCodec;
use crate::config::ContentManagerConfig;
use crate::error::{CodecError, ContentError, ContentResult, OntologyError};
use crate::onto::Ontology;
use crate::onto::basic::basic_ontology;

type MergeKey = (String, Option<String>);

#[derive(Debug, Default)]
struct Registry {
    languages: HashMap<String, (String, LanguageCodec)>,
    ontologies: HashMap<String, (String, Arc<Ontology>)>,
    merged: HashMap<MergeKey, Arc<Ontology>>,
}

/// Registry and orchestrator of message content handling for one agent.
#[derive(Debug)]
pub struct ContentManager {
    registry: Mutex<Registry>,
    validation_mode: AtomicBool,
    reject_undeclared_slots: AtomicBool,
    default_language: Option<String>,
}

impl Default for ContentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentManager {
    /// An empty manager with validation enabled.
    pub fn new() -> Self {
        Self::from_config(&ContentManagerConfig::default())
    }

    /// An empty manager configured from `config`.
    pub fn from_config(config: &ContentManagerConfig) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            validation_mode: AtomicBool::new(config.validation_mode),
            reject_undeclared_slots: AtomicBool::new(config.reject_undeclared_slots),
            default_language: config.default_language.clone(),
        }
    }

    fn lock(&self) -> ContentResult<MutexGuard<'_, Registry>> {
        self.registry.lock().map_err(|err| {
            warn!(error = %err, "content registry lock poisoned");
            ContentError::RegistryPoisoned
        })
    }

    /// Register a language under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidArgument`] if the codec has an empty
    /// name.
    pub fn register_language(&self, codec: LanguageCodec) -> ContentResult<()> {
        let name = codec.name().to_owned();
        self.register_language_as(&name, codec)
    }

    /// Register a language under an explicit name.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidArgument`] if `name` is empty.
    pub fn register_language_as(&self, name: &str, codec: LanguageCodec) -> ContentResult<()> {
        if name.trim().is_empty() {
            return Err(ContentError::InvalidArgument("language name is empty".into()));
        }
        let mut registry = self.lock()?;
        registry
            .languages
            .insert(key(name), (name.to_owned(), codec));
        registry.merged.clear();
        info!(language = %name, "language registered");
        Ok(())
    }

    /// Register an ontology under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidArgument`] if the ontology has an
    /// empty name.
    pub fn register_ontology(&self, onto: Arc<Ontology>) -> ContentResult<()> {
        let name = onto.name().to_owned();
        self.register_ontology_as(&name, onto)
    }

    /// Register an ontology under an explicit name.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidArgument`] if `name` is empty.
    pub fn register_ontology_as(&self, name: &str, onto: Arc<Ontology>) -> ContentResult<()> {
        if name.trim().is_empty() {
            return Err(ContentError::InvalidArgument("ontology name is empty".into()));
        }
        let mut registry = self.lock()?;
        registry
            .ontologies
            .insert(key(name), (name.to_owned(), onto));
        registry.merged.clear();
        info!(ontology = %name, "ontology registered");
        Ok(())
    }

    /// The language registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::RegistryPoisoned`] if the registry lock is
    /// poisoned.
    pub fn lookup_language(&self, name: &str) -> ContentResult<Option<LanguageCodec>> {
        let registry = self.lock()?;
        Ok(registry.languages.get(&key(name)).map(|(_, codec)| codec.clone()))
    }

    /// The ontology registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::RegistryPoisoned`] if the registry lock is
    /// poisoned.
    pub fn lookup_ontology(&self, name: &str) -> ContentResult<Option<Arc<Ontology>>> {
        let registry = self.lock()?;
        Ok(registry.ontologies.get(&key(name)).map(|(_, onto)| Arc::clone(onto)))
    }

    /// Registered language names, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::RegistryPoisoned`] if the registry lock is
    /// poisoned.
    pub fn language_names(&self) -> ContentResult<Vec<String>> {
        let mut names: Vec<String> = self
            .lock()?
            .languages
            .values()
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Registered ontology names, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::RegistryPoisoned`] if the registry lock is
    /// poisoned.
    pub fn ontology_names(&self) -> ContentResult<Vec<String>> {
        let mut names: Vec<String> = self
            .lock()?
            .ontologies
            .values()
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Whether content is validated on fill and extract.
    pub fn validation_mode(&self) -> bool {
        self.validation_mode.load(Ordering::Relaxed)
    }

    /// Turn validation on or off.
    pub fn set_validation_mode(&self, enabled: bool) {
        self.validation_mode.store(enabled, Ordering::Relaxed);
    }

    /// Whether validation also rejects slots no schema declares.
    pub fn reject_undeclared_slots(&self) -> bool {
        self.reject_undeclared_slots.load(Ordering::Relaxed)
    }

    /// Turn rejection of undeclared slots on or off.
    pub fn set_reject_undeclared_slots(&self, enabled: bool) {
        self.reject_undeclared_slots.store(enabled, Ordering::Relaxed);
    }

    /// Validate `content` and encode it into `msg`.
    ///
    /// # Errors
    ///
    /// - [`CodecError::UnknownLanguage`] / [`CodecError::MissingLanguage`]
    ///   before anything else happens;
    /// - [`OntologyError::UnknownOntology`] if the declared ontology is not
    ///   registered;
    /// - [`OntologyError::NotContentElement`] for a bare term;
    /// - any validation or encoding error.
    pub fn fill_content(&self, msg: &mut AclMessage, content: &AbsObject) -> ContentResult<()> {
        let (language, codec) = self.resolve_language(msg)?;
        let onto = self.merged_ontology(&language, &codec, msg.ontology())?;
        self.fill(msg, content, &codec, &onto)
    }

    /// Convert an application value with the message's ontology, then
    /// [`fill_content`](Self::fill_content).
    ///
    /// # Errors
    ///
    /// As [`fill_content`](Self::fill_content), plus conversion errors
    /// from [`Ontology::from_object`].
    pub fn fill_content_object<T: Serialize + 'static>(
        &self,
        msg: &mut AclMessage,
        value: &T,
    ) -> ContentResult<()> {
        let (language, codec) = self.resolve_language(msg)?;
        let onto = self.merged_ontology(&language, &codec, msg.ontology())?;
        let content = onto.from_object(value)?;
        self.fill(msg, &content, &codec, &onto)
    }

    fn fill(
        &self,
        msg: &mut AclMessage,
        content: &AbsObject,
        codec: &LanguageCodec,
        onto: &Ontology,
    ) -> ContentResult<()> {
        debug!(
            language = %codec.name(),
            ontology = %onto.name(),
            content = %content.type_name(),
            "filling content"
        );
        if !content.is_content_element() {
            return Err(OntologyError::NotContentElement(content.to_string()).into());
        }
        self.validate(content, onto)?;
        match codec {
            LanguageCodec::Text(text) => msg.set_content(text.encode(onto, content)?),
            LanguageCodec::Binary(binary) => {
                msg.set_byte_sequence_content(binary.encode(onto, content)?);
            }
        }
        Ok(())
    }

    /// Decode and validate the content of `msg`.
    ///
    /// # Errors
    ///
    /// - [`CodecError::UnknownLanguage`] / [`CodecError::MissingLanguage`];
    /// - [`OntologyError::UnknownOntology`];
    /// - [`CodecError::MissingContent`] when the message is empty;
    /// - [`CodecError::IncompatibleContent`] when the content slot does not
    ///   match the language;
    /// - any decoding or validation error.
    pub fn extract_abs_content(&self, msg: &AclMessage) -> ContentResult<AbsObject> {
        self.extract(msg).map(|(content, _)| content)
    }

    /// Decode, validate and convert the content of `msg` into a `T`.
    ///
    /// The value is converted with the same merged ontology it was
    /// validated against.
    ///
    /// # Errors
    ///
    /// As [`extract_abs_content`](Self::extract_abs_content), plus
    /// conversion errors from [`Ontology::to_object`].
    pub fn extract_content<T: DeserializeOwned + 'static>(&self, msg: &AclMessage) -> ContentResult<T> {
        let (content, onto) = self.extract(msg)?;
        Ok(onto.to_object(&content)?)
    }

    fn extract(&self, msg: &AclMessage) -> ContentResult<(AbsObject, Arc<Ontology>)> {
        let (language, codec) = self.resolve_language(msg)?;
        let onto = self.merged_ontology(&language, &codec, msg.ontology())?;
        debug!(language = %language, ontology = %onto.name(), "extracting content");
        let content = match (&codec, msg.content()) {
            (_, None) => return Err(CodecError::MissingContent.into()),
            (LanguageCodec::Text(text), Some(MessageContent::Text(payload))) => {
                text.decode(&onto, payload)?
            }
            (LanguageCodec::Binary(binary), Some(MessageContent::Bytes(payload))) => {
                binary.decode(&onto, payload)?
            }
            (codec, Some(_)) => {
                return Err(CodecError::IncompatibleContent {
                    language: language.clone(),
                    expected: codec.content_kind(),
                }
                .into());
            }
        };
        self.validate(&content, &onto)?;
        Ok((content, onto))
    }

    /// The ontology used for messages in `language` declaring `ontology`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownLanguage`] or
    /// [`OntologyError::UnknownOntology`].
    pub fn ontology_for(&self, language: &str, ontology: Option<&str>) -> ContentResult<Arc<Ontology>> {
        let codec = self
            .lookup_language(language)?
            .ok_or_else(|| CodecError::UnknownLanguage(language.to_owned()))?;
        self.merged_ontology(language, &codec, ontology)
    }

    fn validate(&self, content: &AbsObject, onto: &Ontology) -> ContentResult<()> {
        if !self.validation_mode() {
            return Ok(());
        }
        let schema = onto.schema(content.type_name())?;
        schema.validate(content, onto)?;
        if self.reject_undeclared_slots() {
            schema.check_undeclared_slots(content, onto)?;
        }
        Ok(())
    }

    fn resolve_language(&self, msg: &AclMessage) -> ContentResult<(String, LanguageCodec)> {
        let language = msg
            .language()
            .or(self.default_language.as_deref())
            .ok_or(CodecError::MissingLanguage)?;
        let codec = self
            .lookup_language(language)?
            .ok_or_else(|| CodecError::UnknownLanguage(language.to_owned()))?;
        Ok((language.to_owned(), codec))
    }

    fn merged_ontology(
        &self,
        language: &str,
        codec: &LanguageCodec,
        ontology: Option<&str>,
    ) -> ContentResult<Arc<Ontology>> {
        let merge_key = (key(language), ontology.map(key));
        let mut registry = self.lock()?;
        if let Some(merged) = registry.merged.get(&merge_key) {
            return Ok(Arc::clone(merged));
        }
        let declared = match ontology {
            Some(name) => Some(
                registry
                    .ontologies
                    .get(&key(name))
                    .map(|(_, onto)| Arc::clone(onto))
                    .ok_or_else(|| OntologyError::UnknownOntology(name.to_owned()))?,
            ),
            None => None,
        };
        let merged = match (declared, codec.inner_ontology()) {
            (Some(declared), Some(inner)) => {
                let name = format!("{}+{}", declared.name(), inner.name());
                Arc::new(Ontology::compose(name, [declared, inner]))
            }
            (Some(declared), None) => declared,
            (None, Some(inner)) => inner,
            (None, None) => basic_ontology(),
        };
        debug!(language = %language, ontology = %merged.name(), "merged ontology cached");
        registry.merged.insert(merge_key, Arc::clone(&merged));
        Ok(merged)
    }
}

fn key(name: &str) -> String {
    name.to_ascii_lowercase()
}
