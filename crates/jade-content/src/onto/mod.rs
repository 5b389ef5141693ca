//! Ontologies: named registries of schemas.
//!
//! An [`Ontology`] maps type names (case-insensitively) to
//! [`ObjectSchema`]s and Rust types to the schema describing them. Type names
//! that are not defined locally are looked up in the base ontologies, in
//! the order they were given; bases are shared through `Arc`, so composing
//! ontologies never copies a schema.
//!
//! Ontologies are populated through `&mut self` during setup and then
//! shared read-only, typically as `Arc<Ontology>`.

pub mod basic;
mod introspect;

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

pub use introspect::{Introspector, SerdeIntrospector};

use crate::abs::AbsObject;
use crate::error::{OntologyError, OntologyResult};
use crate::schema::ObjectSchema;

/// A named set of schemas, optionally backed by base ontologies.
#[derive(Debug, Clone)]
pub struct Ontology {
    name: String,
    schemas: HashMap<String, ObjectSchema>,
    order: Vec<String>,
    classes: HashMap<TypeId, String>,
    bases: Vec<Arc<Ontology>>,
    introspector: Arc<dyn Introspector>,
}

impl Ontology {
    /// An empty ontology with no bases.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schemas: HashMap::new(),
            order: Vec::new(),
            classes: HashMap::new(),
            bases: Vec::new(),
            introspector: Arc::new(SerdeIntrospector),
        }
    }

    /// An ontology backed by `bases`, probed in order for types it does
    /// not define itself.
    pub fn compose(name: impl Into<String>, bases: impl IntoIterator<Item = Arc<Self>>) -> Self {
        let mut onto = Self::new(name);
        onto.bases = bases.into_iter().collect();
        onto
    }

    /// An ontology extending the shared basic ontology.
    pub fn with_basic(name: impl Into<String>) -> Self {
        Self::compose(name, [basic::basic_ontology()])
    }

    /// Replace the introspector used by [`Self::from_object`] and
    /// [`Self::to_object`].
    #[must_use]
    pub fn with_introspector(mut self, introspector: Arc<dyn Introspector>) -> Self {
        self.introspector = introspector;
        self
    }

    /// The ontology name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base ontologies, in lookup order.
    pub fn bases(&self) -> &[Arc<Self>] {
        &self.bases
    }

    /// Register a schema.
    ///
    /// Aggregate types referenced by the schema's aggregate slots are
    /// registered too when the ontology chain does not know them yet.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::DuplicateSchema`] if a schema with the same
    /// type name is already defined locally.
    pub fn add(&mut self, schema: ObjectSchema) -> OntologyResult<()> {
        if self.schemas.contains_key(&key(schema.type_name())) {
            return Err(OntologyError::DuplicateSchema {
                type_name: schema.type_name().to_owned(),
                ontology: self.name.clone(),
            });
        }
        trace!(ontology = %self.name, schema = %schema.type_name(), kind = %schema.kind(), "adding schema");
        self.insert(schema);
        Ok(())
    }

    /// Register a schema together with the Rust type it describes.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::DuplicateSchema`] if a schema with the same
    /// type name is already defined locally.
    pub fn add_class<T: 'static>(&mut self, schema: ObjectSchema) -> OntologyResult<()> {
        let type_name = schema.type_name().to_owned();
        self.add(schema)?;
        self.bind_class::<T>(&type_name);
        Ok(())
    }

    /// Associate a Rust type with a schema already known to the chain.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::SchemaNotFound`] if no schema has that type
    /// name.
    pub fn register_class<T: 'static>(&mut self, type_name: &str) -> OntologyResult<()> {
        self.schema(type_name)?;
        self.bind_class::<T>(type_name);
        Ok(())
    }

    pub(crate) fn insert(&mut self, mut schema: ObjectSchema) {
        for aggregate in schema.take_pending_aggregates() {
            if self.find_schema(&aggregate).is_none() && !aggregate.eq_ignore_ascii_case(schema.type_name()) {
                debug!(ontology = %self.name, aggregate = %aggregate, "registering aggregate type");
                self.insert(ObjectSchema::aggregate(aggregate));
            }
        }
        let type_name = schema.type_name().to_owned();
        if self.schemas.insert(key(&type_name), schema).is_none() {
            self.order.push(type_name);
        }
    }

    pub(crate) fn bind_class<T: 'static>(&mut self, type_name: &str) {
        self.classes.insert(TypeId::of::<T>(), type_name.to_owned());
    }

    /// Schema for a type name, searching local schemas first and then the
    /// bases in order.
    pub fn find_schema(&self, type_name: &str) -> Option<&ObjectSchema> {
        self.schemas
            .get(&key(type_name))
            .or_else(|| self.bases.iter().find_map(|base| base.find_schema(type_name)))
    }

    /// Schema for a type name.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::SchemaNotFound`] if neither this ontology
    /// nor any base defines the type.
    pub fn schema(&self, type_name: &str) -> OntologyResult<&ObjectSchema> {
        self.find_schema(type_name)
            .ok_or_else(|| OntologyError::SchemaNotFound {
                type_name: type_name.to_owned(),
                ontology: self.name.clone(),
            })
    }

    /// Schema registered for the Rust type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::ClassNotRegistered`] if no ontology in the
    /// chain associates a schema with `T`.
    pub fn schema_for<T: 'static>(&self) -> OntologyResult<&ObjectSchema> {
        self.class_type_name(TypeId::of::<T>())
            .and_then(|name| self.find_schema(name))
            .ok_or_else(|| OntologyError::ClassNotRegistered {
                class: type_name::<T>().to_owned(),
                ontology: self.name.clone(),
            })
    }

    fn class_type_name(&self, id: TypeId) -> Option<&str> {
        self.classes
            .get(&id)
            .map(String::as_str)
            .or_else(|| self.bases.iter().find_map(|base| base.class_type_name(id)))
    }

    /// Whether the type name is known anywhere in the chain.
    pub fn contains(&self, type_name: &str) -> bool {
        self.find_schema(type_name).is_some()
    }

    /// Whether the type name is defined by this ontology itself.
    pub fn contains_local(&self, type_name: &str) -> bool {
        self.schemas.contains_key(&key(type_name))
    }

    /// Locally defined type names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Validate a value against the schema of its own type.
    ///
    /// # Errors
    ///
    /// Returns the [`OntologyError`] raised by
    /// [`ObjectSchema::validate`], or [`OntologyError::SchemaNotFound`].
    pub fn validate(&self, abs: &AbsObject) -> OntologyResult<()> {
        self.schema(abs.type_name())?.validate(abs, self)
    }

    /// Convert an application value into abstract content.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::ClassNotRegistered`] if `T` has no schema,
    /// or [`OntologyError::Introspection`] if the value does not fit it.
    pub fn from_object<T: Serialize + 'static>(&self, value: &T) -> OntologyResult<AbsObject> {
        let schema = self.schema_for::<T>()?;
        let json = serde_json::to_value(value).map_err(|e| OntologyError::Introspection {
            type_name: type_name::<T>().to_owned(),
            reason: e.to_string(),
        })?;
        self.introspector.externalise(&json, schema, self)
    }

    /// Convert abstract content into an application value.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::ClassNotRegistered`] if `T` has no schema,
    /// or [`OntologyError::Introspection`] if the content cannot be turned
    /// into a `T`.
    pub fn to_object<T: DeserializeOwned + 'static>(&self, abs: &AbsObject) -> OntologyResult<T> {
        let schema = self.schema_for::<T>()?;
        let json = self.introspector.internalise(abs, schema, self)?;
        serde_json::from_value(json).map_err(|e| OntologyError::Introspection {
            type_name: type_name::<T>().to_owned(),
            reason: e.to_string(),
        })
    }
}

fn key(type_name: &str) -> String {
    type_name.to_ascii_lowercase()
}
