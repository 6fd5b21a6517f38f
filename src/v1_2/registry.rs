/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1_2::entities::register_zenfolio_types;
use crate::v1_2::errors::ZenfolioError;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

/// Field layout for one entity kind.
///
/// The effective fields are the parent chain's fields (root first) followed by the fields this
/// kind declares itself.
#[derive(Debug, PartialEq, Eq)]
pub struct TypeSchema {
    tag: String,
    parent: Option<String>,
    declared: Vec<String>,
    effective: Vec<String>,
}

impl TypeSchema {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Fields declared directly by this kind
    pub fn declared_fields(&self) -> &[String] {
        &self.declared
    }

    /// Inherited and declared fields, parent first
    pub fn effective_fields(&self) -> &[String] {
        &self.effective
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.effective.iter().position(|f| f == field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.position(field).is_some()
    }
}

#[derive(Default)]
struct RegistryState {
    types: HashMap<String, Arc<TypeSchema>>,
    sealed: bool,
}

/// Maps type tags to their field schemas.
///
/// Registration is expected to finish before any concurrent work starts. After that the
/// registry is only read, and [`SchemaRegistry::seal`] can be used to enforce it.
///
/// Cloning is cheap and the clones share the same table. Every object built against a registry
/// keeps such a handle, so later merges and kind checks resolve tags the same way.
#[derive(Default, Clone)]
pub struct SchemaRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl SchemaRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Process wide registry holding every Zenfolio entity kind
    pub fn global() -> &'static SchemaRegistry {
        static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let registry = SchemaRegistry::new();
            if let Err(err) = register_zenfolio_types(&registry) {
                log::error!("Failed registering Zenfolio types: {}", err);
            }
            registry
        })
    }

    /// Adds one entity kind.
    ///
    /// The parent has to be registered first. A field may only be declared once along the
    /// parent chain.
    pub fn register(
        &self,
        tag: &str,
        parent: Option<&str>,
        fields: &[&str],
    ) -> Result<Arc<TypeSchema>, ZenfolioError> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if state.sealed {
            return Err(ZenfolioError::RegistrySealed(tag.to_string()));
        }
        if state.types.contains_key(tag) {
            return Err(ZenfolioError::DuplicateTag(tag.to_string()));
        }

        let mut effective = match parent {
            Some(parent) => state
                .types
                .get(parent)
                .ok_or_else(|| ZenfolioError::UnknownTag(parent.to_string()))?
                .effective
                .clone(),
            None => Vec::new(),
        };
        for field in fields {
            if effective.iter().any(|f| f == field) {
                return Err(ZenfolioError::FieldRedefinition {
                    tag: tag.to_string(),
                    field: field.to_string(),
                });
            }
            effective.push(field.to_string());
        }

        let schema = Arc::new(TypeSchema {
            tag: tag.to_string(),
            parent: parent.map(str::to_string),
            declared: fields.iter().map(|f| f.to_string()).collect(),
            effective,
        });
        state.types.insert(tag.to_string(), schema.clone());
        Ok(schema)
    }

    /// Returns the schema registered for the tag
    pub fn schema(&self, tag: &str) -> Result<Arc<TypeSchema>, ZenfolioError> {
        self.lookup(tag)
            .ok_or_else(|| ZenfolioError::UnknownTag(tag.to_string()))
    }

    pub(crate) fn lookup(&self, tag: &str) -> Option<Arc<TypeSchema>> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.types.get(tag).cloned()
    }

    /// Inherited plus declared fields of the tag, parent first
    pub fn effective_fields(&self, tag: &str) -> Result<Vec<String>, ZenfolioError> {
        Ok(self.schema(tag)?.effective.clone())
    }

    pub fn parent(&self, tag: &str) -> Result<Option<String>, ZenfolioError> {
        Ok(self.schema(tag)?.parent.clone())
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    /// True when `tag` is `ancestor` or inherits from it
    pub fn is_kind_of(&self, tag: &str, ancestor: &str) -> bool {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        let mut current = state.types.get(tag);
        while let Some(schema) = current {
            if schema.tag == ancestor {
                return true;
            }
            current = schema.parent.as_ref().and_then(|p| state.types.get(p));
        }
        false
    }

    /// Rejects any further registration
    pub fn seal(&self) {
        self.state.write().unwrap_or_else(|e| e.into_inner()).sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.state.read().unwrap_or_else(|e| e.into_inner()).sealed
    }

    /// True when both handles share the same table
    pub fn same_as(&self, other: &SchemaRegistry) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        let mut tags: Vec<String> = state.types.keys().cloned().collect();
        tags.sort();
        tags
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("tags", &self.tags())
            .field("sealed", &self.is_sealed())
            .finish()
    }
}
