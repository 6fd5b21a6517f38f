/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1_2::errors::ZenfolioError;
use crate::v1_2::object::{ObjectValue, TYPE_KEY, TypedObject, json_kind};
use serde_json::Value;
use std::borrow::Cow;

/// Data merged into an existing object
#[derive(Debug, Clone, Copy)]
pub enum MergeSource<'a> {
    Object(&'a TypedObject),
    Json(&'a Value),
}

impl<'a> From<&'a TypedObject> for MergeSource<'a> {
    fn from(v: &'a TypedObject) -> Self {
        MergeSource::Object(v)
    }
}

impl<'a> From<&'a Value> for MergeSource<'a> {
    fn from(v: &'a Value) -> Self {
        MergeSource::Json(v)
    }
}

enum Strategy {
    Nested,
    Positional,
    Replace,
}

impl TypedObject {
    /// Updates this object in place from a partial source.
    ///
    /// Nested objects are merged recursively rather than replaced so references to them stay
    /// valid. Lists of objects are merged position by position when the source is a list of
    /// mappings; a shorter source leaves the trailing elements untouched. Anything else is
    /// replaced by the source value, built against this object's registry.
    ///
    /// The merge is all or nothing: on error the object is left as it was.
    pub fn merge<'a>(&mut self, source: impl Into<MergeSource<'a>>) -> Result<(), ZenfolioError> {
        let source = match source.into() {
            MergeSource::Object(obj) => Cow::Owned(obj.to_json()),
            MergeSource::Json(value) => Cow::Borrowed(value),
        };
        // Tried on a copy first so nested objects are only touched once it is known to succeed
        self.clone().merge_json(&source)?;
        self.merge_json(&source)
    }

    fn merge_json(&mut self, source: &Value) -> Result<(), ZenfolioError> {
        let Value::Object(map) = source else {
            return Err(ZenfolioError::type_mismatch(self.tag(), json_kind(source)));
        };
        if let Some(declared) = map.get(TYPE_KEY) {
            let found = declared.as_str().unwrap_or(json_kind(declared));
            if found != self.tag() {
                return Err(ZenfolioError::type_mismatch(self.tag(), found));
            }
        }

        for (key, incoming) in map.iter().filter(|(k, _)| *k != TYPE_KEY) {
            match self.schema().position(key) {
                Some(idx) => self.merge_field(idx, key, incoming)?,
                None => log::warn!("Dropping field {} while merging into {}", key, self.tag()),
            }
        }
        Ok(())
    }

    fn merge_field(&mut self, idx: usize, key: &str, incoming: &Value) -> Result<(), ZenfolioError> {
        let strategy = match (self.value_at(idx), incoming) {
            (ObjectValue::Object(_), _) => Strategy::Nested,
            (ObjectValue::List(items), Value::Array(sources))
                if matches!(items.first(), Some(ObjectValue::Object(_)))
                    && sources.iter().all(Value::is_object) =>
            {
                Strategy::Positional
            }
            _ => Strategy::Replace,
        };

        match strategy {
            Strategy::Nested => {
                if incoming.is_null() {
                    return Ok(());
                }
                if !incoming.is_object() {
                    return Err(ZenfolioError::MergeMismatch {
                        tag: self.tag().to_string(),
                        field: key.to_string(),
                    });
                }
                if let Ok(ObjectValue::Object(nested)) = self.get_mut(key) {
                    nested.merge_json(incoming)?;
                }
                Ok(())
            }
            Strategy::Positional => {
                let registry = self.registry().clone();
                let sources = incoming.as_array().map(Vec::as_slice).unwrap_or_default();
                if let Ok(ObjectValue::List(items)) = self.get_mut(key) {
                    // Source elements past the end of the list are ignored
                    for (item, source) in items.iter_mut().zip(sources) {
                        match item {
                            ObjectValue::Object(obj) => obj.merge_json(source)?,
                            other => *other = registry.build(source)?,
                        }
                    }
                }
                Ok(())
            }
            Strategy::Replace => {
                let built = self.registry().build(incoming)?;
                self.store(idx, built)
            }
        }
    }
}
