/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1_2::errors::{SchemaViolation, ZenfolioError};
use crate::v1_2::object::{FieldMap, ObjectValue, TYPE_KEY, TypedObject, json_kind};
use crate::v1_2::registry::SchemaRegistry;
use serde_json::Value;

/// Builds an object graph from a JSON payload using the global registry
pub fn build(value: &Value) -> Result<ObjectValue, ZenfolioError> {
    SchemaRegistry::global().build(value)
}

/// Same as [`build`] but also returns the schema violations that were recovered from
pub fn build_with_report(
    value: &Value,
) -> Result<(ObjectValue, Vec<SchemaViolation>), ZenfolioError> {
    SchemaRegistry::global().build_with_report(value)
}

impl SchemaRegistry {
    /// Converts a JSON value into an object graph.
    ///
    /// Lists are built element by element and scalars pass through. A mapping whose `$type` is
    /// registered becomes a [`TypedObject`] once its values are built; any other mapping is kept
    /// as a plain [`ObjectValue::Map`].
    pub fn build(&self, value: &Value) -> Result<ObjectValue, ZenfolioError> {
        self.build_reporting(value, &mut Vec::new())
    }

    pub fn build_with_report(
        &self,
        value: &Value,
    ) -> Result<(ObjectValue, Vec<SchemaViolation>), ZenfolioError> {
        let mut violations = Vec::new();
        let built = self.build_reporting(value, &mut violations)?;
        Ok((built, violations))
    }

    /// Creates an object of a registered kind from field maps, later maps overriding earlier
    /// ones.
    ///
    /// Keys outside the schema are dropped with a warning. A `$type` key in any source must name
    /// this tag.
    pub fn object<I>(&self, tag: &str, sources: I) -> Result<TypedObject, ZenfolioError>
    where
        I: IntoIterator<Item = FieldMap>,
    {
        TypedObject::from_schema(self, self.schema(tag)?, sources, &mut Vec::new())
    }

    /// Creates an object of a registered kind from a JSON mapping, building nested values first
    pub fn object_from_json(&self, tag: &str, value: &Value) -> Result<TypedObject, ZenfolioError> {
        let schema = self.schema(tag)?;
        let Value::Object(map) = value else {
            return Err(ZenfolioError::type_mismatch("mapping", json_kind(value)));
        };
        let mut violations = Vec::new();
        let mut source = FieldMap::new();
        for (key, item) in map {
            source.insert(key.clone(), self.build_reporting(item, &mut violations)?);
        }
        TypedObject::from_schema(self, schema, [source], &mut violations)
    }

    pub(crate) fn build_reporting(
        &self,
        value: &Value,
        violations: &mut Vec<SchemaViolation>,
    ) -> Result<ObjectValue, ZenfolioError> {
        Ok(match value {
            Value::Null => ObjectValue::Null,
            Value::Bool(b) => ObjectValue::Bool(*b),
            Value::Number(n) => ObjectValue::Number(n.clone()),
            Value::String(s) => ObjectValue::String(s.clone()),
            Value::Array(items) => ObjectValue::List(
                items
                    .iter()
                    .map(|item| self.build_reporting(item, violations))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => {
                let mut built = FieldMap::new();
                for (key, item) in map {
                    built.insert(key.clone(), self.build_reporting(item, violations)?);
                }
                match map
                    .get(TYPE_KEY)
                    .and_then(Value::as_str)
                    .and_then(|tag| self.lookup(tag))
                {
                    Some(schema) => {
                        ObjectValue::Object(TypedObject::from_schema(
                        self,
                        schema,
                        [built],
                        violations,
                    )?)
                    }
                    None => ObjectValue::Map(built),
                }
            }
        })
    }
}
