/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1_2::datetime;
use crate::v1_2::entities::DATE_TIME;
use crate::v1_2::errors::{SchemaViolation, ZenfolioError};
use crate::v1_2::registry::{SchemaRegistry, TypeSchema};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Key carrying the type tag of an object on the wire
pub const TYPE_KEY: &str = "$type";

/// Name to value mapping used for object sources and opaque (untagged) objects
pub type FieldMap = BTreeMap<String, ObjectValue>;

/// A value inside an object graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ObjectValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// Held by the `Value` field of `DateTime` objects
    Timestamp(NaiveDateTime),
    List(Vec<ObjectValue>),
    /// Mapping whose type tag is missing or not registered
    Map(FieldMap),
    Object(TypedObject),
}

impl ObjectValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ObjectValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ObjectValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ObjectValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ObjectValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ObjectValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&NaiveDateTime> {
        match self {
            ObjectValue::Timestamp(ts) => Some(ts),
            ObjectValue::Object(obj) if obj.tag() == DATE_TIME => obj.timestamp(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ObjectValue]> {
        match self {
            ObjectValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<ObjectValue>> {
        match self {
            ObjectValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&FieldMap> {
        match self {
            ObjectValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&TypedObject> {
        match self {
            ObjectValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut TypedObject> {
        match self {
            ObjectValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Unwraps a typed object of the expected kind (or one inheriting from it)
    pub fn into_object(self, expected: &str) -> Result<TypedObject, ZenfolioError> {
        match self {
            ObjectValue::Object(obj) if obj.is_kind_of(expected) => Ok(obj),
            ObjectValue::Object(obj) => Err(ZenfolioError::type_mismatch(expected, obj.tag())),
            ObjectValue::Null => Err(ZenfolioError::ResponseMissing),
            other => Err(ZenfolioError::type_mismatch(expected, other.kind())),
        }
    }

    /// Short description of the variant, used in error messages
    pub fn kind(&self) -> &str {
        match self {
            ObjectValue::Null => "null",
            ObjectValue::Bool(_) => "bool",
            ObjectValue::Number(_) => "number",
            ObjectValue::String(_) => "string",
            ObjectValue::Timestamp(_) => "timestamp",
            ObjectValue::List(_) => "list",
            ObjectValue::Map(_) => "mapping",
            ObjectValue::Object(obj) => obj.tag(),
        }
    }
}

impl From<bool> for ObjectValue {
    fn from(v: bool) -> Self {
        ObjectValue::Bool(v)
    }
}

impl From<i64> for ObjectValue {
    fn from(v: i64) -> Self {
        ObjectValue::Number(v.into())
    }
}

impl From<i32> for ObjectValue {
    fn from(v: i32) -> Self {
        ObjectValue::Number(v.into())
    }
}

impl From<u32> for ObjectValue {
    fn from(v: u32) -> Self {
        ObjectValue::Number(v.into())
    }
}

impl From<u64> for ObjectValue {
    fn from(v: u64) -> Self {
        ObjectValue::Number(v.into())
    }
}

impl From<f64> for ObjectValue {
    fn from(v: f64) -> Self {
        serde_json::Number::from_f64(v).map_or(ObjectValue::Null, ObjectValue::Number)
    }
}

impl From<&str> for ObjectValue {
    fn from(v: &str) -> Self {
        ObjectValue::String(v.to_string())
    }
}

impl From<String> for ObjectValue {
    fn from(v: String) -> Self {
        ObjectValue::String(v)
    }
}

impl From<NaiveDateTime> for ObjectValue {
    fn from(v: NaiveDateTime) -> Self {
        ObjectValue::Timestamp(v)
    }
}

impl From<TypedObject> for ObjectValue {
    fn from(v: TypedObject) -> Self {
        ObjectValue::Object(v)
    }
}

impl From<FieldMap> for ObjectValue {
    fn from(v: FieldMap) -> Self {
        ObjectValue::Map(v)
    }
}

impl<V: Into<ObjectValue>> From<Vec<V>> for ObjectValue {
    fn from(v: Vec<V>) -> Self {
        ObjectValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<ObjectValue>> From<Option<V>> for ObjectValue {
    fn from(v: Option<V>) -> Self {
        v.map_or(ObjectValue::Null, Into::into)
    }
}

impl std::fmt::Display for ObjectValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ObjectValue::String(s) => write!(f, "{}", s),
            ObjectValue::Timestamp(ts) => write!(f, "{}", datetime::format_timestamp(ts)),
            ObjectValue::Object(obj) => write!(f, "{}", obj),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

/// One entity instance whose fields are restricted to its tag's effective schema.
///
/// Every schema field is always present; unset fields hold [`ObjectValue::Null`]. The object
/// remembers the registry it was built against.
#[derive(Clone)]
pub struct TypedObject {
    registry: SchemaRegistry,
    schema: Arc<TypeSchema>,
    values: Vec<ObjectValue>,
}

impl TypedObject {
    /// Creates an object of a globally registered kind with every field unset
    pub fn new(tag: &str) -> Result<Self, ZenfolioError> {
        Self::from_sources(tag, [])
    }

    /// Creates an object of a globally registered kind from field maps, later maps overriding
    /// earlier ones. See [`SchemaRegistry::object`].
    pub fn from_sources<I>(tag: &str, sources: I) -> Result<Self, ZenfolioError>
    where
        I: IntoIterator<Item = FieldMap>,
    {
        SchemaRegistry::global().object(tag, sources)
    }

    /// Creates an object of a globally registered kind from a JSON mapping. See
    /// [`SchemaRegistry::object_from_json`].
    pub fn from_json(tag: &str, value: &Value) -> Result<Self, ZenfolioError> {
        SchemaRegistry::global().object_from_json(tag, value)
    }

    pub(crate) fn from_schema<I>(
        registry: &SchemaRegistry,
        schema: Arc<TypeSchema>,
        sources: I,
        violations: &mut Vec<SchemaViolation>,
    ) -> Result<Self, ZenfolioError>
    where
        I: IntoIterator<Item = FieldMap>,
    {
        let mut merged = FieldMap::new();
        for mut source in sources {
            if let Some(declared) = source.remove(TYPE_KEY) {
                let found = declared.as_str().unwrap_or(declared.kind());
                if found != schema.tag() {
                    return Err(ZenfolioError::type_mismatch(schema.tag(), found));
                }
            }
            merged.extend(source);
        }

        let values = schema
            .effective_fields()
            .iter()
            .map(|field| merged.remove(field).unwrap_or_default())
            .collect();

        if !merged.is_empty() {
            let violation = SchemaViolation {
                tag: schema.tag().to_string(),
                fields: merged.into_keys().collect(),
            };
            log::warn!("{}", violation);
            violations.push(violation);
        }

        let mut obj = Self {
            registry: registry.clone(),
            schema,
            values,
        };
        if obj.tag() == DATE_TIME {
            obj.normalize_timestamp()?;
        }
        Ok(obj)
    }

    fn normalize_timestamp(&mut self) -> Result<(), ZenfolioError> {
        let idx = self.index_of(datetime::VALUE_FIELD)?;
        let value = std::mem::take(&mut self.values[idx]);
        self.values[idx] = datetime::coerce(value)?;
        Ok(())
    }

    pub fn tag(&self) -> &str {
        self.schema.tag()
    }

    pub fn schema(&self) -> &TypeSchema {
        &self.schema
    }

    /// Registry this object was built against
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// True when this object's tag is `ancestor` or inherits from it
    pub fn is_kind_of(&self, ancestor: &str) -> bool {
        self.tag() == ancestor || self.registry.is_kind_of(self.tag(), ancestor)
    }

    pub(crate) fn index_of(&self, field: &str) -> Result<usize, ZenfolioError> {
        self.schema
            .position(field)
            .ok_or_else(|| ZenfolioError::unknown_field(self.tag(), field))
    }

    pub fn get(&self, field: &str) -> Result<&ObjectValue, ZenfolioError> {
        Ok(&self.values[self.index_of(field)?])
    }

    pub fn get_mut(&mut self, field: &str) -> Result<&mut ObjectValue, ZenfolioError> {
        let idx = self.index_of(field)?;
        Ok(&mut self.values[idx])
    }

    pub fn set(&mut self, field: &str, value: impl Into<ObjectValue>) -> Result<(), ZenfolioError> {
        let idx = self.index_of(field)?;
        self.store(idx, value.into())
    }

    /// Sets the field only when it currently has no value. Returns whether it was set.
    pub fn set_if_unset(
        &mut self,
        field: &str,
        value: impl Into<ObjectValue>,
    ) -> Result<bool, ZenfolioError> {
        let idx = self.index_of(field)?;
        if !self.values[idx].is_null() {
            return Ok(false);
        }
        self.store(idx, value.into())?;
        Ok(true)
    }

    pub(crate) fn store(&mut self, idx: usize, value: ObjectValue) -> Result<(), ZenfolioError> {
        self.values[idx] = if self.tag() == DATE_TIME {
            datetime::coerce(value)?
        } else {
            value
        };
        Ok(())
    }

    pub(crate) fn value_at(&self, idx: usize) -> &ObjectValue {
        &self.values[idx]
    }

    /// Field names and values in schema order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ObjectValue)> {
        self.schema
            .effective_fields()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Value of the `Id` field
    pub fn id(&self) -> Result<i64, ZenfolioError> {
        self.get("Id")?
            .as_i64()
            .ok_or_else(|| ZenfolioError::MissingField {
                tag: self.tag().to_string(),
                field: "Id".to_string(),
            })
    }

    pub fn title(&self) -> Option<&str> {
        self.get("Title").ok().and_then(ObjectValue::as_str)
    }

    pub fn views(&self) -> Option<i64> {
        self.get("Views").ok().and_then(ObjectValue::as_i64)
    }

    /// Timestamp held by a `DateTime` object
    pub fn timestamp(&self) -> Option<&NaiveDateTime> {
        match self.get(datetime::VALUE_FIELD) {
            Ok(ObjectValue::Timestamp(ts)) if self.tag() == DATE_TIME => Some(ts),
            _ => None,
        }
    }
}

impl PartialEq for TypedObject {
    fn eq(&self, other: &Self) -> bool {
        self.tag() == other.tag() && self.values == other.values
    }
}

impl std::fmt::Debug for TypedObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dbg = f.debug_struct("TypedObject");
        dbg.field(TYPE_KEY, &self.tag());
        for (name, value) in self.fields().filter(|(_, v)| !v.is_null()) {
            dbg.field(name, value);
        }
        dbg.finish()
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
