/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1_2::datetime::format_timestamp;
use crate::v1_2::object::{ObjectValue, TYPE_KEY, TypedObject};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

impl TypedObject {
    /// Wire representation: `$type` plus every field that has a value
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(TYPE_KEY.to_string(), Value::String(self.tag().to_string()));
        for (name, value) in self.fields().filter(|(_, v)| !v.is_null()) {
            map.insert(name.to_string(), value.to_json());
        }
        Value::Object(map)
    }
}

impl ObjectValue {
    pub fn to_json(&self) -> Value {
        match self {
            ObjectValue::Null => Value::Null,
            ObjectValue::Bool(b) => Value::Bool(*b),
            ObjectValue::Number(n) => Value::Number(n.clone()),
            ObjectValue::String(s) => Value::String(s.clone()),
            ObjectValue::Timestamp(ts) => Value::String(format_timestamp(ts)),
            ObjectValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            ObjectValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            ObjectValue::Object(obj) => obj.to_json(),
        }
    }
}

impl Serialize for TypedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl Serialize for ObjectValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Packs call parameters into the JSON array sent as `params`
pub fn pack_params(params: &[ObjectValue]) -> Vec<Value> {
    params.iter().map(ObjectValue::to_json).collect()
}
