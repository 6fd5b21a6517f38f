/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1_2::errors::ZenfolioError;
use crate::v1_2::object::ObjectValue;
use serde::Deserialize;
use serde_json::Value;

// Parses an RPC error code that may be sent as a number or a string
pub fn from_code_to_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let code: Option<Value> = Deserialize::deserialize(deserializer)?;
    Ok(match code {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

// Byte arrays (salts, challenges) arrive as lists of numbers
pub fn to_bytes(value: &ObjectValue) -> Result<Vec<u8>, ZenfolioError> {
    value
        .as_list()
        .ok_or(ZenfolioError::ResponseMissing)?
        .iter()
        .map(|b| {
            b.as_i64()
                .and_then(|b| u8::try_from(b).ok())
                .ok_or_else(|| ZenfolioError::InvalidParameter(format!("not a byte: {}", b)))
        })
        .collect()
}
