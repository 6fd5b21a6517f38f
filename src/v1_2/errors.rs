/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use std::io;
use thiserror::Error;

/// Error conditions that can be returned
#[derive(Error, Debug)]
pub enum ZenfolioError {
    #[error("I/O error")]
    Io(#[from] io::Error),

    #[error("Request network error")]
    Request(#[from] reqwest::Error),

    #[error("Deserialization error")]
    Deserialization(#[from] serde_json::Error),

    #[error("URL Parse error")]
    UrlParsing(#[from] url::ParseError),

    #[error("Type tag is not registered: {0}")]
    UnknownTag(String),

    #[error("Type tag is already registered: {0}")]
    DuplicateTag(String),

    #[error("Field {field} is declared more than once in the schema for {tag}")]
    FieldRedefinition { tag: String, field: String },

    #[error("Registry is sealed, can not register: {0}")]
    RegistrySealed(String),

    #[error("Type mismatch. Expected: {expected} found: {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("No field {field} in type {tag}")]
    UnknownField { tag: String, field: String },

    #[error("Field {field} in type {tag} has no value")]
    MissingField { tag: String, field: String },

    #[error("Can not merge a non object value into {tag}.{field}")]
    MergeMismatch { tag: String, field: String },

    #[error("Invalid date/time value: {0}")]
    DateTimeParse(String),

    #[error("HTTP transport failed with status {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("API call returned error: {code:?}, msg: {message}")]
    RemoteCall {
        code: Option<String>,
        message: String,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Photoset is not a gallery: {0}")]
    NotAGallery(String),

    #[error("Call requires an authenticated session")]
    NotAuthenticated,

    #[error("Expected response missing")]
    ResponseMissing,

    #[error("Concurrent task failed: {0}")]
    TaskFailed(String),
}

impl ZenfolioError {
    pub(crate) fn unknown_field(tag: &str, field: &str) -> Self {
        ZenfolioError::UnknownField {
            tag: tag.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn type_mismatch(expected: &str, found: &str) -> Self {
        ZenfolioError::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Keys dropped while constructing a typed object because its schema does not declare them.
///
/// This is recoverable: the object is still built and the violation is logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub tag: String,
    pub fields: Vec<String>,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "No fields {:?} in type {}", self.fields, self.tag)
    }
}
