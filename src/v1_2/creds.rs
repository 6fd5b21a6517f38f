/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1_2::errors::ZenfolioError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Login used for authenticated calls.
///
/// Public calls only need the username. The session token obtained from authenticating is held
/// by the client and never stored with the credentials.
#[derive(Serialize, Deserialize, Default, Clone)]
pub struct Credentials {
    username: Option<String>,
    password: Option<String>,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Credentials for accessing a user's public data
    pub fn anonymous(username: &str) -> Self {
        Self {
            username: Some(username.into()),
            password: None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub(crate) fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub(crate) fn require_username(&self) -> Result<&str, ZenfolioError> {
        self.username()
            .ok_or_else(|| ZenfolioError::InvalidParameter("username is required".to_string()))
    }

    pub(crate) fn require_password(&self) -> Result<&str, ZenfolioError> {
        self.password()
            .ok_or_else(|| ZenfolioError::InvalidParameter("password is required".to_string()))
    }

    /// Loads credentials previously written by [`Credentials::save`]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ZenfolioError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ZenfolioError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"xxx")
            .finish()
    }
}
