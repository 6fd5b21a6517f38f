/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use bytes::Bytes;
use serde_json::{Value, json};
use std::sync::Mutex;
use url::Url;
use zenfolio::v1_2::{Credentials, Transport, ZenfolioError};

#[allow(dead_code)]
type Responder = Box<dyn Fn(&str, &[Value]) -> Result<Value, ZenfolioError> + Send + Sync>;

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub method: String,
    pub params: Vec<Value>,
    pub auth: Option<String>,
    pub secure: bool,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub(crate) struct RecordedUpload {
    pub url: String,
    pub size: usize,
    pub auth: String,
}

/// Transport answering from a closure instead of the network
#[allow(dead_code)]
pub(crate) struct MockTransport {
    responder: Responder,
    upload_result: Value,
    pub calls: Mutex<Vec<RecordedCall>>,
    pub uploads: Mutex<Vec<RecordedUpload>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new(
        responder: impl Fn(&str, &[Value]) -> Result<Value, ZenfolioError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            upload_result: Value::Null,
            calls: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_upload_result(mut self, result: Value) -> Self {
        self.upload_result = result;
        self
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.method.clone())
            .collect()
    }
}

impl Transport for MockTransport {
    async fn invoke(
        &self,
        method: &str,
        params: Vec<Value>,
        auth: Option<&str>,
        secure: bool,
    ) -> Result<Value, ZenfolioError> {
        let resp = (self.responder)(method, &params);
        self.calls.lock().unwrap().push(RecordedCall {
            method: method.to_string(),
            params,
            auth: auth.map(str::to_string),
            secure,
        });
        resp
    }

    async fn upload(&self, url: &Url, data: Bytes, auth: &str) -> Result<Value, ZenfolioError> {
        self.uploads.lock().unwrap().push(RecordedUpload {
            url: url.to_string(),
            size: data.len(),
            auth: auth.to_string(),
        });
        Ok(self.upload_result.clone())
    }
}

/// Successful JSON-RPC envelope
#[allow(dead_code)]
pub(crate) fn ok(result: Value) -> Result<Value, ZenfolioError> {
    Ok(json!({"result": result, "error": null, "id": 1}))
}

/// Failed JSON-RPC envelope
#[allow(dead_code)]
pub(crate) fn rpc_error(code: &str, message: &str) -> Result<Value, ZenfolioError> {
    Ok(json!({"result": null, "error": {"code": code, "message": message}, "id": 1}))
}

#[allow(dead_code)]
pub(crate) fn get_live_creds() -> anyhow::Result<Credentials> {
    if let Ok(path) = std::env::var("ZENFOLIO_CREDS_FILE") {
        return Ok(Credentials::from_file(path)?);
    }
    let username = std::env::var("ZENFOLIO_USERNAME")?;
    Ok(match std::env::var("ZENFOLIO_PASSWORD") {
        Ok(password) => Credentials::new(&username, &password),
        Err(_) => Credentials::anonymous(&username),
    })
}
