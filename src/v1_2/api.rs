/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1_2::errors::ZenfolioError;
use crate::v1_2::parsers::from_code_to_string;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

// Root Zenfolio API
pub const API_ORIGIN: &str = "https://www.zenfolio.com";

// JSON-RPC endpoint of API version 1.2
pub const API_PATH: &str = "/api/1.2/zfapi.asmx";

pub const USER_AGENT: &str = concat!("Zenfolio (Rust) Library/", env!("CARGO_PKG_VERSION"));

/// Sends JSON-RPC calls to the service.
///
/// `invoke` returns the raw response body; unpacking the `result`/`error` envelope is done by
/// the caller.
pub trait Transport: Send + Sync + 'static {
    fn invoke(
        &self,
        method: &str,
        params: Vec<Value>,
        auth: Option<&str>,
        secure: bool,
    ) -> impl Future<Output = Result<Value, ZenfolioError>> + Send;

    /// Posts raw photo data to a gallery upload url
    fn upload(
        &self,
        url: &Url,
        data: Bytes,
        auth: &str,
    ) -> impl Future<Output = Result<Value, ZenfolioError>> + Send;
}

/// Directly communicates with the API over HTTP(S).
#[derive(Clone)]
pub struct HttpTransport {
    origin: String,
    https_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_origin(API_ORIGIN)
    }

    /// Uses a different origin than [`API_ORIGIN`]
    pub fn with_origin(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
            https_client: reqwest::Client::new(),
        }
    }

    // Anonymous calls may go over plain HTTP, anything carrying a token never does
    fn endpoint(&self, secure: bool) -> Result<Url, ZenfolioError> {
        let mut url = Url::parse(&self.origin)?.join(API_PATH)?;
        if !secure && url.scheme() == "https" {
            // Only fails for special scheme changes which https -> http is not
            let _ = url.set_scheme("http");
        }
        Ok(url)
    }

    async fn check(resp: reqwest::Response) -> Result<Value, ZenfolioError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ZenfolioError::Transport {
                status: status.as_u16(),
                body,
            });
        }
        match resp.json::<Value>().await {
            Ok(body) => Ok(body),
            Err(err) => {
                log::warn!("Api Malformed Err {:?}", err);
                Err(ZenfolioError::Request(err))
            }
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("origin", &self.origin)
            .finish()
    }
}

impl Transport for HttpTransport {
    async fn invoke(
        &self,
        method: &str,
        params: Vec<Value>,
        auth: Option<&str>,
        secure: bool,
    ) -> Result<Value, ZenfolioError> {
        let req_url = self.endpoint(secure || auth.is_some())?;
        let body = json!({
            "method": method,
            "params": params,
            "id": request_id(),
        });
        log::debug!("Calling {} at {}", method, req_url);

        let mut req = self
            .https_client
            .post(req_url)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .header("X-Zenfolio-User-Agent", USER_AGENT)
            .json(&body);
        if let Some(token) = auth {
            req = req.header("X-Zenfolio-Token", token);
        }
        Self::check(req.send().await?).await
    }

    async fn upload(&self, url: &Url, data: Bytes, auth: &str) -> Result<Value, ZenfolioError> {
        log::debug!("Uploading {} bytes to {}", data.len(), url);
        let resp = self
            .https_client
            .post(url.clone())
            .header("Content-Type", "image/jpeg")
            .header("User-Agent", USER_AGENT)
            .header("X-Zenfolio-User-Agent", USER_AGENT)
            .header("X-Zenfolio-Token", auth)
            .body(data)
            .send()
            .await?;
        Self::check(resp).await
    }
}

fn request_id() -> u16 {
    rand::random::<u16>().max(1)
}

// JSON-RPC response envelope
#[derive(Deserialize, Debug)]
struct ResponseBody {
    #[serde(default)]
    result: Value,

    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize, Debug)]
struct RpcErrorBody {
    #[serde(default, deserialize_with = "from_code_to_string")]
    code: Option<String>,

    #[serde(default)]
    message: Option<String>,
}

/// Returns the `result` of a response, or the `error` as [`ZenfolioError::RemoteCall`]
pub fn unpack_envelope(body: Value) -> Result<Value, ZenfolioError> {
    let body: ResponseBody = serde_json::from_value(body)?;
    match body.error {
        None => Ok(body.result),
        Some(error) => Err(ZenfolioError::RemoteCall {
            code: error.code,
            message: error.message.unwrap_or_default(),
        }),
    }
}
