use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::protocol::message::{ReadRequest, ReadResponse, WriteAck, WriteRequest};
use crate::transport::error::BridgeError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/cgi-bin/json.cgi";
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Carries protocol requests to the server.
///
/// Implementations are called from worker threads, never from the loop
/// that owns the page.
pub trait Transport: Send + Sync {
    fn read(&self, request: &ReadRequest) -> Result<ReadResponse, BridgeError>;

    fn write(&self, request: &WriteRequest) -> Result<WriteAck, BridgeError>;
}

// ============================================================================
// HTTP Transport
// ============================================================================

pub struct HttpTransport {
    pub endpoint: String,
    pub timeout_ms: u64,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> Result<Self, BridgeError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT_MS)
    }

    pub fn with_timeout(endpoint: &str, timeout_ms: u64) -> Result<Self, BridgeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| BridgeError::Http {
                endpoint: endpoint.to_string(),
                source: e,
            })?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            timeout_ms,
            client,
        })
    }

    fn post<Req, Resp>(&self, request: &Req, context: &str) -> Result<Resp, BridgeError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_string(request).map_err(|e| BridgeError::JsonSerialize {
            context: context.to_string(),
            source: e,
        })?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Status {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let text = response.text().map_err(|e| self.classify(e))?;

        serde_json::from_str(&text).map_err(|e| BridgeError::JsonParse {
            context: format!("{} response", context),
            source: e,
        })
    }

    fn classify(&self, error: reqwest::Error) -> BridgeError {
        if error.is_timeout() {
            BridgeError::Timeout {
                endpoint: self.endpoint.clone(),
                timeout_ms: self.timeout_ms,
            }
        } else {
            BridgeError::Http {
                endpoint: self.endpoint.clone(),
                source: error,
            }
        }
    }
}

impl Transport for HttpTransport {
    fn read(&self, request: &ReadRequest) -> Result<ReadResponse, BridgeError> {
        self.post(request, "read")
    }

    fn write(&self, request: &WriteRequest) -> Result<WriteAck, BridgeError> {
        // Servers may answer a write with an empty body
        match self.post::<_, WriteAck>(request, "write") {
            Err(BridgeError::JsonParse { .. }) => Ok(WriteAck::default()),
            other => other,
        }
    }
}
