use std::fmt;

#[derive(Debug)]
pub enum BridgeError {
    /// HTTP request could not be sent or the connection failed
    Http { endpoint: String, source: reqwest::Error },

    /// No response within the per-request timeout
    Timeout { endpoint: String, timeout_ms: u64 },

    /// Server answered with a non-success status code
    Status { endpoint: String, status: u16 },

    /// Response body was not the expected JSON
    JsonParse { context: String, source: serde_json::Error },

    /// Request could not be encoded
    JsonSerialize { context: String, source: serde_json::Error },

    /// Response parsed but its shape does not match the request
    Protocol(String),

    /// No element with this id on the page
    UnknownElement(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Http { endpoint, source } => {
                write!(f, "HTTP request to {} failed: {}", endpoint, source)
            }
            BridgeError::Timeout { endpoint, timeout_ms } => {
                write!(f, "Request to {} timed out after {} ms", endpoint, timeout_ms)
            }
            BridgeError::Status { endpoint, status } => {
                write!(f, "{} answered with status {}", endpoint, status)
            }
            BridgeError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            BridgeError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            BridgeError::Protocol(msg) => {
                write!(f, "Protocol mismatch: {}", msg)
            }
            BridgeError::UnknownElement(id) => {
                write!(f, "Element '{}' not found on page", id)
            }
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Http { source, .. } => Some(source),
            BridgeError::JsonParse { source, .. } => Some(source),
            BridgeError::JsonSerialize { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl BridgeError {
    /// Short label used in trace events.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::Http { .. } => "http",
            BridgeError::Timeout { .. } => "timeout",
            BridgeError::Status { .. } => "status",
            BridgeError::JsonParse { .. } => "json_parse",
            BridgeError::JsonSerialize { .. } => "json_serialize",
            BridgeError::Protocol(_) => "protocol",
            BridgeError::UnknownElement(_) => "unknown_element",
        }
    }
}
