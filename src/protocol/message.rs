use serde::{Deserialize, Serialize};

/// Version marker sent with every request.
pub const PROTOCOL_VERSION: &str = "1";

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarRef {
    pub var: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarValue {
    pub var: String,
    pub val: String,
}

/// `{"version":"1","read":[{"var":"..."}, ...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRequest {
    pub version: String,
    pub read: Vec<VarRef>,
}

impl ReadRequest {
    pub fn new<I, S>(variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            read: variables
                .into_iter()
                .map(|v| VarRef { var: v.into() })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.read.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read.is_empty()
    }
}

/// `{"version":"1","write":[{"var":"...","val":"..."}]}`
///
/// The sync engine always sends exactly one pair per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRequest {
    pub version: String,
    pub write: Vec<VarValue>,
}

impl WriteRequest {
    pub fn single(variable: &str, value: &str) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            write: vec![VarValue {
                var: variable.to_string(),
                val: value.to_string(),
            }],
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReadEntry {
    pub val: String,
}

/// Read response. The server also echoes `version` and each `var`; those are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReadResponse {
    #[serde(default)]
    pub read: Option<Vec<ReadEntry>>,
}

impl ReadResponse {
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            read: Some(
                values
                    .into_iter()
                    .map(|v| ReadEntry { val: v.into() })
                    .collect(),
            ),
        }
    }

    /// Values in request order, only if the response carries exactly
    /// `expected` entries. Anything else is a shape mismatch.
    pub fn values_for(&self, expected: usize) -> Option<Vec<&str>> {
        let entries = self.read.as_ref()?;
        if entries.len() != expected {
            return None;
        }
        Some(entries.iter().map(|e| e.val.as_str()).collect())
    }
}

/// Echo returned for a write. Not interpreted by the sync engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WriteAck {
    #[serde(default)]
    pub write: Option<Vec<VarValue>>,
}

impl WriteAck {
    pub fn value_of(&self, variable: &str) -> Option<&str> {
        self.write
            .as_ref()?
            .iter()
            .find(|v| v.var == variable)
            .map(|v| v.val.as_str())
    }
}
