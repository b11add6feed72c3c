use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::transport::error::BridgeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    ReadApplied,
    ReadDiscarded,
    ReadFailed,
    UpdateSuppressed,
    UpdateSkipped,
    WriteSent,
    WriteFailed,
    BusyChanged,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncTraceEvent {
    pub timestamp_ms: u128,
    pub cycle: u64,

    pub kind: TraceKind,

    pub element: Option<String>,
    pub variable: Option<String>,
    pub value: Option<String>,

    pub error: Option<String>,
    pub detail: Option<String>,
}

impl SyncTraceEvent {
    pub fn now(cycle: u64, kind: TraceKind) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            cycle,
            kind,
            element: None,
            variable: None,
            value: None,
            error: None,
            detail: None,
        }
    }

    pub fn with_element(mut self, id: &str) -> Self {
        self.element = Some(id.to_string());
        self
    }

    pub fn with_variable(mut self, variable: &str) -> Self {
        self.variable = Some(variable.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_error(mut self, error: &BridgeError) -> Self {
        self.error = Some(format!("{}: {}", error.kind(), error));
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
