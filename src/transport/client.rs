use crate::protocol::message::{ReadRequest, WriteRequest};
use crate::transport::error::BridgeError;
use crate::transport::http::Transport;

/// One-shot variable access for scripts and command-line use.
///
/// Unlike the sync engine, errors are returned to the caller.
pub struct WebgateClient<T: Transport> {
    transport: T,
}

impl<T: Transport> WebgateClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Read one variable. Unknown variables come back as an empty string.
    pub fn get_value(&self, variable: &str) -> Result<String, BridgeError> {
        let mut values = self.get_values(&[variable])?;
        values.pop().ok_or_else(|| {
            BridgeError::Protocol(format!("no value returned for '{}'", variable))
        })
    }

    /// Read several variables in one request, in the given order.
    pub fn get_values(&self, variables: &[&str]) -> Result<Vec<String>, BridgeError> {
        let request = ReadRequest::new(variables.iter().copied());
        let response = self.transport.read(&request)?;

        let values = response.values_for(request.len()).ok_or_else(|| {
            BridgeError::Protocol(format!(
                "expected {} read entries, got {}",
                request.len(),
                response.read.as_ref().map(|r| r.len()).unwrap_or(0)
            ))
        })?;

        Ok(values.into_iter().map(str::to_string).collect())
    }

    /// Write one variable and return the value the server now holds.
    pub fn set_value(&self, variable: &str, value: &str) -> Result<String, BridgeError> {
        let request = WriteRequest::single(variable, value);
        let ack = self.transport.write(&request)?;
        Ok(ack.value_of(variable).unwrap_or(value).to_string())
    }
}
