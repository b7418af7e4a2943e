use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{BrokerError, BrokerResult};
use crate::request::{Operation, Request, Response};

/// Static description of a path a backend serves.
#[derive(Debug, Clone)]
pub struct PathDescriptor {
    pub pattern: &'static str,
    pub operations: &'static [Operation],
    pub help_synopsis: &'static str,
    pub help_description: &'static str,
}

impl PathDescriptor {
    pub fn supports(&self, operation: Operation) -> bool {
        operation == Operation::Help || self.operations.contains(&operation)
    }

    /// Help text as returned to callers: synopsis, blank line, description.
    pub fn help_text(&self) -> String {
        format!(
            "{}\n\n{}",
            self.help_synopsis.trim(),
            self.help_description.trim()
        )
    }

    pub fn help_response(&self) -> Response {
        let mut data = Map::new();
        data.insert("help".into(), Value::String(self.help_text()));
        Response::with_data(data)
    }
}

/// A mounted backend that answers requests for the paths it owns.
#[async_trait]
pub trait LogicalBackend: Send + Sync {
    fn name(&self) -> &str;

    fn paths(&self) -> &[PathDescriptor];

    /// Handle a request. `Ok(None)` means "nothing to return" (e.g. a read of
    /// unset configuration); user mistakes come back as an error [`Response`].
    async fn handle_request(&self, req: &Request) -> BrokerResult<Option<Response>>;

    /// Find the descriptor for `req.path` and check the operation against it.
    fn route(&self, req: &Request) -> BrokerResult<&PathDescriptor> {
        let path = req.path.trim_matches('/');
        let descriptor = self
            .paths()
            .iter()
            .find(|p| p.pattern == path)
            .ok_or_else(|| BrokerError::UnsupportedPath(path.to_string()))?;

        if !descriptor.supports(req.operation) {
            return Err(BrokerError::UnsupportedOperation {
                path: path.to_string(),
                operation: req.operation,
            });
        }
        Ok(descriptor)
    }
}
