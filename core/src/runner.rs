use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::form::{validate_required, ValidationError};
use crate::registry::{Registry, ToolDescriptor};
use crate::webhook::{WebhookClient, WebhookError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Tool not found")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Upstream(#[from] WebhookError),
    #[error("{0}")]
    Unexpected(String),
}

/// Resolves a tool, checks its required inputs and forwards the payload to
/// the tool's webhook.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    registry: Arc<Registry>,
    webhook: WebhookClient,
}

impl ToolRunner {
    pub fn new(registry: Arc<Registry>, webhook: WebhookClient) -> Self {
        Self { registry, webhook }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn tool(&self, id: &str) -> Result<&ToolDescriptor, RunError> {
        self.registry.get(id).ok_or(RunError::NotFound)
    }

    /// Runs a tool from a raw request body. The tool lookup happens before
    /// the body is parsed, so unknown ids are reported as such whatever the
    /// payload looks like.
    pub async fn run_raw(&self, id: &str, body: &[u8]) -> Result<Value, RunError> {
        let tool = self.tool(id)?;
        let payload: Value =
            serde_json::from_slice(body).map_err(|e| RunError::Unexpected(e.to_string()))?;
        self.dispatch(tool, &payload).await
    }

    pub async fn run(&self, id: &str, payload: &Value) -> Result<Value, RunError> {
        let tool = self.tool(id)?;
        self.dispatch(tool, payload).await
    }

    async fn dispatch(&self, tool: &ToolDescriptor, payload: &Value) -> Result<Value, RunError> {
        if let Err(e) = validate_required(tool, payload) {
            warn!("Rejected run of '{}': {}", tool.id, e);
            return Err(e.into());
        }

        info!("Running tool '{}'", tool.id);
        let data = self.webhook.call(&tool.webhook_url, payload).await?;
        info!("Tool '{}' completed", tool.id);
        Ok(data)
    }
}
