//! Tool builder and contract for PdfKit

use crate::client::{execute, ConvertOptions};
use crate::config::{Config, ConfigSnapshot, ConfigSource, EnvConfigSource};
use crate::error::ConvertError;
use crate::normalize::{render, ConvertResponse};
use crate::operations::{OperationDescriptor, OperationRegistry};
use crate::types::OperationArgs;
use crate::{TOOL_DESCRIPTION, TOOL_LLMTXT};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Builder for configuring the PdfKit tool
#[derive(Clone, Default)]
pub struct ToolBuilder {
    /// Where credentials come from; environment when unset
    config_source: Option<Arc<dyn ConfigSource>>,
    /// Custom User-Agent
    user_agent: Option<String>,
    /// Per-call deadline
    timeout: Option<Duration>,
    /// Operations to expose; built-ins when unset
    registry: Option<OperationRegistry>,
}

impl ToolBuilder {
    /// Create a new tool builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed config instead of resolving from the environment
    pub fn config(self, config: Config) -> Self {
        self.config_source(config)
    }

    /// Use a custom config source
    pub fn config_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.config_source = Some(Arc::new(source));
        self
    }

    /// Resolve from the environment with a specific settings file
    pub fn config_path(self, path: impl Into<PathBuf>) -> Self {
        self.config_source(EnvConfigSource::with_path(path))
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Bound every call by this deadline
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Expose a custom set of operations
    pub fn registry(mut self, registry: OperationRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the tool
    pub fn build(self) -> Tool {
        Tool {
            config_source: self
                .config_source
                .unwrap_or_else(|| Arc::new(EnvConfigSource::new())),
            registry: self.registry.unwrap_or_default(),
            options: ConvertOptions {
                user_agent: self.user_agent,
                timeout: self.timeout,
            },
        }
    }
}

/// Configured PdfKit tool
///
/// Cheap to clone; holds no per-call state.
#[derive(Clone)]
pub struct Tool {
    config_source: Arc<dyn ConfigSource>,
    registry: OperationRegistry,
    options: ConvertOptions,
}

impl Default for Tool {
    fn default() -> Self {
        ToolBuilder::new().build()
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("operations", &self.registry.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Tool {
    /// Create a new tool builder
    pub fn builder() -> ToolBuilder {
        ToolBuilder::new()
    }

    /// Get tool description
    pub fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    /// Get full documentation (llmtxt)
    pub fn llmtxt(&self) -> &'static str {
        TOOL_LLMTXT
    }

    /// Operations exposed by this tool
    pub fn operations(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.registry.iter()
    }

    /// Look up one operation
    pub fn operation(&self, name: &str) -> Option<&OperationDescriptor> {
        self.registry.get(name)
    }

    /// Input schema of an operation as JSON
    pub fn input_schema(&self, name: &str) -> Option<serde_json::Value> {
        self.registry.get(name).map(|op| op.schema_json())
    }

    /// Current config with the token masked
    pub fn config_snapshot(&self) -> ConfigSnapshot {
        self.config_source.resolve().snapshot()
    }

    /// Current config with the token masked, as pretty JSON
    pub fn config_resource(&self) -> String {
        serde_json::to_string_pretty(&self.config_snapshot()).unwrap_or_default()
    }

    /// Execute an operation, keeping the structured result
    pub async fn call(
        &self,
        name: &str,
        args: &OperationArgs,
    ) -> Result<ConvertResponse, ConvertError> {
        let descriptor = self
            .registry
            .get(name)
            .ok_or_else(|| ConvertError::UnknownOperation(name.to_string()))?;

        let config = self.config_source.resolve();
        execute(descriptor, args, &config, &self.options).await
    }

    /// Execute an operation and flatten the outcome into one string
    ///
    /// Never fails: configuration, transport and HTTP errors all come back
    /// as descriptive text.
    pub async fn invoke(&self, name: &str, args: &OperationArgs) -> String {
        let Some(descriptor) = self.registry.get(name) else {
            return format!("Error: {}", ConvertError::UnknownOperation(name.to_string()));
        };

        debug!(operation = name, "Invoking operation");

        let config = self.config_source.resolve();
        let outcome = execute(descriptor, args, &config, &self.options).await;
        render(descriptor, &outcome)
    }
}
