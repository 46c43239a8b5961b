// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Name-keyed tool registry with validated dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use concierge_core::ConciergeError;

use crate::schema::validate_arguments;
use crate::tool::Tool;

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name. Re-registering a name replaces
    /// the previous tool.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool definitions in the provider's function-calling format, sorted by
    /// name for a stable prompt.
    pub fn definitions(&self) -> Vec<serde_json::Value> {
        let mut names: Vec<&String> = self.tools.keys().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| {
                let tool = &self.tools[name];
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name(),
                        "description": tool.description(),
                        "parameters": tool.parameters_schema(),
                    }
                })
            })
            .collect()
    }

    /// Validate arguments against the tool's schema, then invoke it.
    ///
    /// Validation failures are returned locally without touching the worker
    /// or the store. Unknown tool names are `NotFound`.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ConciergeError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ConciergeError::not_found(format!("tool {name}")))?;
        validate_arguments(&tool.parameters_schema(), &arguments)?;
        debug!(tool = name, "dispatching tool call");
        tool.invoke(arguments).await
    }
}
