//! Tool descriptors and per-attachment tool selection.

use super::StackDomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Metadata for a tool exposed by a catalog server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawToolDescriptor")]
pub struct ToolDescriptor {
    name: String,
    description: String,
    input_schema: Value,
}

#[derive(Deserialize)]
struct RawToolDescriptor {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    input_schema: Value,
}

impl TryFrom<RawToolDescriptor> for ToolDescriptor {
    type Error = StackDomainError;

    fn try_from(raw: RawToolDescriptor) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.description, raw.input_schema)
    }
}

impl ToolDescriptor {
    /// Creates a tool descriptor.
    ///
    /// The description may be empty; the name may not.
    ///
    /// # Errors
    ///
    /// Returns [`StackDomainError::EmptyToolName`] when the trimmed name is
    /// empty.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Result<Self, StackDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(StackDomainError::EmptyToolName);
        }

        Ok(Self {
            name: normalized_name,
            description: description.into().trim().to_owned(),
            input_schema,
        })
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the input schema.
    #[must_use]
    pub const fn input_schema(&self) -> &Value {
        &self.input_schema
    }
}

/// Which tools of an attached server are enabled within a stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "tools", rename_all = "snake_case")]
pub enum ToolSelection {
    /// Every tool the server exposes, now or later.
    All,
    /// An explicit subset of tool names.
    Subset(BTreeSet<String>),
}

impl ToolSelection {
    /// Builds a selection from the `enable_all_tools` flag and an optional
    /// list of tool names.
    ///
    /// `enable_all_tools` wins over an explicit list. Names are trimmed and
    /// duplicates collapse.
    #[must_use]
    pub fn from_flags(enable_all_tools: bool, tools: Option<Vec<String>>) -> Self {
        if enable_all_tools {
            return Self::All;
        }

        Self::Subset(
            tools
                .unwrap_or_default()
                .into_iter()
                .map(|tool| tool.trim().to_owned())
                .filter(|tool| !tool.is_empty())
                .collect(),
        )
    }

    /// Returns whether every tool is enabled.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Returns whether `tool_name` is enabled by this selection.
    ///
    /// Does not check that the server actually exposes the tool.
    #[must_use]
    pub fn enables(&self, tool_name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Subset(tools) => tools.contains(tool_name),
        }
    }

    /// Number of tools enabled when applied to a server exposing
    /// `exposed_tools` tools.
    #[must_use]
    pub fn selected_count(&self, exposed_tools: usize) -> usize {
        match self {
            Self::All => exposed_tools,
            Self::Subset(tools) => tools.len(),
        }
    }
}
