//! Catalog server records and their credential field declarations.
//!
//! Servers are read-only: the catalog supplies them and the stack workflow
//! only references them. Records are validated on construction and on
//! deserialisation, so downstream code can rely on unique tool names and
//! unique credential field identifiers.

use super::{CredentialFieldId, ServerId, StackDomainError, ToolDescriptor, ToolSelection};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Whether a credential field must be supplied before the server is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialRequirement {
    /// The field gates readiness.
    Required,
    /// The field is optional configuration.
    Optional,
}

impl CredentialRequirement {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
        }
    }
}

impl fmt::Display for CredentialRequirement {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A credential field declared by a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialField {
    field_id: CredentialFieldId,
    display_name: String,
    requirement: CredentialRequirement,
}

impl CredentialField {
    /// Creates a required credential field.
    #[must_use]
    pub fn required(field_id: CredentialFieldId, display_name: impl Into<String>) -> Self {
        Self::new(field_id, display_name, CredentialRequirement::Required)
    }

    /// Creates an optional credential field.
    #[must_use]
    pub fn optional(field_id: CredentialFieldId, display_name: impl Into<String>) -> Self {
        Self::new(field_id, display_name, CredentialRequirement::Optional)
    }

    /// Creates a credential field with an explicit requirement.
    #[must_use]
    pub fn new(
        field_id: CredentialFieldId,
        display_name: impl Into<String>,
        requirement: CredentialRequirement,
    ) -> Self {
        Self {
            field_id,
            display_name: display_name.into().trim().to_owned(),
            requirement,
        }
    }

    /// Returns the field identifier.
    #[must_use]
    pub const fn field_id(&self) -> &CredentialFieldId {
        &self.field_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the requirement flag.
    #[must_use]
    pub const fn requirement(&self) -> CredentialRequirement {
        self.requirement
    }

    /// Returns whether the field gates readiness.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self.requirement, CredentialRequirement::Required)
    }
}

/// A tool server offered by the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawServer")]
pub struct Server {
    server_id: ServerId,
    name: String,
    tools: Vec<ToolDescriptor>,
    credentials: Vec<CredentialField>,
}

#[derive(Deserialize)]
struct RawServer {
    server_id: ServerId,
    name: String,
    #[serde(default)]
    tools: Vec<ToolDescriptor>,
    #[serde(default)]
    credentials: Vec<CredentialField>,
}

impl TryFrom<RawServer> for Server {
    type Error = StackDomainError;

    fn try_from(raw: RawServer) -> Result<Self, Self::Error> {
        Self::new(raw.server_id, raw.name, raw.tools, raw.credentials)
    }
}

impl Server {
    /// Creates a validated server record.
    ///
    /// Tool order is preserved as supplied by the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StackDomainError::DuplicateTool`] or
    /// [`StackDomainError::DuplicateCredentialField`] when a declaration is
    /// repeated.
    pub fn new(
        server_id: ServerId,
        name: impl Into<String>,
        tools: Vec<ToolDescriptor>,
        credentials: Vec<CredentialField>,
    ) -> Result<Self, StackDomainError> {
        let mut seen_tools = HashSet::with_capacity(tools.len());
        for tool in &tools {
            if !seen_tools.insert(tool.name()) {
                return Err(StackDomainError::DuplicateTool {
                    server_id,
                    tool: tool.name().to_owned(),
                });
            }
        }

        let mut seen_fields = HashSet::with_capacity(credentials.len());
        for field in &credentials {
            if !seen_fields.insert(field.field_id()) {
                return Err(StackDomainError::DuplicateCredentialField {
                    server_id,
                    field_id: field.field_id().clone(),
                });
            }
        }

        Ok(Self {
            server_id,
            name: name.into().trim().to_owned(),
            tools,
            credentials,
        })
    }

    /// Returns the server identifier.
    #[must_use]
    pub const fn server_id(&self) -> &ServerId {
        &self.server_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the exposed tools in catalog order.
    #[must_use]
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Returns every declared credential field.
    #[must_use]
    pub fn credentials(&self) -> &[CredentialField] {
        &self.credentials
    }

    /// Iterates over required credential fields.
    pub fn required_credentials(&self) -> impl Iterator<Item = &CredentialField> {
        self.credentials.iter().filter(|field| field.is_required())
    }

    /// Iterates over optional credential fields.
    pub fn optional_credentials(&self) -> impl Iterator<Item = &CredentialField> {
        self.credentials.iter().filter(|field| !field.is_required())
    }

    /// Returns whether the server exposes `tool_name`.
    #[must_use]
    pub fn exposes_tool(&self, tool_name: &str) -> bool {
        self.tools.iter().any(|tool| tool.name() == tool_name)
    }

    /// Returns whether the server declares `field_id`.
    #[must_use]
    pub fn declares_field(&self, field_id: &CredentialFieldId) -> bool {
        self.credentials
            .iter()
            .any(|field| field.field_id() == field_id)
    }

    /// Checks that every named tool is exposed by this server.
    ///
    /// # Errors
    ///
    /// Returns [`StackDomainError::UnknownTool`] for the first name that is not
    /// exposed.
    pub fn ensure_exposes_tools<'a>(
        &self,
        tool_names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), StackDomainError> {
        match tool_names
            .into_iter()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .find(|name| !self.exposes_tool(name))
        {
            Some(unknown) => Err(StackDomainError::UnknownTool {
                server_id: self.server_id.clone(),
                tool: unknown.to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// Checks that every field identifier is declared by this server.
    ///
    /// # Errors
    ///
    /// Returns [`StackDomainError::UnknownCredentialField`] for the first
    /// undeclared field.
    pub fn ensure_declares_fields<'a>(
        &self,
        field_ids: impl IntoIterator<Item = &'a CredentialFieldId>,
    ) -> Result<(), StackDomainError> {
        match field_ids
            .into_iter()
            .find(|field_id| !self.declares_field(field_id))
        {
            Some(unknown) => Err(StackDomainError::UnknownCredentialField {
                server_id: self.server_id.clone(),
                field_id: unknown.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Number of tools a selection enables on this server.
    #[must_use]
    pub fn selected_tool_count(&self, selection: &ToolSelection) -> usize {
        selection.selected_count(self.tools.len())
    }

    /// Iterates over the tools a selection enables, in catalog order.
    pub fn selected_tools<'a>(
        &'a self,
        selection: &'a ToolSelection,
    ) -> impl Iterator<Item = &'a ToolDescriptor> {
        self.tools
            .iter()
            .filter(move |tool| selection.enables(tool.name()))
    }
}
