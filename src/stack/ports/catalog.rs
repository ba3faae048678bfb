//! Remote catalog port: discovery of servers and persistence of stacks,
//! attachments, and credentials.

use crate::stack::domain::{
    AttachmentSnapshot, CredentialValues, ResourceRef, Server, ServerId, Stack, StackId,
    StackName, ToolDescriptor, ToolSelection,
};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Result type for remote catalog operations.
pub type RemoteCatalogResult<T> = Result<T, RemoteCatalogError>;

/// Request payload for creating a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStack {
    /// Validated stack name.
    pub name: StackName,
    /// Whether usage analytics are collected for the stack.
    pub analytics_enabled: bool,
}

/// Request payload for attaching a server to a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachServerSpec {
    /// Tools enabled by the attachment.
    pub tool_selection: ToolSelection,
}

/// Contract for the hosted catalog behind the stack workflow.
///
/// Implementations own all state. Callers re-fetch on every read and never
/// cache results, so a cancelled call leaves nothing behind locally.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// Lists every server offered by the catalog.
    async fn list_servers(&self) -> RemoteCatalogResult<Vec<Server>>;

    /// Lists every stack owned by the caller.
    async fn list_stacks(&self) -> RemoteCatalogResult<Vec<Stack>>;

    /// Fetches a single stack.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteCatalogError::NotFound`] when the stack does not exist
    /// or was deleted.
    async fn get_stack(&self, stack_id: &StackId) -> RemoteCatalogResult<Stack>;

    /// Lists the tools enabled across all attachments of a stack.
    async fn list_tools(&self, stack_id: &StackId) -> RemoteCatalogResult<Vec<ToolDescriptor>>;

    /// Creates a stack and assigns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteCatalogError::Remote`] when the name collides with an
    /// existing stack or the backend rejects the request.
    async fn create_stack(&self, spec: &NewStack) -> RemoteCatalogResult<Stack>;

    /// Deletes a stack and every attachment under it.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteCatalogError::NotFound`] when the stack does not exist.
    async fn delete_stack(&self, stack_id: &StackId) -> RemoteCatalogResult<()>;

    /// Creates or updates the attachment of a server to a stack.
    ///
    /// Re-attaching an attached server replaces its tool selection and keeps
    /// its credential values.
    async fn attach_server(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
        spec: &AttachServerSpec,
    ) -> RemoteCatalogResult<()>;

    /// Removes a server from a stack, discarding its credential values.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteCatalogError::NotFound`] when the stack does not
    /// exist or the server is not attached to it.
    async fn detach_server(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
    ) -> RemoteCatalogResult<()>;

    /// Merges credential values into an existing attachment.
    ///
    /// Fields absent from `values` keep their prior value; a blank value
    /// clears its field. Concurrent writers resolve last-write-wins per field.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteCatalogError::NotFound`] when the attachment does not
    /// exist.
    async fn set_credentials(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
        values: &CredentialValues,
    ) -> RemoteCatalogResult<()>;

    /// Reports the tool selection and filled credential fields of an
    /// attachment.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteCatalogError::NotFound`] when the attachment does not
    /// exist.
    async fn get_credentials(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
    ) -> RemoteCatalogResult<AttachmentSnapshot>;

    /// Invokes a tool through one specific attachment of a stack.
    ///
    /// The call is routed to `server_id` even when another attached server
    /// exposes a tool with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteCatalogError::NotFound`] when the attachment does not
    /// exist or its selection does not enable the tool.
    async fn call_tool(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
        tool_name: &str,
        input: &Value,
    ) -> RemoteCatalogResult<Value>;
}

/// Errors reported by remote catalog implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteCatalogError {
    /// The catalog rejected the caller's own credentials.
    #[error("remote catalog rejected authentication: {message}")]
    Authentication {
        /// Message reported by the catalog.
        message: String,
    },

    /// The referenced resource does not exist.
    #[error("{0} not found")]
    NotFound(ResourceRef),

    /// Generic backend failure, possibly transient.
    #[error("remote catalog error (status {status_code}): {message}")]
    Remote {
        /// Message reported by the catalog.
        message: String,
        /// Status code reported by the catalog.
        status_code: u16,
    },
}

impl RemoteCatalogError {
    /// Creates an authentication failure.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a generic backend failure.
    #[must_use]
    pub fn remote(message: impl Into<String>, status_code: u16) -> Self {
        Self::Remote {
            message: message.into(),
            status_code,
        }
    }

    /// Returns the backend status code, when the failure carries one.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Remote { status_code, .. } => Some(*status_code),
            Self::Authentication { .. } | Self::NotFound(_) => None,
        }
    }
}
