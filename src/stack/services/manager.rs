//! Service layer for credential-gated stack assembly.

use crate::config::StackManagerConfig;
use crate::stack::{
    domain::{
        AttachmentSummary, CredentialStatus, CredentialValues, ResourceRef, Server, ServerId,
        Stack, StackDomainError, StackId, StackName, StackSummary, ToolDescriptor, ToolSelection,
    },
    ports::{AttachServerSpec, NewStack, RemoteCatalog, RemoteCatalogError},
};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Request payload for creating a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStackRequest {
    /// Human-readable stack name.
    pub name: String,
    /// Analytics flag; the manager's configured default applies when unset.
    pub analytics_enabled: Option<bool>,
}

impl CreateStackRequest {
    /// Creates a request using the configured analytics default.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            analytics_enabled: None,
        }
    }

    /// Sets the analytics flag explicitly.
    #[must_use]
    pub const fn with_analytics(mut self, enabled: bool) -> Self {
        self.analytics_enabled = Some(enabled);
        self
    }
}

/// Failure categories shared by every stack operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The catalog rejected the caller's own credentials.
    Authentication,
    /// A referenced stack, server, attachment, or tool is absent.
    NotFound,
    /// Caller input was rejected before reaching the catalog.
    Validation,
    /// Generic backend failure.
    Remote,
    /// A tool was invoked before its server's required credentials were set.
    NotReady,
}

/// Service-level errors for stack operations.
#[derive(Debug, Error)]
pub enum StackManagerError {
    /// Local validation failed.
    #[error(transparent)]
    Validation(#[from] StackDomainError),
    /// The catalog reported a failure; passed through unchanged.
    #[error(transparent)]
    Catalog(#[from] RemoteCatalogError),
    /// A resource the manager looked up itself is absent.
    #[error("{0} not found")]
    NotFound(ResourceRef),
    /// The attachment enabling a tool still lacks required credentials.
    #[error("server {server_id} in stack {stack_id} is missing required credentials")]
    CredentialsIncomplete {
        /// Stack the tool was invoked in.
        stack_id: StackId,
        /// Server whose required credentials are missing.
        server_id: ServerId,
    },
}

impl StackManagerError {
    /// Classifies the error, whichever layer produced it.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Catalog(RemoteCatalogError::Authentication { .. }) => ErrorKind::Authentication,
            Self::Catalog(RemoteCatalogError::NotFound(_)) | Self::NotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Catalog(RemoteCatalogError::Remote { .. }) => ErrorKind::Remote,
            Self::CredentialsIncomplete { .. } => ErrorKind::NotReady,
        }
    }

    /// Returns the backend status code, when the failure carries one.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Catalog(err) => err.status_code(),
            Self::Validation(_) | Self::NotFound(_) | Self::CredentialsIncomplete { .. } => None,
        }
    }
}

/// Result type for stack manager operations.
pub type StackManagerResult<T> = Result<T, StackManagerError>;

/// Orchestrates stacks, attachments, and credential readiness over a
/// [`RemoteCatalog`].
///
/// The manager keeps no state of its own beyond configuration: every read is
/// fetched from the catalog, so dropping a pending call leaves nothing to
/// clean up locally. Instances are caller-owned; clone to share.
pub struct StackManager<C>
where
    C: RemoteCatalog,
{
    catalog: Arc<C>,
    config: StackManagerConfig,
}

impl<C> Clone for StackManager<C>
where
    C: RemoteCatalog,
{
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            config: self.config,
        }
    }
}

impl<C> StackManager<C>
where
    C: RemoteCatalog,
{
    /// Creates a manager over `catalog`.
    #[must_use]
    pub const fn new(catalog: Arc<C>, config: StackManagerConfig) -> Self {
        Self { catalog, config }
    }

    /// Creates a manager with [`StackManagerConfig::default`].
    #[must_use]
    pub fn with_defaults(catalog: Arc<C>) -> Self {
        Self::new(catalog, StackManagerConfig::default())
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &StackManagerConfig {
        &self.config
    }

    async fn find_server(&self, server_id: &ServerId) -> StackManagerResult<Server> {
        self.catalog
            .list_servers()
            .await?
            .into_iter()
            .find(|server| server.server_id() == server_id)
            .ok_or_else(|| StackManagerError::NotFound(ResourceRef::Server(server_id.clone())))
    }

    /// Lists every server offered by the catalog.
    ///
    /// # Errors
    ///
    /// Returns catalog errors unchanged.
    pub async fn list_servers(&self) -> StackManagerResult<Vec<Server>> {
        Ok(self.catalog.list_servers().await?)
    }

    /// Lists every stack owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns catalog errors unchanged.
    pub async fn list_stacks(&self) -> StackManagerResult<Vec<Stack>> {
        Ok(self.catalog.list_stacks().await?)
    }

    /// Fetches a single stack.
    ///
    /// # Errors
    ///
    /// Returns catalog errors unchanged, including not-found for unknown or
    /// deleted stacks.
    pub async fn get_stack(&self, stack_id: &StackId) -> StackManagerResult<Stack> {
        Ok(self.catalog.get_stack(stack_id).await?)
    }

    /// Finds a stack by exact name.
    ///
    /// # Errors
    ///
    /// Returns catalog errors unchanged.
    pub async fn find_stack_by_name(&self, name: &str) -> StackManagerResult<Option<Stack>> {
        let wanted = name.trim();
        Ok(self
            .catalog
            .list_stacks()
            .await?
            .into_iter()
            .find(|stack| stack.stack_name().as_str() == wanted))
    }

    /// Lists the tools enabled across every attachment of a stack.
    ///
    /// # Errors
    ///
    /// Returns catalog errors unchanged.
    pub async fn list_stack_tools(
        &self,
        stack_id: &StackId,
    ) -> StackManagerResult<Vec<ToolDescriptor>> {
        Ok(self.catalog.list_tools(stack_id).await?)
    }

    /// Creates a stack.
    ///
    /// # Errors
    ///
    /// Returns [`StackManagerError::Validation`] for an empty or over-long
    /// name, or the catalog's error when it rejects the request (for example
    /// a name collision).
    #[instrument(skip_all, fields(stack_name = %request.name))]
    pub async fn create_stack(&self, request: CreateStackRequest) -> StackManagerResult<Stack> {
        let spec = NewStack {
            name: StackName::with_max_length(request.name, self.config.max_stack_name_length)?,
            analytics_enabled: request
                .analytics_enabled
                .unwrap_or(self.config.default_analytics_enabled),
        };
        let stack = self.catalog.create_stack(&spec).await?;
        info!(stack_id = %stack.stack_id(), "created stack");
        Ok(stack)
    }

    /// Deletes a stack and, with it, every attachment.
    ///
    /// # Errors
    ///
    /// Returns the catalog's not-found error when the stack does not exist,
    /// including when it was already deleted.
    #[instrument(skip_all, fields(stack_id = %stack_id))]
    pub async fn delete_stack(&self, stack_id: &StackId) -> StackManagerResult<()> {
        self.catalog.delete_stack(stack_id).await?;
        info!("deleted stack");
        Ok(())
    }

    /// Attaches a server to a stack, or updates an existing attachment.
    ///
    /// `enable_all_tools` takes precedence over `tool_selection`; a supplied
    /// selection is still validated against the server's tools. Attaching the
    /// same server again keeps a single attachment.
    ///
    /// # Errors
    ///
    /// Returns not-found when the stack or server is unknown and
    /// [`StackManagerError::Validation`] when the selection names a tool the
    /// server does not expose.
    #[instrument(skip_all, fields(stack_id = %stack_id, server_id = %server_id))]
    pub async fn attach_server(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
        enable_all_tools: bool,
        tool_selection: Option<Vec<String>>,
    ) -> StackManagerResult<()> {
        self.catalog.get_stack(stack_id).await?;
        let server = self.find_server(server_id).await?;

        if let Some(names) = &tool_selection {
            server.ensure_exposes_tools(names.iter().map(String::as_str))?;
        }

        let spec = AttachServerSpec {
            tool_selection: ToolSelection::from_flags(enable_all_tools, tool_selection),
        };
        self.catalog.attach_server(stack_id, server_id, &spec).await?;
        info!(
            all_tools = spec.tool_selection.is_all(),
            selected_tools = server.selected_tool_count(&spec.tool_selection),
            "attached server"
        );
        Ok(())
    }

    /// Detaches a server from a stack, discarding its credentials.
    ///
    /// # Errors
    ///
    /// Returns the catalog's not-found error when the stack does not exist or
    /// the server is not attached.
    #[instrument(skip_all, fields(stack_id = %stack_id, server_id = %server_id))]
    pub async fn detach_server(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
    ) -> StackManagerResult<()> {
        self.catalog.detach_server(stack_id, server_id).await?;
        info!("detached server");
        Ok(())
    }

    /// Merges credential values into an existing attachment.
    ///
    /// Fields not named in `values` keep their prior value. Submit every
    /// field in one call when the update must be applied together.
    ///
    /// # Errors
    ///
    /// Returns not-found when the attachment does not exist and
    /// [`StackManagerError::Validation`] when a field is not declared by the
    /// server.
    #[instrument(skip_all, fields(stack_id = %stack_id, server_id = %server_id))]
    pub async fn update_credentials(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
        values: CredentialValues,
    ) -> StackManagerResult<()> {
        self.catalog.get_credentials(stack_id, server_id).await?;
        let server = self.find_server(server_id).await?;
        server.ensure_declares_fields(values.field_ids())?;

        self.catalog
            .set_credentials(stack_id, server_id, &values)
            .await?;
        info!(fields = ?values, "updated credentials");
        Ok(())
    }

    /// Computes readiness of an attachment.
    ///
    /// # Errors
    ///
    /// Returns not-found when the attachment or its server does not exist.
    #[instrument(skip_all, fields(stack_id = %stack_id, server_id = %server_id))]
    pub async fn get_credential_status(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
    ) -> StackManagerResult<CredentialStatus> {
        let snapshot = self.catalog.get_credentials(stack_id, server_id).await?;
        let server = self.find_server(server_id).await?;
        let status = CredentialStatus::evaluate(&server, snapshot.provided_fields());
        debug!(
            required_added = status.required_credentials_added(),
            all_added = status.all_credentials_added(),
            "evaluated credential status"
        );
        Ok(status)
    }

    /// Summarises tool totals and readiness across a stack's attachments.
    ///
    /// # Errors
    ///
    /// Returns not-found when the stack does not exist, or when an attached
    /// server has disappeared from the catalog.
    #[instrument(skip_all, fields(stack_id = %stack_id))]
    pub async fn get_stack_summary(&self, stack_id: &StackId) -> StackManagerResult<StackSummary> {
        let stack = self.catalog.get_stack(stack_id).await?;
        let servers = self.catalog.list_servers().await?;

        let mut attachments = Vec::with_capacity(stack.servers().len());
        for server_id in stack.servers() {
            let server = servers
                .iter()
                .find(|server| server.server_id() == server_id)
                .ok_or_else(|| StackManagerError::NotFound(ResourceRef::Server(server_id.clone())))?;
            let snapshot = self.catalog.get_credentials(stack_id, server_id).await?;
            attachments.push(AttachmentSummary::new(
                server_id.clone(),
                server.name(),
                server.selected_tool_count(snapshot.tool_selection()),
                CredentialStatus::evaluate(server, snapshot.provided_fields()),
            ));
        }

        let summary = StackSummary::new(stack, attachments);
        debug!(
            total_tools = summary.total_tools(),
            servers_configured = summary.servers_configured(),
            "summarised stack"
        );
        Ok(summary)
    }

    /// Creates a stack, attaches one server, and optionally sets credentials.
    ///
    /// Steps run in order and stop at the first failure. A stack created
    /// before the failing step is left in place: the failing step's error is
    /// returned unchanged, and callers that need all-or-nothing behaviour
    /// must delete the stack themselves (see [`Self::find_stack_by_name`]).
    ///
    /// # Errors
    ///
    /// Returns the error of whichever step failed.
    #[instrument(skip_all, fields(stack_name = %request.name, server_id = %server_id))]
    pub async fn create_stack_with_server(
        &self,
        request: CreateStackRequest,
        server_id: &ServerId,
        enable_all_tools: bool,
        credentials: Option<CredentialValues>,
    ) -> StackManagerResult<Stack> {
        let stack = self.create_stack(request).await?;

        let remaining = async {
            self.attach_server(stack.stack_id(), server_id, enable_all_tools, None)
                .await?;
            if let Some(values) = credentials {
                self.update_credentials(stack.stack_id(), server_id, values)
                    .await?;
            }
            self.get_stack(stack.stack_id()).await
        };

        remaining.await.inspect_err(|err| {
            warn!(
                stack_id = %stack.stack_id(),
                error = %err,
                "stack left in place after failed setup step"
            );
        })
    }

    /// Invokes a tool enabled in a stack once its server is ready.
    ///
    /// The first attachment (in attachment order) whose server exposes the
    /// tool and whose selection enables it is used, and the call is routed
    /// to that attachment's server.
    ///
    /// # Errors
    ///
    /// Returns not-found when no attachment enables the tool and
    /// [`StackManagerError::CredentialsIncomplete`] when that attachment
    /// still lacks required credentials.
    #[instrument(skip_all, fields(stack_id = %stack_id, tool = tool_name))]
    pub async fn call_tool(
        &self,
        stack_id: &StackId,
        tool_name: &str,
        input: &Value,
    ) -> StackManagerResult<Value> {
        let stack = self.catalog.get_stack(stack_id).await?;
        let servers = self.catalog.list_servers().await?;

        for server_id in stack.servers() {
            let Some(server) = servers
                .iter()
                .find(|server| server.server_id() == server_id && server.exposes_tool(tool_name))
            else {
                continue;
            };

            let snapshot = self.catalog.get_credentials(stack_id, server_id).await?;
            if !snapshot.tool_selection().enables(tool_name) {
                continue;
            }

            if !CredentialStatus::evaluate(server, snapshot.provided_fields())
                .required_credentials_added()
            {
                return Err(StackManagerError::CredentialsIncomplete {
                    stack_id: stack_id.clone(),
                    server_id: server_id.clone(),
                });
            }

            let output = self
                .catalog
                .call_tool(stack_id, server_id, tool_name, input)
                .await?;
            debug!(server_id = %server_id, "invoked tool");
            return Ok(output);
        }

        Err(StackManagerError::NotFound(ResourceRef::Tool {
            stack_id: stack_id.clone(),
            tool: tool_name.to_owned(),
        }))
    }
}
