//! In-memory remote catalog adapter.

use crate::stack::{
    domain::{
        AttachmentSnapshot, CredentialFieldId, CredentialValue, CredentialValues, ResourceRef,
        Server, ServerId, Stack, StackId, ToolDescriptor, ToolSelection,
    },
    ports::{AttachServerSpec, NewStack, RemoteCatalog, RemoteCatalogError, RemoteCatalogResult},
};
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Status code reported when a stack name is already taken.
const CONFLICT_STATUS: u16 = 409;

/// Status code reported when the adapter's own state is unusable.
const INTERNAL_STATUS: u16 = 500;

/// A recorded tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    /// Stack the tool was invoked in.
    pub stack_id: StackId,
    /// Attached server the call was routed to.
    pub server_id: ServerId,
    /// Invoked tool name.
    pub tool_name: String,
    /// Input passed to the tool.
    pub input: Value,
}

/// Thread-safe in-memory remote catalog.
///
/// Models the hosted catalog without any network access: stack identifiers
/// are random UUIDs, deleted identifiers are never reused, and credential
/// values are merged per field. Suitable for tests and deterministic local
/// flows.
pub struct InMemoryRemoteCatalog<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    state: Arc<RwLock<CatalogState>>,
    clock: Arc<C>,
}

#[derive(Debug)]
struct CatalogState {
    authenticated: bool,
    servers: Vec<Server>,
    stacks: HashMap<StackId, StackRecord>,
    deleted: HashSet<StackId>,
    tool_responses: HashMap<String, Value>,
    invocations: Vec<ToolInvocation>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            authenticated: true,
            servers: Vec::new(),
            stacks: HashMap::new(),
            deleted: HashSet::new(),
            tool_responses: HashMap::new(),
            invocations: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct StackRecord {
    stack: Stack,
    attachments: BTreeMap<ServerId, AttachmentRecord>,
}

#[derive(Debug)]
struct AttachmentRecord {
    tool_selection: ToolSelection,
    credentials: BTreeMap<CredentialFieldId, CredentialValue>,
}

impl CatalogState {
    fn ensure_authenticated(&self) -> RemoteCatalogResult<()> {
        if self.authenticated {
            return Ok(());
        }
        Err(RemoteCatalogError::authentication("invalid account API key"))
    }

    fn server(&self, server_id: &ServerId) -> RemoteCatalogResult<&Server> {
        self.servers
            .iter()
            .find(|server| server.server_id() == server_id)
            .ok_or_else(|| RemoteCatalogError::NotFound(ResourceRef::Server(server_id.clone())))
    }

    fn stack(&self, stack_id: &StackId) -> RemoteCatalogResult<&StackRecord> {
        self.stacks
            .get(stack_id)
            .ok_or_else(|| RemoteCatalogError::NotFound(ResourceRef::Stack(stack_id.clone())))
    }

    fn stack_mut(&mut self, stack_id: &StackId) -> RemoteCatalogResult<&mut StackRecord> {
        self.stacks
            .get_mut(stack_id)
            .ok_or_else(|| RemoteCatalogError::NotFound(ResourceRef::Stack(stack_id.clone())))
    }

    fn enabled_tools(&self, record: &StackRecord) -> Vec<ToolDescriptor> {
        record
            .stack
            .servers()
            .iter()
            .filter_map(|server_id| {
                let attachment = record.attachments.get(server_id)?;
                let server = self.server(server_id).ok()?;
                Some(
                    server
                        .selected_tools(&attachment.tool_selection)
                        .cloned()
                        .collect::<Vec<_>>(),
                )
            })
            .flatten()
            .collect()
    }
}

fn attachment_not_found(stack_id: &StackId, server_id: &ServerId) -> RemoteCatalogError {
    RemoteCatalogError::NotFound(ResourceRef::Attachment {
        stack_id: stack_id.clone(),
        server_id: server_id.clone(),
    })
}

impl InMemoryRemoteCatalog {
    /// Creates an empty catalog using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryRemoteCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for InMemoryRemoteCatalog<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> InMemoryRemoteCatalog<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty catalog stamping stacks with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(CatalogState::default())),
            clock,
        }
    }

    fn read_state(&self) -> RemoteCatalogResult<RwLockReadGuard<'_, CatalogState>> {
        self.state
            .read()
            .map_err(|err| RemoteCatalogError::remote(err.to_string(), INTERNAL_STATUS))
    }

    fn write_state(&self) -> RemoteCatalogResult<RwLockWriteGuard<'_, CatalogState>> {
        self.state
            .write()
            .map_err(|err| RemoteCatalogError::remote(err.to_string(), INTERNAL_STATUS))
    }

    /// Adds a server to the catalog, replacing any server with the same id.
    ///
    /// # Errors
    ///
    /// Returns adapter errors when lock acquisition fails.
    pub fn register_server(&self, server: Server) -> RemoteCatalogResult<()> {
        let mut state = self.write_state()?;
        if let Some(existing) = state
            .servers
            .iter_mut()
            .find(|existing| existing.server_id() == server.server_id())
        {
            *existing = server;
        } else {
            state.servers.push(server);
        }
        Ok(())
    }

    /// Withdraws a server from the catalog.
    ///
    /// Existing attachments are kept, mirroring a catalog that retires a
    /// server while stacks still reference it.
    ///
    /// # Errors
    ///
    /// Returns adapter errors when lock acquisition fails.
    pub fn remove_server(&self, server_id: &ServerId) -> RemoteCatalogResult<bool> {
        let mut state = self.write_state()?;
        let before = state.servers.len();
        state
            .servers
            .retain(|server| server.server_id() != server_id);
        Ok(state.servers.len() != before)
    }

    /// Toggles whether the catalog accepts the caller's credentials.
    ///
    /// While unauthenticated every port call fails with
    /// [`RemoteCatalogError::Authentication`].
    ///
    /// # Errors
    ///
    /// Returns adapter errors when lock acquisition fails.
    pub fn set_authenticated(&self, authenticated: bool) -> RemoteCatalogResult<()> {
        self.write_state()?.authenticated = authenticated;
        Ok(())
    }

    /// Sets the value returned when `tool_name` is invoked.
    ///
    /// Tools without a configured response echo their input.
    ///
    /// # Errors
    ///
    /// Returns adapter errors when lock acquisition fails.
    pub fn set_tool_response(
        &self,
        tool_name: impl Into<String>,
        response: Value,
    ) -> RemoteCatalogResult<()> {
        self.write_state()?
            .tool_responses
            .insert(tool_name.into(), response);
        Ok(())
    }

    /// Returns every tool invocation recorded so far.
    ///
    /// # Errors
    ///
    /// Returns adapter errors when lock acquisition fails.
    pub fn invocations(&self) -> RemoteCatalogResult<Vec<ToolInvocation>> {
        Ok(self.read_state()?.invocations.clone())
    }

    /// Returns the raw credential value stored for a field, if any.
    ///
    /// The port never echoes values back; this accessor exists so tests can
    /// observe merge behaviour.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteCatalogError::NotFound`] when the attachment does not
    /// exist.
    pub fn stored_credential(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
        field_id: &str,
    ) -> RemoteCatalogResult<Option<String>> {
        let state = self.read_state()?;
        let attachment = state
            .stack(stack_id)?
            .attachments
            .get(server_id)
            .ok_or_else(|| attachment_not_found(stack_id, server_id))?;
        Ok(attachment
            .credentials
            .get(field_id)
            .map(|value| value.expose().to_owned()))
    }
}

#[async_trait]
impl<C> RemoteCatalog for InMemoryRemoteCatalog<C>
where
    C: Clock + Send + Sync,
{
    async fn list_servers(&self) -> RemoteCatalogResult<Vec<Server>> {
        let state = self.read_state()?;
        state.ensure_authenticated()?;
        Ok(state.servers.clone())
    }

    async fn list_stacks(&self) -> RemoteCatalogResult<Vec<Stack>> {
        let state = self.read_state()?;
        state.ensure_authenticated()?;
        let mut stacks: Vec<Stack> = state
            .stacks
            .values()
            .map(|record| record.stack.clone())
            .collect();
        stacks.sort_by(|left, right| {
            left.created_at()
                .cmp(&right.created_at())
                .then_with(|| left.stack_id().cmp(right.stack_id()))
        });
        Ok(stacks)
    }

    async fn get_stack(&self, stack_id: &StackId) -> RemoteCatalogResult<Stack> {
        let state = self.read_state()?;
        state.ensure_authenticated()?;
        Ok(state.stack(stack_id)?.stack.clone())
    }

    async fn list_tools(&self, stack_id: &StackId) -> RemoteCatalogResult<Vec<ToolDescriptor>> {
        let state = self.read_state()?;
        state.ensure_authenticated()?;
        let record = state.stack(stack_id)?;
        Ok(state.enabled_tools(record))
    }

    async fn create_stack(&self, spec: &NewStack) -> RemoteCatalogResult<Stack> {
        let mut state = self.write_state()?;
        state.ensure_authenticated()?;

        if state
            .stacks
            .values()
            .any(|record| record.stack.stack_name() == &spec.name)
        {
            return Err(RemoteCatalogError::remote(
                format!("stack name '{}' is already in use", spec.name),
                CONFLICT_STATUS,
            ));
        }

        let stack_id = loop {
            let candidate = StackId::new(Uuid::new_v4().to_string())
                .map_err(|err| RemoteCatalogError::remote(err.to_string(), INTERNAL_STATUS))?;
            if !state.deleted.contains(&candidate) && !state.stacks.contains_key(&candidate) {
                break candidate;
            }
        };

        let stack = Stack::new(
            stack_id.clone(),
            spec.name.clone(),
            spec.analytics_enabled,
            self.clock.utc(),
        );
        state.stacks.insert(
            stack_id,
            StackRecord {
                stack: stack.clone(),
                attachments: BTreeMap::new(),
            },
        );
        Ok(stack)
    }

    async fn delete_stack(&self, stack_id: &StackId) -> RemoteCatalogResult<()> {
        let mut state = self.write_state()?;
        state.ensure_authenticated()?;
        if state.stacks.remove(stack_id).is_none() {
            return Err(RemoteCatalogError::NotFound(ResourceRef::Stack(
                stack_id.clone(),
            )));
        }
        state.deleted.insert(stack_id.clone());
        Ok(())
    }

    async fn attach_server(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
        spec: &AttachServerSpec,
    ) -> RemoteCatalogResult<()> {
        let mut state = self.write_state()?;
        state.ensure_authenticated()?;
        state.server(server_id)?;

        let record = state.stack_mut(stack_id)?;
        record.stack.record_attachment(server_id.clone());
        record
            .attachments
            .entry(server_id.clone())
            .and_modify(|attachment| attachment.tool_selection = spec.tool_selection.clone())
            .or_insert_with(|| AttachmentRecord {
                tool_selection: spec.tool_selection.clone(),
                credentials: BTreeMap::new(),
            });
        Ok(())
    }

    async fn detach_server(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
    ) -> RemoteCatalogResult<()> {
        let mut state = self.write_state()?;
        state.ensure_authenticated()?;
        let record = state.stack_mut(stack_id)?;
        if record.attachments.remove(server_id).is_none() {
            return Err(attachment_not_found(stack_id, server_id));
        }
        record.stack.remove_attachment(server_id);
        Ok(())
    }

    async fn set_credentials(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
        values: &CredentialValues,
    ) -> RemoteCatalogResult<()> {
        let mut state = self.write_state()?;
        state.ensure_authenticated()?;
        let attachment = state
            .stack_mut(stack_id)?
            .attachments
            .get_mut(server_id)
            .ok_or_else(|| attachment_not_found(stack_id, server_id))?;

        for (field_id, value) in values.iter() {
            if value.is_blank() {
                attachment.credentials.remove(field_id);
            } else {
                attachment
                    .credentials
                    .insert(field_id.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn get_credentials(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
    ) -> RemoteCatalogResult<AttachmentSnapshot> {
        let state = self.read_state()?;
        state.ensure_authenticated()?;
        let attachment = state
            .stack(stack_id)?
            .attachments
            .get(server_id)
            .ok_or_else(|| attachment_not_found(stack_id, server_id))?;

        Ok(AttachmentSnapshot::new(
            stack_id.clone(),
            server_id.clone(),
            attachment.tool_selection.clone(),
            attachment.credentials.keys().cloned().collect(),
        ))
    }

    async fn call_tool(
        &self,
        stack_id: &StackId,
        server_id: &ServerId,
        tool_name: &str,
        input: &Value,
    ) -> RemoteCatalogResult<Value> {
        let mut state = self.write_state()?;
        state.ensure_authenticated()?;
        let attachment = state
            .stack(stack_id)?
            .attachments
            .get(server_id)
            .ok_or_else(|| attachment_not_found(stack_id, server_id))?;
        let enabled = attachment.tool_selection.enables(tool_name)
            && state.server(server_id)?.exposes_tool(tool_name);
        if !enabled {
            return Err(RemoteCatalogError::NotFound(ResourceRef::Tool {
                stack_id: stack_id.clone(),
                tool: tool_name.to_owned(),
            }));
        }

        state.invocations.push(ToolInvocation {
            stack_id: stack_id.clone(),
            server_id: server_id.clone(),
            tool_name: tool_name.to_owned(),
            input: input.clone(),
        });
        Ok(state
            .tool_responses
            .get(tool_name)
            .cloned()
            .unwrap_or_else(|| json!({ "tool": tool_name, "input": input })))
    }
}
