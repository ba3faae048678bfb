//! Stack aggregate as reported by the remote catalog.

use super::{ServerId, StackId, StackName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named collection of attached tool servers.
///
/// The identifier is assigned by the catalog on creation and never changes.
/// Each server appears at most once in [`Stack::servers`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    stack_id: StackId,
    stack_name: StackName,
    servers: Vec<ServerId>,
    analytics_enabled: bool,
    created_at: DateTime<Utc>,
}

impl Stack {
    /// Creates a stack with no attached servers.
    #[must_use]
    pub const fn new(
        stack_id: StackId,
        stack_name: StackName,
        analytics_enabled: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            stack_id,
            stack_name,
            servers: Vec::new(),
            analytics_enabled,
            created_at,
        }
    }

    /// Replaces the attached server list, dropping repeated entries.
    #[must_use]
    pub fn with_servers(mut self, servers: impl IntoIterator<Item = ServerId>) -> Self {
        self.servers.clear();
        for server_id in servers {
            self.record_attachment(server_id);
        }
        self
    }

    /// Records an attachment; attaching a server twice keeps one entry.
    ///
    /// Returns `true` when the server was not attached before.
    pub fn record_attachment(&mut self, server_id: ServerId) -> bool {
        if self.contains_server(&server_id) {
            return false;
        }
        self.servers.push(server_id);
        true
    }

    /// Removes an attachment, keeping the order of the remaining servers.
    ///
    /// Returns `true` when the server was attached.
    pub fn remove_attachment(&mut self, server_id: &ServerId) -> bool {
        let before = self.servers.len();
        self.servers.retain(|attached| attached != server_id);
        self.servers.len() != before
    }

    /// Returns the stack identifier.
    #[must_use]
    pub const fn stack_id(&self) -> &StackId {
        &self.stack_id
    }

    /// Returns the stack name.
    #[must_use]
    pub const fn stack_name(&self) -> &StackName {
        &self.stack_name
    }

    /// Returns attached servers in attachment order.
    #[must_use]
    pub fn servers(&self) -> &[ServerId] {
        &self.servers
    }

    /// Returns whether `server_id` is attached.
    #[must_use]
    pub fn contains_server(&self, server_id: &ServerId) -> bool {
        self.servers.contains(server_id)
    }

    /// Returns whether usage analytics are enabled.
    #[must_use]
    pub const fn analytics_enabled(&self) -> bool {
        self.analytics_enabled
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
