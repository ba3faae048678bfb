//! Aggregate view of a stack and the readiness of its attachments.

use super::{CredentialStatus, ServerId, Stack};
use serde::{Deserialize, Serialize};

/// Per-attachment line of a [`StackSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentSummary {
    server_id: ServerId,
    server_name: String,
    selected_tools: usize,
    status: CredentialStatus,
}

impl AttachmentSummary {
    /// Creates an attachment summary line.
    #[must_use]
    pub fn new(
        server_id: ServerId,
        server_name: impl Into<String>,
        selected_tools: usize,
        status: CredentialStatus,
    ) -> Self {
        Self {
            server_id,
            server_name: server_name.into(),
            selected_tools,
            status,
        }
    }

    /// Returns the attached server.
    #[must_use]
    pub const fn server_id(&self) -> &ServerId {
        &self.server_id
    }

    /// Returns the server display name.
    #[must_use]
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Number of tools enabled by this attachment.
    #[must_use]
    pub const fn selected_tools(&self) -> usize {
        self.selected_tools
    }

    /// Readiness of this attachment.
    #[must_use]
    pub const fn status(&self) -> &CredentialStatus {
        &self.status
    }
}

/// A stack together with tool and readiness totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSummary {
    stack: Stack,
    total_tools: usize,
    servers_configured: usize,
    attachments: Vec<AttachmentSummary>,
}

impl StackSummary {
    /// Builds a summary from per-attachment lines.
    ///
    /// `total_tools` sums the selected tool counts; `servers_configured`
    /// counts attachments whose required credentials are all present.
    #[must_use]
    pub fn new(stack: Stack, attachments: Vec<AttachmentSummary>) -> Self {
        let total_tools = attachments
            .iter()
            .map(AttachmentSummary::selected_tools)
            .sum();
        let servers_configured = attachments
            .iter()
            .filter(|line| line.status().required_credentials_added())
            .count();

        Self {
            stack,
            total_tools,
            servers_configured,
            attachments,
        }
    }

    /// Returns the summarised stack.
    #[must_use]
    pub const fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Sum of selected tools across attachments.
    #[must_use]
    pub const fn total_tools(&self) -> usize {
        self.total_tools
    }

    /// Number of attachments with every required credential present.
    #[must_use]
    pub const fn servers_configured(&self) -> usize {
        self.servers_configured
    }

    /// Per-attachment lines in attachment order.
    #[must_use]
    pub fn attachments(&self) -> &[AttachmentSummary] {
        &self.attachments
    }
}
