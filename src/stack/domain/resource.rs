//! References to remote resources, used in not-found reporting.

use super::{ServerId, StackId};
use std::fmt;

/// Identifies the resource a lookup failed to find.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    /// A stack.
    Stack(StackId),
    /// A catalog server.
    Server(ServerId),
    /// The attachment of a server to a stack.
    Attachment {
        /// Owning stack.
        stack_id: StackId,
        /// Attached server.
        server_id: ServerId,
    },
    /// A tool enabled within a stack.
    Tool {
        /// Stack that was searched.
        stack_id: StackId,
        /// Requested tool name.
        tool: String,
    },
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stack(stack_id) => write!(formatter, "stack {stack_id}"),
            Self::Server(server_id) => write!(formatter, "server {server_id}"),
            Self::Attachment {
                stack_id,
                server_id,
            } => write!(formatter, "server {server_id} in stack {stack_id}"),
            Self::Tool { stack_id, tool } => write!(formatter, "tool '{tool}' in stack {stack_id}"),
        }
    }
}
