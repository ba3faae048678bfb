//! Error types for stack domain validation.

use super::{CredentialFieldId, ServerId};
use thiserror::Error;

/// Errors returned while constructing or validating stack domain values.
///
/// These are raised locally, before any call reaches the remote catalog, and
/// always indicate input the caller must fix.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StackDomainError {
    /// An opaque identifier is empty after trimming.
    #[error("{kind} identifier must not be empty")]
    EmptyIdentifier {
        /// Which identifier was empty (`stack`, `server`, `credential field`).
        kind: &'static str,
    },

    /// The stack name is empty after trimming.
    #[error("stack name must not be empty")]
    EmptyStackName,

    /// The stack name exceeds the configured length limit.
    #[error("stack name is {length} characters long, limit is {max}")]
    StackNameTooLong {
        /// Length of the rejected name in characters.
        length: usize,
        /// Configured maximum length.
        max: usize,
    },

    /// A tool descriptor name is empty after trimming.
    #[error("tool name must not be empty")]
    EmptyToolName,

    /// A server record declares the same tool twice.
    #[error("server {server_id} declares tool '{tool}' more than once")]
    DuplicateTool {
        /// Server declaring the tool.
        server_id: ServerId,
        /// Duplicated tool name.
        tool: String,
    },

    /// A server record declares the same credential field twice.
    #[error("server {server_id} declares credential field '{field_id}' more than once")]
    DuplicateCredentialField {
        /// Server declaring the field.
        server_id: ServerId,
        /// Duplicated field identifier.
        field_id: CredentialFieldId,
    },

    /// A tool selection names a tool the server does not expose.
    #[error("server {server_id} does not expose tool '{tool}'")]
    UnknownTool {
        /// Server the selection was made against.
        server_id: ServerId,
        /// Tool name that is not exposed.
        tool: String,
    },

    /// A credential update names a field the server does not declare.
    #[error("server {server_id} does not declare credential field '{field_id}'")]
    UnknownCredentialField {
        /// Server the update was made against.
        server_id: ServerId,
        /// Undeclared field identifier.
        field_id: CredentialFieldId,
    },
}
