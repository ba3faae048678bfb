//! Domain model for credential-gated stack assembly.
//!
//! Stacks group catalog servers; each (stack, server) attachment carries a
//! tool selection and credential values. Readiness is derived from the
//! server's declared credential fields and the fields the catalog reports as
//! filled. Transport and persistence remain outside this boundary.

mod credentials;
mod error;
mod ids;
mod resource;
mod server;
mod stack;
mod summary;
mod tool;

pub use credentials::{AttachmentSnapshot, CredentialStatus, CredentialValue, CredentialValues};
pub use error::StackDomainError;
pub use ids::{CredentialFieldId, DEFAULT_MAX_STACK_NAME_LENGTH, ServerId, StackId, StackName};
pub use resource::ResourceRef;
pub use server::{CredentialField, CredentialRequirement, Server};
pub use stack::Stack;
pub use summary::{AttachmentSummary, StackSummary};
pub use tool::{ToolDescriptor, ToolSelection};
