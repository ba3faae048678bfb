//! Identifier and validated-name types for stacks, servers, and credential
//! fields.
//!
//! Identifiers are opaque strings assigned by the remote catalog. They are
//! trimmed and must be non-empty; nothing else about their shape is assumed.

use super::StackDomainError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Default maximum length for a stack name.
pub const DEFAULT_MAX_STACK_NAME_LENGTH: usize = 100;

fn normalize_identifier(
    kind: &'static str,
    value: impl Into<String>,
) -> Result<String, StackDomainError> {
    let raw = value.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StackDomainError::EmptyIdentifier { kind });
    }
    Ok(trimmed.to_owned())
}

/// Catalog-assigned identifier of a stack. Immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StackId(String);

impl StackId {
    /// Creates a stack identifier from a catalog-provided value.
    ///
    /// # Errors
    ///
    /// Returns [`StackDomainError::EmptyIdentifier`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, StackDomainError> {
        normalize_identifier("stack", value).map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StackId {
    type Error = StackDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StackId> for String {
    fn from(value: StackId) -> Self {
        value.0
    }
}

impl AsRef<str> for StackId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StackId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Catalog identifier of a tool server.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerId(String);

impl ServerId {
    /// Creates a server identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StackDomainError::EmptyIdentifier`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, StackDomainError> {
        normalize_identifier("server", value).map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ServerId {
    type Error = StackDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServerId> for String {
    fn from(value: ServerId) -> Self {
        value.0
    }
}

impl AsRef<str> for ServerId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Identifier of a credential field declared by a server (e.g. `api_key`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CredentialFieldId(String);

impl CredentialFieldId {
    /// Creates a credential field identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StackDomainError::EmptyIdentifier`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, StackDomainError> {
        normalize_identifier("credential field", value).map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CredentialFieldId {
    type Error = StackDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CredentialFieldId> for String {
    fn from(value: CredentialFieldId) -> Self {
        value.0
    }
}

impl AsRef<str> for CredentialFieldId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for CredentialFieldId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CredentialFieldId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Validated human-readable stack name.
///
/// Deserialized names are checked against
/// [`DEFAULT_MAX_STACK_NAME_LENGTH`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StackName(String);

impl StackName {
    /// Creates a stack name using [`DEFAULT_MAX_STACK_NAME_LENGTH`].
    ///
    /// # Errors
    ///
    /// Returns [`StackDomainError`] when the trimmed name is empty or too long.
    pub fn new(value: impl Into<String>) -> Result<Self, StackDomainError> {
        Self::with_max_length(value, DEFAULT_MAX_STACK_NAME_LENGTH)
    }

    /// Creates a stack name with an explicit length limit in characters.
    ///
    /// The input is trimmed; case is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`StackDomainError::EmptyStackName`] or
    /// [`StackDomainError::StackNameTooLong`].
    pub fn with_max_length(
        value: impl Into<String>,
        max_length: usize,
    ) -> Result<Self, StackDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(StackDomainError::EmptyStackName);
        }

        let length = normalized.chars().count();
        if length > max_length {
            return Err(StackDomainError::StackNameTooLong {
                length,
                max: max_length,
            });
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the stack name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StackName {
    type Error = StackDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StackName> for String {
    fn from(value: StackName) -> Self {
        value.0
    }
}

impl AsRef<str> for StackName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StackName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
