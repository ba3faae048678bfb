//! Credential values, attachment snapshots, and readiness evaluation.

use super::{CredentialFieldId, Server, ServerId, StackDomainError, StackId, ToolSelection};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// An opaque credential value.
///
/// Values are secrets: `Debug` is redacted and there is no `Display` or
/// `Serialize` implementation. A value that is blank after trimming counts as
/// "not provided".
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialValue(String);

impl CredentialValue {
    /// Wraps a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns whether the value is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Returns the raw secret for transmission to the catalog.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("CredentialValue([REDACTED])")
    }
}

impl From<&str> for CredentialValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CredentialValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A set of credential values keyed by field identifier.
///
/// Used as the payload of a credential update. Submitting a blank value for a
/// field clears it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialValues(BTreeMap<CredentialFieldId, CredentialValue>);

impl CredentialValues {
    /// Creates an empty set of values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds values from raw `(field, value)` string pairs.
    ///
    /// Later pairs for the same field overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`StackDomainError::EmptyIdentifier`] when a field identifier
    /// is blank.
    pub fn try_from_pairs<K, V>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, StackDomainError>
    where
        K: Into<String>,
        V: Into<CredentialValue>,
    {
        let mut values = Self::new();
        for (field_id, value) in pairs {
            values.insert(CredentialFieldId::new(field_id)?, value);
        }
        Ok(values)
    }

    /// Sets a value, returning the previous one for the same field.
    pub fn insert(
        &mut self,
        field_id: CredentialFieldId,
        value: impl Into<CredentialValue>,
    ) -> Option<CredentialValue> {
        self.0.insert(field_id, value.into())
    }

    /// Returns the value for a field.
    #[must_use]
    pub fn get(&self, field_id: &str) -> Option<&CredentialValue> {
        self.0.get(field_id)
    }

    /// Iterates over the field identifiers in the set.
    pub fn field_ids(&self) -> impl Iterator<Item = &CredentialFieldId> {
        self.0.keys()
    }

    /// Iterates over `(field, value)` entries in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&CredentialFieldId, &CredentialValue)> {
        self.0.iter()
    }

    /// Number of fields in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CredentialValues {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_set()
            .entries(self.0.keys().map(CredentialFieldId::as_str))
            .finish()
    }
}

impl FromIterator<(CredentialFieldId, CredentialValue)> for CredentialValues {
    fn from_iter<T: IntoIterator<Item = (CredentialFieldId, CredentialValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The catalog's view of one (stack, server) attachment.
///
/// Credential values are never echoed back; the snapshot only records which
/// fields currently hold a non-blank value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentSnapshot {
    stack_id: StackId,
    server_id: ServerId,
    tool_selection: ToolSelection,
    provided_fields: BTreeSet<CredentialFieldId>,
}

impl AttachmentSnapshot {
    /// Creates an attachment snapshot.
    #[must_use]
    pub const fn new(
        stack_id: StackId,
        server_id: ServerId,
        tool_selection: ToolSelection,
        provided_fields: BTreeSet<CredentialFieldId>,
    ) -> Self {
        Self {
            stack_id,
            server_id,
            tool_selection,
            provided_fields,
        }
    }

    /// Returns the owning stack.
    #[must_use]
    pub const fn stack_id(&self) -> &StackId {
        &self.stack_id
    }

    /// Returns the attached server.
    #[must_use]
    pub const fn server_id(&self) -> &ServerId {
        &self.server_id
    }

    /// Returns the tool selection for this attachment.
    #[must_use]
    pub const fn tool_selection(&self) -> &ToolSelection {
        &self.tool_selection
    }

    /// Returns the fields that currently hold a non-blank value.
    #[must_use]
    pub const fn provided_fields(&self) -> &BTreeSet<CredentialFieldId> {
        &self.provided_fields
    }
}

/// Derived readiness of an attachment. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialStatus {
    required_credentials_added: bool,
    all_credentials_added: bool,
    missing_required: Vec<CredentialFieldId>,
    missing_optional: Vec<CredentialFieldId>,
}

impl CredentialStatus {
    /// Evaluates readiness of `server` given the fields provided for it.
    ///
    /// Provided fields the server does not declare are ignored. A server with
    /// no required fields is always ready.
    #[must_use]
    pub fn evaluate(server: &Server, provided_fields: &BTreeSet<CredentialFieldId>) -> Self {
        let missing = |required: bool| -> Vec<CredentialFieldId> {
            server
                .credentials()
                .iter()
                .filter(|field| field.is_required() == required)
                .map(|field| field.field_id())
                .filter(|field_id| !provided_fields.contains(*field_id))
                .cloned()
                .collect()
        };

        let missing_required = missing(true);
        let missing_optional = missing(false);
        let required_credentials_added = missing_required.is_empty();

        Self {
            required_credentials_added,
            all_credentials_added: required_credentials_added && missing_optional.is_empty(),
            missing_required,
            missing_optional,
        }
    }

    /// Returns whether every required field has a value.
    #[must_use]
    pub const fn required_credentials_added(&self) -> bool {
        self.required_credentials_added
    }

    /// Returns whether every declared field, required or optional, has a value.
    #[must_use]
    pub const fn all_credentials_added(&self) -> bool {
        self.all_credentials_added
    }

    /// Required fields still lacking a value, in declaration order.
    #[must_use]
    pub fn missing_required(&self) -> &[CredentialFieldId] {
        &self.missing_required
    }

    /// Optional fields still lacking a value, in declaration order.
    #[must_use]
    pub fn missing_optional(&self) -> &[CredentialFieldId] {
        &self.missing_optional
    }
}
