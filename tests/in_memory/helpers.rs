//! Shared test helpers for in-memory catalog integration tests.

use chrono::{DateTime, Duration, Local, Utc};
use mockable::Clock;
use rstest::fixture;
use serde_json::json;
use std::sync::{Arc, Mutex, PoisonError};
use toolrouter::stack::{
    adapters::InMemoryRemoteCatalog,
    domain::{CredentialField, CredentialFieldId, CredentialValues, Server, ServerId, ToolDescriptor},
    services::StackManager,
};

/// Clock that advances one second per reading.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    /// Creates a clock starting at the Unix epoch.
    pub fn new() -> Self {
        Self {
            next: Mutex::new(DateTime::UNIX_EPOCH),
        }
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        let current = *next;
        *next = current + Duration::seconds(1);
        current
    }
}

/// Catalog stamped by a [`SteppingClock`].
pub type TestCatalog = InMemoryRemoteCatalog<SteppingClock>;

/// Manager over a [`TestCatalog`].
pub type TestManager = StackManager<TestCatalog>;

/// Catalog and manager sharing state.
pub struct TestContext {
    pub catalog: Arc<TestCatalog>,
    pub manager: TestManager,
}

/// Builds a server exposing `tools` and declaring the given credential fields.
///
/// # Panics
///
/// Panics if any identifier is blank.
pub fn server(id: &str, tools: &[&str], required: &[&str], optional: &[&str]) -> Server {
    let descriptors = tools
        .iter()
        .map(|name| {
            ToolDescriptor::new(*name, format!("{name} tool"), json!({"type": "object"}))
                .expect("valid tool")
        })
        .collect();
    let required_fields = required.iter().map(|field| {
        CredentialField::required(CredentialFieldId::new(*field).expect("valid field"), *field)
    });
    let optional_fields = optional.iter().map(|field| {
        CredentialField::optional(CredentialFieldId::new(*field).expect("valid field"), *field)
    });
    Server::new(
        ServerId::new(id).expect("valid server id"),
        id,
        descriptors,
        required_fields.chain(optional_fields).collect(),
    )
    .expect("valid server")
}

/// Parses a server identifier.
///
/// # Panics
///
/// Panics if `id` is blank.
pub fn server_id(id: &str) -> ServerId {
    ServerId::new(id).expect("valid server id")
}

/// Builds credential values from string pairs.
///
/// # Panics
///
/// Panics if any field identifier is blank.
pub fn credentials(pairs: &[(&str, &str)]) -> CredentialValues {
    CredentialValues::try_from_pairs(pairs.iter().copied()).expect("valid credential values")
}

/// Provides a catalog seeded with `weather`, `github`, and `notes` servers.
#[fixture]
pub fn context() -> TestContext {
    let catalog = Arc::new(InMemoryRemoteCatalog::with_clock(Arc::new(
        SteppingClock::new(),
    )));
    for definition in [
        server(
            "weather",
            &["get_forecast", "get_alerts"],
            &["api_key"],
            &["units"],
        ),
        server(
            "github",
            &["list_issues", "create_issue", "search_code"],
            &["token"],
            &[],
        ),
        server("notes", &["append_note"], &[], &[]),
    ] {
        catalog
            .register_server(definition)
            .expect("server registration should succeed");
    }
    let manager = StackManager::with_defaults(Arc::clone(&catalog));
    TestContext { catalog, manager }
}
