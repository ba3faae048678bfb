//! In-memory integration tests for stack lifecycle and tool invocation.

use super::helpers::{TestContext, context, credentials, server, server_id};
use rstest::rstest;
use serde_json::json;
use toolrouter::stack::{
    domain::{ResourceRef, Server},
    services::{CreateStackRequest, ErrorKind, StackManagerError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_servers_returns_registered_catalog(context: TestContext) {
    let servers = context
        .manager
        .list_servers()
        .await
        .expect("listing should succeed");

    let ids: Vec<_> = servers
        .iter()
        .map(|definition| definition.server_id().as_str())
        .collect();
    assert_eq!(ids, vec!["weather", "github", "notes"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stacks_are_listed_in_creation_order(context: TestContext) {
    for name in ["first", "second", "third"] {
        context
            .manager
            .create_stack(CreateStackRequest::new(name))
            .await
            .expect("creation should succeed");
    }

    let names: Vec<_> = context
        .manager
        .list_stacks()
        .await
        .expect("listing should succeed")
        .iter()
        .map(|stack| stack.stack_name().as_str().to_owned())
        .collect();

    assert_eq!(names, vec!["first", "second", "third"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_stack_by_name_trims_input(context: TestContext) {
    let created = context
        .manager
        .create_stack(CreateStackRequest::new("research"))
        .await
        .expect("creation should succeed");

    let found = context
        .manager
        .find_stack_by_name("  research ")
        .await
        .expect("lookup should succeed");
    let missing = context
        .manager
        .find_stack_by_name("absent")
        .await
        .expect("lookup should succeed");

    assert_eq!(found.as_ref().map(|stack| stack.stack_id()), Some(created.stack_id()));
    assert!(missing.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_identifier_is_never_reissued(context: TestContext) {
    let first = context
        .manager
        .create_stack(CreateStackRequest::new("demo"))
        .await
        .expect("creation should succeed");
    context
        .manager
        .delete_stack(first.stack_id())
        .await
        .expect("deletion should succeed");

    let second = context
        .manager
        .create_stack(CreateStackRequest::new("demo"))
        .await
        .expect("name should be reusable after deletion");

    assert_ne!(first.stack_id(), second.stack_id());
    assert_eq!(
        context
            .manager
            .get_stack(first.stack_id())
            .await
            .map_err(|err| err.kind()),
        Err(ErrorKind::NotFound)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn revoked_account_key_fails_with_authentication(context: TestContext) {
    context
        .catalog
        .set_authenticated(false)
        .expect("toggle should succeed");

    let result = context
        .manager
        .create_stack(CreateStackRequest::new("demo"))
        .await;

    assert_eq!(result.map_err(|err| err.kind()), Err(ErrorKind::Authentication));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reattach_replaces_tool_selection(context: TestContext) {
    let stack = context
        .manager
        .create_stack(CreateStackRequest::new("demo"))
        .await
        .expect("creation should succeed");
    let github = server_id("github");
    context
        .manager
        .attach_server(stack.stack_id(), &github, true, None)
        .await
        .expect("attach should succeed");
    context
        .manager
        .attach_server(
            stack.stack_id(),
            &github,
            false,
            Some(vec!["search_code".to_owned(), "search_code".to_owned()]),
        )
        .await
        .expect("re-attach should succeed");

    let tools = context
        .manager
        .list_stack_tools(stack.stack_id())
        .await
        .expect("listing should succeed");
    let summary = context
        .manager
        .get_stack_summary(stack.stack_id())
        .await
        .expect("summary should succeed");

    assert_eq!(tools.len(), 1);
    assert_eq!(summary.total_tools(), 1);
    assert_eq!(summary.stack().servers().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn summary_fails_when_attached_server_leaves_catalog(context: TestContext) {
    let stack = context
        .manager
        .create_stack(CreateStackRequest::new("demo"))
        .await
        .expect("creation should succeed");
    context
        .manager
        .attach_server(stack.stack_id(), &server_id("notes"), true, None)
        .await
        .expect("attach should succeed");
    let removed = context
        .catalog
        .remove_server(&server_id("notes"))
        .expect("removal should succeed");
    assert!(removed);

    let result = context.manager.get_stack_summary(stack.stack_id()).await;

    assert!(matches!(
        result,
        Err(StackManagerError::NotFound(ResourceRef::Server(ref missing)))
            if missing.as_str() == "notes"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replacing_a_server_updates_its_tools(context: TestContext) {
    context
        .catalog
        .register_server(server("notes", &["append_note", "read_notes"], &[], &[]))
        .expect("registration should succeed");

    let servers: Vec<Server> = context
        .manager
        .list_servers()
        .await
        .expect("listing should succeed");
    let notes = servers
        .iter()
        .find(|definition| definition.server_id().as_str() == "notes")
        .expect("notes server should be listed");

    assert_eq!(servers.len(), 3);
    assert_eq!(notes.tools().len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_tool_response_is_returned(context: TestContext) {
    let stack = context
        .manager
        .create_stack_with_server(
            CreateStackRequest::new("weather-desk"),
            &server_id("weather"),
            true,
            Some(credentials(&[("api_key", "demo-key")])),
        )
        .await
        .expect("composite creation should succeed");
    context
        .catalog
        .set_tool_response("get_forecast", json!({"forecast": "sunny"}))
        .expect("response registration should succeed");

    let output = context
        .manager
        .call_tool(
            stack.stack_id(),
            "get_forecast",
            &json!({"location": "San Francisco"}),
        )
        .await
        .expect("invocation should succeed");

    assert_eq!(output, json!({"forecast": "sunny"}));
    let invocations = context
        .catalog
        .invocations()
        .expect("invocations readable");
    assert_eq!(invocations.len(), 1);
    assert_eq!(
        invocations.first().map(|call| call.tool_name.as_str()),
        Some("get_forecast")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_tool_invocation_is_not_found(context: TestContext) {
    let stack = context
        .manager
        .create_stack_with_server(
            CreateStackRequest::new("notes-only"),
            &server_id("notes"),
            true,
            None,
        )
        .await
        .expect("composite creation should succeed");

    let result = context
        .manager
        .call_tool(stack.stack_id(), "get_forecast", &json!({}))
        .await;

    assert!(matches!(
        result,
        Err(StackManagerError::NotFound(ResourceRef::Tool { .. }))
    ));
}
