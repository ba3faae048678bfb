//! Given steps for stack credential scenarios.

use super::world::{StackWorld, run_async, server_id};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::json;
use toolrouter::stack::{
    domain::{CredentialField, CredentialFieldId, Server, ToolDescriptor},
    services::CreateStackRequest,
};

#[given(
    r#"a catalog server "{server}" exposing {count:usize} tools and requiring credential "{field}""#
)]
fn catalog_server(
    world: &mut StackWorld,
    server: String,
    count: usize,
    field: String,
) -> Result<(), eyre::Report> {
    let tools = (1..=count)
        .map(|index| {
            ToolDescriptor::new(
                format!("{server}_tool_{index}"),
                format!("Tool {index} of {server}"),
                json!({"type": "object"}),
            )
        })
        .collect::<Result<Vec<_>, _>>()
        .wrap_err("tool descriptors should be valid")?;
    let credential = CredentialField::required(
        CredentialFieldId::new(field.as_str()).wrap_err("credential field should be valid")?,
        field.as_str(),
    );
    let definition = Server::new(server_id(&server)?, &server, tools, vec![credential])
        .wrap_err("server definition should be valid")?;

    world
        .catalog
        .register_server(definition)
        .wrap_err("server registration should succeed")
}

#[given(r#"a stack named "{name}""#)]
fn stack_named(world: &mut StackWorld, name: String) -> Result<(), eyre::Report> {
    let stack = run_async(world.manager.create_stack(CreateStackRequest::new(name)))
        .wrap_err("stack creation should succeed")?;
    world.stack = Some(stack);
    Ok(())
}
