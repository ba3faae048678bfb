//! When steps for stack credential scenarios.

use super::world::{StackWorld, run_async, server_id};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use toolrouter::stack::domain::CredentialValues;

#[when(r#"server "{server}" is attached with all tools enabled"#)]
fn attach_all_tools(world: &mut StackWorld, server: String) -> Result<(), eyre::Report> {
    let stack_id = world.stack_id()?.clone();
    run_async(
        world
            .manager
            .attach_server(&stack_id, &server_id(&server)?, true, None),
    )
    .wrap_err("attach should succeed")
}

#[when(r#"server "{server}" is attached with tool selection "{tools}""#)]
fn attach_selected_tools(
    world: &mut StackWorld,
    server: String,
    tools: String,
) -> Result<(), eyre::Report> {
    let stack_id = world.stack_id()?.clone();
    let selection = tools.split(',').map(str::to_owned).collect();
    let result = run_async(world.manager.attach_server(
        &stack_id,
        &server_id(&server)?,
        false,
        Some(selection),
    ));
    world.last_error = result.err();
    Ok(())
}

#[when(r#"credential "{field}" is set to "{value}" for server "{server}""#)]
fn set_credential(
    world: &mut StackWorld,
    field: String,
    value: String,
    server: String,
) -> Result<(), eyre::Report> {
    let stack_id = world.stack_id()?.clone();
    let values = CredentialValues::try_from_pairs([(field, value)])
        .wrap_err("credential values should be valid")?;
    run_async(
        world
            .manager
            .update_credentials(&stack_id, &server_id(&server)?, values),
    )
    .wrap_err("credential update should succeed")
}

#[when("the stack is deleted")]
fn delete_stack(world: &mut StackWorld) -> Result<(), eyre::Report> {
    let stack_id = world.stack_id()?.clone();
    run_async(world.manager.delete_stack(&stack_id)).wrap_err("deletion should succeed")
}
