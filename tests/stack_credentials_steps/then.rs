//! Then steps for stack credential scenarios.

use super::world::{StackWorld, run_async, server_id};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::then;
use toolrouter::stack::services::ErrorKind;

#[then(r#"the credential status for "{server}" reports required credentials {state}"#)]
fn credential_status(
    world: &mut StackWorld,
    server: String,
    state: String,
) -> Result<(), eyre::Report> {
    let expected = match state.as_str() {
        "added" => true,
        "missing" => false,
        other => return Err(eyre!("unknown credential state '{other}'")),
    };
    let stack_id = world.stack_id()?.clone();
    let status = run_async(
        world
            .manager
            .get_credential_status(&stack_id, &server_id(&server)?),
    )
    .wrap_err("status query should succeed")?;

    if status.required_credentials_added() != expected {
        return Err(eyre!(
            "expected required credentials {state}, missing fields: {:?}",
            status.missing_required()
        ));
    }
    Ok(())
}

#[then("the last operation fails with a validation error")]
fn last_operation_validation(world: &mut StackWorld) -> Result<(), eyre::Report> {
    let error = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre!("expected the last operation to fail"))?;
    if error.kind() != ErrorKind::Validation {
        return Err(eyre!("expected validation error, got {error:?}"));
    }
    Ok(())
}

#[then("requesting the stack summary fails with a not found error")]
fn summary_not_found(world: &mut StackWorld) -> Result<(), eyre::Report> {
    let stack_id = world.stack_id()?.clone();
    match run_async(world.manager.get_stack_summary(&stack_id)) {
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(eyre!("expected not found error, got {err:?}")),
        Ok(summary) => Err(eyre!("expected failure, got summary {summary:?}")),
    }
}

#[then("deleting the stack again fails with a not found error")]
fn second_delete_not_found(world: &mut StackWorld) -> Result<(), eyre::Report> {
    let stack_id = world.stack_id()?.clone();
    match run_async(world.manager.delete_stack(&stack_id)) {
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(eyre!("expected not found error, got {err:?}")),
        Ok(()) => Err(eyre!("expected second deletion to fail")),
    }
}

#[then("the stack summary reports {total:usize} total tools and {configured:usize} configured servers")]
fn summary_totals(
    world: &mut StackWorld,
    total: usize,
    configured: usize,
) -> Result<(), eyre::Report> {
    let stack_id = world.stack_id()?.clone();
    let summary = run_async(world.manager.get_stack_summary(&stack_id))
        .wrap_err("summary should succeed")?;

    if summary.total_tools() != total || summary.servers_configured() != configured {
        return Err(eyre!(
            "expected {total} tools and {configured} configured servers, got {} and {}",
            summary.total_tools(),
            summary.servers_configured()
        ));
    }
    Ok(())
}
