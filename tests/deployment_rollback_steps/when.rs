//! When steps for deployment rollback BDD scenarios.

use super::world::{DeploymentWorld, run_async};
use rstest_bdd_macros::when;

#[when("the deployments are listed")]
fn deployments_listed(world: &mut DeploymentWorld) -> Result<(), eyre::Report> {
    let service = world.service_name()?.clone();
    world.last_listing = Some(run_async(world.service.list_deployments(&service)));
    Ok(())
}

#[when(r#"the service is rolled back to "{target}""#)]
fn service_rolled_back(world: &mut DeploymentWorld, target: String) -> Result<(), eyre::Report> {
    let service = world.service_name()?.clone();
    let resolved = world.resolve(&target);
    world.last_rollback = Some(run_async(world.service.rollback(
        &service,
        &resolved,
        Some(format!("rollback to {target}")),
    )));
    Ok(())
}

#[when(r#"deployment "{label}" is shown"#)]
fn deployment_shown(world: &mut DeploymentWorld, label: String) -> Result<(), eyre::Report> {
    let service = world.service_name()?.clone();
    let resolved = world.resolve(&label);
    world.last_detail = Some(run_async(world.service.show_deployment(&service, &resolved)));
    Ok(())
}
