//! Then steps for deployment rollback BDD scenarios.

use super::world::{DeploymentWorld, run_async};
use eyre::WrapErr;
use quartermaster::deployment::{
    presenter::{DEFAULT_LISTING_LIMIT, DeploymentPresenter},
    services::{DeploymentLifecycleError, DeploymentListing, RollbackOutcome},
};
use rstest_bdd_macros::then;

fn listing(world: &DeploymentWorld) -> Result<&DeploymentListing, eyre::Report> {
    world
        .last_listing
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing listing result"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("listing failed: {err}"))
}

fn rollback_outcome(world: &DeploymentWorld) -> Result<&RollbackOutcome, eyre::Report> {
    world
        .last_rollback
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing rollback result"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("rollback failed: {err}"))
}

#[then("the listing reports that the service has no deployments yet")]
fn listing_reports_never_deployed(world: &DeploymentWorld) -> Result<(), eyre::Report> {
    let found = listing(world)?;
    if !matches!(found, DeploymentListing::NeverDeployed { .. }) {
        return Err(eyre::eyre!("expected a never-deployed listing, got {found:?}"));
    }

    let rendered = DeploymentPresenter::new()
        .wrap_err("build presenter")?
        .render_listing(found, DEFAULT_LISTING_LIMIT)
        .wrap_err("render listing")?;
    if !rendered.contains("has no deployments yet") {
        return Err(eyre::eyre!("unexpected listing output: {rendered}"));
    }
    Ok(())
}

#[then("{count:usize} deployments are listed")]
fn deployments_are_listed(world: &DeploymentWorld, count: usize) -> Result<(), eyre::Report> {
    match listing(world)? {
        DeploymentListing::Deployed { history, .. } if history.len() == count => Ok(()),
        other => Err(eyre::eyre!("expected {count} deployments, got {other:?}")),
    }
}

#[then(r#"deployment "{label}" is marked active"#)]
fn deployment_marked_active(world: &DeploymentWorld, label: String) -> Result<(), eyre::Report> {
    let expected = world.resolve(&label);
    match listing(world)? {
        DeploymentListing::Deployed { active, .. } if active.as_str() == expected => Ok(()),
        other => Err(eyre::eyre!("expected {label} to be active, got {other:?}")),
    }
}

#[then("the rollback succeeds with a deployment ID unlike any earlier one")]
fn rollback_creates_fresh_id(world: &DeploymentWorld) -> Result<(), eyre::Report> {
    let outcome = rollback_outcome(world)?;
    if world.published.values().any(|id| id == outcome.record.id()) {
        return Err(eyre::eyre!(
            "rollback reused deployment ID {}",
            outcome.record.id()
        ));
    }
    Ok(())
}

#[then(r#"the output confirms the rollback to "{label}""#)]
fn output_confirms_rollback(world: &DeploymentWorld, label: String) -> Result<(), eyre::Report> {
    let outcome = rollback_outcome(world)?;
    let rendered = DeploymentPresenter::new()
        .wrap_err("build presenter")?
        .render_rollback(outcome)
        .wrap_err("render rollback")?;
    let expected = format!(
        "Successfully rolled back to deployment ID: {}",
        world.resolve(&label)
    );
    if !rendered.contains(&expected) {
        return Err(eyre::eyre!("unexpected rollback output: {rendered}"));
    }
    Ok(())
}

#[then("the history contains {count:usize} deployments")]
fn history_contains(world: &DeploymentWorld, count: usize) -> Result<(), eyre::Report> {
    let service = world.service_name()?;
    let history = run_async(world.service.history().fetch_history(service))
        .wrap_err("fetch history")?;
    if history.len() != count {
        return Err(eyre::eyre!(
            "expected {count} deployments, found {}",
            history.len()
        ));
    }
    Ok(())
}

#[then("the rollback deployment is marked active")]
fn rollback_deployment_active(world: &DeploymentWorld) -> Result<(), eyre::Report> {
    let outcome = rollback_outcome(world)?;
    let service = world.service_name()?;
    let refreshed =
        run_async(world.service.list_deployments(service)).wrap_err("list deployments")?;
    match refreshed {
        DeploymentListing::Deployed { ref active, .. } if active == outcome.record.id() => Ok(()),
        other => Err(eyre::eyre!(
            "expected {} to be active, got {other:?}",
            outcome.record.id()
        )),
    }
}

#[then("the rollback fails because the target was not found")]
fn rollback_target_not_found(world: &DeploymentWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_rollback
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing rollback result"))?;
    if !matches!(result, Err(DeploymentLifecycleError::RollbackNotFound { .. })) {
        return Err(eyre::eyre!("expected RollbackNotFound, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the error names deployment "{label}""#)]
fn error_names_deployment(world: &DeploymentWorld, label: String) -> Result<(), eyre::Report> {
    let result = world
        .last_detail
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing detail result"))?;
    match result {
        Err(err @ DeploymentLifecycleError::DeploymentNotFound { .. })
            if err.to_string().contains(&label) =>
        {
            Ok(())
        }
        other => Err(eyre::eyre!(
            "expected DeploymentNotFound naming {label}, got {other:?}"
        )),
    }
}

#[then(r#"the detail output includes the script "{content}""#)]
fn detail_includes_script(world: &DeploymentWorld, content: String) -> Result<(), eyre::Report> {
    let detail = world
        .last_detail
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing detail result"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("detail failed: {err}"))?;
    let rendered = DeploymentPresenter::new()
        .wrap_err("build presenter")?
        .render_detail(detail)
        .wrap_err("render detail")?;
    if !rendered.contains(&content) || !rendered.contains("Handlers:      fetch") {
        return Err(eyre::eyre!("unexpected detail output: {rendered}"));
    }
    Ok(())
}
