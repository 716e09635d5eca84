//! Given steps for deployment rollback BDD scenarios.

use super::world::DeploymentWorld;
use eyre::WrapErr;
use quartermaster::deployment::{adapters::memory::ScriptUpload, domain::ServiceName};
use rstest_bdd_macros::given;

const AUTHOR: &str = "Jean-Luc-Picard@federation.org";

#[given(r#"a service named "{name}""#)]
fn service_named(world: &mut DeploymentWorld, name: String) -> Result<(), eyre::Report> {
    let service = ServiceName::new(name).wrap_err("parse service name")?;
    world
        .platform
        .create_service(&service)
        .wrap_err("create service")?;
    world.service_name = Some(service);
    Ok(())
}

#[given(r#"deployments "{first}" and "{second}" were published"#)]
fn deployments_published(
    world: &mut DeploymentWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let service = world.service_name()?.clone();
    for label in [first, second] {
        let id = world
            .platform
            .publish(&service, ScriptUpload::new(AUTHOR, label.as_str()))
            .wrap_err_with(|| format!("publish {label}"))?;
        world.published.insert(label, id);
    }
    Ok(())
}
