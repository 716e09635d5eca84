//! Command-line front end for listing, inspecting and rolling back
//! deployments of a script service.
//!
//! Usage:
//!
//! ```text
//! quartermaster --name <service> list [--limit <n>]
//! quartermaster --name <service> show <deployment-id>
//! quartermaster --name <service> rollback <deployment-id> [--message <text>]
//! ```
//!
//! Credentials are read from flags or from the `QUARTERMASTER_*`
//! environment variables. Logs go to stderr and honour `RUST_LOG`.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use quartermaster::deployment::{
    adapters::http::{ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS, HttpDeploymentsClient},
    domain::ServiceName,
    presenter::{DEFAULT_LISTING_LIMIT, DeploymentPresenter},
    services::DeploymentLifecycleService,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quartermaster")]
#[command(about = "Inspect and roll back script deployments")]
#[command(version)]
struct Cli {
    /// Service whose deployments are managed
    #[arg(long, global = true, env = "QUARTERMASTER_SERVICE_NAME")]
    name: Option<String>,

    /// Root URL of the deployments API
    #[arg(long, env = "QUARTERMASTER_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Account that owns the service
    #[arg(long, env = "QUARTERMASTER_ACCOUNT_ID")]
    account_id: String,

    /// Bearer token for the deployments API
    #[arg(long, env = "QUARTERMASTER_API_TOKEN", hide_env_values = true)]
    api_token: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the most recent deployments and mark the active one
    List {
        /// Number of recent deployments to show
        #[arg(long, default_value_t = DEFAULT_LISTING_LIMIT)]
        limit: usize,
    },

    /// Show one deployment with its resources and script
    Show {
        /// Deployment to inspect
        deployment_id: String,
    },

    /// Roll the service back to an earlier deployment
    Rollback {
        /// Deployment whose content is restored
        deployment_id: String,

        /// Message recorded with the rollback
        #[arg(short, long)]
        message: Option<String>,
    },
}

/// Builds the log filter from `RUST_LOG` directives, defaulting to `info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|spec| !spec.trim().is_empty())
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        ))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let raw_name = cli
        .name
        .context("a service name is required; pass --name or set QUARTERMASTER_SERVICE_NAME")?;
    let service = ServiceName::new(raw_name)?;
    let config = ClientConfig::new(cli.api_base_url, cli.account_id, cli.api_token)?
        .with_timeout_secs(cli.timeout_secs)?;
    let client = Arc::new(HttpDeploymentsClient::new(config)?);
    let lifecycle = DeploymentLifecycleService::new(Arc::clone(&client), client);
    let presenter = DeploymentPresenter::new()?;

    let rendered = match cli.command {
        Commands::List { limit } => {
            let listing = lifecycle.list_deployments(&service).await?;
            presenter.render_listing(&listing, limit)?
        }
        Commands::Show { deployment_id } => {
            let detail = lifecycle.show_deployment(&service, &deployment_id).await?;
            presenter.render_detail(&detail)?
        }
        Commands::Rollback {
            deployment_id,
            message,
        } => {
            let outcome = lifecycle
                .rollback(&service, &deployment_id, message)
                .await?;
            presenter.render_rollback(&outcome)?
        }
    };

    let mut stdout = io::stdout().lock();
    write!(stdout, "{rendered}")?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::log_filter;
    use rstest::rstest;
    use tracing_subscriber::filter::LevelFilter;

    #[rstest]
    #[case(None, LevelFilter::INFO)]
    #[case(Some(""), LevelFilter::INFO)]
    #[case(Some("warn"), LevelFilter::WARN)]
    #[case(Some("debug"), LevelFilter::DEBUG)]
    fn log_level_follows_rust_log(#[case] directives: Option<&str>, #[case] expected: LevelFilter) {
        assert_eq!(log_filter(directives).max_level_hint(), Some(expected));
    }
}
