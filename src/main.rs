//! Scenario Simulation Gateway entry point.
//!
//! Startup order: select environment, load YAML config, init logging, read
//! the required upstream URL from the environment (fatal if absent), build
//! the dispatcher, serve.

use std::time::Duration;

use anyhow::Context;

use scenario_gateway::config::{self, AppConfig};
use scenario_gateway::dispatcher::Dispatcher;
use scenario_gateway::{gateway, logging};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env);
    let _log_guard = logging::init_logging(&app_config);

    let base_url = config::upstream_base_url()
        .context("gateway cannot start without an upstream simulation service")?;
    let timeout = Duration::from_millis(app_config.upstream.timeout_ms);
    let dispatcher = Dispatcher::new(&base_url, timeout)
        .context("failed to build upstream HTTP client")?;

    tracing::info!(
        env = %env,
        upstream = dispatcher.simulate_url(),
        timeout_ms = app_config.upstream.timeout_ms,
        "scenario gateway starting"
    );

    gateway::run_server(&app_config.gateway.host, app_config.gateway.port, dispatcher).await;
    Ok(())
}
