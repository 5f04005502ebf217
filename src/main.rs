use std::io::IsTerminal as _;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;
use prerelease_sweeper::registry::build_client;
use prerelease_sweeper::{
    ApiKind, Config, DeletionLog, GraphqlRegistry, Options, Registry, RestRegistry, RunReport,
    run_with_log,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let options = Options::parse();
    init_tracing(options.verbose, options.quiet);

    match real_main(options).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .init();
}

async fn real_main(options: Options) -> anyhow::Result<RunReport> {
    let config = Config::from_options(options).context("invalid configuration")?;
    let client = build_client().context("failed to build HTTP client")?;

    let registry: Box<dyn Registry> = match config.api {
        ApiKind::Rest => Box::new(RestRegistry::new(
            client,
            config.api_url.clone(),
            config.token.expose(),
            config.organization.as_str(),
            config.package_type.as_str(),
        )),
        ApiKind::Graphql => Box::new(GraphqlRegistry::new(
            client,
            config.graphql_url.clone(),
            config.token.expose(),
            config.organization.as_str(),
            config.package_type.as_str(),
        )),
    };

    if config.dry_run {
        tracing::info!("Dry run: no versions will be deleted");
    }

    let deletions = DeletionLog::new();
    let result =
        tokio::time::timeout(config.timeout, run_with_log(&config, registry.as_ref(), &deletions))
            .await;
    if result.is_err() {
        deletions.log_interrupted();
    }
    result.with_context(|| format!("run did not finish within {}s", config.timeout.as_secs()))?
}
