use std::process::ExitCode;

use cork_runner::{chain::Chain, config::RunnerConfig, errors::Result, runner::Runner};
use tracing::{error, info};

async fn run() -> Result<()> {
    let config = RunnerConfig::from_env().await?;
    let chain = Chain::connect(Some(config.ethereum_url.as_str())).await?;
    let client = chain.client(config.signer).await?;
    let runner = Runner::new(
        client.clone(),
        client.address(),
        config.addresses,
        config.parameters,
    );
    info!(
        client_version = chain.client_version(),
        caller = ?runner.caller(),
        addresses = ?runner.addresses(),
        "starting run"
    );

    let report = runner.run().await?;
    info!(?report, "run complete");

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(step = ?err.step(), "{}", err);
            ExitCode::FAILURE
        }
    }
}
