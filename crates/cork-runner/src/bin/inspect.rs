use cork_runner::{chain::Chain, config::RunnerConfig, runner::Runner, units::format_ether};
use eyre::Result;

/// Prints the hook's view of the configured pair without changing anything.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = RunnerConfig::from_env().await?;
    let chain = Chain::connect(Some(config.ethereum_url.as_str())).await?;
    let client = chain.client(config.signer).await?;
    let runner = Runner::new(
        client.clone(),
        client.address(),
        config.addresses,
        config.parameters,
    );

    println!("symbol {}", runner.symbol().await?);
    println!("balance {}", runner.balance().await?);
    println!("allowance {}", format_ether(runner.allowance().await?)?);
    println!("pool key {:?}", runner.pool_key().await?);
    println!("liquidity token {:?}", runner.liquidity_token().await?);

    let fee = runner.fee().await?;
    println!("fee base={} actual={}", fee.base, fee.actual);

    let amount = config.quote_amount;
    println!(
        "{} ra buys {} ct",
        format_ether(amount)?,
        format_ether(runner.amount_out(true, amount).await?)?
    );
    println!(
        "{} ct buys {} ra",
        format_ether(amount)?,
        format_ether(runner.amount_out(false, amount).await?)?
    );
    println!(
        "{} ct costs {} ra",
        format_ether(amount)?,
        format_ether(runner.amount_in(true, amount).await?)?
    );

    Ok(())
}
