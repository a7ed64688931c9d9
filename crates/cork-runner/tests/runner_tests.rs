use std::sync::Arc;

use cork_addresses::Addresses;
use cork_runner::{
    config::Parameters,
    errors::{RunnerError, Step},
    runner::Runner,
};
use ethers::{
    abi::{self, Token},
    providers::{MockProvider, Provider},
    types::{Address, Bytes, U256, U64},
    utils::WEI_IN_ETHER,
};
use eyre::Result;

// The mock answers with the most recently queued response first, so a
// sequence of answers is queued back to front. Any request left without an
// answer fails as a transport error.

fn mocked_runner(addresses: Addresses) -> (Runner<Provider<MockProvider>>, MockProvider) {
    let (provider, mock) = Provider::mocked();
    let caller = Address::repeat_byte(0xca);
    let runner = Runner::new(Arc::new(provider), caller, addresses, Parameters::default());
    (runner, mock)
}

fn returns(tokens: &[Token]) -> Bytes {
    abi::encode(tokens).into()
}

#[tokio::test]
async fn test_run_stops_at_the_first_step_without_a_response() -> Result<()> {
    let (runner, _mock) = mocked_runner(Addresses::local());
    match runner.run().await {
        Err(RunnerError::Connection { step, .. }) => assert_eq!(step, Step::Symbol),
        other => panic!("expected a connection error, got {:?}", other.map(|_| ())),
    }
    Ok(())
}

#[tokio::test]
async fn test_run_reports_the_step_that_failed() -> Result<()> {
    let (runner, mock) = mocked_runner(Addresses::local());
    mock.push::<Bytes, _>(returns(&[Token::String("RA".to_string())]))?;

    // The symbol read succeeds and the block number read is the first one
    // left without an answer. Nothing after it runs.
    let err = runner.run().await.err().ok_or_else(|| eyre::eyre!("run succeeded"))?;
    assert!(matches!(err, RunnerError::Connection { .. }));
    assert_eq!(err.step(), Some(Step::BlockNumber));
    Ok(())
}

#[tokio::test]
async fn test_run_reads_everything_before_the_first_write() -> Result<()> {
    let addresses = Addresses::local();
    let (runner, mock) = mocked_runner(addresses);

    // Answers for steps 6 down to 1.
    mock.push::<Bytes, _>(returns(&[Token::Address(addresses.forwarder)]))?;
    mock.push::<Bytes, _>(returns(&[Token::Tuple(vec![
        Token::Address(addresses.token_0),
        Token::Address(addresses.token_1),
        Token::Uint(U256::from(3000)),
        Token::Int(U256::from(60)),
        Token::Address(addresses.cork_hook),
    ])]))?;
    mock.push::<Bytes, _>(returns(&[Token::Address(addresses.pool_manager)]))?;
    mock.push::<Bytes, _>(returns(&[Token::Uint(WEI_IN_ETHER * U256::from(7))]))?;
    mock.push::<U64, _>(U64::from(42))?;
    mock.push::<Bytes, _>(returns(&[Token::String("RA".to_string())]))?;

    // Every read is answered, the pair passes the guard, and the approval is
    // the first request that goes unanswered. Liquidity is never added.
    let err = runner.run().await.err().ok_or_else(|| eyre::eyre!("run succeeded"))?;
    assert!(matches!(err, RunnerError::Connection { .. }));
    assert_eq!(err.step(), Some(Step::Approve));
    Ok(())
}

#[tokio::test]
async fn test_run_skips_writes_for_an_unusable_pair() -> Result<()> {
    let local = Addresses::local();
    let addresses = Addresses {
        token_1: local.token_0,
        ..local
    };
    let (runner, mock) = mocked_runner(addresses);
    mock.push::<Bytes, _>(returns(&[Token::Address(addresses.forwarder)]))?;
    mock.push::<Bytes, _>(returns(&[Token::Tuple(vec![
        Token::Address(addresses.token_0),
        Token::Address(addresses.token_1),
        Token::Uint(U256::from(3000)),
        Token::Int(U256::from(60)),
        Token::Address(addresses.cork_hook),
    ])]))?;
    mock.push::<Bytes, _>(returns(&[Token::Address(addresses.pool_manager)]))?;
    mock.push::<Bytes, _>(returns(&[Token::Uint(U256::zero())]))?;
    mock.push::<U64, _>(U64::from(42))?;
    mock.push::<Bytes, _>(returns(&[Token::String("RA".to_string())]))?;

    let err = runner.run().await.err().ok_or_else(|| eyre::eyre!("run succeeded"))?;
    assert!(matches!(err, RunnerError::Validation { .. }));
    Ok(())
}

#[tokio::test]
async fn test_symbol() -> Result<()> {
    let (runner, mock) = mocked_runner(Addresses::local());
    mock.push::<Bytes, _>(returns(&[Token::String("RA".to_string())]))?;
    assert_eq!(runner.symbol().await?, "RA");
    Ok(())
}

#[tokio::test]
async fn test_balance_is_formatted() -> Result<()> {
    let (runner, mock) = mocked_runner(Addresses::local());
    let raw = WEI_IN_ETHER * U256::from(3) / U256::from(2);
    mock.push::<Bytes, _>(returns(&[Token::Uint(raw)]))?;
    assert_eq!(runner.balance().await?, "1.5");
    Ok(())
}

#[tokio::test]
async fn test_undecodable_data_is_an_execution_error() -> Result<()> {
    // A call to an address without code returns no data at all.
    let (runner, mock) = mocked_runner(Addresses::local());
    mock.push::<Bytes, _>(Bytes::default())?;
    match runner.symbol().await {
        Err(RunnerError::Execution { step, .. }) => assert_eq!(step, Step::Symbol),
        other => panic!("expected an execution error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_pool_key() -> Result<()> {
    let addresses = Addresses::local();
    let (runner, mock) = mocked_runner(addresses);
    mock.push::<Bytes, _>(returns(&[Token::Tuple(vec![
        Token::Address(addresses.token_0),
        Token::Address(addresses.token_1),
        Token::Uint(U256::from(3000)),
        Token::Int(U256::from(60)),
        Token::Address(addresses.cork_hook),
    ])]))?;

    let pool_key = runner.pool_key().await?;
    assert_eq!(pool_key.fee, 3000);
    assert_eq!(pool_key.tick_spacing, 60);
    assert_eq!(pool_key.hooks, addresses.cork_hook);
    Ok(())
}

#[tokio::test]
async fn test_pool_manager_and_forwarder() -> Result<()> {
    let addresses = Addresses::local();

    let (runner, mock) = mocked_runner(addresses);
    mock.push::<Bytes, _>(returns(&[Token::Address(addresses.pool_manager)]))?;
    assert_eq!(runner.pool_manager().await?, addresses.pool_manager);

    let (runner, mock) = mocked_runner(addresses);
    mock.push::<Bytes, _>(returns(&[Token::Address(addresses.forwarder)]))?;
    assert_eq!(runner.forwarder().await?, addresses.forwarder);
    Ok(())
}

#[tokio::test]
async fn test_liquidity_token() -> Result<()> {
    let (runner, mock) = mocked_runner(Addresses::local());
    let liquidity_token = Address::repeat_byte(0x1f);
    mock.push::<Bytes, _>(returns(&[Token::Address(liquidity_token)]))?;
    assert_eq!(runner.liquidity_token().await?, liquidity_token);
    Ok(())
}

#[tokio::test]
async fn test_token_pair_guard() -> Result<()> {
    let (runner, _mock) = mocked_runner(Addresses::local());
    runner.validate_tokens()?;

    // The guard runs before any write, so the run fails without a request
    // reaching the mock.
    let local = Addresses::local();
    for addresses in [
        Addresses {
            token_1: local.token_0,
            ..local
        },
        Addresses {
            token_0: Address::zero(),
            ..local
        },
    ] {
        let (runner, _mock) = mocked_runner(addresses);
        let err = runner.validate_tokens().err().ok_or_else(|| eyre::eyre!("accepted"))?;
        assert!(matches!(err, RunnerError::Validation { .. }));
        assert_eq!(err.step(), None);
    }
    Ok(())
}

#[tokio::test]
async fn test_inspection_reads() -> Result<()> {
    let (runner, mock) = mocked_runner(Addresses::local());
    mock.push::<Bytes, _>(returns(&[Token::Uint(U256::from(3)), Token::Uint(U256::from(5))]))?;
    let fee = runner.fee().await?;
    assert_eq!(fee.base, U256::from(3));
    assert_eq!(fee.actual, U256::from(5));

    let (runner, mock) = mocked_runner(Addresses::local());
    mock.push::<Bytes, _>(returns(&[Token::Uint(WEI_IN_ETHER / U256::from(2))]))?;
    assert_eq!(
        runner.amount_out(true, WEI_IN_ETHER).await?,
        WEI_IN_ETHER / U256::from(2)
    );

    let (runner, mock) = mocked_runner(Addresses::local());
    mock.push::<Bytes, _>(returns(&[Token::Uint(WEI_IN_ETHER * U256::from(2))]))?;
    assert_eq!(
        runner.amount_in(false, WEI_IN_ETHER).await?,
        WEI_IN_ETHER * U256::from(2)
    );

    let (runner, mock) = mocked_runner(Addresses::local());
    mock.push::<Bytes, _>(returns(&[Token::Uint(U256::MAX)]))?;
    assert_eq!(runner.allowance().await?, U256::MAX);

    // Each inspection read is tagged with its own step.
    let (runner, _mock) = mocked_runner(Addresses::local());
    assert_eq!(runner.fee().await.err().and_then(|err| err.step()), Some(Step::Fee));
    assert_eq!(
        runner.allowance().await.err().and_then(|err| err.step()),
        Some(Step::Allowance)
    );
    Ok(())
}
