use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use cork_addresses::Addresses;
use cork_wrappers::wrappers::{
    cork_hook::{CorkHook, PoolKey},
    ierc20::IERC20,
};
use ethers::{
    providers::Middleware,
    types::{Address, TransactionReceipt, H256, U256, U64},
};
use tracing::info;

use crate::{
    address::ensure_token_pair,
    config::Parameters,
    errors::{Result, RunnerError, Step},
    units::format_ether,
};

/// Everything a completed run read or wrote.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub symbol: String,
    pub block_number: U64,
    /// The caller's balance of token 0 in whole units.
    pub balance: String,
    pub pool_manager: Address,
    pub pool_key: PoolKey,
    pub forwarder: Address,
    pub approval_tx: H256,
    pub liquidity_tx: H256,
    pub liquidity_token: Address,
}

/// The hook's fee for a pair, in the hook's percentage units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fee {
    pub base: U256,
    pub actual: U256,
}

/// Drives the hook deployment through the liquidity sequence. Token 0 is the
/// redemption asset and token 1 is the cover token of the pair.
pub struct Runner<M: Middleware> {
    client: Arc<M>,
    caller: Address,
    addresses: Addresses,
    parameters: Parameters,
    token: IERC20<M>,
    hook: CorkHook<M>,
}

impl<M: Middleware + 'static> Runner<M> {
    pub fn new(
        client: Arc<M>,
        caller: Address,
        addresses: Addresses,
        parameters: Parameters,
    ) -> Self {
        let token = IERC20::new(addresses.token_0, client.clone());
        let hook = CorkHook::new(addresses.cork_hook, client.clone());
        Self {
            client,
            caller,
            addresses,
            parameters,
            token,
            hook,
        }
    }

    pub fn caller(&self) -> Address {
        self.caller
    }

    pub fn addresses(&self) -> &Addresses {
        &self.addresses
    }

    /// Runs every step in order. The first failure ends the run; writes that
    /// already went through stay on chain.
    pub async fn run(&self) -> Result<RunReport> {
        let symbol = self.symbol().await?;
        let block_number = self.block_number().await?;
        let balance = self.balance().await?;
        let pool_manager = self.pool_manager().await?;
        let pool_key = self.pool_key().await?;
        let forwarder = self.forwarder().await?;
        self.validate_tokens()?;
        let approval_tx = self.approve().await?;
        let liquidity_tx = self.add_liquidity().await?;
        let liquidity_token = self.liquidity_token().await?;

        Ok(RunReport {
            symbol,
            block_number,
            balance,
            pool_manager,
            pool_key,
            forwarder,
            approval_tx,
            liquidity_tx,
            liquidity_token,
        })
    }

    /// Step 1: token 0's symbol.
    pub async fn symbol(&self) -> Result<String> {
        let symbol = self
            .token
            .symbol()
            .call()
            .await
            .map_err(|err| RunnerError::from_contract_error(Step::Symbol, err))?;
        info!(step = %Step::Symbol, %symbol);
        Ok(symbol)
    }

    /// Step 2: the latest block number.
    pub async fn block_number(&self) -> Result<U64> {
        let block_number = self
            .client
            .get_block_number()
            .await
            .map_err(|err| RunnerError::from_middleware_error(Step::BlockNumber, err))?;
        info!(step = %Step::BlockNumber, %block_number);
        Ok(block_number)
    }

    /// Step 3: the caller's balance of token 0, formatted in whole units.
    pub async fn balance(&self) -> Result<String> {
        let raw = self
            .token
            .balance_of(self.caller)
            .call()
            .await
            .map_err(|err| RunnerError::from_contract_error(Step::Balance, err))?;
        let balance = format_ether(raw)?;
        info!(step = %Step::Balance, owner = ?self.caller, %balance);
        Ok(balance)
    }

    /// Step 4.
    pub async fn pool_manager(&self) -> Result<Address> {
        let pool_manager = self
            .hook
            .get_pool_manager()
            .call()
            .await
            .map_err(|err| RunnerError::from_contract_error(Step::PoolManager, err))?;
        info!(step = %Step::PoolManager, ?pool_manager);
        Ok(pool_manager)
    }

    /// Step 5: the pool key of the (token 0, token 1) pair.
    pub async fn pool_key(&self) -> Result<PoolKey> {
        let (currency_0, currency_1, fee, tick_spacing, hooks) = self
            .hook
            .get_pool_key(self.addresses.token_0, self.addresses.token_1)
            .call()
            .await
            .map_err(|err| RunnerError::from_contract_error(Step::PoolKey, err))?;
        let pool_key = PoolKey {
            currency_0,
            currency_1,
            fee,
            tick_spacing,
            hooks,
        };
        info!(step = %Step::PoolKey, ?pool_key);
        Ok(pool_key)
    }

    /// Step 6.
    pub async fn forwarder(&self) -> Result<Address> {
        let forwarder = self
            .hook
            .get_forwarder()
            .call()
            .await
            .map_err(|err| RunnerError::from_contract_error(Step::Forwarder, err))?;
        info!(step = %Step::Forwarder, ?forwarder);
        Ok(forwarder)
    }

    /// Step 7: refuses to write anything for a pair that can't name a pool.
    pub fn validate_tokens(&self) -> Result<()> {
        ensure_token_pair(self.addresses.token_0, self.addresses.token_1)?;
        info!(
            step = %Step::ValidateTokens,
            token_0 = ?self.addresses.token_0,
            token_1 = ?self.addresses.token_1,
            "token pair is usable"
        );
        Ok(())
    }

    /// Step 8: approves the hook to spend the caller's token 0 and waits for
    /// the approval to be mined.
    pub async fn approve(&self) -> Result<H256> {
        let receipt = self
            .token
            .approve(self.addresses.cork_hook, self.parameters.approval_amount)
            .from(self.caller)
            .send()
            .await
            .map_err(|err| RunnerError::from_contract_error(Step::Approve, err))?
            .confirmations(self.parameters.confirmations)
            .await
            .map_err(|err| RunnerError::from_middleware_error(Step::Approve, err))?;
        let tx_hash = ensure_success(Step::Approve, receipt)?;
        let amount = format_ether(self.parameters.approval_amount)?;
        info!(
            step = %Step::Approve,
            spender = ?self.addresses.cork_hook,
            %amount,
            ?tx_hash,
            "approved the hook"
        );
        Ok(tx_hash)
    }

    /// Step 9: adds liquidity to the pair with a deadline measured from now.
    pub async fn add_liquidity(&self) -> Result<H256> {
        let deadline = deadline_from_now(&self.parameters)?;
        let receipt = self
            .hook
            .add_liquidity(
                self.addresses.token_0,
                self.addresses.token_1,
                self.parameters.ra_amount,
                self.parameters.ct_amount,
                self.parameters.ra_min,
                self.parameters.ct_min,
                deadline,
            )
            .from(self.caller)
            .send()
            .await
            .map_err(|err| RunnerError::from_contract_error(Step::AddLiquidity, err))?
            .confirmations(self.parameters.confirmations)
            .await
            .map_err(|err| RunnerError::from_middleware_error(Step::AddLiquidity, err))?;
        let tx_hash = ensure_success(Step::AddLiquidity, receipt)?;
        info!(
            step = %Step::AddLiquidity,
            ra_amount = %self.parameters.ra_amount,
            ct_amount = %self.parameters.ct_amount,
            %deadline,
            ?tx_hash,
            "added liquidity"
        );
        Ok(tx_hash)
    }

    /// Step 10.
    pub async fn liquidity_token(&self) -> Result<Address> {
        let liquidity_token = self
            .hook
            .get_liquidity_token(self.addresses.token_0, self.addresses.token_1)
            .call()
            .await
            .map_err(|err| RunnerError::from_contract_error(Step::LiquidityToken, err))?;
        info!(step = %Step::LiquidityToken, ?liquidity_token);
        Ok(liquidity_token)
    }

    // Inspection reads. None of these are part of `run`.

    pub async fn fee(&self) -> Result<Fee> {
        let (base, actual) = self
            .hook
            .get_fee(self.addresses.token_0, self.addresses.token_1)
            .call()
            .await
            .map_err(|err| RunnerError::from_contract_error(Step::Fee, err))?;
        info!(step = %Step::Fee, %base, %actual);
        Ok(Fee { base, actual })
    }

    /// Quotes how much of the other side `amount_in` buys. `ra_for_ct` sells
    /// token 0 for token 1.
    pub async fn amount_out(&self, ra_for_ct: bool, amount_in: U256) -> Result<U256> {
        let amount_out = self
            .hook
            .get_amount_out(
                self.addresses.token_0,
                self.addresses.token_1,
                ra_for_ct,
                amount_in,
            )
            .call()
            .await
            .map_err(|err| RunnerError::from_contract_error(Step::AmountOut, err))?;
        info!(
            step = %Step::AmountOut,
            ra_for_ct,
            %amount_in,
            %amount_out,
            "quoted amount out"
        );
        Ok(amount_out)
    }

    /// Quotes how much has to go in to get `amount_out` back.
    pub async fn amount_in(&self, ra_for_ct: bool, amount_out: U256) -> Result<U256> {
        let amount_in = self
            .hook
            .get_amount_in(
                self.addresses.token_0,
                self.addresses.token_1,
                ra_for_ct,
                amount_out,
            )
            .call()
            .await
            .map_err(|err| RunnerError::from_contract_error(Step::AmountIn, err))?;
        info!(
            step = %Step::AmountIn,
            ra_for_ct,
            %amount_out,
            %amount_in,
            "quoted amount in"
        );
        Ok(amount_in)
    }

    /// The caller's current token 0 allowance toward the hook.
    pub async fn allowance(&self) -> Result<U256> {
        let allowance = self
            .token
            .allowance(self.caller, self.addresses.cork_hook)
            .call()
            .await
            .map_err(|err| RunnerError::from_contract_error(Step::Allowance, err))?;
        info!(step = %Step::Allowance, %allowance);
        Ok(allowance)
    }
}

/// A transaction only counts once it's mined with a successful status.
fn ensure_success(step: Step, receipt: Option<TransactionReceipt>) -> Result<H256> {
    let receipt = receipt.ok_or_else(|| RunnerError::Execution {
        step,
        reason: "transaction was dropped".to_string(),
    })?;
    if receipt.status != Some(U64::one()) {
        return Err(RunnerError::Execution {
            step,
            reason: format!("transaction {:?} reverted", receipt.transaction_hash),
        });
    }
    Ok(receipt.transaction_hash)
}

fn deadline_from_now(parameters: &Parameters) -> Result<U256> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| RunnerError::Config(format!("system clock: {}", err)))?;
    let deadline = now.checked_add(parameters.deadline).ok_or_else(|| {
        RunnerError::Config(format!(
            "a deadline {} seconds out doesn't fit in a timestamp",
            parameters.deadline.as_secs()
        ))
    })?;
    Ok(U256::from(deadline.as_secs()))
}
