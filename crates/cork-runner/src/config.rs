use std::{env, time::Duration};

use cork_addresses::Addresses;
use ethers::{signers::LocalWallet, types::U256};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    address::parse_address,
    constants::DEFAULT_ETHEREUM_URL,
    errors::{Result, RunnerError},
    infra::query_addresses,
    units::parse_ether,
};

/// The prefix shared by every environment variable the runner reads.
pub const ENV_PREFIX: &str = "CORK_";

/// The unprefixed variable that older local setups keep the anvil key in.
pub const FALLBACK_PRIVATE_KEY_VAR: &str = "ANVIL_ACCOUNT_1";

fn default_ethereum_url() -> String {
    DEFAULT_ETHEREUM_URL.to_string()
}

fn default_approval_amount() -> String {
    "10000".to_string()
}

fn default_liquidity_amount() -> String {
    "1".to_string()
}

fn default_minimum_amount() -> String {
    "0".to_string()
}

fn default_deadline_secs() -> u64 {
    60 * 60 // 1 hour
}

fn default_confirmations() -> usize {
    1
}

/// The raw configuration as it appears in the environment. Every key is read
/// with the `CORK_` prefix, so `ethereum_url` comes from `CORK_ETHEREUM_URL`.
/// Amounts are decimal strings in whole token units.
#[derive(Clone, Deserialize)]
pub struct EnvConfig {
    #[serde(default = "default_ethereum_url")]
    pub ethereum_url: String,
    pub private_key: Option<String>,
    pub artifacts_url: Option<String>,
    // address overrides
    pub token_0: Option<String>,
    pub token_1: Option<String>,
    pub hook: Option<String>,
    pub pool_manager: Option<String>,
    pub forwarder: Option<String>,
    // run parameters
    #[serde(default = "default_approval_amount")]
    pub approval_amount: String,
    #[serde(default = "default_liquidity_amount")]
    pub ra_amount: String,
    #[serde(default = "default_liquidity_amount")]
    pub ct_amount: String,
    #[serde(default = "default_minimum_amount")]
    pub ra_min: String,
    #[serde(default = "default_minimum_amount")]
    pub ct_min: String,
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
    #[serde(default = "default_confirmations")]
    pub confirmations: usize,
    #[serde(default = "default_liquidity_amount")]
    pub quote_amount: String,
}

impl EnvConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env::<Self>()
            .map_err(|err| RunnerError::Config(err.to_string()))
    }

    /// Reads the configuration from a list of key-value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .map_err(|err| RunnerError::Config(err.to_string()))
    }
}

/// The amounts and limits used by the run's write calls. All amounts are in
/// the token's smallest unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameters {
    /// The allowance granted to the hook.
    pub approval_amount: U256,
    pub ra_amount: U256,
    pub ct_amount: U256,
    pub ra_min: U256,
    pub ct_min: U256,
    /// How far in the future the add liquidity deadline is set.
    pub deadline: Duration,
    /// How many confirmations to wait for after each write.
    pub confirmations: usize,
}

impl Default for Parameters {
    fn default() -> Self {
        let one = ethers::utils::WEI_IN_ETHER;
        Self {
            approval_amount: one * U256::from(10_000),
            ra_amount: one,
            ct_amount: one,
            ra_min: U256::zero(),
            ct_min: U256::zero(),
            deadline: Duration::from_secs(default_deadline_secs()),
            confirmations: default_confirmations(),
        }
    }
}

/// The fully resolved configuration of a run.
pub struct RunnerConfig {
    pub ethereum_url: String,
    pub signer: LocalWallet,
    pub addresses: Addresses,
    pub parameters: Parameters,
    /// The input amount used by the inspection quotes.
    pub quote_amount: U256,
}

impl RunnerConfig {
    /// Loads a `.env` file if there is one and resolves the configuration from
    /// the environment.
    pub async fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded environment file");
        }
        let fallback_key = env::var(FALLBACK_PRIVATE_KEY_VAR).ok();
        Self::resolve(EnvConfig::from_env()?, fallback_key).await
    }

    /// Validates the raw configuration. Addresses start from the artifacts
    /// server if one is configured and from the local deployment otherwise;
    /// individual addresses can be overridden on top of either.
    pub async fn resolve(raw: EnvConfig, fallback_key: Option<String>) -> Result<Self> {
        // Never echo the key back in an error.
        let private_key = raw.private_key.or(fallback_key).ok_or_else(|| {
            RunnerError::Config(format!(
                "{}PRIVATE_KEY or {} must be set",
                ENV_PREFIX, FALLBACK_PRIVATE_KEY_VAR
            ))
        })?;
        let signer = private_key
            .trim()
            .parse::<LocalWallet>()
            .map_err(|_| RunnerError::Config("the private key is malformed".to_string()))?;

        let mut addresses = match &raw.artifacts_url {
            Some(artifacts_url) => query_addresses(artifacts_url).await?,
            None => Addresses::local(),
        };
        let overrides = [
            (&raw.token_0, &mut addresses.token_0),
            (&raw.token_1, &mut addresses.token_1),
            (&raw.hook, &mut addresses.cork_hook),
            (&raw.pool_manager, &mut addresses.pool_manager),
            (&raw.forwarder, &mut addresses.forwarder),
        ];
        for (input, address) in overrides {
            if let Some(input) = input {
                *address = parse_address(input.trim())?;
            }
        }

        if raw.confirmations == 0 {
            return Err(RunnerError::Config(
                "at least one confirmation is required".to_string(),
            ));
        }
        let parameters = Parameters {
            approval_amount: parse_ether(&raw.approval_amount)?,
            ra_amount: parse_ether(&raw.ra_amount)?,
            ct_amount: parse_ether(&raw.ct_amount)?,
            ra_min: parse_ether(&raw.ra_min)?,
            ct_min: parse_ether(&raw.ct_min)?,
            deadline: Duration::from_secs(raw.deadline_secs),
            confirmations: raw.confirmations,
        };
        let quote_amount = parse_ether(&raw.quote_amount)?;

        info!(
            ethereum_url = %raw.ethereum_url,
            ?addresses,
            "resolved configuration"
        );

        Ok(Self {
            ethereum_url: raw.ethereum_url,
            signer,
            addresses,
            parameters,
            quote_amount,
        })
    }
}
