use std::fmt;

use ethers::{
    contract::ContractError,
    providers::{Middleware, MiddlewareError},
};
use thiserror::Error;

use crate::revert::decode_revert;

/// The points in a run at which something can go wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Connect,
    Symbol,
    BlockNumber,
    Balance,
    PoolManager,
    PoolKey,
    Forwarder,
    ValidateTokens,
    Approve,
    AddLiquidity,
    LiquidityToken,
    // Inspection reads.
    Fee,
    AmountOut,
    AmountIn,
    Allowance,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Connect => "connect",
            Step::Symbol => "symbol",
            Step::BlockNumber => "block number",
            Step::Balance => "balance",
            Step::PoolManager => "pool manager",
            Step::PoolKey => "pool key",
            Step::Forwarder => "forwarder",
            Step::ValidateTokens => "validate tokens",
            Step::Approve => "approve",
            Step::AddLiquidity => "add liquidity",
            Step::LiquidityToken => "liquidity token",
            Step::Fee => "fee",
            Step::AmountOut => "amount out",
            Step::AmountIn => "amount in",
            Step::Allowance => "allowance",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    /// An input was rejected before it was sent anywhere.
    #[error("invalid {subject}: {reason}")]
    Validation { subject: String, reason: String },
    #[error("configuration error: {0}")]
    Config(String),
    /// The node couldn't be reached or didn't answer.
    #[error("{step}: connection failed: {message}")]
    Connection { step: Step, message: String },
    /// The node answered, but the call or transaction failed.
    #[error("{step}: execution failed: {reason}")]
    Execution { step: Step, reason: String },
}

pub type Result<T> = std::result::Result<T, RunnerError>;

impl RunnerError {
    pub fn validation(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    /// The step that failed. Validation and configuration errors happen
    /// outside of a step unless the token pair guard raised them.
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Connection { step, .. } | Self::Execution { step, .. } => Some(*step),
            Self::Validation { .. } | Self::Config(_) => None,
        }
    }

    /// Classifies an error coming out of the middleware stack. Anything the
    /// node answered with a JSON-RPC error object is an execution failure;
    /// everything else never made it to a response.
    pub fn from_middleware_error<E: MiddlewareError>(step: Step, err: E) -> Self {
        match err.as_error_response() {
            Some(response) => {
                let reason = match response.as_revert_data() {
                    Some(data) if !data.is_empty() => decode_revert(&data),
                    _ => response.message.clone(),
                };
                Self::Execution { step, reason }
            }
            None => Self::Connection {
                step,
                message: err.to_string(),
            },
        }
    }

    /// Classifies an error produced by a contract call or send.
    pub fn from_contract_error<M: Middleware>(step: Step, err: ContractError<M>) -> Self {
        match err {
            ContractError::Revert(data) => Self::Execution {
                step,
                reason: decode_revert(&data),
            },
            ContractError::MiddlewareError { e } => Self::from_middleware_error(step, e),
            ContractError::ProviderError { e } => Self::from_middleware_error(step, e),
            // Decoding failures mean the node returned data that doesn't fit
            // the interface, which usually means there's no contract there.
            other => Self::Execution {
                step,
                reason: other.to_string(),
            },
        }
    }
}
