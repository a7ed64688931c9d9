use ethers::{
    types::U256,
    utils::{self, ParseUnits},
};

use crate::errors::{Result, RunnerError};

/// The number of decimals that token amounts are displayed with.
pub const DECIMALS: u32 = 18;

/// Converts a decimal string like `"10000"` or `"0.5"` into its smallest unit
/// representation.
pub fn parse_units(amount: &str, decimals: u32) -> Result<U256> {
    let invalid = |reason: String| RunnerError::validation(format!("amount {:?}", amount), reason);
    match utils::parse_units(amount.trim(), decimals).map_err(|err| invalid(err.to_string()))? {
        ParseUnits::U256(parsed) => Ok(parsed),
        ParseUnits::I256(_) => Err(invalid("amounts can't be negative".to_string())),
    }
}

/// Renders an amount in smallest units as a decimal string. The result is
/// exactly `amount / 10^decimals` with trailing fractional zeros removed.
pub fn format_units(amount: U256, decimals: u32) -> Result<String> {
    let formatted = utils::format_units(amount, decimals)
        .map_err(|err| RunnerError::validation("decimals", err.to_string()))?;
    if !formatted.contains('.') {
        return Ok(formatted);
    }
    Ok(formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string())
}

/// Shorthand for `parse_units(amount, 18)`.
pub fn parse_ether(amount: &str) -> Result<U256> {
    parse_units(amount, DECIMALS)
}

/// Shorthand for `format_units(amount, 18)`.
pub fn format_ether(amount: U256) -> Result<String> {
    format_units(amount, DECIMALS)
}
