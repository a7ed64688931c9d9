use ethers::{types::Address, utils::to_checksum};

use crate::errors::{Result, RunnerError};

/// Parses a hex address strictly. The input must be `0x` followed by 40 hex
/// digits. Lowercase input is accepted as is; any other casing has to match
/// the EIP-55 checksum exactly.
pub fn parse_address(input: &str) -> Result<Address> {
    let invalid = |reason: &str| RunnerError::validation(format!("address {:?}", input), reason);

    let digits = input
        .strip_prefix("0x")
        .ok_or_else(|| invalid("missing 0x prefix"))?;
    if digits.len() != 40 {
        return Err(invalid("expected 40 hex digits"));
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hex characters"));
    }
    let address = digits
        .parse::<Address>()
        .map_err(|err| invalid(&err.to_string()))?;
    if input.to_lowercase() != input && to_checksum(&address, None) != input {
        return Err(invalid("checksum mismatch"));
    }

    Ok(address)
}

/// Checks that a token pair can name a pool: neither side may be the zero
/// address and the two tokens must differ.
pub fn ensure_token_pair(token_0: Address, token_1: Address) -> Result<()> {
    if token_0.is_zero() || token_1.is_zero() {
        return Err(RunnerError::validation(
            "token pair",
            "the zero address is not a token",
        ));
    }
    if token_0 == token_1 {
        return Err(RunnerError::validation(
            "token pair",
            format!("both tokens are {:?}", token_0),
        ));
    }
    Ok(())
}
