use std::env;

use cork_runner::revert::{decode_revert, parse_revert_data};
use eyre::{eyre, Result};

/// Decodes revert data copied out of a failed call, e.g.
/// `decode_error 0x203d82d8`.
fn main() -> Result<()> {
    let input = env::args()
        .nth(1)
        .ok_or_else(|| eyre!("usage: decode_error <hex revert data>"))?;
    let data = parse_revert_data(&input)?;
    println!("{}", decode_revert(&data));
    Ok(())
}
