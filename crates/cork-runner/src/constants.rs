use std::env;

use ethers::signers::LocalWallet;

/// The RPC endpoint of a local anvil node.
pub const DEFAULT_ETHEREUM_URL: &str = "http://localhost:8545";

lazy_static! {
    // The first of anvil's pre-funded development accounts. Every anvil node
    // derives it from the same default mnemonic.
    pub static ref DEV_ACCOUNT: LocalWallet =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".parse().unwrap();

    // The Ethereum URL the tests should connect to. If None, then the tests
    // will spawn an anvil node.
    pub static ref MAYBE_ETHEREUM_URL: Option<String> = env::var("CORK_ETHEREUM_URL").ok();
}
