use ethers::types::{Address, H160};
use serde::{Deserialize, Serialize};

/// The addresses that the local deployment script produces when it is run
/// against a fresh anvil node with the default deployer.
pub mod local {
    use super::*;

    pub const TOKEN_0: Address = H160([
        0x9f, 0xe4, 0x67, 0x36, 0x67, 0x9d, 0x2d, 0x9a, 0x65, 0xf0, 0x99, 0x2f, 0x22, 0x72, 0xde,
        0x9f, 0x3c, 0x7f, 0xa6, 0xe0,
    ]);
    pub const TOKEN_1: Address = H160([
        0xcf, 0x7e, 0xd3, 0xac, 0xca, 0x5a, 0x46, 0x7e, 0x9e, 0x70, 0x4c, 0x70, 0x3e, 0x8d, 0x87,
        0xf6, 0x34, 0xfb, 0x0f, 0xc9,
    ]);
    pub const CORK_HOOK: Address = H160([
        0x0e, 0x14, 0x32, 0x6e, 0x2e, 0x15, 0xbd, 0xd0, 0x3a, 0xd9, 0xb2, 0x7e, 0x12, 0xae, 0xcf,
        0x8e, 0x79, 0xbd, 0x6a, 0x88,
    ]);
    pub const POOL_MANAGER: Address = H160([
        0xe7, 0xf1, 0x72, 0x5e, 0x77, 0x34, 0xce, 0x28, 0x8f, 0x83, 0x67, 0xe1, 0xbb, 0x14, 0x3e,
        0x90, 0xbb, 0x3f, 0x05, 0x12,
    ]);
    pub const FORWARDER: Address = H160([
        0xb7, 0xf8, 0xbc, 0x63, 0xbb, 0xca, 0xd1, 0x81, 0x55, 0x20, 0x13, 0x08, 0xc8, 0xf3, 0x54,
        0x0b, 0x07, 0xf8, 0x4f, 0x5e,
    ]);
}

/// The address book of a Cork deployment. The JSON form uses camel case keys
/// so that it matches what the artifacts server hands out.
#[derive(Default, Debug, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addresses {
    /// The redemption asset side of the pair.
    pub token_0: Address,
    /// The cover token side of the pair.
    pub token_1: Address,
    pub cork_hook: Address,
    pub pool_manager: Address,
    pub forwarder: Address,
}

impl Addresses {
    /// The address book of a local anvil deployment.
    pub fn local() -> Self {
        Self {
            token_0: local::TOKEN_0,
            token_1: local::TOKEN_1,
            cork_hook: local::CORK_HOOK,
            pool_manager: local::POOL_MANAGER,
            forwarder: local::FORWARDER,
        }
    }
}
