use cork_wrappers::wrappers::{cork_hook::CORKHOOK_ABI, ierc20::IERC20_ABI};
use ethers::{
    abi::{self, AbiDecode, Token},
    types::U256,
    utils::hex,
};

const SELECTOR_LEN: usize = 4;

/// `Error(string)`
const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// `Panic(uint256)`
const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// Renders revert data as something a person can read.
///
/// String reasons and panic codes are decoded directly. Custom errors are
/// looked up in the hook and token interfaces. If the arguments of a known
/// error don't decode, the error's name is still reported. Anything else is
/// printed as hex.
pub fn decode_revert(data: &[u8]) -> String {
    if data.is_empty() {
        return "reverted without data".to_string();
    }
    if data.len() < SELECTOR_LEN {
        return format!("reverted with 0x{}", hex::encode(data));
    }

    let (selector, args) = data.split_at(SELECTOR_LEN);
    if selector == ERROR_STRING_SELECTOR {
        if let Ok(reason) = String::decode(args) {
            return reason;
        }
    }
    if selector == PANIC_SELECTOR {
        if let Ok(code) = U256::decode(args) {
            return format!("panic code {:#x}", code);
        }
    }

    for error in CORKHOOK_ABI.errors().chain(IERC20_ABI.errors()) {
        let kinds = error
            .inputs
            .iter()
            .map(|param| param.kind.clone())
            .collect::<Vec<_>>();
        if abi::short_signature(&error.name, &kinds) != selector {
            continue;
        }
        return match abi::decode(&kinds, args) {
            Ok(tokens) => format!("{}({})", error.name, format_tokens(&tokens)),
            Err(_) => format!("{}(<undecodable arguments>)", error.name),
        };
    }

    format!("unknown error 0x{}", hex::encode(data))
}

fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| match token {
            Token::Address(address) => format!("{:?}", address),
            token => token.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses hex encoded revert data, with or without a `0x` prefix.
pub fn parse_revert_data(input: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let input = input.trim();
    hex::decode(input.strip_prefix("0x").unwrap_or(input))
}
