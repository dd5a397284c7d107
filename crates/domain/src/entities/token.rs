use crate::value_objects::TokenAmount;
use serde::{Deserialize, Serialize};

/// A registered fungible token.
///
/// Identity is the on-chain type address; two tokens with the same address are
/// the same token regardless of symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Fully-qualified coin type, e.g. `0x1::aptos_coin::AptosCoin`.
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

impl Token {
    pub fn new(
        address: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
            name: name.into(),
            decimals,
        }
    }

    #[must_use]
    pub fn short_address(&self) -> String {
        shorten_address(&self.address)
    }
}

/// Coin metadata as reported by the coin info view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub supply: Option<TokenAmount>,
}

/// Renders `0x1234...abcd` for display. Short inputs are returned unchanged.
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 12 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
