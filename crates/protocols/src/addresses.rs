//! Deployed module addresses and the tokens known at startup.

use crate::amm::AmmContract;
use crate::clob::ClobContract;
use crate::coin::CoinContract;
use crate::router::RouterContract;
use hybrid_dex_domain::entities::Token;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;

/// Publisher account of the deployed modules.
pub const DEFAULT_PUBLISHER: &str =
    "0x1bb7e129d639ef1ca7e0d66a8d9af8f4af3ac2c40e0e3132a19a18ad85469a56";

/// Native coin type.
pub const APTOS_COIN: &str = "0x1::aptos_coin::AptosCoin";

/// USDC type on the target network.
pub const USDC_COIN: &str = "0xbae207659db88bea0cbead6da0ed00aac12edcdda169e591cd41c94180b46f3b";

/// Module paths (`0xADDR::module`) of the contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub amm: String,
    pub clob: String,
    pub router: String,
    pub custom_coin: String,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self::for_publisher(DEFAULT_PUBLISHER)
    }
}

impl ContractAddresses {
    /// All four modules under one publisher account.
    pub fn for_publisher(publisher: &str) -> Self {
        Self {
            amm: format!("{publisher}::amm"),
            clob: format!("{publisher}::clob"),
            router: format!("{publisher}::router"),
            custom_coin: format!("{publisher}::custom_coin"),
        }
    }

    /// Defaults overridden by `HYBRID_DEX_PUBLISHER`, then by the per-module
    /// `HYBRID_DEX_AMM_MODULE`, `HYBRID_DEX_CLOB_MODULE`,
    /// `HYBRID_DEX_ROUTER_MODULE` and `HYBRID_DEX_COIN_MODULE`.
    pub fn from_env() -> Self {
        let mut addresses = match env::var("HYBRID_DEX_PUBLISHER") {
            Ok(publisher) => Self::for_publisher(&publisher),
            Err(_) => Self::default(),
        };
        let overrides = [
            ("HYBRID_DEX_AMM_MODULE", &mut addresses.amm),
            ("HYBRID_DEX_CLOB_MODULE", &mut addresses.clob),
            ("HYBRID_DEX_ROUTER_MODULE", &mut addresses.router),
            ("HYBRID_DEX_COIN_MODULE", &mut addresses.custom_coin),
        ];
        for (key, slot) in overrides {
            if let Ok(value) = env::var(key) {
                debug!(key, value = %value, "Module address override");
                *slot = value;
            }
        }
        addresses
    }

    /// The single coin type the custom coin module issues.
    #[must_use]
    pub fn custom_coin_type(&self) -> String {
        format!("{}::CustomCoin", self.custom_coin)
    }

    #[must_use]
    pub fn amm(&self) -> AmmContract<'_> {
        AmmContract::new(&self.amm)
    }

    #[must_use]
    pub fn clob(&self) -> ClobContract<'_> {
        ClobContract::new(&self.clob)
    }

    #[must_use]
    pub fn router(&self) -> RouterContract<'_> {
        RouterContract::new(&self.router)
    }

    #[must_use]
    pub fn coin(&self) -> CoinContract<'_> {
        CoinContract::new(&self.custom_coin)
    }

    /// Tokens listed before any user registration.
    #[must_use]
    pub fn default_tokens(&self) -> Vec<Token> {
        vec![
            Token::new(APTOS_COIN, "APT", "Aptos Coin", 8),
            Token::new(self.custom_coin_type(), "MY", "My Token", 8),
            Token::new(USDC_COIN, "USDC", "USD Coin", 6),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_modules() {
        let addrs = ContractAddresses::default();
        assert_eq!(addrs.amm, format!("{DEFAULT_PUBLISHER}::amm"));
        assert_eq!(
            addrs.custom_coin_type(),
            format!("{DEFAULT_PUBLISHER}::custom_coin::CustomCoin")
        );
    }

    #[test]
    fn test_default_tokens_have_unique_addresses() {
        let tokens = ContractAddresses::default().default_tokens();
        assert_eq!(tokens.len(), 3);
        let usdc = tokens.iter().find(|t| t.symbol == "USDC").unwrap();
        assert_eq!(usdc.decimals, 6);
        assert!(hybrid_dex_domain::registry::TokenRegistry::with_tokens(tokens).is_ok());
    }
}
