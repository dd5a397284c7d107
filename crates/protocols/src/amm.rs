//! AMM module payloads.
//!
//! Every pool call takes a [`PoolKey`], so type arguments are always in
//! canonical order.

use crate::payload::{TransactionRequest, ViewRequest, amount_arg, small_arg, u128_arg};
use hybrid_dex_domain::entities::PoolKey;
use hybrid_dex_domain::value_objects::TokenAmount;
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct AmmContract<'a> {
    module: &'a str,
}

impl<'a> AmmContract<'a> {
    pub fn new(module: &'a str) -> Self {
        Self { module }
    }

    fn function(&self, name: &str) -> String {
        format!("{}::{name}", self.module)
    }

    /// One-time module setup by the deployer.
    #[must_use]
    pub fn initialize(&self) -> TransactionRequest {
        TransactionRequest::new(self.function("initialize"), vec![], vec![])
    }

    #[must_use]
    pub fn create_pool(&self, pool: &PoolKey) -> TransactionRequest {
        TransactionRequest::new(
            self.function("create_pool"),
            pool.type_arguments(),
            vec![small_arg(pool.fee_tier.bps())],
        )
    }

    #[must_use]
    pub fn add_liquidity(
        &self,
        pool: &PoolKey,
        amount_x: TokenAmount,
        amount_y: TokenAmount,
        min_liquidity: TokenAmount,
    ) -> TransactionRequest {
        TransactionRequest::new(
            self.function("add_liquidity"),
            pool.type_arguments(),
            vec![
                small_arg(pool.fee_tier.bps()),
                amount_arg(amount_x),
                amount_arg(amount_y),
                amount_arg(min_liquidity),
            ],
        )
    }

    #[must_use]
    pub fn remove_liquidity(
        &self,
        pool: &PoolKey,
        liquidity: u128,
        min_amount_x: TokenAmount,
        min_amount_y: TokenAmount,
    ) -> TransactionRequest {
        TransactionRequest::new(
            self.function("remove_liquidity"),
            pool.type_arguments(),
            vec![
                small_arg(pool.fee_tier.bps()),
                u128_arg(liquidity),
                amount_arg(min_amount_x),
                amount_arg(min_amount_y),
            ],
        )
    }

    #[must_use]
    pub fn swap_exact_in(
        &self,
        pool: &PoolKey,
        amount_in: TokenAmount,
        min_amount_out: TokenAmount,
        x_to_y: bool,
    ) -> TransactionRequest {
        TransactionRequest::new(
            self.function("swap_exact_in"),
            pool.type_arguments(),
            vec![
                small_arg(pool.fee_tier.bps()),
                amount_arg(amount_in),
                amount_arg(min_amount_out),
                Value::Bool(x_to_y),
            ],
        )
    }

    #[must_use]
    pub fn get_pool_reserves(&self, pool: &PoolKey) -> ViewRequest {
        ViewRequest::new(
            self.function("get_pool_reserves"),
            pool.type_arguments(),
            vec![small_arg(pool.fee_tier.bps())],
        )
    }

    /// Note the argument order differs from the swap: amount first.
    #[must_use]
    pub fn quote_swap_exact_in(&self, pool: &PoolKey, amount_in: TokenAmount, x_to_y: bool) -> ViewRequest {
        ViewRequest::new(
            self.function("quote_swap_exact_in"),
            pool.type_arguments(),
            vec![
                amount_arg(amount_in),
                small_arg(pool.fee_tier.bps()),
                Value::Bool(x_to_y),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addresses::ContractAddresses;
    use hybrid_dex_domain::enums::FeeTier;
    use serde_json::json;

    #[test]
    fn test_create_pool_uses_canonical_order() {
        let addrs = ContractAddresses::default();
        let key = PoolKey::new("0xBBB", "0xAAA", FeeTier::High).unwrap();
        let tx = addrs.amm().create_pool(&key);
        assert!(tx.function.ends_with("::amm::create_pool"));
        assert_eq!(tx.type_arguments, vec!["0xAAA", "0xBBB"]);
        assert_eq!(tx.function_arguments, vec![json!(30)]);
    }

    #[test]
    fn test_swap_arguments() {
        let addrs = ContractAddresses::default();
        let key = PoolKey::new("0xAAA", "0xBBB", FeeTier::Low).unwrap();
        let tx = addrs.amm().swap_exact_in(
            &key,
            TokenAmount::from(1_000u64),
            TokenAmount::from(990u64),
            false,
        );
        assert_eq!(
            tx.function_arguments,
            vec![json!(5), json!("1000"), json!("990"), json!(false)]
        );
    }

    #[test]
    fn test_quote_argument_order() {
        let addrs = ContractAddresses::default();
        let key = PoolKey::new("0xAAA", "0xBBB", FeeTier::Low).unwrap();
        let view = addrs.amm().quote_swap_exact_in(&key, TokenAmount::from(7u64), true);
        assert_eq!(view.function_arguments, vec![json!("7"), json!(5), json!(true)]);
    }
}
