//! Router module payloads.

use crate::payload::{TransactionRequest, ViewRequest, amount_arg, small_arg, u64_arg};
use hybrid_dex_domain::entities::PoolKey;
use hybrid_dex_domain::enums::{FeeTier, OrderSide};
use hybrid_dex_domain::value_objects::TokenAmount;
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct RouterContract<'a> {
    module: &'a str,
}

impl<'a> RouterContract<'a> {
    pub fn new(module: &'a str) -> Self {
        Self { module }
    }

    fn function(&self, name: &str) -> String {
        format!("{}::{name}", self.module)
    }

    #[must_use]
    pub fn swap_exact_input_single(
        &self,
        pool: &PoolKey,
        amount_in: TokenAmount,
        min_amount_out: TokenAmount,
        x_to_y: bool,
    ) -> TransactionRequest {
        TransactionRequest::new(
            self.function("swap_exact_input_single"),
            pool.type_arguments(),
            vec![
                small_arg(pool.fee_tier.bps()),
                amount_arg(amount_in),
                amount_arg(min_amount_out),
                Value::Bool(x_to_y),
            ],
        )
    }

    /// Type arguments follow the path: input, intermediate, output.
    #[must_use]
    pub fn swap_exact_input_multihop(
        &self,
        path: [&str; 3],
        fee_tiers: [FeeTier; 2],
        amount_in: TokenAmount,
        min_amount_out: TokenAmount,
    ) -> TransactionRequest {
        TransactionRequest::new(
            self.function("swap_exact_input_multihop"),
            path.iter().map(|t| (*t).to_string()).collect(),
            vec![
                small_arg(fee_tiers[0].bps()),
                small_arg(fee_tiers[1].bps()),
                amount_arg(amount_in),
                amount_arg(min_amount_out),
            ],
        )
    }

    #[must_use]
    pub fn arbitrage_amm_clob(
        &self,
        base: &str,
        quote: &str,
        amm_fee_tier: FeeTier,
        clob_side: OrderSide,
        clob_price_scaled: u64,
        amount: TokenAmount,
    ) -> TransactionRequest {
        TransactionRequest::new(
            self.function("arbitrage_amm_clob"),
            vec![base.to_string(), quote.to_string()],
            vec![
                small_arg(amm_fee_tier.bps()),
                small_arg(u32::from(clob_side.code())),
                u64_arg(clob_price_scaled),
                amount_arg(amount),
            ],
        )
    }

    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn split_order_execution(
        &self,
        token_in: &str,
        token_out: &str,
        total_amount: TokenAmount,
        amm_portion: TokenAmount,
        amm_fee_tier: FeeTier,
        clob_price_scaled: u64,
        min_total_output: TokenAmount,
    ) -> TransactionRequest {
        TransactionRequest::new(
            self.function("split_order_execution"),
            vec![token_in.to_string(), token_out.to_string()],
            vec![
                amount_arg(total_amount),
                amount_arg(amm_portion),
                small_arg(amm_fee_tier.bps()),
                u64_arg(clob_price_scaled),
                amount_arg(min_total_output),
            ],
        )
    }

    #[must_use]
    pub fn get_best_route(&self, token_x: &str, token_y: &str, amount_in: TokenAmount, x_to_y: bool) -> ViewRequest {
        ViewRequest::new(
            self.function("get_best_route"),
            vec![token_x.to_string(), token_y.to_string()],
            vec![amount_arg(amount_in), Value::Bool(x_to_y)],
        )
    }

    #[must_use]
    pub fn check_arbitrage_opportunity(&self, base: &str, quote: &str, amm_fee_tier: FeeTier) -> ViewRequest {
        ViewRequest::new(
            self.function("check_arbitrage_opportunity"),
            vec![base.to_string(), quote.to_string()],
            vec![small_arg(amm_fee_tier.bps())],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addresses::ContractAddresses;
    use serde_json::json;

    #[test]
    fn test_multihop_keeps_path_order() {
        let addrs = ContractAddresses::default();
        let tx = addrs.router().swap_exact_input_multihop(
            ["0xCCC", "0xAAA", "0xBBB"],
            [FeeTier::Low, FeeTier::High],
            TokenAmount::from(100u64),
            TokenAmount::from(95u64),
        );
        assert_eq!(tx.type_arguments, vec!["0xCCC", "0xAAA", "0xBBB"]);
        assert_eq!(
            tx.function_arguments,
            vec![json!(5), json!(30), json!("100"), json!("95")]
        );
    }

    #[test]
    fn test_arbitrage_payload() {
        let addrs = ContractAddresses::default();
        let tx = addrs.router().arbitrage_amm_clob(
            "0xAAA",
            "0xBBB",
            FeeTier::Low,
            OrderSide::Sell,
            12_475_000,
            TokenAmount::from(500_000_000u64),
        );
        assert_eq!(tx.function_name(), "arbitrage_amm_clob");
        assert_eq!(
            tx.function_arguments,
            vec![json!(5), json!(1), json!("12475000"), json!("500000000")]
        );
    }
}
