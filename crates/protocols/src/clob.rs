//! CLOB module payloads. Prices are already scaled by 10^6 and sizes are
//! raw base units.

use crate::payload::{TransactionRequest, ViewRequest, amount_arg, small_arg, u64_arg};
use hybrid_dex_domain::entities::Token;
use hybrid_dex_domain::enums::OrderSide;
use hybrid_dex_domain::value_objects::TokenAmount;
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct ClobContract<'a> {
    module: &'a str,
}

impl<'a> ClobContract<'a> {
    pub fn new(module: &'a str) -> Self {
        Self { module }
    }

    fn function(&self, name: &str) -> String {
        format!("{}::{name}", self.module)
    }

    fn market(base: &Token, quote: &Token) -> Vec<String> {
        vec![base.address.clone(), quote.address.clone()]
    }

    #[must_use]
    pub fn create_market(&self, base: &Token, quote: &Token, tick_size: u64, lot_size: u64) -> TransactionRequest {
        TransactionRequest::new(
            self.function("create_market"),
            Self::market(base, quote),
            vec![u64_arg(tick_size), u64_arg(lot_size)],
        )
    }

    #[must_use]
    pub fn place_limit_order(
        &self,
        base: &Token,
        quote: &Token,
        side: OrderSide,
        price_scaled: u64,
        size: TokenAmount,
    ) -> TransactionRequest {
        TransactionRequest::new(
            self.function("place_limit_order"),
            Self::market(base, quote),
            vec![
                small_arg(u32::from(side.code())),
                u64_arg(price_scaled),
                amount_arg(size),
            ],
        )
    }

    #[must_use]
    pub fn place_market_order(
        &self,
        base: &Token,
        quote: &Token,
        side: OrderSide,
        size: TokenAmount,
    ) -> TransactionRequest {
        TransactionRequest::new(
            self.function("place_market_order"),
            Self::market(base, quote),
            vec![small_arg(u32::from(side.code())), amount_arg(size)],
        )
    }

    #[must_use]
    pub fn cancel_order(&self, base: &Token, quote: &Token, order_id: &str) -> TransactionRequest {
        TransactionRequest::new(
            self.function("cancel_order"),
            Self::market(base, quote),
            vec![Value::String(order_id.to_string())],
        )
    }

    #[must_use]
    pub fn get_best_bid_ask(&self, base: &Token, quote: &Token) -> ViewRequest {
        ViewRequest::new(self.function("get_best_bid_ask"), Self::market(base, quote), vec![])
    }

    #[must_use]
    pub fn get_order_book_depth(&self, base: &Token, quote: &Token, levels: u32) -> ViewRequest {
        ViewRequest::new(
            self.function("get_order_book_depth"),
            Self::market(base, quote),
            vec![small_arg(levels)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addresses::ContractAddresses;
    use serde_json::json;

    fn pair() -> (Token, Token) {
        (
            Token::new("0x1::aptos_coin::AptosCoin", "APT", "Aptos Coin", 8),
            Token::new("0xbae2::usdc::USDC", "USDC", "USD Coin", 6),
        )
    }

    #[test]
    fn test_limit_order_payload() {
        let addrs = ContractAddresses::default();
        let (apt, usdc) = pair();
        let tx = addrs.clob().place_limit_order(
            &apt,
            &usdc,
            OrderSide::Sell,
            12_450_000,
            TokenAmount::from(100_000_000u64),
        );
        assert_eq!(tx.function_name(), "place_limit_order");
        assert_eq!(tx.type_arguments[0], apt.address);
        assert_eq!(
            tx.function_arguments,
            vec![json!(1), json!("12450000"), json!("100000000")]
        );
    }

    #[test]
    fn test_depth_view() {
        let addrs = ContractAddresses::default();
        let (apt, usdc) = pair();
        let view = addrs.clob().get_order_book_depth(&apt, &usdc, 10);
        assert_eq!(view.function_arguments, vec![json!(10)]);
    }
}
