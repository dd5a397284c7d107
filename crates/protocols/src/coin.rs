//! Custom coin module payloads. The module issues a single coin type,
//! `<module>::CustomCoin`.

use crate::payload::{TransactionRequest, ViewRequest, amount_arg, bytes_arg, small_arg};
use hybrid_dex_domain::value_objects::TokenAmount;
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct CoinContract<'a> {
    module: &'a str,
}

impl<'a> CoinContract<'a> {
    pub fn new(module: &'a str) -> Self {
        Self { module }
    }

    fn function(&self, name: &str) -> String {
        format!("{}::{name}", self.module)
    }

    #[must_use]
    pub fn coin_type(&self) -> String {
        format!("{}::CustomCoin", self.module)
    }

    fn call(&self, name: &str, args: Vec<Value>) -> TransactionRequest {
        TransactionRequest::new(self.function(name), vec![self.coin_type()], args)
    }

    /// Name and symbol are sent as UTF-8 byte vectors.
    #[must_use]
    pub fn initialize_coin(&self, name: &str, symbol: &str, decimals: u8, monitor_supply: bool) -> TransactionRequest {
        self.call(
            "initialize_coin",
            vec![
                bytes_arg(name),
                bytes_arg(symbol),
                small_arg(u32::from(decimals)),
                Value::Bool(monitor_supply),
            ],
        )
    }

    #[must_use]
    pub fn register_coin(&self) -> TransactionRequest {
        self.call("register_coin", vec![])
    }

    #[must_use]
    pub fn mint(&self, to: &str, amount: TokenAmount) -> TransactionRequest {
        self.call("mint", vec![Value::String(to.to_string()), amount_arg(amount)])
    }

    #[must_use]
    pub fn mint_with_admin(&self, to: &str, amount: TokenAmount) -> TransactionRequest {
        self.call(
            "mint_with_admin",
            vec![Value::String(to.to_string()), amount_arg(amount)],
        )
    }

    #[must_use]
    pub fn burn(&self, amount: TokenAmount) -> TransactionRequest {
        self.call("burn", vec![amount_arg(amount)])
    }

    #[must_use]
    pub fn transfer(&self, to: &str, amount: TokenAmount) -> TransactionRequest {
        self.call("transfer", vec![Value::String(to.to_string()), amount_arg(amount)])
    }

    /// Coin info is keyed by the admin account and takes no type argument.
    #[must_use]
    pub fn get_coin_info(&self, admin: &str) -> ViewRequest {
        ViewRequest::new(
            self.function("get_coin_info"),
            vec![],
            vec![Value::String(admin.to_string())],
        )
    }

    #[must_use]
    pub fn get_balance(&self, account: &str) -> ViewRequest {
        ViewRequest::new(
            self.function("get_balance"),
            vec![self.coin_type()],
            vec![Value::String(account.to_string())],
        )
    }

    #[must_use]
    pub fn is_account_registered(&self, account: &str) -> ViewRequest {
        ViewRequest::new(
            self.function("is_account_registered"),
            vec![self.coin_type()],
            vec![Value::String(account.to_string())],
        )
    }

    #[must_use]
    pub fn is_coin_initialized(&self, admin: &str) -> ViewRequest {
        ViewRequest::new(
            self.function("is_coin_initialized"),
            vec![self.coin_type()],
            vec![Value::String(admin.to_string())],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addresses::ContractAddresses;
    use serde_json::json;

    #[test]
    fn test_initialize_coin_payload() {
        let addrs = ContractAddresses::default();
        let tx = addrs.coin().initialize_coin("My", "MY", 8, true);
        assert_eq!(tx.type_arguments, vec![addrs.custom_coin_type()]);
        assert_eq!(
            tx.function_arguments,
            vec![json!([77, 121]), json!([77, 89]), json!(8), json!(true)]
        );
    }

    #[test]
    fn test_coin_info_has_no_type_argument() {
        let addrs = ContractAddresses::default();
        let view = addrs.coin().get_coin_info("0x1");
        assert!(view.type_arguments.is_empty());
    }
}
