//! Single-step custom coin actions and token bookkeeping.

use crate::error::{ExecutionError, Result};
use crate::workflow::store::TokenRegistryStore;
use hybrid_dex_domain::entities::{CoinInfo, Token};
use hybrid_dex_domain::math::units;
use hybrid_dex_domain::registry::TokenRegistry;
use hybrid_dex_domain::value_objects::TokenAmount;
use hybrid_dex_protocols::addresses::ContractAddresses;
use hybrid_dex_protocols::client::{ClientError, TransactionSigner, TxReceipt, ViewClient, submit};
use hybrid_dex_protocols::views::{parse_balance, parse_coin_info, parse_flag};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

pub struct TokenAdmin {
    addresses: ContractAddresses,
    registry: Arc<TokenRegistryStore>,
}

impl TokenAdmin {
    pub fn new(addresses: ContractAddresses, registry: Arc<TokenRegistryStore>) -> Self {
        Self {
            addresses,
            registry,
        }
    }

    fn raw_amount(token: &Token, amount: Decimal) -> Result<TokenAmount> {
        let raw = units::to_raw_units(amount, token.decimals)?;
        if raw.is_zero() {
            return Err(ExecutionError::InvalidInput(format!(
                "amount {amount} is below one unit of {}",
                token.symbol
            )));
        }
        Ok(raw)
    }

    fn require_recipient(to: &str) -> Result<()> {
        if to.trim().is_empty() {
            return Err(ExecutionError::InvalidInput("recipient address is required".into()));
        }
        Ok(())
    }

    /// Mints `amount` (human units of `token`) to `to` with the admin account.
    ///
    /// # Errors
    /// Input errors before submission, then signer or chain failure.
    pub async fn mint_to(
        &self,
        signer: &dyn TransactionSigner,
        token: &Token,
        to: &str,
        amount: Decimal,
    ) -> Result<TxReceipt> {
        Self::require_recipient(to)?;
        let raw = Self::raw_amount(token, amount)?;
        let receipt = submit(signer, &self.addresses.coin().mint_with_admin(to, raw)).await?;
        info!(token = %token.symbol, to, amount = %raw, hash = %receipt.hash, "Minted");
        Ok(receipt)
    }

    /// # Errors
    /// Input errors before submission, then signer or chain failure.
    pub async fn transfer(
        &self,
        signer: &dyn TransactionSigner,
        token: &Token,
        to: &str,
        amount: Decimal,
    ) -> Result<TxReceipt> {
        Self::require_recipient(to)?;
        let raw = Self::raw_amount(token, amount)?;
        let receipt = submit(signer, &self.addresses.coin().transfer(to, raw)).await?;
        info!(token = %token.symbol, to, amount = %raw, hash = %receipt.hash, "Transferred");
        Ok(receipt)
    }

    /// # Errors
    /// Input errors before submission, then signer or chain failure.
    pub async fn burn(&self, signer: &dyn TransactionSigner, token: &Token, amount: Decimal) -> Result<TxReceipt> {
        let raw = Self::raw_amount(token, amount)?;
        let receipt = submit(signer, &self.addresses.coin().burn(raw)).await?;
        info!(token = %token.symbol, amount = %raw, hash = %receipt.hash, "Burned");
        Ok(receipt)
    }

    /// Adds a token by hand, e.g. one deployed outside this client.
    ///
    /// # Errors
    /// [`ExecutionError::InvalidInput`] for missing fields, or
    /// `DuplicateToken` when the address is already known.
    pub async fn register_token(
        &self,
        address: &str,
        symbol: &str,
        name: &str,
        decimals: u8,
    ) -> Result<Arc<TokenRegistry>> {
        if address.trim().is_empty() || symbol.trim().is_empty() {
            return Err(ExecutionError::InvalidInput(
                "token address and symbol are required".into(),
            ));
        }
        units::to_raw_units(Decimal::ZERO, decimals)?;
        let name = if name.trim().is_empty() { symbol } else { name };
        let token = Token::new(address.trim(), symbol.trim().to_uppercase(), name.trim(), decimals);
        let registry = self.registry.add(token).await?;
        info!(address, symbol, "Token registered");
        Ok(registry)
    }

    /// Metadata of the coin issued by `admin`; `None` when unavailable.
    ///
    /// # Errors
    /// View call failure.
    pub async fn coin_info(&self, view: &dyn ViewClient, admin: &str) -> std::result::Result<Option<CoinInfo>, ClientError> {
        let values = view.view(&self.addresses.coin().get_coin_info(admin)).await?;
        Ok(parse_coin_info(&values))
    }

    /// Balance of `account` in human units of `token`.
    ///
    /// # Errors
    /// View call failure or an unscalable balance.
    pub async fn balance(&self, view: &dyn ViewClient, token: &Token, account: &str) -> Result<Option<Decimal>> {
        let values = view.view(&self.addresses.coin().get_balance(account)).await?;
        parse_balance(&values)
            .map(|raw| units::to_human_units(raw, token.decimals))
            .transpose()
            .map_err(Into::into)
    }

    /// # Errors
    /// View call failure.
    pub async fn is_registered(&self, view: &dyn ViewClient, account: &str) -> std::result::Result<Option<bool>, ClientError> {
        let values = view.view(&self.addresses.coin().is_account_registered(account)).await?;
        Ok(parse_flag(&values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hybrid_dex_domain::error::DomainError;
    use hybrid_dex_protocols::client::{DryRunSigner, StaticViewClient};
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};

    fn admin() -> TokenAdmin {
        TokenAdmin::new(
            ContractAddresses::default(),
            Arc::new(TokenRegistryStore::default()),
        )
    }

    fn my_token() -> Token {
        Token::new(ContractAddresses::default().custom_coin_type(), "MY", "My Token", 8)
    }

    #[tokio::test]
    async fn test_mint_and_transfer_scale_amounts() {
        let admin = admin();
        let signer = DryRunSigner::new("0xabc");
        admin.mint_to(&signer, &my_token(), "0xdef", dec!(2.5)).await.unwrap();
        admin.transfer(&signer, &my_token(), "0xdef", dec!(0.00000001)).await.unwrap();

        let sent = signer.submitted().await;
        assert_eq!(sent[0].function_arguments, vec![json!("0xdef"), json!("250000000")]);
        assert_eq!(sent[1].function_name(), "transfer");
        assert_eq!(sent[1].function_arguments[1], json!("1"));
    }

    #[tokio::test]
    async fn test_dust_and_missing_recipient_rejected() {
        let admin = admin();
        let signer = DryRunSigner::new("0xabc");
        assert!(admin.mint_to(&signer, &my_token(), "", dec!(1)).await.is_err());
        assert!(admin.transfer(&signer, &my_token(), "0xdef", dec!(0.000000001)).await.is_err());
        assert!(signer.submitted().await.is_empty());
    }

    #[tokio::test]
    async fn test_register_token() {
        let admin = admin();
        let registry = admin.register_token("0x9::coin::Z", "zz", "", 6).await.unwrap();
        let token = registry.find_by_symbol("ZZ").unwrap();
        assert_eq!(token.name, "zz");

        assert!(matches!(
            admin.register_token("0x9::coin::Z", "ZZ", "Z", 6).await,
            Err(ExecutionError::Domain(DomainError::DuplicateToken(_)))
        ));
        assert!(admin.register_token("0x9::coin::Y", "Y", "Y", 19).await.is_err());
    }

    #[tokio::test]
    async fn test_balance_view() {
        let view = StaticViewClient::new().with_response("get_balance", vec![Value::from("150000000")]);
        let balance = admin().balance(&view, &my_token(), "0xabc").await.unwrap();
        assert_eq!(balance, Some(dec!(1.5)));
    }
}
