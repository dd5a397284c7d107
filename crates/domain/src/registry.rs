//! Immutable token registry.
//!
//! Adding a token yields a new registry; existing snapshots never change, so
//! readers holding an older one keep a consistent view.

use crate::entities::Token;
use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
}

impl TokenRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a list of tokens.
    ///
    /// # Errors
    /// [`DomainError::DuplicateToken`] when two tokens share an address.
    pub fn with_tokens(tokens: impl IntoIterator<Item = Token>) -> Result<Self> {
        tokens
            .into_iter()
            .try_fold(Self::new(), |registry, token| registry.add(token))
    }

    /// Returns a new registry containing `token` as well.
    ///
    /// # Errors
    /// [`DomainError::DuplicateToken`] when the address is already registered.
    pub fn add(&self, token: Token) -> Result<Self> {
        if self.find_by_address(&token.address).is_some() {
            return Err(DomainError::DuplicateToken(token.address));
        }
        let mut tokens = self.tokens.clone();
        tokens.push(token);
        Ok(Self { tokens })
    }

    pub fn find_by_address(&self, address: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.address == address)
    }

    /// Case-insensitive symbol lookup; the first registered match wins.
    pub fn find_by_symbol(&self, symbol: &str) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_returns_new_snapshot() {
        let empty = TokenRegistry::new();
        let one = empty
            .add(Token::new("0x1::aptos_coin::AptosCoin", "APT", "Aptos Coin", 8))
            .unwrap();
        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(one.find_by_symbol("apt").unwrap().decimals, 8);
    }

    #[test]
    fn test_duplicate_address_rejected() {
        let registry =
            TokenRegistry::with_tokens([Token::new("0xAAA", "A", "A", 8)]).unwrap();
        let err = registry.add(Token::new("0xAAA", "B", "B", 6)).unwrap_err();
        assert_eq!(err, DomainError::DuplicateToken("0xAAA".to_string()));
    }
}
