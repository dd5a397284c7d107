use crate::entities::token::Token;
use crate::error::{DomainError, Result};
use crate::math::units;
use crate::value_objects::{Price, TokenAmount};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A depth level as returned by the CLOB view: price scaled by 10^6, size in
/// raw base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBookLevel {
    pub price_raw: u64,
    pub size_raw: TokenAmount,
}

/// A human-scaled depth level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Price,
    /// Size in base token units.
    pub size: Decimal,
}

impl BookLevel {
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self {
            price: Price(price),
            size,
        }
    }

    /// Converts a raw level using the base token's decimals.
    ///
    /// # Errors
    /// Propagates unit conversion failures.
    pub fn from_raw(raw: RawBookLevel, base_decimals: u8) -> Result<Self> {
        Ok(Self {
            price: units::unscale_price(raw.price_raw),
            size: units::to_human_units(raw.size_raw, base_decimals)?,
        })
    }
}

/// Order book for one base/quote market.
///
/// Bids are sorted by price descending and asks ascending. A snapshot whose
/// best bid is not strictly below its best ask cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrderBookRecord")]
pub struct OrderBookSnapshot {
    pub base: Token,
    pub quote: Token,
    bids: Vec<BookLevel>,
    asks: Vec<BookLevel>,
    pub captured_at: DateTime<Utc>,
}

/// Serialized form of [`OrderBookSnapshot`], validated on the way in.
#[derive(Deserialize)]
struct OrderBookRecord {
    base: Token,
    quote: Token,
    bids: Vec<BookLevel>,
    asks: Vec<BookLevel>,
    captured_at: DateTime<Utc>,
}

impl TryFrom<OrderBookRecord> for OrderBookSnapshot {
    type Error = DomainError;

    fn try_from(record: OrderBookRecord) -> Result<Self> {
        let mut book = Self::new(record.base, record.quote, record.bids, record.asks)?;
        book.captured_at = record.captured_at;
        Ok(book)
    }
}

impl OrderBookSnapshot {
    /// # Errors
    /// Returns [`DomainError::CrossedBook`] when `best_bid >= best_ask`.
    pub fn new(
        base: Token,
        quote: Token,
        mut bids: Vec<BookLevel>,
        mut asks: Vec<BookLevel>,
    ) -> Result<Self> {
        if base.address == quote.address {
            return Err(DomainError::IdenticalTokens(base.address));
        }
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        if let (Some(bid), Some(ask)) = (bids.first(), asks.first()) {
            if bid.price >= ask.price {
                return Err(DomainError::CrossedBook {
                    bid: bid.price.value(),
                    ask: ask.price.value(),
                });
            }
        }
        Ok(Self {
            base,
            quote,
            bids,
            asks,
            captured_at: Utc::now(),
        })
    }

    /// Builds a snapshot from raw view levels.
    ///
    /// # Errors
    /// Conversion failures or a crossed book.
    pub fn from_raw(
        base: Token,
        quote: Token,
        bids: &[RawBookLevel],
        asks: &[RawBookLevel],
    ) -> Result<Self> {
        let convert = |levels: &[RawBookLevel]| -> Result<Vec<BookLevel>> {
            levels
                .iter()
                .map(|l| BookLevel::from_raw(*l, base.decimals))
                .collect()
        };
        let bids = convert(bids)?;
        let asks = convert(asks)?;
        Self::new(base, quote, bids, asks)
    }

    #[must_use]
    pub fn empty(base: Token, quote: Token) -> Self {
        Self {
            base,
            quote,
            bids: Vec::new(),
            asks: Vec::new(),
            captured_at: Utc::now(),
        }
    }

    pub fn bids(&self) -> &[BookLevel] {
        &self.bids
    }

    pub fn asks(&self) -> &[BookLevel] {
        &self.asks
    }

    pub fn best_bid(&self) -> Option<&BookLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&BookLevel> {
        self.asks.first()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Market label, e.g. `APT/USDC`.
    #[must_use]
    pub fn market(&self) -> String {
        format!("{}/{}", self.base.symbol, self.quote.symbol)
    }
}
