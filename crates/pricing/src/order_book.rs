//! Order book metrics and depth rows for display.

use hybrid_dex_domain::entities::{BookLevel, OrderBookSnapshot};
use hybrid_dex_domain::enums::{OrderSide, OrderType};
use hybrid_dex_domain::value_objects::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a book can be traded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketState {
    /// No levels on either side.
    NoMarket,
    /// Only bids or only asks.
    OneSided,
    /// Both sides quoted.
    Active,
}

/// Top-of-book figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetrics {
    pub state: MarketState,
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
    /// `ask - bid`, zero unless both sides are quoted.
    pub spread: Decimal,
    /// `spread / bid * 100`, zero without a bid.
    pub spread_percent: Decimal,
    pub mid: Option<Price>,
}

impl BookMetrics {
    #[must_use]
    pub fn from_snapshot(book: &OrderBookSnapshot) -> Self {
        let best_bid = book.best_bid().map(|l| l.price);
        let best_ask = book.best_ask().map(|l| l.price);

        let state = match (best_bid, best_ask) {
            (None, None) => MarketState::NoMarket,
            (Some(_), Some(_)) => MarketState::Active,
            _ => MarketState::OneSided,
        };

        let (spread, mid) = match (best_bid, best_ask) {
            (Some(bid), Some(ask)) => (ask.value() - bid.value(), Some(Price::midpoint(bid, ask))),
            _ => (Decimal::ZERO, None),
        };

        let spread_percent = match best_bid {
            Some(bid) if !bid.value().is_zero() => spread / bid.value() * Decimal::ONE_HUNDRED,
            _ => Decimal::ZERO,
        };

        Self {
            state,
            best_bid,
            best_ask,
            spread,
            spread_percent,
            mid,
        }
    }
}

/// Sum of sizes of `levels[0..=index]`. An index past the end sums every level.
pub fn cumulative_total(levels: &[BookLevel], index: usize) -> Decimal {
    let end = index.saturating_add(1).min(levels.len());
    levels[..end].iter().map(|l| l.size).sum()
}

/// One rendered depth row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthRow {
    /// Book side the row belongs to (`Buy` for bids, `Sell` for asks).
    pub side: OrderSide,
    pub price: Price,
    pub size: Decimal,
    /// Running total up to and including this row.
    pub total: Decimal,
    /// Size relative to the largest visible level on this side.
    pub size_percent: Decimal,
}

/// Builds rows for the first `n` levels. Levels past `n` are never touched.
pub fn depth_rows(levels: &[BookLevel], side: OrderSide, n: usize) -> Vec<DepthRow> {
    let visible = &levels[..n.min(levels.len())];
    let max_size = visible
        .iter()
        .map(|l| l.size)
        .max()
        .unwrap_or(Decimal::ZERO);

    let mut total = Decimal::ZERO;
    visible
        .iter()
        .map(|level| {
            total += level.size;
            let size_percent = if max_size.is_zero() {
                Decimal::ZERO
            } else {
                level.size / max_size * Decimal::ONE_HUNDRED
            };
            DepthRow {
                side,
                price: level.price,
                size: level.size,
                total,
                size_percent,
            }
        })
        .collect()
}

/// Both sides of a book, trimmed to `n` levels each, with metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthView {
    pub market: String,
    pub metrics: BookMetrics,
    pub bids: Vec<DepthRow>,
    pub asks: Vec<DepthRow>,
}

impl DepthView {
    #[must_use]
    pub fn new(book: &OrderBookSnapshot, n: usize) -> Self {
        Self {
            market: book.market(),
            metrics: BookMetrics::from_snapshot(book),
            bids: depth_rows(book.bids(), OrderSide::Buy, n),
            asks: depth_rows(book.asks(), OrderSide::Sell, n),
        }
    }
}

/// Order form values produced by clicking a depth row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPrefill {
    pub side: OrderSide,
    pub order_type: OrderType,
    pub price: Price,
}

/// Clicking an ask fills a sell at that price; clicking a bid fills a buy.
#[must_use]
pub fn prefill_from_click(row: &DepthRow) -> OrderPrefill {
    OrderPrefill {
        side: row.side,
        order_type: OrderType::Limit,
        price: row.price,
    }
}
