//! Market data read through view calls.

use crate::config::TradingConfig;
use crate::error::{ExecutionError, Result};
use crate::scheduler::Scheduler;
use async_trait::async_trait;
use hybrid_dex_domain::entities::{OrderBookSnapshot, PoolKey, PoolSnapshot, Token};
use hybrid_dex_domain::enums::FeeTier;
use hybrid_dex_domain::value_objects::{Price, TokenAmount};
use hybrid_dex_pricing::chart::{PriceSeries, PriceStats};
use hybrid_dex_pricing::feed::{FeedError, MarketPairs, SnapshotSource};
use hybrid_dex_pricing::order_book::DepthView;
use hybrid_dex_pricing::venue::{book_mid_price, estimate_swap};
use hybrid_dex_protocols::addresses::ContractAddresses;
use hybrid_dex_protocols::client::ViewClient;
use hybrid_dex_protocols::views::{
    BestRoute, SwapQuote, order_book_from_view, parse_best_bid_ask, parse_best_route,
    parse_swap_quote, pool_snapshot_from_view,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Typed wrappers over the pool, book and router views.
///
/// `Ok(None)` means the view answered with data that failed validation.
#[derive(Clone)]
pub struct MarketReader {
    view: Arc<dyn ViewClient>,
    addresses: ContractAddresses,
}

impl MarketReader {
    pub fn new(view: Arc<dyn ViewClient>, addresses: ContractAddresses) -> Self {
        Self { view, addresses }
    }

    /// # Errors
    /// Identical tokens or a failed view call.
    pub async fn pool_snapshot(&self, token_a: &Token, token_b: &Token, fee_tier: FeeTier) -> Result<Option<PoolSnapshot>> {
        let key = PoolKey::new(&token_a.address, &token_b.address, fee_tier)?;
        let values = self.view.view(&self.addresses.amm().get_pool_reserves(&key)).await?;
        Ok(pool_snapshot_from_view(token_a, token_b, fee_tier, &values))
    }

    /// # Errors
    /// A failed view call.
    pub async fn order_book(&self, base: &Token, quote: &Token, levels: u32) -> Result<Option<OrderBookSnapshot>> {
        let request = self.addresses.clob().get_order_book_depth(base, quote, levels);
        let values = self.view.view(&request).await?;
        Ok(order_book_from_view(base, quote, &values))
    }

    /// # Errors
    /// A failed view call.
    pub async fn best_bid_ask(&self, base: &Token, quote: &Token) -> Result<Option<(Option<Price>, Option<Price>)>> {
        let values = self.view.view(&self.addresses.clob().get_best_bid_ask(base, quote)).await?;
        Ok(parse_best_bid_ask(&values))
    }

    /// Quote for selling `amount_in` raw units of `token_in`.
    ///
    /// # Errors
    /// Identical tokens or a failed view call.
    pub async fn quote_swap(
        &self,
        token_in: &Token,
        token_out: &Token,
        fee_tier: FeeTier,
        amount_in: TokenAmount,
    ) -> Result<Option<SwapQuote>> {
        let key = PoolKey::new(&token_in.address, &token_out.address, fee_tier)?;
        let x_to_y = key.token_x == token_in.address;
        let values = self
            .view
            .view(&self.addresses.amm().quote_swap_exact_in(&key, amount_in, x_to_y))
            .await?;
        Ok(parse_swap_quote(&values))
    }

    /// Expected output for selling `amount_in` raw units of `token_in`.
    ///
    /// Uses the quote view; when it is unreachable or answers with no usable
    /// amount, falls back to a constant-product estimate from the pool
    /// reserves. `Ok(None)` when neither yields a positive amount.
    ///
    /// # Errors
    /// Identical tokens, or the reserves view failed after the quote view did.
    pub async fn expected_output(
        &self,
        token_in: &Token,
        token_out: &Token,
        fee_tier: FeeTier,
        amount_in: TokenAmount,
    ) -> Result<Option<TokenAmount>> {
        match self.quote_swap(token_in, token_out, fee_tier, amount_in).await {
            Ok(Some(quote)) if !quote.amount_out.is_zero() => return Ok(Some(quote.amount_out)),
            Ok(_) => debug!(token_in = %token_in.symbol, token_out = %token_out.symbol, "Quote view unusable, estimating locally"),
            Err(ExecutionError::Client(e)) => {
                warn!(token_in = %token_in.symbol, error = %e, "Quote view failed, estimating locally");
            }
            Err(e) => return Err(e),
        }
        let Some(pool) = self.pool_snapshot(token_in, token_out, fee_tier).await? else {
            return Ok(None);
        };
        Ok(estimate_swap(&pool, &token_in.address, amount_in)
            .map(|e| e.amount_out)
            .filter(|out| !out.is_zero()))
    }

    /// Router's preferred venue for the trade.
    ///
    /// # Errors
    /// Identical tokens or a failed view call.
    pub async fn best_route(&self, token_in: &Token, token_out: &Token, amount_in: TokenAmount) -> Result<Option<BestRoute>> {
        // Fee tier is not part of the router view; any tier yields the canonical pair.
        let key = PoolKey::new(&token_in.address, &token_out.address, FeeTier::Low)?;
        let x_to_y = key.token_x == token_in.address;
        let request = self
            .addresses
            .router()
            .get_best_route(&key.token_x, &key.token_y, amount_in, x_to_y);
        let values = self.view.view(&request).await?;
        Ok(parse_best_route(&values))
    }
}

/// A pool/book pair to compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedMarket {
    pub base: Token,
    pub quote: Token,
    pub fee_tier: FeeTier,
}

/// [`SnapshotSource`] reading live pool reserves and book depth.
///
/// Markets whose pool or book is unavailable are skipped; the fetch only
/// fails when every market failed outright.
pub struct ViewSnapshotSource {
    reader: MarketReader,
    markets: Vec<WatchedMarket>,
    depth_levels: u32,
}

impl ViewSnapshotSource {
    pub fn new(reader: MarketReader, markets: Vec<WatchedMarket>, depth_levels: u32) -> Self {
        Self {
            reader,
            markets,
            depth_levels,
        }
    }

    async fn fetch_one(&self, market: &WatchedMarket) -> Result<Option<(PoolSnapshot, OrderBookSnapshot)>> {
        let pool = self
            .reader
            .pool_snapshot(&market.base, &market.quote, market.fee_tier)
            .await?;
        let book = self
            .reader
            .order_book(&market.base, &market.quote, self.depth_levels)
            .await?;
        Ok(pool.zip(book))
    }
}

#[async_trait]
impl SnapshotSource for ViewSnapshotSource {
    async fn fetch(&self) -> std::result::Result<MarketPairs, FeedError> {
        let mut pairs = Vec::with_capacity(self.markets.len());
        let mut failures = 0usize;
        for market in &self.markets {
            match self.fetch_one(market).await {
                Ok(Some(pair)) => pairs.push(pair),
                Ok(None) => {
                    debug!(base = %market.base.symbol, quote = %market.quote.symbol, "Market data unavailable");
                }
                Err(e) => {
                    failures += 1;
                    warn!(base = %market.base.symbol, quote = %market.quote.symbol, error = %e, "Market fetch failed");
                }
            }
        }
        if failures > 0 && failures == self.markets.len() {
            return Err(FeedError::Unavailable(format!("all {failures} markets failed")));
        }
        Ok(pairs)
    }
}

/// Live view of one CLOB market: latest depth snapshot plus a sampled
/// mid-price chart.
pub struct MarketWatcher {
    reader: MarketReader,
    base: Token,
    quote: Token,
    depth_levels: u32,
    book: RwLock<Option<Arc<OrderBookSnapshot>>>,
    chart: RwLock<PriceSeries>,
}

impl MarketWatcher {
    pub fn new(reader: MarketReader, base: Token, quote: Token, config: &TradingConfig) -> Self {
        Self {
            reader,
            base,
            quote,
            depth_levels: config.depth_levels,
            book: RwLock::new(None),
            chart: RwLock::new(PriceSeries::new(config.chart_capacity)),
        }
    }

    pub fn market(&self) -> String {
        format!("{}/{}", self.base.symbol, self.quote.symbol)
    }

    /// Fetches the book. On failure the previous snapshot stays in place.
    ///
    /// # Errors
    /// A failed view call, or [`ExecutionError::Unavailable`] for a book that
    /// failed validation.
    pub async fn refresh_book(&self) -> Result<Arc<OrderBookSnapshot>> {
        let book = self
            .reader
            .order_book(&self.base, &self.quote, self.depth_levels)
            .await?
            .ok_or_else(|| ExecutionError::Unavailable(format!("order book {}", self.market())))?;
        let book = Arc::new(book);
        *self.book.write().await = Some(Arc::clone(&book));
        debug!(market = %self.market(), bids = book.bids().len(), asks = book.asks().len(), "Order book refreshed");
        Ok(book)
    }

    pub async fn latest_book(&self) -> Option<Arc<OrderBookSnapshot>> {
        self.book.read().await.clone()
    }

    /// Depth table for the latest book, top `levels` per side.
    pub async fn depth(&self, levels: usize) -> Option<DepthView> {
        self.latest_book().await.map(|book| DepthView::new(&book, levels))
    }

    /// Records the current mid price on the chart. Returns the price, or
    /// `None` when there is no two-sided book to sample.
    pub async fn sample_price(&self) -> Option<Decimal> {
        let mid = self.latest_book().await.and_then(|b| book_mid_price(&b))?;
        self.chart.write().await.record(mid.value());
        Some(mid.value())
    }

    pub async fn chart(&self) -> PriceSeries {
        self.chart.read().await.clone()
    }

    pub async fn chart_stats(&self) -> Option<PriceStats> {
        self.chart.read().await.stats()
    }

    /// Registers the book refresh and chart sampling loops on `scheduler`.
    pub fn start(self: &Arc<Self>, scheduler: &mut Scheduler, config: &TradingConfig) {
        let market = self.market();
        let watcher = Arc::clone(self);
        scheduler.every(format!("order-book:{market}"), config.order_book_refresh, move || {
            let watcher = Arc::clone(&watcher);
            async move {
                if let Err(e) = watcher.refresh_book().await {
                    warn!(market = %watcher.market(), error = %e, "Order book refresh failed; keeping previous");
                }
            }
        });

        let watcher = Arc::clone(self);
        scheduler.every(format!("chart:{market}"), config.chart_refresh, move || {
            let watcher = Arc::clone(&watcher);
            async move {
                if watcher.sample_price().await.is_none() {
                    debug!(market = %watcher.market(), "No mid price to sample");
                }
            }
        });
        info!(market = %market, "Market watcher started");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hybrid_dex_protocols::client::StaticViewClient;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn apt() -> Token {
        Token::new("0x1::aptos_coin::AptosCoin", "APT", "Aptos Coin", 8)
    }

    fn usdc() -> Token {
        Token::new("0xbae2::usdc::USDC", "USDC", "USD Coin", 6)
    }

    fn depth() -> serde_json::Value {
        json!({
            "bids": [["12440000", "100000000"], ["12430000", "200000000"]],
            "asks": [["12460000", "100000000"]]
        })
    }

    fn reader(view: StaticViewClient) -> MarketReader {
        MarketReader::new(Arc::new(view), ContractAddresses::default())
    }

    #[tokio::test]
    async fn test_refresh_book_and_sample() {
        let view = StaticViewClient::new().with_response("get_order_book_depth", vec![depth()]);
        let watcher = MarketWatcher::new(reader(view), apt(), usdc(), &TradingConfig::default());
        assert!(watcher.sample_price().await.is_none());

        watcher.refresh_book().await.unwrap();
        assert_eq!(watcher.sample_price().await, Some(dec!(12.45)));
        assert_eq!(watcher.chart().await.len(), 1);
        let view = watcher.depth(10).await.unwrap();
        assert_eq!(view.bids.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_book() {
        let view = StaticViewClient::new().with_response("get_order_book_depth", vec![json!("garbage")]);
        let watcher = MarketWatcher::new(reader(view), apt(), usdc(), &TradingConfig::default());
        assert!(matches!(
            watcher.refresh_book().await,
            Err(ExecutionError::Unavailable(_))
        ));
        assert!(watcher.latest_book().await.is_none());
    }

    #[tokio::test]
    async fn test_view_snapshot_source() {
        let view = StaticViewClient::new()
            .with_response("get_order_book_depth", vec![depth()])
            .with_response("get_pool_reserves", vec![json!("100000000000"), json!("12450000000")]);
        let market = WatchedMarket {
            base: apt(),
            quote: usdc(),
            fee_tier: FeeTier::Low,
        };
        let source = ViewSnapshotSource::new(reader(view), vec![market], 10);
        let pairs = source.fetch().await.unwrap();
        assert_eq!(pairs.len(), 1);

        let empty = ViewSnapshotSource::new(
            reader(StaticViewClient::new()),
            vec![WatchedMarket {
                base: apt(),
                quote: usdc(),
                fee_tier: FeeTier::Low,
            }],
            10,
        );
        assert!(empty.fetch().await.is_err());
    }

    #[tokio::test]
    async fn test_quote_swap_direction() {
        let view = StaticViewClient::new().with_response("quote_swap_exact_in", vec![json!("990")]);
        let quote = reader(view)
            .quote_swap(&usdc(), &apt(), FeeTier::Low, TokenAmount::from(1000u64))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(quote.amount_out, TokenAmount::from(990u64));
    }

    #[tokio::test]
    async fn test_expected_output_prefers_quote_view() {
        let view = StaticViewClient::new()
            .with_response("quote_swap_exact_in", vec![json!("123000000")])
            .with_response("get_pool_reserves", vec![json!("100000000000"), json!("12450000000")]);
        let out = reader(view)
            .expected_output(&apt(), &usdc(), FeeTier::Low, TokenAmount::from(1_000_000_000u64))
            .await
            .unwrap();
        assert_eq!(out, Some(TokenAmount::from(123_000_000u64)));
    }

    #[tokio::test]
    async fn test_expected_output_falls_back_to_reserves() {
        let view = StaticViewClient::new()
            .with_response("get_pool_reserves", vec![json!("100000000000"), json!("12450000000")]);
        // 10 APT into 1000 APT / 12450 USDC at 5 bps
        let out = reader(view)
            .expected_output(&apt(), &usdc(), FeeTier::Low, TokenAmount::from(1_000_000_000u64))
            .await
            .unwrap();
        assert_eq!(out, Some(TokenAmount::from(123_206_303u64)));

        let zero = StaticViewClient::new()
            .with_response("quote_swap_exact_in", vec![json!("0")])
            .with_response("get_pool_reserves", vec![json!("0"), json!("0")]);
        let out = reader(zero)
            .expected_output(&apt(), &usdc(), FeeTier::Low, TokenAmount::from(1u64))
            .await
            .unwrap();
        assert_eq!(out, None);
    }
}
