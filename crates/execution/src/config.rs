//! Trading configuration.

use hybrid_dex_pricing::arbitrage::ArbitrageConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Tunables shared by routing, order entry and the refresh loops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Slippage tolerance in percent.
    pub slippage_percent: Decimal,
    /// Maximum arbitrage trade value in quote units.
    pub max_notional: Decimal,
    /// Gaps at or below this margin are not reported.
    pub min_margin_percent: Decimal,
    /// Order book view refresh period.
    pub order_book_refresh: Duration,
    /// Arbitrage scan period; also the staleness window of a scan.
    pub arbitrage_refresh: Duration,
    /// Price chart sampling period.
    pub chart_refresh: Duration,
    /// Levels requested per side of the book.
    pub depth_levels: u32,
    /// Points kept per price chart.
    pub chart_capacity: usize,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            slippage_percent: Decimal::new(5, 1), // 0.5%
            max_notional: Decimal::from(1_000),
            min_margin_percent: Decimal::ZERO,
            order_book_refresh: Duration::from_secs(5),
            arbitrage_refresh: Duration::from_secs(10),
            chart_refresh: Duration::from_secs(30),
            depth_levels: 10,
            chart_capacity: 120, // one hour at 30 s
        }
    }
}

impl TradingConfig {
    /// Defaults overridden by `HYBRID_DEX_*` environment variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_value::<Decimal>("HYBRID_DEX_SLIPPAGE_PERCENT") {
            config.slippage_percent = v;
        }
        if let Some(v) = env_value::<Decimal>("HYBRID_DEX_MAX_NOTIONAL") {
            config.max_notional = v;
        }
        if let Some(v) = env_value::<Decimal>("HYBRID_DEX_MIN_MARGIN_PERCENT") {
            config.min_margin_percent = v;
        }
        if let Some(secs) = env_value::<u64>("HYBRID_DEX_ORDER_BOOK_REFRESH_SECS") {
            config.order_book_refresh = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = env_value::<u64>("HYBRID_DEX_ARBITRAGE_REFRESH_SECS") {
            config.arbitrage_refresh = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = env_value::<u64>("HYBRID_DEX_CHART_REFRESH_SECS") {
            config.chart_refresh = Duration::from_secs(secs.max(1));
        }
        if let Some(levels) = env_value::<u32>("HYBRID_DEX_DEPTH_LEVELS") {
            config.depth_levels = levels;
        }
        config
    }

    /// Detection settings derived from this config.
    pub fn arbitrage_config(&self) -> ArbitrageConfig {
        ArbitrageConfig {
            max_notional: self.max_notional,
            min_margin_percent: self.min_margin_percent,
            stale_after: self.arbitrage_refresh,
        }
    }
}

fn env_value<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = TradingConfig::default();
        assert_eq!(config.slippage_percent, dec!(0.5));
        assert_eq!(config.order_book_refresh, Duration::from_secs(5));
        assert_eq!(config.arbitrage_refresh, Duration::from_secs(10));
        assert_eq!(config.chart_refresh, Duration::from_secs(30));
    }

    #[test]
    fn test_arbitrage_config_uses_scan_period_as_ttl() {
        let config = TradingConfig {
            arbitrage_refresh: Duration::from_secs(20),
            max_notional: dec!(250),
            ..TradingConfig::default()
        };
        let arb = config.arbitrage_config();
        assert_eq!(arb.stale_after, Duration::from_secs(20));
        assert_eq!(arb.max_notional, dec!(250));
    }
}
