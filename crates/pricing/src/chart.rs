//! Price history buffer and summary statistics for the chart view.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub at: DateTime<Utc>,
    pub price: Decimal,
}

/// Summary over the buffered points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceStats {
    pub open: Decimal,
    pub current: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub change: Decimal,
    /// Change relative to `open`, zero when `open` is zero.
    pub change_percent: Decimal,
}

/// Bounded price history; the oldest point is dropped once full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: VecDeque<PricePoint>,
    capacity: usize,
}

impl PriceSeries {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, point: PricePoint) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn record(&mut self, price: Decimal) {
        self.push(PricePoint {
            at: Utc::now(),
            price,
        });
    }

    pub fn points(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn stats(&self) -> Option<PriceStats> {
        let open = self.points.front()?.price;
        let current = self.points.back()?.price;
        let high = self.points.iter().map(|p| p.price).max()?;
        let low = self.points.iter().map(|p| p.price).min()?;
        let change = current - open;
        let change_percent = if open.is_zero() {
            Decimal::ZERO
        } else {
            change / open * Decimal::ONE_HUNDRED
        };
        Some(PriceStats {
            open,
            current,
            high,
            low,
            change,
            change_percent,
        })
    }
}

/// Formats a price with precision that grows as the price shrinks:
/// 6 places below 0.01, 4 below 1, otherwise 2.
pub fn format_price(price: Decimal) -> String {
    let places = if price.abs() < Decimal::new(1, 2) {
        6
    } else if price.abs() < Decimal::ONE {
        4
    } else {
        2
    };
    format!("{:.*}", places, price.round_dp(places as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_series_is_bounded() {
        let mut series = PriceSeries::new(3);
        for p in [dec!(1), dec!(2), dec!(3), dec!(4)] {
            series.record(p);
        }
        assert_eq!(series.len(), 3);
        let stats = series.stats().unwrap();
        assert_eq!(stats.open, dec!(2));
        assert_eq!(stats.current, dec!(4));
        assert_eq!(stats.high, dec!(4));
        assert_eq!(stats.low, dec!(2));
        assert_eq!(stats.change_percent, dec!(100));
    }

    #[test]
    fn test_empty_series_has_no_stats() {
        assert!(PriceSeries::new(10).stats().is_none());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(dec!(12.4567)), "12.46");
        assert_eq!(format_price(dec!(0.123456)), "0.1235");
        assert_eq!(format_price(dec!(0.00123456)), "0.001235");
        assert_eq!(format_price(dec!(3)), "3.00");
    }
}
