//! Validation of untyped view-call results.
//!
//! Nodes return Move values as JSON: u64/u128 as decimal strings, structs as
//! objects, tuples as arrays. Every parser here accepts the shapes observed
//! in practice and returns `None` for anything else; a `None` means the data
//! is unavailable and must not be displayed or acted on.

use hybrid_dex_domain::entities::{
    CoinInfo, OrderBookSnapshot, PoolSnapshot, RawBookLevel, Token,
};
use hybrid_dex_domain::enums::{FeeTier, Venue};
use hybrid_dex_domain::math::units;
use hybrid_dex_domain::value_objects::{Price, TokenAmount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;

fn as_amount(value: &Value) -> Option<TokenAmount> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64().map(TokenAmount::from),
        _ => None,
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Move strings arrive either as text or as `0x`-prefixed hex bytes.
fn as_text(value: &Value) -> Option<String> {
    let s = value.as_str()?;
    let Some(hex) = s.strip_prefix("0x") else {
        return Some(s.to_string());
    };
    if hex.len() % 2 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Some(s.to_string());
    }
    let bytes: Option<Vec<u8>> = (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect();
    String::from_utf8(bytes?).ok()
}

/// Unwraps a single-element result so `[{...}]` and `{...}` parse alike.
fn single(values: &[Value]) -> Option<&Value> {
    match values {
        [only] => Some(only),
        _ => None,
    }
}

/// Reserves in canonical order, from `[x, y]`, `[x, y, fee]` or
/// `{reserve_x, reserve_y}`.
pub fn parse_pool_reserves(values: &[Value]) -> Option<(TokenAmount, TokenAmount)> {
    let parsed = match values {
        [x, y] | [x, y, _] => as_amount(x).zip(as_amount(y)),
        [obj] => obj
            .get("reserve_x")
            .and_then(as_amount)
            .zip(obj.get("reserve_y").and_then(as_amount)),
        _ => None,
    };
    if parsed.is_none() {
        debug!(?values, "Unrecognised pool reserves");
    }
    parsed
}

/// Builds a pool snapshot from a reserves view issued with canonical type
/// arguments.
pub fn pool_snapshot_from_view(
    token_a: &Token,
    token_b: &Token,
    fee_tier: FeeTier,
    values: &[Value],
) -> Option<PoolSnapshot> {
    let (reserve_x, reserve_y) = parse_pool_reserves(values)?;
    let (x, y) = if token_a.address < token_b.address {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };
    PoolSnapshot::new(x.clone(), y.clone(), fee_tier, reserve_x, reserve_y)
        .map_err(|e| debug!(error = %e, "Rejected pool snapshot"))
        .ok()
}

/// Result of the AMM quote view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub amount_out: TokenAmount,
    pub price_impact: Option<Decimal>,
    pub fee: Option<TokenAmount>,
}

/// Parses `[amount_out]`, `[amount_out, impact, fee]` or
/// `{amount_out, price_impact, fee}`.
pub fn parse_swap_quote(values: &[Value]) -> Option<SwapQuote> {
    let impact = |v: &Value| match v {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s).ok(),
        _ => None,
    };
    let quote = match values {
        [obj] if obj.is_object() => Some(SwapQuote {
            amount_out: obj.get("amount_out").and_then(as_amount)?,
            price_impact: obj.get("price_impact").and_then(impact),
            fee: obj.get("fee").and_then(as_amount),
        }),
        [out] => as_amount(out).map(|amount_out| SwapQuote {
            amount_out,
            price_impact: None,
            fee: None,
        }),
        [out, price_impact, fee] => Some(SwapQuote {
            amount_out: as_amount(out)?,
            price_impact: impact(price_impact),
            fee: as_amount(fee),
        }),
        _ => None,
    };
    if quote.is_none() {
        debug!(?values, "Unrecognised swap quote");
    }
    quote
}

/// Best bid and ask from `[bid, ask]`, scaled by 10^6. Zero means no level.
pub fn parse_best_bid_ask(values: &[Value]) -> Option<(Option<Price>, Option<Price>)> {
    let (bid, ask) = match values {
        [bid, ask] => (as_u64(bid)?, as_u64(ask)?),
        [obj] => (
            obj.get("best_bid").and_then(as_u64)?,
            obj.get("best_ask").and_then(as_u64)?,
        ),
        _ => {
            debug!(?values, "Unrecognised best bid/ask");
            return None;
        }
    };
    let to_price = |raw: u64| (raw != 0).then(|| units::unscale_price(raw));
    Some((to_price(bid), to_price(ask)))
}

fn parse_level(value: &Value) -> Option<RawBookLevel> {
    let (price, size) = match value {
        Value::Array(pair) if pair.len() == 2 => (&pair[0], &pair[1]),
        Value::Object(_) => (value.get("price")?, value.get("size")?),
        _ => return None,
    };
    Some(RawBookLevel {
        price_raw: as_u64(price)?,
        size_raw: as_amount(size)?,
    })
}

fn parse_levels(value: &Value) -> Option<Vec<RawBookLevel>> {
    value.as_array()?.iter().map(parse_level).collect()
}

/// Raw depth from `{bids, asks}` or `[bids, asks]`.
pub fn parse_order_book_depth(values: &[Value]) -> Option<(Vec<RawBookLevel>, Vec<RawBookLevel>)> {
    let depth = match values {
        [bids, asks] => parse_levels(bids).zip(parse_levels(asks)),
        [obj] => obj
            .get("bids")
            .and_then(parse_levels)
            .zip(obj.get("asks").and_then(parse_levels)),
        _ => None,
    };
    if depth.is_none() {
        debug!(?values, "Unrecognised order book depth");
    }
    depth
}

/// Converts a depth view into a validated snapshot. Crossed books are
/// reported as unavailable.
pub fn order_book_from_view(base: &Token, quote: &Token, values: &[Value]) -> Option<OrderBookSnapshot> {
    let (bids, asks) = parse_order_book_depth(values)?;
    OrderBookSnapshot::from_raw(base.clone(), quote.clone(), &bids, &asks)
        .map_err(|e| debug!(market = %format!("{}/{}", base.symbol, quote.symbol), error = %e, "Rejected order book"))
        .ok()
}

/// Coin metadata from `{name, symbol, decimals, supply}` or
/// `[name, symbol, decimals(, supply)]`.
pub fn parse_coin_info(values: &[Value]) -> Option<CoinInfo> {
    let decimals = |v: &Value| as_u64(v).and_then(|d| u8::try_from(d).ok());
    let info = match values {
        [obj] if obj.is_object() => Some(CoinInfo {
            name: obj.get("name").and_then(as_text)?,
            symbol: obj.get("symbol").and_then(as_text)?,
            decimals: obj.get("decimals").and_then(decimals)?,
            supply: obj.get("supply").and_then(as_amount),
        }),
        [name, symbol, dec] => Some(CoinInfo {
            name: as_text(name)?,
            symbol: as_text(symbol)?,
            decimals: decimals(dec)?,
            supply: None,
        }),
        [name, symbol, dec, supply] => Some(CoinInfo {
            name: as_text(name)?,
            symbol: as_text(symbol)?,
            decimals: decimals(dec)?,
            supply: as_amount(supply),
        }),
        _ => None,
    };
    if info.is_none() {
        debug!(?values, "Unrecognised coin info");
    }
    info
}

pub fn parse_balance(values: &[Value]) -> Option<TokenAmount> {
    single(values).and_then(as_amount)
}

pub fn parse_flag(values: &[Value]) -> Option<bool> {
    single(values).and_then(as_bool)
}

/// Router recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRoute {
    pub venue: Venue,
    pub expected_out: TokenAmount,
}

/// Parses `[venue_code, expected_out]` where 0 is the AMM and 1 the CLOB.
pub fn parse_best_route(values: &[Value]) -> Option<BestRoute> {
    let [code, out] = values else {
        debug!(?values, "Unrecognised best route");
        return None;
    };
    let venue = match as_u64(code)? {
        0 => Venue::Amm,
        1 => Venue::Clob,
        other => {
            debug!(code = other, "Unknown route venue");
            return None;
        }
    };
    Some(BestRoute {
        venue,
        expected_out: as_amount(out)?,
    })
}

/// On-chain arbitrage check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageCheck {
    pub profitable: bool,
    pub expected_profit: Option<TokenAmount>,
}

/// Parses `[profitable]` or `[profitable, expected_profit]`.
pub fn parse_arbitrage_check(values: &[Value]) -> Option<ArbitrageCheck> {
    match values {
        [flag] => Some(ArbitrageCheck {
            profitable: as_bool(flag)?,
            expected_profit: None,
        }),
        [flag, profit] => Some(ArbitrageCheck {
            profitable: as_bool(flag)?,
            expected_profit: as_amount(profit),
        }),
        _ => {
            debug!(?values, "Unrecognised arbitrage check");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn apt() -> Token {
        Token::new("0x1::aptos_coin::AptosCoin", "APT", "Aptos Coin", 8)
    }

    fn usdc() -> Token {
        Token::new("0xbae2::usdc::USDC", "USDC", "USD Coin", 6)
    }

    #[test]
    fn test_pool_reserves_shapes() {
        let expected = (TokenAmount::from(10u64), TokenAmount::from(20u64));
        assert_eq!(parse_pool_reserves(&[json!("10"), json!("20")]), Some(expected));
        assert_eq!(
            parse_pool_reserves(&[json!({"reserve_x": "10", "reserve_y": 20, "fee_tier": 5})]),
            Some(expected)
        );
        assert_eq!(parse_pool_reserves(&[json!("ten"), json!("20")]), None);
        assert_eq!(parse_pool_reserves(&[]), None);
    }

    #[test]
    fn test_pool_snapshot_from_view_any_token_order() {
        let snap = pool_snapshot_from_view(
            &usdc(),
            &apt(),
            FeeTier::Low,
            &[json!("100000000000"), json!("12450000000")],
        )
        .unwrap();
        assert_eq!(snap.token_x.symbol, "APT");
        assert_eq!(snap.reserve_x, TokenAmount::from(100_000_000_000u64));
    }

    #[test]
    fn test_swap_quote() {
        let q = parse_swap_quote(&[json!({"amount_out": "990", "price_impact": 0.15, "fee": "3"})]).unwrap();
        assert_eq!(q.amount_out, TokenAmount::from(990u64));
        assert_eq!(q.price_impact, Some(dec!(0.15)));
        assert_eq!(parse_swap_quote(&[json!("42")]).unwrap().fee, None);
        assert!(parse_swap_quote(&[json!(null)]).is_none());
    }

    #[test]
    fn test_best_bid_ask() {
        let (bid, ask) = parse_best_bid_ask(&[json!("12450000"), json!("0")]).unwrap();
        assert_eq!(bid.unwrap().value(), dec!(12.45));
        assert!(ask.is_none());
    }

    #[test]
    fn test_depth_and_crossed_book() {
        let depth = json!({
            "bids": [{"price": "12450000", "size": "100000000"}],
            "asks": [["12475000", "50000000"]],
        });
        let book = order_book_from_view(&apt(), &usdc(), &[depth]).unwrap();
        assert_eq!(book.best_ask().unwrap().size, dec!(0.5));

        let crossed = json!({
            "bids": [{"price": "13000000", "size": "1"}],
            "asks": [{"price": "12000000", "size": "1"}],
        });
        assert!(order_book_from_view(&apt(), &usdc(), &[crossed]).is_none());
        assert!(order_book_from_view(&apt(), &usdc(), &[json!({"bids": "x"})]).is_none());
    }

    #[test]
    fn test_coin_info_hex_strings() {
        let info = parse_coin_info(&[json!("0x4d7920546f6b656e"), json!("MY"), json!(8)]).unwrap();
        assert_eq!(info.name, "My Token");
        assert_eq!(info.symbol, "MY");
        assert_eq!(info.decimals, 8);
        assert!(parse_coin_info(&[json!("a"), json!("b"), json!(300)]).is_none());
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse_balance(&[json!("77")]), Some(TokenAmount::from(77u64)));
        assert_eq!(parse_flag(&[json!(true)]), Some(true));
        assert_eq!(parse_flag(&[json!(1)]), None);
        assert_eq!(
            parse_best_route(&[json!(1), json!("500")]),
            Some(BestRoute {
                venue: Venue::Clob,
                expected_out: TokenAmount::from(500u64)
            })
        );
        assert_eq!(parse_best_route(&[json!(7), json!("500")]), None);
        assert_eq!(
            parse_arbitrage_check(&[json!(false)]),
            Some(ArbitrageCheck {
                profitable: false,
                expected_profit: None
            })
        );
    }
}
