//! Command Line Interface for the hybrid AMM/CLOB trading client.
use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use hybrid_dex_domain::entities::{PoolSnapshot, Token};
use hybrid_dex_domain::enums::FeeTier;
use hybrid_dex_domain::math::units;
use hybrid_dex_domain::registry::TokenRegistry;
use hybrid_dex_domain::value_objects::{Percentage, TokenAmount};
use hybrid_dex_execution::prelude::*;
use hybrid_dex_pricing::prelude::*;
use hybrid_dex_protocols::prelude::*;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hdx")]
#[command(about = "Hybrid AMM/CLOB trading client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert between human and raw units
    Scale {
        #[command(subcommand)]
        action: ScaleAction,
    },
    /// Show spread and depth for an order book depth file
    Book {
        /// JSON file holding a depth view result ({bids, asks})
        #[arg(short, long)]
        file: PathBuf,

        /// Base token symbol or address
        #[arg(long, default_value = "APT")]
        base: String,

        /// Quote token symbol or address
        #[arg(long, default_value = "USDC")]
        quote: String,

        /// Levels shown per side
        #[arg(short, long, default_value_t = 10)]
        levels: usize,
    },
    /// Rank arbitrage opportunities from a file of pool/book pairs
    Arb {
        /// JSON array of {base, quote, fee_bps, reserves, depth}
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Print the transaction request for a swap
    Route {
        /// Input token symbol or address
        #[arg(long)]
        from: String,

        /// Output token symbol or address
        #[arg(long)]
        to: String,

        /// Input amount in human units
        #[arg(short, long)]
        amount: Decimal,

        /// Expected output in raw units, from a quote
        #[arg(short, long)]
        quote: Option<String>,

        /// Raw pool reserves as IN,OUT; estimates the output when no quote is given
        #[arg(long)]
        reserves: Option<String>,

        /// Fee tier in basis points (5 or 30)
        #[arg(long, default_value_t = 30)]
        fee_bps: u32,

        #[arg(long, value_enum, default_value_t = Mode::Amm)]
        mode: Mode,

        /// Intermediate token for multi-hop routes
        #[arg(long)]
        via: Option<String>,

        /// Fee tier of the second hop in basis points
        #[arg(long, default_value_t = 30)]
        second_fee_bps: u32,

        /// AMM share of a split route, 0 to 1
        #[arg(long, default_value = "0.5")]
        amm_share: Decimal,

        /// CLOB price for a split route
        #[arg(long)]
        clob_price: Option<Decimal>,

        /// Slippage tolerance in percent (defaults to config)
        #[arg(long)]
        slippage: Option<Decimal>,
    },
    /// Scan a synthetic market for arbitrage for a bounded time
    Monitor {
        /// How long to run, in seconds
        #[arg(short, long, default_value_t = 30)]
        secs: u64,

        /// Reference APT/USDC price
        #[arg(long, default_value = "12.45")]
        price: Decimal,

        /// Per-tick log-price volatility
        #[arg(long, default_value_t = 0.003)]
        volatility: f64,

        /// Execute the best opportunity each scan with a dry-run signer
        #[arg(long)]
        execute: bool,
    },
}

#[derive(Subcommand)]
enum ScaleAction {
    /// Human amount to raw units
    ToRaw {
        amount: String,
        #[arg(short, long)]
        decimals: u8,
    },
    /// Raw units to a human amount
    ToHuman {
        raw: String,
        #[arg(short, long)]
        decimals: u8,
    },
    /// Human price to the order book's 10^6 scale
    Price { price: Decimal },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Amm,
    Single,
    Multi,
    Split,
}

/// One entry of the `arb` input file.
#[derive(Deserialize)]
struct PairFile {
    base: String,
    quote: String,
    fee_bps: u32,
    /// Pool reserves view result.
    reserves: Vec<Value>,
    /// Depth view result.
    depth: Value,
}

fn registry(addresses: &ContractAddresses) -> Result<TokenRegistry> {
    Ok(TokenRegistry::with_tokens(addresses.default_tokens())?)
}

fn lookup(registry: &TokenRegistry, key: &str) -> Result<Token> {
    registry
        .find_by_symbol(key)
        .or_else(|| registry.find_by_address(key))
        .cloned()
        .ok_or_else(|| anyhow!("unknown token {key:?}"))
}

fn read_json(path: &PathBuf) -> Result<Value> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_book(view: &DepthView) {
    let m = &view.metrics;
    println!("📖 {} ({:?})", view.market, m.state);
    println!(
        "   best bid {}  best ask {}  spread {} ({}%)",
        m.best_bid.map_or("-".into(), |p| format_price(p.value())),
        m.best_ask.map_or("-".into(), |p| format_price(p.value())),
        m.spread,
        m.spread_percent.round_dp(4)
    );
    println!("{:<6} | {:>12} | {:>14} | {:>14}", "Side", "Price", "Size", "Total");
    println!("{}", "-".repeat(56));
    for row in view.asks.iter().rev().chain(view.bids.iter()) {
        println!(
            "{:<6} | {:>12} | {:>14} | {:>14}",
            format!("{:?}", row.side),
            format_price(row.price.value()),
            row.size,
            row.total
        );
    }
}

fn print_opportunities(set: &OpportunitySet) {
    if set.is_empty() {
        println!("   no opportunities");
        return;
    }
    println!(
        "{:<4} | {:<10} | {:>10} | {:>10} | {:>8} | {:<20} | {:>10}",
        "#", "Pair", "AMM", "CLOB", "Margin%", "Direction", "Profit"
    );
    println!("{}", "-".repeat(90));
    for (i, o) in set.opportunities().iter().enumerate() {
        println!(
            "{:<4} | {:<10} | {:>10} | {:>10} | {:>8} | {:<20} | {:>10}",
            i + 1,
            o.pair(),
            format_price(o.amm_price.value()),
            format_price(o.clob_price.value()),
            o.margin_percent.round_dp(3),
            o.direction.to_string(),
            o.profit_potential.round_dp(4)
        );
    }
    let stats = set.stats();
    println!(
        "   {} found, total profit {}, average margin {}%",
        stats.count,
        stats.total_profit.round_dp(4),
        stats.average_margin.round_dp(3)
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let addresses = ContractAddresses::from_env();
    let config = TradingConfig::from_env();

    match cli.command {
        Commands::Scale { action } => match action {
            ScaleAction::ToRaw { amount, decimals } => {
                println!("{}", units::parse_raw_units(&amount, decimals)?);
            }
            ScaleAction::ToHuman { raw, decimals } => {
                let raw: TokenAmount = raw.parse()?;
                println!("{}", units::format_human_units(raw, decimals)?);
            }
            ScaleAction::Price { price } => {
                println!("{}", units::scale_price(price)?);
            }
        },
        Commands::Book {
            file,
            base,
            quote,
            levels,
        } => {
            let registry = registry(&addresses)?;
            let base = lookup(&registry, &base)?;
            let quote = lookup(&registry, &quote)?;
            let depth = read_json(&file)?;
            let book = order_book_from_view(&base, &quote, &[depth])
                .ok_or_else(|| anyhow!("order book in {} is malformed or crossed", file.display()))?;
            print_book(&DepthView::new(&book, levels));
        }
        Commands::Arb { file } => {
            let registry = registry(&addresses)?;
            let entries: Vec<PairFile> = serde_json::from_value(read_json(&file)?)?;
            let mut pairs = Vec::with_capacity(entries.len());
            for entry in entries {
                let base = lookup(&registry, &entry.base)?;
                let quote = lookup(&registry, &entry.quote)?;
                let fee_tier = FeeTier::from_bps(entry.fee_bps)?;
                let pool = pool_snapshot_from_view(&base, &quote, fee_tier, &entry.reserves);
                let book = order_book_from_view(&base, &quote, &[entry.depth]);
                match pool.zip(book) {
                    Some(pair) => pairs.push(pair),
                    None => println!("⚠️  skipping {}/{}: unusable data", base.symbol, quote.symbol),
                }
            }
            let engine = ArbitrageEngine::new(config.arbitrage_config());
            println!("🔍 Scanning {} pairs...", pairs.len());
            print_opportunities(&engine.detect_opportunities(&pairs));
        }
        Commands::Route {
            from,
            to,
            amount,
            quote,
            reserves,
            fee_bps,
            mode,
            via,
            second_fee_bps,
            amm_share,
            clob_price,
            slippage,
        } => {
            let registry = registry(&addresses)?;
            let mode = match mode {
                Mode::Amm => RouteMode::AmmDirect,
                Mode::Single => RouteMode::RouterSingleHop,
                Mode::Multi => {
                    let via = via.ok_or_else(|| anyhow!("--via is required for multi-hop"))?;
                    RouteMode::RouterMultiHop {
                        intermediate: lookup(&registry, &via)?,
                        second_fee_tier: FeeTier::from_bps(second_fee_bps)?,
                    }
                }
                Mode::Split => RouteMode::SplitExecution {
                    amm_share,
                    clob_price: clob_price.ok_or_else(|| anyhow!("--clob-price is required for split"))?,
                },
            };
            let token_in = lookup(&registry, &from)?;
            let token_out = lookup(&registry, &to)?;
            let fee_tier = FeeTier::from_bps(fee_bps)?;
            let quote = match (quote, reserves) {
                (Some(q), _) => Some(q.parse::<TokenAmount>()?),
                (None, Some(r)) => {
                    let (reserve_in, reserve_out) = r
                        .split_once(',')
                        .ok_or_else(|| anyhow!("--reserves expects IN,OUT"))?;
                    let pool = PoolSnapshot::new(
                        token_in.clone(),
                        token_out.clone(),
                        fee_tier,
                        reserve_in.trim().parse()?,
                        reserve_out.trim().parse()?,
                    )?;
                    let raw_in = units::to_raw_units(amount, token_in.decimals)?;
                    let estimate = estimate_swap(&pool, &token_in.address, raw_in)
                        .ok_or_else(|| anyhow!("cannot estimate output from these reserves"))?;
                    println!(
                        "📐 Local estimate: {} {} ({:.4}% impact)",
                        units::format_human_units(estimate.amount_out, token_out.decimals)?,
                        token_out.symbol,
                        estimate.price_impact
                    );
                    Some(estimate.amount_out)
                }
                (None, None) => None,
            };
            let request = RouteRequest {
                token_in,
                token_out,
                amount_in: amount,
                fee_tier,
                slippage: Percentage::new(slippage.unwrap_or(config.slippage_percent))?,
                quote,
                mode,
            };
            let route = choose_route(&request)?;
            println!("{}", serde_json::to_string_pretty(&route.to_transaction(&addresses))?);
        }
        Commands::Monitor {
            secs,
            price,
            volatility,
            execute,
        } => {
            if secs == 0 {
                bail!("--secs must be positive");
            }
            let registry = registry(&addresses)?;
            let market = SyntheticMarket {
                base: lookup(&registry, "APT")?,
                quote: lookup(&registry, "USDC")?,
                fee_tier: FeeTier::Low,
                reference_price: price,
                pool_base_reserve: Decimal::from(10_000),
                spread_bps: 10,
                depth_levels: config.depth_levels as usize,
                level_size: Decimal::from(100),
            };
            let feed = Arc::new(SyntheticFeed::new(vec![market], volatility));
            let engine = ArbitrageEngine::new(config.arbitrage_config());
            let monitor = Arc::new(ArbitrageMonitor::new(engine, feed, addresses.clone()));
            let dry_run = Arc::new(DryRunSigner::new("0xdry-run"));
            let session = Session::new();
            if execute {
                session.connect(dry_run.clone()).await;
            }

            println!("📡 Monitoring synthetic APT/USDC for {secs}s...");
            let handle = monitor.start();
            let deadline = tokio::time::Instant::now() + Duration::from_secs(secs);
            let mut ticker = tokio::time::interval(config.arbitrage_refresh);
            loop {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => break,
                    _ = ticker.tick() => {
                        // let the first scan land
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        let set = monitor.latest().await;
                        println!("⏱  {}", set.computed_at.format("%H:%M:%S"));
                        print_opportunities(&set);
                        if !set.is_empty() && session.is_connected().await {
                            let result = match session.signer().await {
                                Ok(signer) => monitor.execute_best(signer.as_ref()).await,
                                Err(e) => Err(e),
                            };
                            match result {
                                Ok(receipt) => println!("✅ submitted {}", receipt.hash),
                                Err(e) => println!("❌ {e}"),
                            }
                        }
                    }
                }
            }
            handle.cancel();
            session.disconnect().await;
            info!(submitted = dry_run.submitted().await.len(), "Monitor finished");
        }
    }

    Ok(())
}
