//! Command-line interface definitions.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::debug;

use crate::config::AppConfig;
use crate::domain::format::NumberFormat;
use crate::domain::trade::{MarketState, Side, TradeIntent};

/// ospm - LMSR pricing and trade previews for binary prediction markets.
#[derive(Parser, Debug)]
#[command(name = "ospm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show YES/NO prices
    Price(MarketArgs),

    /// Show the value of the cost function
    Cost(MarketArgs),

    /// Cost of buying an exact number of shares
    Quote(QuoteArgs),

    /// Shares received for a spend, with prices before and after
    Preview(PreviewArgs),
}

/// Market state shared by every command.
#[derive(Args, Debug, Clone)]
pub struct MarketArgs {
    /// Net YES shares issued
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub q_yes: f64,

    /// Net NO shares issued
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub q_no: f64,

    /// Liquidity parameter
    #[arg(long, allow_negative_numbers = true)]
    pub b: f64,
}

#[derive(Args, Debug)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Outcome to buy (yes/no)
    #[arg(long)]
    pub side: Side,

    /// Shares to buy
    #[arg(long, allow_negative_numbers = true)]
    pub shares: f64,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Outcome to buy (yes/no)
    #[arg(long)]
    pub side: Side,

    /// Tokens to spend, as typed
    #[arg(long, allow_hyphen_values = true)]
    pub spend: String,
}

impl MarketArgs {
    fn state(&self) -> Result<MarketState> {
        MarketState::new(self.q_yes, self.q_no, self.b).context("Invalid market state")
    }
}

/// Run a parsed command and render its output.
///
/// # Errors
/// Returns error for invalid market input, a spend with no preview, or
/// an engine failure.
pub fn execute(cli: &Cli, config: &AppConfig) -> Result<String> {
    let engine = config.engine.engine();
    let fmt = config.display.number_format();

    match &cli.command {
        Commands::Price(args) => {
            let prices = engine.price(&args.state()?)?;
            if cli.json {
                return Ok(serde_json::to_string_pretty(&prices)?);
            }
            Ok(format!(
                "YES {}  NO {}",
                fmt.probability(prices.yes),
                fmt.probability(prices.no)
            ))
        }
        Commands::Cost(args) => {
            let cost = engine.cost(&args.state()?)?;
            if cli.json {
                return Ok(serde_json::to_string_pretty(&json!({ "cost": cost }))?);
            }
            Ok(format!("cost {}", fmt.number(cost)))
        }
        Commands::Quote(args) => {
            let cost = engine.buy_cost(&args.market.state()?, args.side, args.shares)?;
            if cli.json {
                return Ok(serde_json::to_string_pretty(&json!({
                    "side": args.side,
                    "shares": args.shares,
                    "cost": cost,
                }))?);
            }
            Ok(format!(
                "{} {} shares cost {} tokens",
                fmt.number(args.shares),
                args.side,
                fmt.number(cost)
            ))
        }
        Commands::Preview(args) => {
            let state = args.market.state()?;
            let intent = TradeIntent::parse(args.side, &args.spend).with_context(|| {
                format!("No preview available: invalid spend '{}'", args.spend)
            })?;
            let preview = engine
                .simulate_buy(&state, &intent)
                .context("No preview available")?;
            debug!(?preview, "Preview computed");

            if cli.json {
                return Ok(serde_json::to_string_pretty(&preview)?);
            }
            Ok(render_preview(fmt, args.side, &preview))
        }
    }
}

fn render_preview(
    fmt: NumberFormat,
    side: Side,
    preview: &crate::domain::trade::TradePreview,
) -> String {
    [
        format!("You spend:     {} tokens", fmt.number(preview.cost)),
        format!("You receive:   {} {side} shares", fmt.number(preview.delta_shares)),
        format!("Current price: {}", fmt.probability(preview.p_before)),
        format!(
            "Price after:   {} ({})",
            fmt.probability(preview.p_after),
            fmt.signed_percent(preview.price_change_pct())
        ),
    ]
    .join("\n")
}
