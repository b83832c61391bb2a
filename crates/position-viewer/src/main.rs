use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use solana_sdk::pubkey::Pubkey;

use clmm_position_viewer::{PositionReader, RpcAccountSource, ViewerConfig};

#[derive(Parser, Debug)]
#[command(name = "clmm-position")]
#[command(about = "Show holdings, fees and rewards of a Raydium CLMM position")]
struct Args {
    /// Path to viewer configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// RPC URL for Solana cluster, overrides the config file
    #[arg(short, long)]
    rpc_url: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Position NFT mint
    nft_mint: String,
}

/// Plain notation for everyday prices, scientific at the edges of the tick range
fn format_price(price: f64) -> String {
    let magnitude = price.abs();
    if magnitude != 0.0 && !(1e-6..1e15).contains(&magnitude) {
        format!("{:e}", price)
    } else {
        format!("{}", price)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(rpc_url) = args.rpc_url {
        config.rpc_url = rpc_url;
        config.validate()?;
    }

    let nft_mint = Pubkey::from_str(&args.nft_mint)
        .with_context(|| format!("invalid NFT mint {}", args.nft_mint))?;

    let source = RpcAccountSource::new(config.rpc_url.clone(), config.commitment_config()?);
    log::debug!("RPC URL: {}", source.url());
    log::debug!("CLMM program: {}", config.program_id);

    let reader = PositionReader::new(source, config);
    let summary = reader
        .read_position(&nft_mint)
        .await
        .with_context(|| format!("failed to read position {}", nft_mint))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    log::info!("Pool:            {}", summary.pool);
    log::info!("Position NFT:    {}", summary.nft);
    log::info!(
        "Price range:     {} - {} (ticks {} to {})",
        format_price(summary.price_lower),
        format_price(summary.price_upper),
        summary.tick_lower,
        summary.tick_upper
    );
    log::info!(
        "Current price:   {} (tick {})",
        format_price(summary.current_price),
        summary.current_tick
    );
    log::info!("Pooled amount A: {}", summary.pooled_amount_a);
    log::info!("Pooled amount B: {}", summary.pooled_amount_b);
    if summary.reward_infos.is_empty() {
        log::info!("Nothing to claim");
    }
    for line in &summary.reward_infos {
        log::info!("Claimable {}: {} ({})", line.mint, line.amount, line.address);
    }

    Ok(())
}
