use clap::Parser;
use signalcore::replay::{PriceScenario, SyntheticPriceGenerator};
use signalcore::strategy::{compute_crossover_signals, CrossoverConfig};
use signalcore::Result;
use std::path::PathBuf;

/// Run the moving-average crossover generator over a synthetic series and
/// print the buy/sell markers.
#[derive(Parser, Debug)]
struct Args {
    /// Short moving-average window
    #[arg(long, default_value_t = 20)]
    short_window: usize,

    /// Long moving-average window
    #[arg(long, default_value_t = 50)]
    long_window: usize,

    /// Number of price points to generate
    #[arg(long, default_value_t = 400)]
    points: usize,

    /// Minutes between points (1440 approximates daily bars)
    #[arg(long, default_value_t = 1440)]
    interval_minutes: i64,

    /// Write the full signal series to this file as JSON
    #[arg(long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter("signalcore=info")
        .init();

    let args = Args::parse();

    let seed = std::env::var("SIGNALCORE_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let mut generator = SyntheticPriceGenerator::new(seed);
    let points = generator.generate(PriceScenario::Choppy, args.points, args.interval_minutes);

    let config = CrossoverConfig {
        short_window: args.short_window,
        long_window: args.long_window,
    };
    let series = compute_crossover_signals(&points, &config);

    println!(
        "MA crossover {}/{} over {} synthetic points (seed {})\n",
        config.short_window,
        config.long_window,
        points.len(),
        seed
    );

    let buys = series.buy_markers();
    let sells = series.sell_markers();

    println!("{:<22} {:>10} {:>6}", "timestamp", "price", "side");
    for row in series.rows() {
        let side = match row.position {
            Some(1) => "BUY",
            Some(-1) => "SELL",
            _ => continue,
        };
        println!(
            "{:<22} {:>10.4} {:>6}",
            row.timestamp.format("%Y-%m-%d %H:%M"),
            row.price,
            side
        );
    }

    println!(
        "\n{} buy markers, {} sell markers across {} rows",
        buys.len(),
        sells.len(),
        series.len()
    );

    if let Some(path) = args.export {
        let json = serde_json::to_string_pretty(&series)?;
        std::fs::write(&path, json)?;
        println!("Signal series written to {}", path.display());
    }

    Ok(())
}
