use clap::Parser;
use signalcore::models::TradeSide;
use signalcore::replay::{IntradayReplay, PriceScenario, SyntheticPriceGenerator};
use signalcore::Result;

/// Replay the intraday detectors over synthetic minute bars, one scenario
/// per section, and print the trade markers they produce.
#[derive(Parser, Debug)]
struct Args {
    /// Minutes of price history per scenario
    #[arg(long, default_value_t = 240)]
    minutes: usize,

    /// RNG seed for the synthetic series
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Trailing window length handed to the detectors
    #[arg(long, default_value_t = 30)]
    lookback: usize,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter("signalcore=info")
        .init();

    let args = Args::parse();
    let replay = IntradayReplay::new().with_lookback(args.lookback);

    for &scenario in PriceScenario::all() {
        let mut generator = SyntheticPriceGenerator::new(args.seed);
        let points = generator.generate(scenario, args.minutes, 1);

        println!("\n=== {:?} ({} minutes) ===", scenario, args.minutes);

        let markers = match replay.run(&points) {
            Ok(markers) => markers,
            Err(e) => {
                eprintln!("replay failed: {e}");
                continue;
            }
        };

        if markers.is_empty() {
            println!("no signals");
            continue;
        }

        let mut last_buy: Option<f64> = None;
        for marker in &markers {
            match marker.side {
                TradeSide::Buy => {
                    println!(
                        "  BUY  {} @ {:.4}",
                        marker.timestamp.format("%H:%M"),
                        marker.price
                    );
                    last_buy = Some(marker.price);
                }
                TradeSide::Sell => {
                    let change = last_buy
                        .map(|buy| (marker.price - buy) / buy * 100.0)
                        .unwrap_or(0.0);
                    println!(
                        "  SELL {} @ {:.4} ({:+.2}%)",
                        marker.timestamp.format("%H:%M"),
                        marker.price,
                        change
                    );
                }
            }
        }
    }

    Ok(())
}
