// Trading strategy module
pub mod crossover;
pub mod intraday;

use crate::models::{PricePoint, Signal};
use crate::Result;

pub use crossover::{compute_crossover_signals, CrossoverConfig, CrossoverStrategy};
pub use intraday::{
    drop_then_stabilize, drop_window_then_stabilize, peak_reversal_or_stop_loss,
    rise_then_stabilize, DropStabilizeConfig, PeakReversalConfig, RiseStabilizeConfig,
    WindowDropConfig,
};

/// Base trait for all trading strategies
pub trait Strategy: Send + Sync {
    /// Generate a trading signal from a trailing window of price points
    fn generate_signal(&self, points: &[PricePoint]) -> Result<Signal>;

    /// Get strategy name
    fn name(&self) -> &str;

    /// Minimum price points required for this strategy
    fn min_points_required(&self) -> usize;
}
