//! Intraday pattern detectors over trailing 1-minute price windows.
//!
//! Each detector is a pure predicate: no internal state, re-evaluated fresh
//! on every tick, and `false` on insufficient or degenerate data rather than
//! an error. The caller owns the flat/holding state machine and feeds the
//! purchase price into the sell detectors.

use crate::indicators::pct_change;

/// Configuration for the drop-then-stabilize buy detector
#[derive(Debug, Clone)]
pub struct DropStabilizeConfig {
    /// Minute-over-minute change that qualifies as a drop (negative)
    pub drop_threshold: f64,
    /// Minute-over-minute change that qualifies as a rebound
    pub stabilization_threshold: f64,
    /// Minutes to look back for the drop
    pub drop_lookback: usize,
    /// Minutes at the end of the window checked for the rebound
    pub stabilization_lookback: usize,
}

impl Default for DropStabilizeConfig {
    fn default() -> Self {
        Self {
            drop_threshold: -0.005,
            stabilization_threshold: 0.001,
            drop_lookback: 7,
            stabilization_lookback: 1,
        }
    }
}

/// Buy detector: a sharp one-minute dip followed by any sign of an upward
/// bounce, for mean-reversion entries.
///
/// The drop window is the `drop_lookback` changes ending
/// `stabilization_lookback` minutes before now; any change below
/// `drop_threshold` there qualifies. Any of the last `stabilization_lookback`
/// changes above `stabilization_threshold` counts as the bounce. Fires iff
/// both hold.
pub fn drop_then_stabilize(prices: &[f64], config: &DropStabilizeConfig) -> bool {
    let min_len = config.drop_lookback + config.stabilization_lookback + 1;
    if prices.len() < min_len || config.stabilization_lookback == 0 {
        return false;
    }

    let changes = pct_change(prices, 1);
    let n = changes.len();

    let drop_window = &changes[n - config.drop_lookback - config.stabilization_lookback
        ..n - config.stabilization_lookback];
    let dropped = drop_window
        .iter()
        .flatten()
        .any(|&change| change < config.drop_threshold);

    let stabilizing = changes[n - config.stabilization_lookback..]
        .iter()
        .flatten()
        .any(|&change| change > config.stabilization_threshold);

    if dropped && stabilizing {
        tracing::debug!(
            "drop_then_stabilize fired: drop < {} within {}m, rebound > {} within {}m",
            config.drop_threshold,
            config.drop_lookback,
            config.stabilization_threshold,
            config.stabilization_lookback
        );
    }

    dropped && stabilizing
}

/// Configuration for the windowed-drop buy detector
#[derive(Debug, Clone)]
pub struct WindowDropConfig {
    /// Minimum relative decrease over the drop window (negative)
    pub drop_threshold: f64,
    /// Minutes checked for stabilization after the drop
    pub stabilization_period: usize,
}

impl Default for WindowDropConfig {
    fn default() -> Self {
        Self {
            drop_threshold: -0.005,
            stabilization_period: 1,
        }
    }
}

/// Buy detector: a significant drop over the last 15 minutes, followed by a
/// tight stabilization band.
///
/// The drop is the 15-minute percent change ending exactly
/// `stabilization_period` minutes before now; the band requires every one of
/// the last `stabilization_period` minute-over-minute changes to stay within
/// 0.2% in magnitude. An undefined drop or change never fires.
pub fn drop_window_then_stabilize(prices: &[f64], config: &WindowDropConfig) -> bool {
    const DROP_WINDOW_MINUTES: usize = 15;
    const STABILIZATION_BAND: f64 = 0.002;

    let n = prices.len();
    if config.stabilization_period == 0 || n < DROP_WINDOW_MINUTES + config.stabilization_period {
        return false;
    }

    let significant_drop = pct_change(prices, DROP_WINDOW_MINUTES)
        [n - 1 - config.stabilization_period]
        .map_or(false, |change| change <= config.drop_threshold);

    let stabilized = pct_change(prices, 1)[n - config.stabilization_period..]
        .iter()
        .all(|change| matches!(change, Some(c) if c.abs() <= STABILIZATION_BAND));

    if significant_drop && stabilized {
        tracing::debug!(
            "drop_window_then_stabilize fired: {}m drop <= {}, band held for {}m",
            DROP_WINDOW_MINUTES,
            config.drop_threshold,
            config.stabilization_period
        );
    }

    significant_drop && stabilized
}

/// Configuration for the peak-reversal sell detector
#[derive(Debug, Clone)]
pub struct PeakReversalConfig {
    /// Minimum relative increase to the recent peak before a reversal sells
    pub threshold: f64,
    /// Maximum tolerable drawdown from the purchase price
    pub stop_loss: f64,
}

impl Default for PeakReversalConfig {
    fn default() -> Self {
        Self {
            threshold: 0.005,
            stop_loss: 0.02,
        }
    }
}

/// Sell detector: a completed run-up rolling over, or the stop-loss.
///
/// The peak and the rise count are measured over the six comparisons before
/// the last two; the last two moves must both be down. The relative increase
/// is measured against the first element of the supplied window, not the
/// purchase price (see DESIGN.md). The stop-loss branch fires on its own
/// whenever the drawdown from the purchase price reaches `stop_loss`.
pub fn peak_reversal_or_stop_loss(
    prices: &[f64],
    purchase_price: f64,
    config: &PeakReversalConfig,
) -> bool {
    const LOOKBACK_PERIOD: usize = 6;
    const REQUIRED_RISES: usize = 4;
    const DOWNWARD_COMPARISONS: usize = 2;

    let n = prices.len();
    if n < LOOKBACK_PERIOD + 1 {
        return false;
    }
    if !purchase_price.is_finite() || purchase_price <= 0.0 {
        return false;
    }

    let current_price = prices[n - 1];

    let peak_price = prices[n - (LOOKBACK_PERIOD + 1)..n - DOWNWARD_COMPARISONS]
        .iter()
        .fold(f64::MIN, |max, &p| max.max(p));

    // Baseline is the first element of the window, not the purchase price
    let relative_increase = if prices[0] != 0.0 {
        Some((peak_price - prices[0]) / prices[0])
    } else {
        None
    };

    let stop_loss_triggered = (purchase_price - current_price) / purchase_price >= config.stop_loss;

    let diffs: Vec<f64> = prices.windows(2).map(|pair| pair[1] - pair[0]).collect();

    // Same span as the peak window, shifted one left in diff space; the
    // window is clamped at the front when it would reach before the series.
    let rise_start = n.saturating_sub(LOOKBACK_PERIOD + 2);
    let rises = diffs[rise_start..n - DOWNWARD_COMPARISONS - 1]
        .iter()
        .filter(|&&diff| diff > 0.0)
        .count();

    let recent_downward = diffs[diffs.len() - DOWNWARD_COMPARISONS..]
        .iter()
        .all(|&diff| diff < 0.0);

    if stop_loss_triggered {
        tracing::debug!(
            "stop loss fired: purchase {:.4}, current {:.4}, limit {}",
            purchase_price,
            current_price,
            config.stop_loss
        );
        return true;
    }

    relative_increase.map_or(false, |increase| increase >= config.threshold)
        && rises >= REQUIRED_RISES
        && recent_downward
        && current_price > purchase_price
}

/// Configuration for the rise-then-stabilize sell detector
#[derive(Debug, Clone)]
pub struct RiseStabilizeConfig {
    /// Minimum relative increase over the rise window
    pub rise_threshold: f64,
    /// Minutes checked for stabilization after the rise
    pub stabilization_period: usize,
}

impl Default for RiseStabilizeConfig {
    fn default() -> Self {
        Self {
            rise_threshold: 0.008,
            stabilization_period: 4,
        }
    }
}

/// Sell detector: a significant 10-minute rise that has gone quiet.
///
/// The rise is the 10-minute percent change ending `stabilization_period`
/// minutes before now. Stabilization looks only at the changes within the
/// last `stabilization_period` prices (one fewer than the period) and
/// requires every one of them to stay within 0.1% in magnitude; a period of
/// one has no changes to inspect and never stabilizes.
pub fn rise_then_stabilize(prices: &[f64], config: &RiseStabilizeConfig) -> bool {
    const RISE_WINDOW_MINUTES: usize = 10;
    const STABILIZATION_BAND: f64 = 0.001;

    let n = prices.len();
    if config.stabilization_period == 0 || n < RISE_WINDOW_MINUTES + config.stabilization_period {
        return false;
    }

    let significant_rise = pct_change(prices, RISE_WINDOW_MINUTES)
        [n - 1 - config.stabilization_period]
        .map_or(false, |change| change >= config.rise_threshold);

    let tail_changes = pct_change(&prices[n - config.stabilization_period..], 1);
    let stabilized = tail_changes.len() > 1
        && tail_changes[1..]
            .iter()
            .all(|change| matches!(change, Some(c) if c.abs() <= STABILIZATION_BAND));

    if significant_rise && stabilized {
        tracing::debug!(
            "rise_then_stabilize fired: {}m rise >= {}, quiet for {}m",
            RISE_WINDOW_MINUTES,
            config.rise_threshold,
            config.stabilization_period
        );
    }

    significant_rise && stabilized
}
