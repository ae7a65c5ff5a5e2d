use crate::models::{PricePoint, TradeMarker, TradeSide};
use crate::strategy::{
    drop_then_stabilize, drop_window_then_stabilize, peak_reversal_or_stop_loss,
    rise_then_stabilize, DropStabilizeConfig, PeakReversalConfig, RiseStabilizeConfig,
    WindowDropConfig,
};

/// Validate that price points are uniformly spaced in time
///
/// # Arguments
/// * `points` - The price points to validate
/// * `expected_interval_secs` - Expected time between points in seconds
///
/// # Returns
/// * `Ok(())` if points are uniformly spaced (within tolerance)
/// * `Err` if there are gaps in the data
///
/// # Tolerance
/// Allows up to 1.5x the expected interval (e.g., 90s for 1-minute bars)
pub fn validate_minute_spacing(
    points: &[PricePoint],
    expected_interval_secs: u64,
) -> anyhow::Result<()> {
    if points.len() < 2 {
        return Ok(());
    }

    // Allow 50% tolerance for slight timing variations
    let max_gap_secs = expected_interval_secs + (expected_interval_secs / 2);

    for window in points.windows(2) {
        let time_diff = (window[1].timestamp - window[0].timestamp).num_seconds();

        if time_diff < 0 {
            anyhow::bail!("Price points are not sorted by timestamp");
        }

        if time_diff as u64 > max_gap_secs {
            anyhow::bail!(
                "Data gap detected: {}s between points (expected ~{}s, max allowed {}s). \
                 Gap from {} to {}.",
                time_diff,
                expected_interval_secs,
                max_gap_secs,
                window[0].timestamp.format("%H:%M:%S"),
                window[1].timestamp.format("%H:%M:%S")
            );
        }
    }

    Ok(())
}

/// Replays a 1-minute price series through the intraday detectors.
///
/// This is the flat -> holding -> flat state machine the detectors
/// themselves deliberately do not carry: while flat it watches the two buy
/// detectors, and while holding it watches the two sell detectors with the
/// recorded purchase price. Detectors only ever see the trailing window;
/// the runner holds all state.
#[derive(Debug, Clone)]
pub struct IntradayReplay {
    buy_dip: DropStabilizeConfig,
    buy_window_drop: WindowDropConfig,
    sell_peak: PeakReversalConfig,
    sell_rise: RiseStabilizeConfig,
    lookback_minutes: usize,
}

impl Default for IntradayReplay {
    fn default() -> Self {
        Self {
            buy_dip: DropStabilizeConfig::default(),
            buy_window_drop: WindowDropConfig::default(),
            sell_peak: PeakReversalConfig::default(),
            sell_rise: RiseStabilizeConfig::default(),
            lookback_minutes: 30,
        }
    }
}

impl IntradayReplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trailing window length handed to the detectors on every tick
    pub fn with_lookback(mut self, minutes: usize) -> Self {
        self.lookback_minutes = minutes;
        self
    }

    pub fn with_buy_configs(mut self, dip: DropStabilizeConfig, drop: WindowDropConfig) -> Self {
        self.buy_dip = dip;
        self.buy_window_drop = drop;
        self
    }

    pub fn with_sell_configs(mut self, peak: PeakReversalConfig, rise: RiseStabilizeConfig) -> Self {
        self.sell_peak = peak;
        self.sell_rise = rise;
        self
    }

    /// Walk the series tick by tick and collect the trade markers.
    ///
    /// Rejects non-uniform input up front; the detectors themselves assume
    /// 1-minute spacing and never verify it.
    pub fn run(&self, points: &[PricePoint]) -> anyhow::Result<Vec<TradeMarker>> {
        validate_minute_spacing(points, 60)?;

        let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
        let mut markers = Vec::new();
        let mut holding_at: Option<f64> = None;

        for (i, point) in points.iter().enumerate() {
            let start = (i + 1).saturating_sub(self.lookback_minutes);
            let window = &prices[start..=i];

            match holding_at {
                None => {
                    if drop_then_stabilize(window, &self.buy_dip)
                        || drop_window_then_stabilize(window, &self.buy_window_drop)
                    {
                        tracing::info!(
                            "📉 BUY signal at {} @ {:.4}",
                            point.timestamp.format("%H:%M"),
                            point.price
                        );
                        markers.push(TradeMarker::new(TradeSide::Buy, point.price, point.timestamp));
                        holding_at = Some(point.price);
                    }
                }
                Some(purchase_price) => {
                    if peak_reversal_or_stop_loss(window, purchase_price, &self.sell_peak)
                        || rise_then_stabilize(window, &self.sell_rise)
                    {
                        tracing::info!(
                            "📈 SELL signal at {} @ {:.4} (bought @ {:.4})",
                            point.timestamp.format("%H:%M"),
                            point.price,
                            purchase_price
                        );
                        markers.push(TradeMarker::new(
                            TradeSide::Sell,
                            point.price,
                            point.timestamp,
                        ));
                        holding_at = None;
                    }
                }
            }
        }

        tracing::debug!(
            "replay complete: {} points, {} markers, {}",
            points.len(),
            markers.len(),
            if holding_at.is_some() {
                "still holding"
            } else {
                "flat"
            }
        );

        Ok(markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn minute_points(prices: &[f64]) -> Vec<PricePoint> {
        let start = Utc::now() - Duration::minutes(prices.len() as i64);
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint::new(start + Duration::minutes(i as i64), price))
            .collect()
    }

    #[test]
    fn test_uniform_points_pass() {
        let points = minute_points(&[100.0, 100.1, 100.2]);
        assert!(validate_minute_spacing(&points, 60).is_ok());
    }

    #[test]
    fn test_gap_detected() {
        let start = Utc::now();
        let points = vec![
            PricePoint::new(start, 100.0),
            PricePoint::new(start + Duration::minutes(10), 100.1),
        ];

        let result = validate_minute_spacing(&points, 60);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("gap"));
    }

    #[test]
    fn test_backwards_timestamps_fail() {
        let start = Utc::now();
        let points = vec![
            PricePoint::new(start, 100.0),
            PricePoint::new(start - Duration::minutes(1), 100.1),
        ];

        let result = validate_minute_spacing(&points, 60);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not sorted"));
    }

    #[test]
    fn test_replay_round_trip() {
        // Flat, then a sharp dip with a bounce (buy), then a 1% climb that
        // goes quiet (sell)
        let mut prices = vec![100.0; 20];
        prices.push(99.2); // -0.8% dip
        prices.push(99.5); // +0.3% bounce -> buy here
        for i in 1..=10 {
            prices.push(99.5 + 0.1 * i as f64); // climb to 100.5
        }
        prices.extend(vec![100.5; 4]); // quiet tail -> sell in here

        let points = minute_points(&prices);
        let markers = IntradayReplay::new().run(&points).unwrap();

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].side, TradeSide::Buy);
        assert!((markers[0].price - 99.5).abs() < 1e-9);
        assert_eq!(markers[1].side, TradeSide::Sell);
        assert!((markers[1].price - 100.5).abs() < 1e-9);
        assert!(markers[1].timestamp > markers[0].timestamp);
    }

    #[test]
    fn test_replay_flat_series_stays_flat() {
        let points = minute_points(&[100.0; 60]);
        let markers = IntradayReplay::new().run(&points).unwrap();
        assert!(markers.is_empty());
    }

    #[test]
    fn test_replay_stop_loss_exit() {
        // Dip-and-bounce entry, then a steep slide past the 2% stop
        let mut prices = vec![100.0; 20];
        prices.push(99.2);
        prices.push(99.5);
        for i in 1..=10 {
            prices.push(99.5 - 0.3 * i as f64);
        }

        let points = minute_points(&prices);
        let markers = IntradayReplay::new().run(&points).unwrap();

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[1].side, TradeSide::Sell);
        // Exit at or below the stop-loss price
        assert!(markers[1].price <= 99.5 * 0.98);
    }

    #[test]
    fn test_replay_rejects_gapped_input() {
        let start = Utc::now();
        let points: Vec<PricePoint> = (0..30)
            .map(|i| PricePoint::new(start + Duration::minutes(i * 7), 100.0))
            .collect();

        assert!(IntradayReplay::new().run(&points).is_err());
    }
}
