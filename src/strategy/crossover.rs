use crate::indicators::rolling_mean;
use crate::models::{PricePoint, Signal, SignalRow, SignalSeries};
use crate::strategy::Strategy;
use crate::Result;

/// Configuration for the moving-average crossover generator
#[derive(Debug, Clone)]
pub struct CrossoverConfig {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            short_window: 20,
            long_window: 50,
        }
    }
}

/// Derive a long/flat signal series from two rolling means.
///
/// For every input timestamp: `signal = Some(1)` iff the short MA is
/// strictly above the long MA, `Some(0)` iff it is at or below, and `None`
/// while either MA is still filling its window. `position` is the discrete
/// derivative of `signal`; it stays `None` across the undefined prefix and
/// at the first defined signal, so no position change can fire just because
/// data started flowing.
///
/// Pure function of the input; the caller's series is never mutated.
pub fn compute_crossover_signals(points: &[PricePoint], config: &CrossoverConfig) -> SignalSeries {
    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
    let short_ma = rolling_mean(&prices, config.short_window);
    let long_ma = rolling_mean(&prices, config.long_window);

    let mut rows = Vec::with_capacity(points.len());
    let mut prev_signal: Option<i8> = None;

    for (i, point) in points.iter().enumerate() {
        let signal = match (short_ma[i], long_ma[i]) {
            (Some(short), Some(long)) => Some(if short > long { 1 } else { 0 }),
            _ => None,
        };

        let position = match (signal, prev_signal) {
            (Some(current), Some(previous)) => Some(current - previous),
            _ => None,
        };

        rows.push(SignalRow {
            timestamp: point.timestamp,
            price: point.price,
            short_ma: short_ma[i],
            long_ma: long_ma[i],
            signal,
            position,
        });

        prev_signal = signal;
    }

    SignalSeries::new(rows)
}

/// Moving-average crossover strategy for swing trading.
///
/// Reports `Buy` when the short MA has just crossed above the long MA on
/// the final point of the supplied window, `Sell` on the opposite cross,
/// `Hold` otherwise.
#[derive(Debug, Clone, Default)]
pub struct CrossoverStrategy {
    config: CrossoverConfig,
}

impl CrossoverStrategy {
    pub fn new(config: CrossoverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CrossoverConfig {
        &self.config
    }
}

impl Strategy for CrossoverStrategy {
    fn generate_signal(&self, points: &[PricePoint]) -> Result<Signal> {
        if points.len() < self.min_points_required() {
            return Err(format!(
                "Need at least {} points for crossover strategy, got {}",
                self.min_points_required(),
                points.len()
            )
            .into());
        }

        let series = compute_crossover_signals(points, &self.config);
        let signal = match series.rows().last().and_then(|row| row.position) {
            Some(1) => Signal::Buy,
            Some(-1) => Signal::Sell,
            _ => Signal::Hold,
        };

        tracing::debug!(
            "Crossover({}/{}): last position {:?} -> {:?}",
            self.config.short_window,
            self.config.long_window,
            series.rows().last().and_then(|row| row.position),
            signal
        );

        Ok(signal)
    }

    fn name(&self) -> &str {
        "MA Crossover"
    }

    fn min_points_required(&self) -> usize {
        // One extra point so the last row has a defined previous signal
        self.config.long_window + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn create_points(prices: &[f64]) -> Vec<PricePoint> {
        let start = Utc::now() - Duration::minutes(prices.len() as i64);
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint::new(start + Duration::minutes(i as i64), price))
            .collect()
    }

    fn short_config() -> CrossoverConfig {
        CrossoverConfig {
            short_window: 2,
            long_window: 3,
        }
    }

    #[test]
    fn test_undefined_prefix_has_no_signal() {
        let points = create_points(&[10.0, 10.0, 10.0, 10.0]);
        let series = compute_crossover_signals(&points, &short_config());

        assert_eq!(series.rows()[0].signal, None);
        assert_eq!(series.rows()[1].signal, None);
        assert_eq!(series.rows()[1].short_ma, Some(10.0));
        assert_eq!(series.rows()[1].long_ma, None);
        // First defined signal has no prior signal to diff against
        assert_eq!(series.rows()[2].signal, Some(0));
        assert_eq!(series.rows()[2].position, None);
        assert_eq!(series.rows()[3].position, Some(0));
    }

    #[test]
    fn test_crossover_markers() {
        // Short MA crosses above at index 3, back below at index 5
        let points = create_points(&[10.0, 10.0, 10.0, 13.0, 16.0, 10.0, 4.0]);
        let series = compute_crossover_signals(&points, &short_config());

        let signals: Vec<Option<i8>> = series.rows().iter().map(|r| r.signal).collect();
        assert_eq!(
            signals,
            vec![None, None, Some(0), Some(1), Some(1), Some(0), Some(0)]
        );

        let buys = series.buy_markers();
        let sells = series.sell_markers();
        assert_eq!(buys.len(), 1);
        assert_eq!(buys[0].timestamp, points[3].timestamp);
        assert_eq!(sells.len(), 1);
        assert_eq!(sells[0].timestamp, points[5].timestamp);
    }

    #[test]
    fn test_equal_mas_are_flat() {
        // Strict comparison: short == long must not read as long
        let points = create_points(&[10.0, 10.0, 10.0, 10.0, 10.0]);
        let series = compute_crossover_signals(&points, &short_config());

        for row in &series.rows()[2..] {
            assert_eq!(row.signal, Some(0));
        }
        assert!(series.buy_markers().is_empty());
        assert!(series.sell_markers().is_empty());
    }

    #[test]
    fn test_positions_telescope() {
        let prices: Vec<f64> = (0..40)
            .map(|i| 100.0 + 10.0 * ((i as f64) * 0.7).sin())
            .collect();
        let points = create_points(&prices);
        let series = compute_crossover_signals(
            &points,
            &CrossoverConfig {
                short_window: 3,
                long_window: 8,
            },
        );

        let defined: Vec<i8> = series.rows().iter().filter_map(|r| r.signal).collect();
        let position_sum: i8 = series.rows().iter().filter_map(|r| r.position).sum();

        assert!(!defined.is_empty());
        assert_eq!(
            position_sum,
            defined.last().unwrap() - defined.first().unwrap()
        );
    }

    #[test]
    fn test_strategy_requires_sufficient_data() {
        let strategy = CrossoverStrategy::new(short_config());
        let points = create_points(&[10.0, 10.0, 10.0]);

        let result = strategy.generate_signal(&points);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Need at least"));
    }

    #[test]
    fn test_strategy_reports_fresh_crossover() {
        let strategy = CrossoverStrategy::new(short_config());

        let buy = strategy
            .generate_signal(&create_points(&[10.0, 10.0, 10.0, 13.0]))
            .unwrap();
        assert_eq!(buy, Signal::Buy);

        let hold = strategy
            .generate_signal(&create_points(&[10.0, 10.0, 10.0, 10.0]))
            .unwrap();
        assert_eq!(hold, Signal::Hold);
    }

    #[test]
    fn test_default_windows() {
        let config = CrossoverConfig::default();
        assert_eq!(config.short_window, 20);
        assert_eq!(config.long_window, 50);
        assert_eq!(CrossoverStrategy::default().min_points_required(), 51);
    }
}
