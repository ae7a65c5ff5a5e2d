use crate::models::PricePoint;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Price path shapes for synthetic series generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceScenario {
    /// Flat price with negligible noise
    Flat,
    /// Steady uptrend with noise (+2% daily average)
    Uptrend,
    /// Steady downtrend with noise (-2% daily average)
    Downtrend,
    /// Mean-reverting chop around the base price
    Choppy,
    /// Stable, then a sharp one-minute dip and a small bounce
    FlashDip,
    /// A 10-minute rally that goes quiet
    RallyFade,
    /// Slow bleed into a steep collapse
    Crash,
}

impl PriceScenario {
    pub fn all() -> &'static [PriceScenario] {
        &[
            PriceScenario::Flat,
            PriceScenario::Uptrend,
            PriceScenario::Downtrend,
            PriceScenario::Choppy,
            PriceScenario::FlashDip,
            PriceScenario::RallyFade,
            PriceScenario::Crash,
        ]
    }
}

/// Generates synthetic price series - the stand-in for a market-data feed
pub struct SyntheticPriceGenerator {
    rng: StdRng,
    base_price: f64,
}

impl SyntheticPriceGenerator {
    /// Create a new generator with a seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_price: 150.0,
        }
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    /// Generate a price series for a specific scenario
    ///
    /// # Arguments
    /// * `scenario` - The price path shape to simulate
    /// * `num_points` - Number of points to generate
    /// * `interval_minutes` - Minutes between points (1 for the intraday
    ///   detectors, larger for the crossover strategy)
    pub fn generate(
        &mut self,
        scenario: PriceScenario,
        num_points: usize,
        interval_minutes: i64,
    ) -> Vec<PricePoint> {
        let start_time = Utc::now() - Duration::minutes(num_points as i64 * interval_minutes);

        match scenario {
            PriceScenario::Flat => self.generate_flat(start_time, num_points, interval_minutes),
            PriceScenario::Uptrend => {
                self.generate_drift(start_time, num_points, interval_minutes, 0.02)
            }
            PriceScenario::Downtrend => {
                self.generate_drift(start_time, num_points, interval_minutes, -0.02)
            }
            PriceScenario::Choppy => self.generate_choppy(start_time, num_points, interval_minutes),
            PriceScenario::FlashDip => {
                self.generate_flash_dip(start_time, num_points, interval_minutes)
            }
            PriceScenario::RallyFade => {
                self.generate_rally_fade(start_time, num_points, interval_minutes)
            }
            PriceScenario::Crash => self.generate_crash(start_time, num_points, interval_minutes),
        }
    }

    fn generate_flat(
        &mut self,
        start_time: DateTime<Utc>,
        num_points: usize,
        interval_minutes: i64,
    ) -> Vec<PricePoint> {
        let base = self.base_price;
        (0..num_points)
            .map(|i| {
                // ±0.01% noise: far inside every detector band
                let noise = base * self.rng.gen_range(-0.0001..0.0001);
                PricePoint::new(
                    start_time + Duration::minutes(i as i64 * interval_minutes),
                    base + noise,
                )
            })
            .collect()
    }

    /// Drift of `daily_rate` per day with small noise
    fn generate_drift(
        &mut self,
        start_time: DateTime<Utc>,
        num_points: usize,
        interval_minutes: i64,
        daily_rate: f64,
    ) -> Vec<PricePoint> {
        let drift_per_interval = daily_rate / (24.0 * 60.0 / interval_minutes as f64);
        let mut current_price = self.base_price;
        let mut points = Vec::with_capacity(num_points);

        for i in 0..num_points {
            let drift = current_price * drift_per_interval;
            let noise = current_price * self.rng.gen_range(-0.001..0.001);
            current_price += drift + noise;

            points.push(PricePoint::new(
                start_time + Duration::minutes(i as i64 * interval_minutes),
                current_price,
            ));
        }

        points
    }

    /// Mean-reverting chop: crosses its own moving averages repeatedly
    fn generate_choppy(
        &mut self,
        start_time: DateTime<Utc>,
        num_points: usize,
        interval_minutes: i64,
    ) -> Vec<PricePoint> {
        let mean_price = self.base_price;
        let mut current_price = self.base_price;
        let mut points = Vec::with_capacity(num_points);

        for i in 0..num_points {
            let reversion = (mean_price - current_price) * 0.1;
            let noise = current_price * self.rng.gen_range(-0.01..0.01);
            current_price += reversion + noise;

            points.push(PricePoint::new(
                start_time + Duration::minutes(i as i64 * interval_minutes),
                current_price,
            ));
        }

        points
    }

    /// Stable tape, then a -0.8% minute and a +0.3% bounce, then stable.
    /// The dip lands two thirds of the way through the series.
    fn generate_flash_dip(
        &mut self,
        start_time: DateTime<Utc>,
        num_points: usize,
        interval_minutes: i64,
    ) -> Vec<PricePoint> {
        let dip_at = num_points * 2 / 3;
        let mut current_price = self.base_price;
        let mut points = Vec::with_capacity(num_points);

        for i in 0..num_points {
            if i == dip_at {
                current_price *= 0.992;
            } else if i == dip_at + 1 {
                current_price *= 1.003;
            } else {
                // ±0.02% noise keeps the dip unambiguous
                current_price *= 1.0 + self.rng.gen_range(-0.0002..0.0002);
            }

            points.push(PricePoint::new(
                start_time + Duration::minutes(i as i64 * interval_minutes),
                current_price,
            ));
        }

        points
    }

    /// Quiet tape, a +1.2% climb over ten minutes, then a near-still tail
    fn generate_rally_fade(
        &mut self,
        start_time: DateTime<Utc>,
        num_points: usize,
        interval_minutes: i64,
    ) -> Vec<PricePoint> {
        let rally_start = num_points / 2;
        let rally_end = (rally_start + 10).min(num_points);
        let mut current_price = self.base_price;
        let mut points = Vec::with_capacity(num_points);

        for i in 0..num_points {
            if i >= rally_start && i < rally_end {
                current_price *= 1.0012;
            } else if i >= rally_end {
                // Inside the 0.1% stabilization band
                current_price *= 1.0 + self.rng.gen_range(-0.00005..0.00005);
            } else {
                current_price *= 1.0 + self.rng.gen_range(-0.0002..0.0002);
            }

            points.push(PricePoint::new(
                start_time + Duration::minutes(i as i64 * interval_minutes),
                current_price,
            ));
        }

        points
    }

    /// First half drifts slightly up, second half collapses 25%
    fn generate_crash(
        &mut self,
        start_time: DateTime<Utc>,
        num_points: usize,
        interval_minutes: i64,
    ) -> Vec<PricePoint> {
        let mut current_price = self.base_price;
        let mut points = Vec::with_capacity(num_points);

        for i in 0..num_points {
            if i < num_points / 2 {
                let change = current_price * self.rng.gen_range(-0.0005..0.001);
                current_price += change;
            } else {
                let drop_rate = -0.25 / (num_points as f64 / 2.0);
                let drop = current_price * drop_rate;
                let noise = current_price * self.rng.gen_range(-0.0005..0.0005);
                current_price += drop + noise;
            }

            points.push(PricePoint::new(
                start_time + Duration::minutes(i as i64 * interval_minutes),
                current_price,
            ));
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_lengths_and_order() {
        let mut gen = SyntheticPriceGenerator::new(42);

        for &scenario in PriceScenario::all() {
            let points = gen.generate(scenario, 120, 1);
            assert_eq!(points.len(), 120);

            for pair in points.windows(2) {
                assert!(pair[1].timestamp > pair[0].timestamp);
                assert!(pair[1].price > 0.0);
            }
        }
    }

    #[test]
    fn test_uptrend_ends_higher() {
        let mut gen = SyntheticPriceGenerator::new(42);
        let points = gen.generate(PriceScenario::Uptrend, 500, 5);

        assert!(points.last().unwrap().price > points.first().unwrap().price);
    }

    #[test]
    fn test_downtrend_ends_lower() {
        let mut gen = SyntheticPriceGenerator::new(42);
        let points = gen.generate(PriceScenario::Downtrend, 500, 5);

        assert!(points.last().unwrap().price < points.first().unwrap().price);
    }

    #[test]
    fn test_flat_stays_within_noise_band() {
        let mut gen = SyntheticPriceGenerator::new(7);
        let base = gen.base_price();
        let points = gen.generate(PriceScenario::Flat, 200, 1);

        for point in &points {
            assert!((point.price - base).abs() < base * 0.001);
        }
    }

    #[test]
    fn test_flash_dip_contains_the_dip() {
        let mut gen = SyntheticPriceGenerator::new(42);
        let points = gen.generate(PriceScenario::FlashDip, 90, 1);

        let has_dip = points.windows(2).any(|pair| {
            let change = (pair[1].price - pair[0].price) / pair[0].price;
            change < -0.005
        });
        assert!(has_dip);
    }

    #[test]
    fn test_crash_loses_a_fifth() {
        let mut gen = SyntheticPriceGenerator::new(42);
        let points = gen.generate(PriceScenario::Crash, 200, 1);

        let first = points.first().unwrap().price;
        let last = points.last().unwrap().price;
        assert!(last < first * 0.85);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = SyntheticPriceGenerator::new(9).generate(PriceScenario::Choppy, 50, 1);
        let b = SyntheticPriceGenerator::new(9).generate(PriceScenario::Choppy, 50, 1);

        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.price, y.price);
        }
    }
}
