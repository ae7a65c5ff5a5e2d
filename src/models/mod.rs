use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single observation in a price series - just price and timestamp.
/// This is our core data structure; ordering and sampling interval are
/// the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Trading signal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A discrete trade marker emitted when a detector or crossover fires.
/// Consumers (plotting, execution) only need the side, price and time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeMarker {
    pub id: Uuid,
    pub side: TradeSide,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl TradeMarker {
    pub fn new(side: TradeSide, price: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            side,
            price,
            timestamp,
        }
    }
}

/// One row of the crossover signal table.
///
/// `short_ma`/`long_ma` are `None` until their windows fill. `signal` is
/// `Some(1)` while the short MA is strictly above the long MA, `Some(0)`
/// otherwise, and `None` while either MA is undefined. `position` is the
/// discrete derivative `signal[i] - signal[i-1]`: `Some(1)` marks a buy
/// crossover, `Some(-1)` a sell crossover, `None` wherever either term
/// is undefined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRow {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub short_ma: Option<f64>,
    pub long_ma: Option<f64>,
    pub signal: Option<i8>,
    pub position: Option<i8>,
}

/// Per-timestamp crossover records plus marker enumeration for consumers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalSeries {
    pub rows: Vec<SignalRow>,
}

impl SignalSeries {
    pub fn new(rows: Vec<SignalRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[SignalRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows where an upward crossover completed (position == +1)
    pub fn buy_markers(&self) -> Vec<&SignalRow> {
        self.rows
            .iter()
            .filter(|row| row.position == Some(1))
            .collect()
    }

    /// Rows where a downward crossover completed (position == -1)
    pub fn sell_markers(&self) -> Vec<&SignalRow> {
        self.rows
            .iter()
            .filter(|row| row.position == Some(-1))
            .collect()
    }
}
