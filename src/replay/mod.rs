// Signal consumption: replaying a price series through the detectors

pub mod runner;
pub mod synthetic;

pub use runner::{validate_minute_spacing, IntradayReplay};
pub use synthetic::{PriceScenario, SyntheticPriceGenerator};
