// Windowed statistics over ordered price series

pub mod rolling;

pub use rolling::{pct_change, rolling_mean};
