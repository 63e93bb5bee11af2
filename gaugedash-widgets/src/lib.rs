pub mod common;
pub mod gauge;
pub mod thresholds;

pub use common::*;
pub use gauge::GaugeWidget;
pub use thresholds::ThresholdsWidget;
