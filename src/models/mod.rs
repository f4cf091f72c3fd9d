// Domain models

mod alert;
mod sample;

pub use alert::{AlertEvent, AlertLevel};
pub use sample::{Metric, Sample};
