pub mod closure;
pub mod metrics;
pub mod thresholds;
