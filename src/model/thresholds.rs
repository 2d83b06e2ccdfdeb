pub const OVERLAP_CUTOFF: f64 = 0.5;
pub const SWEEP_START: f64 = 0.50;
pub const SWEEP_STOP: f64 = 1.00;
pub const SWEEP_STEP: f64 = 0.01;
pub const MAX_SWEEP_STEPS: usize = 1_000_000;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProfileError {
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("sweep step must be positive, got {0}")]
    NonPositiveStep(f64),
    #[error("sweep start {start} must be below sweep stop {stop}")]
    EmptyRange { start: f64, stop: f64 },
    #[error("sweep would take {steps} steps, limit is {MAX_SWEEP_STEPS}")]
    TooManySteps { steps: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalProfile {
    pub overlap_cutoff: f64,
    pub sweep_start: f64,
    /// Exclusive upper bound.
    pub sweep_stop: f64,
    pub sweep_step: f64,
}

impl Default for EvalProfile {
    fn default() -> Self {
        Self::default_v1()
    }
}

impl EvalProfile {
    pub fn default_v1() -> Self {
        Self {
            overlap_cutoff: OVERLAP_CUTOFF,
            sweep_start: SWEEP_START,
            sweep_stop: SWEEP_STOP,
            sweep_step: SWEEP_STEP,
        }
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        for (name, value) in [
            ("overlap cutoff", self.overlap_cutoff),
            ("sweep start", self.sweep_start),
            ("sweep stop", self.sweep_stop),
            ("sweep step", self.sweep_step),
        ] {
            if !value.is_finite() {
                return Err(ProfileError::NonFinite { name, value });
            }
        }
        if self.sweep_step <= 0.0 {
            return Err(ProfileError::NonPositiveStep(self.sweep_step));
        }
        if self.sweep_start >= self.sweep_stop {
            return Err(ProfileError::EmptyRange {
                start: self.sweep_start,
                stop: self.sweep_stop,
            });
        }
        let steps = self.step_count();
        if steps > MAX_SWEEP_STEPS as f64 {
            return Err(ProfileError::TooManySteps { steps });
        }
        Ok(())
    }

    fn step_count(&self) -> f64 {
        ((self.sweep_stop - self.sweep_start) / self.sweep_step).ceil()
    }

    /// Ascending thresholds `start + k * step` for every `k` with a value below `stop`.
    pub fn thresholds(&self) -> Vec<f64> {
        if self.validate().is_err() {
            return Vec::new();
        }
        let n = self.step_count() as usize;
        (0..n)
            .map(|k| self.sweep_start + k as f64 * self.sweep_step)
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/thresholds.rs"]
mod tests;
