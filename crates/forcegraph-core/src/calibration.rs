//! Iterative calibration against a reference mass
//!
//! With a known mass on the load cell the routine repeatedly averages a few
//! readings taken at the current scale factor and corrects the factor by the
//! ratio of reading to reference. Steps whose average lands within tolerance
//! count as converged; once enough of them accumulated, their factors are
//! averaged into the integer calibration constant that goes to flash.
//!
//! The routine never blocks. It consumes one reading per call and tells the
//! caller what to do with the sensor next.

use log::{debug, info, warn};

use crate::config::CalibrationConfig;

/// Outcome of feeding one reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationStep {
    /// The current step needs more readings
    Sampling,
    /// A step finished; apply `factor` to the sensor before the next reading
    Adjusted {
        factor: f32,
        average: f32,
        converged: usize,
    },
    /// Enough converged steps; `constant` is the new calibration value
    Finished { constant: i32 },
    /// No convergence within the step budget
    Aborted,
}

#[derive(Debug, Clone)]
pub struct CalibrationRoutine {
    config: CalibrationConfig,
    factor: f32,
    step_sum: f32,
    step_readings: usize,
    steps: usize,
    converged: usize,
    converged_factor_sum: f32,
}

impl CalibrationRoutine {
    /// Scale factor every run starts from
    pub const START_FACTOR: f32 = 1.0;

    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            factor: Self::START_FACTOR,
            step_sum: 0.0,
            step_readings: 0,
            steps: 0,
            converged: 0,
            converged_factor_sum: 0.0,
        }
    }

    /// Begin a fresh run; returns the factor to apply to the sensor
    pub fn start(&mut self) -> f32 {
        *self = Self::new(self.config);
        info!(
            "Calibration started: reference {} g, tolerance {}",
            self.config.reference_mass, self.config.tolerance
        );
        self.factor
    }

    /// Factor readings are currently taken with
    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn converged(&self) -> usize {
        self.converged
    }

    /// Consume one reading taken at [`factor`](Self::factor)
    pub fn feed(&mut self, reading: f32) -> CalibrationStep {
        if !reading.is_finite() {
            warn!("Calibration ignored non-finite reading");
            return CalibrationStep::Sampling;
        }

        self.step_sum += reading;
        self.step_readings += 1;
        if self.step_readings < self.config.samples_per_step.max(1) {
            return CalibrationStep::Sampling;
        }

        let average = self.step_sum / self.step_readings as f32;
        self.step_sum = 0.0;
        self.step_readings = 0;
        self.steps += 1;

        let reference = self.config.reference_mass;
        if (average - reference).abs() < reference * self.config.tolerance {
            self.converged += 1;
            self.converged_factor_sum += self.factor;
        }

        if self.converged >= self.config.converged_steps {
            return self.finish();
        }

        if self.steps >= self.config.max_steps {
            warn!(
                "Calibration aborted after {} steps ({} converged)",
                self.steps, self.converged
            );
            return CalibrationStep::Aborted;
        }

        // A dead or reversed reading gives no usable correction
        if average > 0.0 {
            let next = self.factor * average / reference;
            if next.is_finite() && next > 0.0 {
                self.factor = next;
            }
        }

        debug!(
            "Calibration step {}: average {:.2}, factor {:.3}, converged {}",
            self.steps, average, self.factor, self.converged
        );
        CalibrationStep::Adjusted {
            factor: self.factor,
            average,
            converged: self.converged,
        }
    }

    fn finish(&mut self) -> CalibrationStep {
        let mean = self.converged_factor_sum / self.converged as f32;
        match round_to_i32(mean) {
            Some(constant) if constant > 0 => {
                info!("Calibration converged after {} steps: {}", self.steps, constant);
                CalibrationStep::Finished { constant }
            }
            _ => {
                warn!("Calibration converged on unusable factor {}", mean);
                CalibrationStep::Aborted
            }
        }
    }
}

/// Round half away from zero; `None` outside the `i32` range
fn round_to_i32(value: f32) -> Option<i32> {
    if !value.is_finite() || value >= i32::MAX as f32 || value <= i32::MIN as f32 {
        return None;
    }
    let rounded = if value >= 0.0 { value + 0.5 } else { value - 0.5 };
    Some(rounded as i32)
}
