//! Outlier rejection for load cell readings
//!
//! The amplifier occasionally returns garbage (a flipped bit in the top byte
//! turns a few grams into tens of thousands). Such readings are replaced by
//! the mean of all readings accepted since the last tare so the chart and
//! the window statistics never see them.

use log::warn;

use crate::config::LoopConfig;

/// All-time mean of accepted readings
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanTracker {
    sum: f64,
    count: u32,
}

impl MeanTracker {
    pub const fn new() -> Self {
        Self { sum: 0.0, count: 0 }
    }

    pub fn add(&mut self, value: f32) {
        self.sum += value as f64;
        self.count = self.count.saturating_add(1);
    }

    /// Mean so far; a freshly tared sensor reads zero
    pub fn mean(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            (self.sum / self.count as f64) as f32
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Result of conditioning one reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value: f32,
    /// The raw value was rejected and `value` is the running mean
    pub substituted: bool,
}

/// Threshold filter with optional sign inversion
#[derive(Debug, Clone, Copy)]
pub struct OutlierFilter {
    threshold: f32,
    invert: bool,
    mean: MeanTracker,
}

impl OutlierFilter {
    pub fn new(threshold: f32, invert: bool) -> Self {
        Self {
            threshold,
            invert,
            mean: MeanTracker::new(),
        }
    }

    pub fn from_config(config: &LoopConfig) -> Self {
        Self::new(config.outlier_threshold, config.invert_force)
    }

    pub fn mean(&self) -> f32 {
        self.mean.mean()
    }

    /// Forget the history, called after every tare
    pub fn reset(&mut self) {
        self.mean.reset();
    }

    pub fn apply(&mut self, raw: f32) -> Reading {
        let value = if self.invert { -raw } else { raw };

        if !value.is_finite() || value.abs() > self.threshold {
            let mean = self.mean.mean();
            warn!("Outlier {} replaced by mean {:.2}", value, mean);
            return Reading {
                value: mean,
                substituted: true,
            };
        }

        self.mean.add(value);
        Reading {
            value,
            substituted: false,
        }
    }
}
