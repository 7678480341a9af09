//! Load cell abstraction and signal conditioning

pub mod filter;

pub use filter::{MeanTracker, OutlierFilter, Reading};

use thiserror_no_std::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SensorError {
    /// Conversion not finished; poll again later
    #[error("Sensor not ready")]
    NotReady,
    #[error("Sensor read failed")]
    ReadError,
}

/// A force sensor behind an amplifier with tare and scale support
///
/// `read_units` returns `(raw - offset) / scale`, the same convention the
/// HX711 driver uses.
pub trait ForceSensor {
    /// Whether a conversion is available without blocking
    fn is_ready(&mut self) -> bool;

    /// One scaled, tared reading
    fn read_units(&mut self) -> Result<f32, SensorError>;

    /// Re-zero on the average of `samples` raw readings
    fn tare(&mut self, samples: usize) -> Result<(), SensorError>;

    fn set_scale(&mut self, scale: f32);

    fn scale(&self) -> f32;
}
