//! HX711 load cell amplifier as a [`ForceSensor`]

use esp_hal::delay::Delay;
use esp_hal::gpio::{Input, Output};
use forcegraph_core::sensors::{ForceSensor, SensorError};
use loadcell::LoadCell;
use loadcell::hx711::HX711;

/// HX711 on two GPIOs, bit-banged with a busy-wait delay
pub type Hx711<'d> = HX711<Output<'d>, Input<'d>, Delay>;

pub struct LoadCellSensor<'d> {
    hx711: Hx711<'d>,
}

impl<'d> LoadCellSensor<'d> {
    pub fn new(sck: Output<'d>, dt: Input<'d>, delay: Delay) -> Self {
        Self {
            hx711: HX711::new(sck, dt, delay),
        }
    }
}

impl ForceSensor for LoadCellSensor<'_> {
    fn is_ready(&mut self) -> bool {
        self.hx711.is_ready()
    }

    fn read_units(&mut self) -> Result<f32, SensorError> {
        self.hx711.read_scaled().map_err(|_| SensorError::NotReady)
    }

    fn tare(&mut self, samples: usize) -> Result<(), SensorError> {
        // Blocks until `samples` conversions have been averaged
        self.hx711.tare(samples);
        Ok(())
    }

    fn set_scale(&mut self, scale: f32) {
        self.hx711.set_scale(scale);
    }

    fn scale(&self) -> f32 {
        self.hx711.get_scale()
    }
}
