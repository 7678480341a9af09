//! Push button on a GPIO with pull-up (pressed = low)

use esp_hal::gpio::Input;
use forcegraph_core::config::ButtonConfig;
use forcegraph_core::input::{ButtonEvent, ButtonInput, ClickDetector};

pub struct PushButton<'d> {
    pin: Input<'d>,
    detector: ClickDetector,
}

impl<'d> PushButton<'d> {
    pub fn new(pin: Input<'d>, config: ButtonConfig) -> Self {
        Self {
            pin,
            detector: ClickDetector::new(config),
        }
    }
}

impl ButtonInput for PushButton<'_> {
    fn poll(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        self.detector.update(self.pin.is_low(), now_ms)
    }
}
