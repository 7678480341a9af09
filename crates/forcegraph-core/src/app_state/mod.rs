//! Application-wide mode and error types

use core::fmt::{Debug, Write};

use thiserror_no_std::Error;

use crate::input::ButtonEvent;

/// What the control loop is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Plotting live samples
    #[default]
    Idle,
    /// Re-zeroing the sensor; lasts one tick
    Taring,
    /// Calibration requested, waiting for the reference mass and a double click
    AwaitingConfirm,
    /// Calibration routine running
    Calibrating,
}

impl Mode {
    /// Transition on a button event
    ///
    /// Pairs not listed keep the current mode; in particular nothing
    /// interrupts a running tare or calibration.
    pub fn on_button(self, event: ButtonEvent) -> Mode {
        match (self, event) {
            (Mode::Idle, ButtonEvent::Click) => Mode::Taring,
            (Mode::Idle, ButtonEvent::LongPress) => Mode::AwaitingConfirm,
            (Mode::AwaitingConfirm, ButtonEvent::DoubleClick) => Mode::Calibrating,
            (Mode::AwaitingConfirm, ButtonEvent::Click) => Mode::Idle,
            (mode, _) => mode,
        }
    }
}

/// Application-wide error type
///
/// Collaborator errors are flattened into a short description so the loop
/// can log them without knowing every device's error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Sensor error: {0}")]
    Sensor(heapless::String<64>),
    #[error("Calibration storage error: {0}")]
    Storage(heapless::String<64>),
    #[error("Display error: {0}")]
    Display(heapless::String<64>),
}

impl AppError {
    pub fn sensor(cause: impl Debug) -> Self {
        AppError::Sensor(describe(cause))
    }

    pub fn storage(cause: impl Debug) -> Self {
        AppError::Storage(describe(cause))
    }

    pub fn display(cause: impl Debug) -> Self {
        AppError::Display(describe(cause))
    }
}

/// Debug representation, cut off once the buffer is full
fn describe(cause: impl Debug) -> heapless::String<64> {
    let mut text = heapless::String::<64>::new();
    // An overflowing write keeps the pieces that fit
    let _ = write!(text, "{:?}", cause);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_tares_from_idle() {
        assert_eq!(Mode::Idle.on_button(ButtonEvent::Click), Mode::Taring);
    }

    #[test]
    fn test_calibration_needs_long_press_then_double_click() {
        let mode = Mode::Idle.on_button(ButtonEvent::LongPress);
        assert_eq!(mode, Mode::AwaitingConfirm);
        assert_eq!(mode.on_button(ButtonEvent::DoubleClick), Mode::Calibrating);
    }

    #[test]
    fn test_click_cancels_pending_calibration() {
        assert_eq!(Mode::AwaitingConfirm.on_button(ButtonEvent::Click), Mode::Idle);
        assert_eq!(
            Mode::AwaitingConfirm.on_button(ButtonEvent::LongPress),
            Mode::AwaitingConfirm
        );
    }

    #[test]
    fn test_busy_modes_ignore_buttons() {
        for event in [ButtonEvent::Click, ButtonEvent::LongPress, ButtonEvent::DoubleClick] {
            assert_eq!(Mode::Taring.on_button(event), Mode::Taring);
            assert_eq!(Mode::Calibrating.on_button(event), Mode::Calibrating);
        }
        assert_eq!(Mode::Idle.on_button(ButtonEvent::DoubleClick), Mode::Idle);
    }

    #[test]
    fn test_error_description_is_bounded() {
        let long = [0u8; 64];
        match AppError::storage(long) {
            AppError::Storage(text) => {
                assert!(text.len() > 32);
                assert!(text.starts_with("[0, 0"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
