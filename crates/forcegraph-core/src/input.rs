//! Button events
//!
//! A single push button drives the whole user interface. Its raw level is
//! turned into discrete click events by [`ClickDetector`]; the control loop
//! polls for at most one event per tick through [`ButtonInput`].

use crate::config::ButtonConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Short press and release (tare)
    Click,
    /// Held past the long-press threshold (enter calibration)
    LongPress,
    /// Two clicks in quick succession (confirm calibration)
    DoubleClick,
}

/// Source of button events, polled once per loop tick
pub trait ButtonInput {
    fn poll(&mut self, now_ms: u32) -> Option<ButtonEvent>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Pressed {
        since_ms: u32,
        second: bool,
        long_sent: bool,
    },
    /// Released after one short press, waiting for a possible second one
    Released { at_ms: u32 },
}

/// Classifies a sampled button level into click, double click and long press
///
/// A single click is only reported once the double-click window has passed
/// without a second press.
#[derive(Debug, Clone, Copy)]
pub struct ClickDetector {
    config: ButtonConfig,
    phase: Phase,
}

impl ClickDetector {
    pub fn new(config: ButtonConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
        }
    }

    /// Feed the current level; returns an event when one completes
    pub fn update(&mut self, pressed: bool, now_ms: u32) -> Option<ButtonEvent> {
        match (self.phase, pressed) {
            (Phase::Idle, true) => {
                self.phase = Phase::Pressed {
                    since_ms: now_ms,
                    second: false,
                    long_sent: false,
                };
                None
            }
            (Phase::Idle, false) => None,

            (
                Phase::Pressed {
                    since_ms,
                    second,
                    long_sent: false,
                },
                true,
            ) if now_ms.wrapping_sub(since_ms) >= self.config.long_press_ms => {
                self.phase = Phase::Pressed {
                    since_ms,
                    second,
                    long_sent: true,
                };
                Some(ButtonEvent::LongPress)
            }
            (Phase::Pressed { .. }, true) => None,

            (Phase::Pressed { long_sent: true, .. }, false) => {
                self.phase = Phase::Idle;
                None
            }
            (Phase::Pressed { second: true, .. }, false) => {
                self.phase = Phase::Idle;
                Some(ButtonEvent::DoubleClick)
            }
            (Phase::Pressed { .. }, false) => {
                self.phase = Phase::Released { at_ms: now_ms };
                None
            }

            (Phase::Released { at_ms }, true) => {
                if now_ms.wrapping_sub(at_ms) <= self.config.double_click_ms {
                    self.phase = Phase::Pressed {
                        since_ms: now_ms,
                        second: true,
                        long_sent: false,
                    };
                    None
                } else {
                    // The first click expired unnoticed; report it and start over
                    self.phase = Phase::Pressed {
                        since_ms: now_ms,
                        second: false,
                        long_sent: false,
                    };
                    Some(ButtonEvent::Click)
                }
            }
            (Phase::Released { at_ms }, false) => {
                if now_ms.wrapping_sub(at_ms) > self.config.double_click_ms {
                    self.phase = Phase::Idle;
                    Some(ButtonEvent::Click)
                } else {
                    None
                }
            }
        }
    }
}

impl Default for ClickDetector {
    fn default() -> Self {
        Self::new(ButtonConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::vec::Vec;

    /// Feed `(level, from_ms)` steps, sampling every 10 ms up to `end_ms`
    fn run(levels: &[(bool, u32)], end_ms: u32) -> Vec<(ButtonEvent, u32)> {
        let mut detector = ClickDetector::default();
        let mut events = Vec::new();
        for now in (0..=end_ms).step_by(10) {
            let pressed = levels
                .iter()
                .rev()
                .find(|(_, from)| *from <= now)
                .is_some_and(|(level, _)| *level);
            if let Some(event) = detector.update(pressed, now) {
                events.push((event, now));
            }
        }
        events
    }

    #[test]
    fn test_single_click_after_double_click_window() {
        let events = run(&[(true, 100), (false, 200)], 1000);
        assert_eq!(events, [(ButtonEvent::Click, 610)]);
    }

    #[test]
    fn test_double_click() {
        let events = run(&[(true, 100), (false, 200), (true, 300), (false, 400)], 1500);
        assert_eq!(events, [(ButtonEvent::DoubleClick, 400)]);
    }

    #[test]
    fn test_long_press_fires_while_held() {
        let events = run(&[(true, 100), (false, 2000)], 3000);
        assert_eq!(events, [(ButtonEvent::LongPress, 900)]);
    }

    #[test]
    fn test_slow_second_press_is_two_clicks() {
        let events = run(&[(true, 0), (false, 100), (true, 600), (false, 700)], 2000);
        let kinds: Vec<ButtonEvent> = events.iter().map(|(e, _)| *e).collect();
        assert_eq!(kinds, [ButtonEvent::Click, ButtonEvent::Click]);
    }
}
