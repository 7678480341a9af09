//! Compile-time configuration for the grapher
//!
//! Every tunable lives here as a named constant with its unit in the name,
//! grouped into small `Copy` structs that the components take at construction.

use crate::chart::AxisWindow;

/// Calibration constant used when the flash region holds no record
pub const DEFAULT_CALIBRATION: i32 = 100;

/// How often a new sample is taken and plotted
pub const SAMPLE_INTERVAL_MS: u32 = 250;

/// Readings beyond this magnitude are treated as glitches
pub const OUTLIER_THRESHOLD: f32 = 15000.0;

/// Readings averaged when taring at power-up
pub const STARTUP_TARE_SAMPLES: usize = 20;

/// Readings averaged for a user-requested tare
pub const TARE_SAMPLES: usize = 10;

/// How long a result notice stays up before the chart returns
pub const NOTICE_HOLD_MS: u32 = 2000;

/// Number of samples kept in the chart window
pub const WINDOW_CAPACITY: usize = 90;

/// Samples required before the autoscaler is consulted
pub const AUTOSCALE_WARMUP_SAMPLES: usize = 20;

/// Fraction of |y| added beyond a sample that escapes the visible range
pub const AUTOSCALE_GROW_FACTOR: f32 = 0.1;

/// The visible range may be at most this many times the data span
pub const AUTOSCALE_EXPAND_FACTOR: f32 = 7.0;

/// Allowed imbalance between top and bottom headroom, relative to the data span
pub const AUTOSCALE_CENTERING_FACTOR: f32 = 0.4;

/// Number of Y gridline intervals after a rescale
pub const Y_TICK_DIVISIONS: f32 = 8.0;

/// Holding the button at least this long is a long press
pub const BUTTON_LONG_PRESS_MS: u32 = 800;

/// A second click within this time after a release is a double click
pub const BUTTON_DOUBLE_CLICK_MS: u32 = 400;

/// Reference mass hung from the sensor during calibration, in grams
pub const REFERENCE_MASS_G: f32 = 1000.0;

/// Relative tolerance for a calibration step to count as converged (0.5 %)
pub const CALIBRATION_TOLERANCE: f32 = 0.005;

/// Successful steps needed to finish calibrating
pub const CALIBRATION_CONVERGED_STEPS: usize = 10;

/// Readings averaged per calibration step
pub const CALIBRATION_SAMPLES_PER_STEP: usize = 10;

/// Calibration gives up after this many steps
pub const CALIBRATION_MAX_STEPS: usize = 200;

/// Calibration store settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreConfig {
    /// Value returned when the region is fully erased
    pub default_calibration: i32,
    /// Use this constant instead of reading flash at startup
    pub override_calibration: Option<i32>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_calibration: DEFAULT_CALIBRATION,
            override_calibration: None,
        }
    }
}

/// Sampling and signal conditioning settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopConfig {
    /// Minimum time between two samples
    pub sample_interval_ms: u32,
    /// Magnitude above which a reading is replaced by the running mean
    pub outlier_threshold: f32,
    /// Readings averaged for the power-up tare
    pub startup_tare_samples: usize,
    /// Readings averaged for a button tare
    pub tare_samples: usize,
    /// Negate every reading (sensor mounted upside down)
    pub invert_force: bool,
    /// Time a calibration result stays on screen
    pub notice_hold_ms: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: SAMPLE_INTERVAL_MS,
            outlier_threshold: OUTLIER_THRESHOLD,
            startup_tare_samples: STARTUP_TARE_SAMPLES,
            tare_samples: TARE_SAMPLES,
            invert_force: false,
            notice_hold_ms: NOTICE_HOLD_MS,
        }
    }
}

/// Autoscaler tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScaleConfig {
    pub grow_factor: f32,
    pub expand_factor: f32,
    pub centering_factor: f32,
    /// The autoscaler only runs once the window holds more samples than this
    pub warmup_samples: usize,
}

impl Default for AutoScaleConfig {
    fn default() -> Self {
        Self {
            grow_factor: AUTOSCALE_GROW_FACTOR,
            expand_factor: AUTOSCALE_EXPAND_FACTOR,
            centering_factor: AUTOSCALE_CENTERING_FACTOR,
            warmup_samples: AUTOSCALE_WARMUP_SAMPLES,
        }
    }
}

/// Chart layout and initial bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartConfig {
    /// Axis bounds used at startup and after every restart
    pub initial_axis: AxisWindow,
    /// Title drawn above the plot
    pub title: &'static str,
}

impl Default for ChartConfig {
    fn default() -> Self {
        // The X span covers one full window of samples.
        let x_span_s = WINDOW_CAPACITY as f32 * SAMPLE_INTERVAL_MS as f32 / 1000.0;
        Self {
            initial_axis: AxisWindow::new(0.0, x_span_s, x_span_s / 9.0, -100.0, 100.0, 25.0),
            title: "Z-Axis Force",
        }
    }
}

/// Click classification timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonConfig {
    pub long_press_ms: u32,
    pub double_click_ms: u32,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            long_press_ms: BUTTON_LONG_PRESS_MS,
            double_click_ms: BUTTON_DOUBLE_CLICK_MS,
        }
    }
}

/// Calibration routine settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationConfig {
    pub reference_mass: f32,
    pub tolerance: f32,
    pub converged_steps: usize,
    pub samples_per_step: usize,
    pub max_steps: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            reference_mass: REFERENCE_MASS_G,
            tolerance: CALIBRATION_TOLERANCE,
            converged_steps: CALIBRATION_CONVERGED_STEPS,
            samples_per_step: CALIBRATION_SAMPLES_PER_STEP,
            max_steps: CALIBRATION_MAX_STEPS,
        }
    }
}

/// Complete configuration of the control loop
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Config {
    pub store: StoreConfig,
    pub sampling: LoopConfig,
    pub autoscale: AutoScaleConfig,
    pub chart: ChartConfig,
    pub calibration: CalibrationConfig,
    pub button: ButtonConfig,
}
