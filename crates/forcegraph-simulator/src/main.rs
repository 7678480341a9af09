//! Headless desktop simulator for the force sensor grapher.
//!
//! Runs the forcegraph-core control loop on a virtual clock against a
//! synthetic load cell, a scripted push button and a RAM-backed flash region.
//! The chart is rendered into a `SimulatorDisplay` and written out as PNG
//! snapshots, so the whole pipeline can be inspected without hardware.
//!
//! # Usage
//!
//! ```text
//! forcegraph-simulator [OUTPUT_DIR]
//! ```
//!
//! Frames land in `OUTPUT_DIR` (default `sim-output`). The flash image is kept
//! in `OUTPUT_DIR/flash.bin`; a calibration saved in one run is loaded by the
//! next, just like a power cycle on the device.
//!
//! # Script
//!
//! | Time   | Event                                         |
//! |--------|-----------------------------------------------|
//! | 0 s    | Power-up: load calibration, tare, empty chart |
//! | 0–30 s | Oscillating push with a few glitched readings |
//! | 30 s   | Click: tare                                   |
//! | 40 s   | Long press: calibration prompt                |
//! | 41 s   | Reference mass hung on the sensor             |
//! | 43 s   | Double click: calibrate                       |
//! | 65 s   | Mass removed                                  |

use std::fs;
use std::path::{Path, PathBuf};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use log::{error, info, warn};

use forcegraph_core::chart::DisplaySurface;
use forcegraph_core::chart::constants::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
use forcegraph_core::config::{Config, REFERENCE_MASS_G, WINDOW_CAPACITY};
use forcegraph_core::controller::Controller;
use forcegraph_core::input::{ButtonEvent, ButtonInput, ClickDetector};
use forcegraph_core::sensors::{ForceSensor, SensorError};
use forcegraph_core::storage::{CalibrationStore, RamRegion};

// ---------------------------------------------------------------------------
// Simulation constants
// ---------------------------------------------------------------------------

/// Virtual time between two loop iterations
const TICK_MS: u32 = 5;

/// Total simulated time
const RUN_MS: u32 = 75_000;

/// Interval between PNG snapshots
const SNAPSHOT_INTERVAL_MS: u32 = 2_500;

/// HX711 output data rate at RATE = low (10 Hz)
const CONVERSION_MS: u32 = 100;

/// Raw counts per gram of the simulated load cell
const TRUE_COUNTS_PER_GRAM: f32 = 420.0;

/// Raw reading with nothing on the sensor
const ZERO_OFFSET_COUNTS: f32 = 83_000.0;

/// PNG pixel scale
const IMAGE_SCALE: u32 = 2;

const FLASH_IMAGE: &str = "flash.bin";

// ---------------------------------------------------------------------------
// Synthetic load cell
// ---------------------------------------------------------------------------

/// Load cell whose force follows the script, read through HX711-style
/// offset and scale
struct SimLoadCell {
    now_ms: u32,
    last_conversion_ms: u32,
    offset: f32,
    scale: f32,
}

impl SimLoadCell {
    fn new() -> Self {
        Self {
            now_ms: 0,
            last_conversion_ms: 0,
            offset: 0.0,
            scale: 1.0,
        }
    }

    fn set_time(&mut self, now_ms: u32) {
        self.now_ms = now_ms;
    }

    /// Applied force in grams at time `t_ms`
    fn force_g(t_ms: u32) -> f32 {
        let t = t_ms as f32 / 1000.0;
        match t_ms {
            0..10_000 => 80.0 * (t * 0.9).sin(),
            10_000..20_000 => 250.0 + 120.0 * (t * 0.5).sin(),
            20_000..30_000 => 15.0 * (t * 2.0).sin(),
            // A finger still resting on the sensor before the tare
            30_000..41_000 => 12.0,
            41_000..65_000 => REFERENCE_MASS_G + 12.0,
            _ => 12.0 + 40.0 * (t * 0.7).sin(),
        }
    }

    /// Occasional corrupted conversion
    fn glitch(t_ms: u32) -> bool {
        matches!(t_ms / CONVERSION_MS, 57 | 131 | 244)
    }

    fn raw(&self) -> f32 {
        let t = self.now_ms as f32 / 1000.0;
        let noise = 0.4 * (t * 37.0).sin() + 0.3 * (t * 91.0).cos();
        let mut raw = ZERO_OFFSET_COUNTS + (Self::force_g(self.now_ms) + noise) * TRUE_COUNTS_PER_GRAM;
        if Self::glitch(self.now_ms) {
            raw += 8_388_608.0;
        }
        raw
    }
}

impl ForceSensor for SimLoadCell {
    fn is_ready(&mut self) -> bool {
        self.now_ms.wrapping_sub(self.last_conversion_ms) >= CONVERSION_MS
    }

    fn read_units(&mut self) -> Result<f32, SensorError> {
        if !self.is_ready() {
            return Err(SensorError::NotReady);
        }
        self.last_conversion_ms = self.now_ms;
        Ok((self.raw() - self.offset) / self.scale)
    }

    fn tare(&mut self, samples: usize) -> Result<(), SensorError> {
        info!("Simulated tare over {} samples", samples);
        self.offset = self.raw();
        self.last_conversion_ms = self.now_ms;
        Ok(())
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn scale(&self) -> f32 {
        self.scale
    }
}

// ---------------------------------------------------------------------------
// Scripted button
// ---------------------------------------------------------------------------

/// Button whose level follows a list of `(press_ms, release_ms)` intervals
struct ScriptedButton {
    presses: &'static [(u32, u32)],
    detector: ClickDetector,
}

impl ScriptedButton {
    fn new(presses: &'static [(u32, u32)]) -> Self {
        Self {
            presses,
            detector: ClickDetector::default(),
        }
    }
}

impl ButtonInput for ScriptedButton {
    fn poll(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        let pressed = self
            .presses
            .iter()
            .any(|(down, up)| (*down..*up).contains(&now_ms));
        let event = self.detector.update(pressed, now_ms);
        if let Some(event) = event {
            info!("Button: {:?}", event);
        }
        event
    }
}

const BUTTON_SCRIPT: &[(u32, u32)] = &[
    // Click
    (30_000, 30_120),
    // Long press
    (40_000, 41_000),
    // Double click
    (43_000, 43_100),
    (43_250, 43_350),
];

// ---------------------------------------------------------------------------
// Flash persistence
// ---------------------------------------------------------------------------

/// One 4 KiB sector split into 256-byte pages, like the device
type SimRegion = RamRegion;

fn load_region(path: &Path) -> SimRegion {
    match fs::read(path) {
        Ok(image) => {
            info!("Loaded flash image from {}", path.display());
            RamRegion::from_bytes(&image)
        }
        Err(_) => {
            info!("No flash image at {}, starting erased", path.display());
            RamRegion::new()
        }
    }
}

fn save_region(path: &Path, region: &SimRegion) {
    match fs::write(path, region.as_bytes()) {
        Ok(()) => info!(
            "Saved flash image ({} programs, {} erases)",
            region.program_count(),
            region.erase_count()
        ),
        Err(e) => warn!("Could not save flash image: {}", e),
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn save_frame(display: &SimulatorDisplay<Rgb565>, dir: &Path, now_ms: u32) {
    let settings = OutputSettingsBuilder::new().scale(IMAGE_SCALE).build();
    let path = dir.join(format!("frame_{:06}.png", now_ms));
    if let Err(e) = display.to_rgb_output_image(&settings).save_png(&path) {
        error!("Could not write {}: {}", path.display(), e);
    }
}

fn main() {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sim-output"));
    if let Err(e) = fs::create_dir_all(&out_dir) {
        error!("Could not create {}: {}", out_dir.display(), e);
        return;
    }

    info!("Starting forcegraph simulator");
    info!(
        "Display: {}×{}, {} ms per tick, {} s run",
        DISPLAY_WIDTH_PX,
        DISPLAY_HEIGHT_PX,
        TICK_MS,
        RUN_MS / 1000
    );

    let config = Config::default();
    let flash_path = out_dir.join(FLASH_IMAGE);
    let mut store = CalibrationStore::new(load_region(&flash_path), config.store.default_calibration);

    let display = SimulatorDisplay::<Rgb565>::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));
    let mut surface = DisplaySurface::new(display);
    let mut sensor = SimLoadCell::new();
    let mut button = ScriptedButton::new(BUTTON_SCRIPT);
    let mut controller = Controller::<WINDOW_CAPACITY>::new(config);

    if let Err(e) = controller.startup(0, &mut sensor, &mut store, &mut surface) {
        error!("Startup failed: {}", e);
        return;
    }

    let mut now_ms = 0;
    let mut next_snapshot_ms = 0;
    while now_ms <= RUN_MS {
        sensor.set_time(now_ms);
        if let Err(e) = controller.tick(now_ms, &mut sensor, &mut button, &mut store, &mut surface) {
            error!("Tick at {} ms: {}", now_ms, e);
        }

        if now_ms >= next_snapshot_ms {
            save_frame(surface.display(), &out_dir, now_ms);
            next_snapshot_ms += SNAPSHOT_INTERVAL_MS;
        }

        now_ms += TICK_MS;
    }

    info!(
        "Finished: mode {:?}, calibration constant {}",
        controller.mode(),
        controller.calibration_constant()
    );
    save_region(&flash_path, store.region());
    info!("Frames written to {}", out_dir.display());
}
