//! Control-loop context
//!
//! [`Controller`] owns everything the loop mutates: the current [`Mode`],
//! the chart, the outlier filter, the calibration routine and the sampling
//! clock. Devices are borrowed per call, so the firmware and the simulator
//! drive the same logic with different collaborators.
//!
//! Each [`Controller::tick`] polls the button once, advances the mode and
//! does at most one unit of work. Nothing waits for a device: if the sensor
//! is not ready the tick simply returns.

use core::fmt::Write;

use heapless::String;
use log::{debug, error, info, warn};

use crate::app_state::{AppError, Mode};
use crate::calibration::{CalibrationRoutine, CalibrationStep};
use crate::chart::{ChartSurface, ForceChart, SamplePoint};
use crate::config::Config;
use crate::input::ButtonInput;
use crate::sensors::{ForceSensor, OutlierFilter, Reading};
use crate::storage::{CalibrationStore, NvRegion};

/// Owner of all loop state
pub struct Controller<const N: usize> {
    config: Config,
    mode: Mode,
    chart: ForceChart<N>,
    filter: OutlierFilter,
    calibration: CalibrationRoutine,
    calibration_constant: i32,
    /// Time origin of the chart's X axis
    epoch_ms: u32,
    last_sample_ms: Option<u32>,
    last_reading: Option<Reading>,
    /// A result notice is on screen until this time
    notice_until_ms: Option<u32>,
}

impl<const N: usize> Controller<N> {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            mode: Mode::Idle,
            chart: ForceChart::new(config.chart, config.autoscale),
            filter: OutlierFilter::from_config(&config.sampling),
            calibration: CalibrationRoutine::new(config.calibration),
            calibration_constant: config.store.default_calibration,
            epoch_ms: 0,
            last_sample_ms: None,
            last_reading: None,
            notice_until_ms: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn chart(&self) -> &ForceChart<N> {
        &self.chart
    }

    /// Constant currently applied to the sensor
    pub fn calibration_constant(&self) -> i32 {
        self.calibration_constant
    }

    /// Last conditioned reading that went into the chart
    pub fn last_reading(&self) -> Option<Reading> {
        self.last_reading
    }

    /// Load the calibration, zero the sensor and draw the empty chart
    ///
    /// A failing flash read is logged and the default constant is used.
    pub fn startup<S, R, D>(
        &mut self,
        now_ms: u32,
        sensor: &mut S,
        store: &mut CalibrationStore<R>,
        surface: &mut D,
    ) -> Result<(), AppError>
    where
        S: ForceSensor,
        R: NvRegion,
        D: ChartSurface,
    {
        self.calibration_constant = match self.config.store.override_calibration {
            Some(value) => {
                info!("Using calibration override {}", value);
                value
            }
            None => match store.read_latest() {
                Ok(value) => {
                    info!("Loaded calibration {}", value);
                    value
                }
                Err(e) => {
                    error!("Calibration read failed: {:?}", e);
                    store.default_value()
                }
            },
        };
        sensor.set_scale(self.calibration_constant as f32);

        sensor
            .tare(self.config.sampling.startup_tare_samples)
            .map_err(AppError::sensor)?;
        info!("Sensor tared at startup");

        self.mode = Mode::Idle;
        self.restart_chart(now_ms, surface)
    }

    /// One pass of the control loop
    pub fn tick<S, B, R, D>(
        &mut self,
        now_ms: u32,
        sensor: &mut S,
        buttons: &mut B,
        store: &mut CalibrationStore<R>,
        surface: &mut D,
    ) -> Result<(), AppError>
    where
        S: ForceSensor,
        B: ButtonInput,
        R: NvRegion,
        D: ChartSurface,
    {
        if let Some(event) = buttons.poll(now_ms) {
            let next = self.mode.on_button(event);
            debug!("Button {:?}: {:?} -> {:?}", event, self.mode, next);
            if next != self.mode {
                self.enter(next, now_ms, sensor, surface)?;
            }
        }

        match self.mode {
            Mode::Idle => self.plot(now_ms, sensor, surface),
            Mode::Taring => self.tare(now_ms, sensor, surface),
            Mode::AwaitingConfirm => Ok(()),
            Mode::Calibrating => self.calibrate(now_ms, sensor, store, surface),
        }
    }

    fn enter<S: ForceSensor, D: ChartSurface>(
        &mut self,
        next: Mode,
        now_ms: u32,
        sensor: &mut S,
        surface: &mut D,
    ) -> Result<(), AppError> {
        let previous = self.mode;
        self.mode = next;

        match next {
            Mode::AwaitingConfirm => {
                let mut mass = String::<32>::new();
                let _ = write!(mass, "Hang {} g on the sensor", self.config.calibration.reference_mass);
                self.chart
                    .show_notice(surface, "Calibration", &[mass.as_str(), "Double-click to start", "Click to cancel"])
                    .map_err(AppError::display)
            }
            Mode::Calibrating => {
                let factor = self.calibration.start();
                sensor.set_scale(factor);
                self.chart
                    .show_notice(surface, "Calibrating", &["Do not touch the sensor"])
                    .map_err(AppError::display)
            }
            Mode::Idle if previous == Mode::AwaitingConfirm => {
                info!("Calibration cancelled");
                self.restart_chart(now_ms, surface)
            }
            Mode::Idle | Mode::Taring => Ok(()),
        }
    }

    fn plot<S: ForceSensor, D: ChartSurface>(
        &mut self,
        now_ms: u32,
        sensor: &mut S,
        surface: &mut D,
    ) -> Result<(), AppError> {
        if let Some(until) = self.notice_until_ms {
            if (now_ms.wrapping_sub(until) as i32) < 0 {
                return Ok(());
            }
            self.notice_until_ms = None;
            self.restart_chart(now_ms, surface)?;
        }

        let due = self.last_sample_ms.is_none_or(|last| {
            now_ms.wrapping_sub(last) >= self.config.sampling.sample_interval_ms
        });
        if !due || !sensor.is_ready() {
            return Ok(());
        }

        let raw = sensor.read_units().map_err(AppError::sensor)?;
        self.last_sample_ms = Some(now_ms);

        let reading = self.filter.apply(raw);
        self.last_reading = Some(reading);

        let x = now_ms.wrapping_sub(self.epoch_ms) as f32 / 1000.0;
        debug!("{:.3}, {:.2}", x, reading.value);

        self.chart
            .push_sample(surface, SamplePoint::new(x, reading.value))
            .map_err(AppError::display)?;
        Ok(())
    }

    fn tare<S: ForceSensor, D: ChartSurface>(
        &mut self,
        now_ms: u32,
        sensor: &mut S,
        surface: &mut D,
    ) -> Result<(), AppError> {
        if !sensor.is_ready() {
            return Ok(());
        }

        self.mode = Mode::Idle;
        sensor
            .tare(self.config.sampling.tare_samples)
            .map_err(AppError::sensor)?;
        self.filter.reset();
        info!("Sensor tared");

        self.restart_chart(now_ms, surface)
    }

    fn calibrate<S, R, D>(
        &mut self,
        now_ms: u32,
        sensor: &mut S,
        store: &mut CalibrationStore<R>,
        surface: &mut D,
    ) -> Result<(), AppError>
    where
        S: ForceSensor,
        R: NvRegion,
        D: ChartSurface,
    {
        if !sensor.is_ready() {
            return Ok(());
        }

        let reading = match sensor.read_units() {
            Ok(reading) => reading,
            Err(e) => {
                warn!("Calibration reading failed: {:?}", e);
                return Ok(());
            }
        };

        match self.calibration.feed(reading) {
            CalibrationStep::Sampling => Ok(()),
            CalibrationStep::Adjusted { factor, .. } => {
                sensor.set_scale(factor);
                Ok(())
            }
            CalibrationStep::Finished { constant } => {
                self.calibration_constant = constant;
                sensor.set_scale(constant as f32);

                let saved = store.write(constant);
                let mut line = String::<32>::new();
                let _ = write!(line, "Constant: {}", constant);
                let status = match &saved {
                    Ok(page) => {
                        info!("Calibration {} saved to page {}", constant, page);
                        "Saved to flash"
                    }
                    Err(e) => {
                        error!("Calibration {} not saved: {:?}", constant, e);
                        "Not saved"
                    }
                };

                self.finish_calibration(now_ms, surface, "Calibrated", &[line.as_str(), status])?;
                saved.map(|_| ()).map_err(AppError::storage)
            }
            CalibrationStep::Aborted => {
                sensor.set_scale(self.calibration_constant as f32);
                let mut line = String::<32>::new();
                let _ = write!(line, "Keeping {}", self.calibration_constant);
                self.finish_calibration(now_ms, surface, "Calibration failed", &[line.as_str()])
            }
        }
    }

    fn finish_calibration<D: ChartSurface>(
        &mut self,
        now_ms: u32,
        surface: &mut D,
        title: &str,
        lines: &[&str],
    ) -> Result<(), AppError> {
        self.mode = Mode::Idle;
        self.notice_until_ms = Some(now_ms.wrapping_add(self.config.sampling.notice_hold_ms));
        self.chart
            .show_notice(surface, title, lines)
            .map_err(AppError::display)
    }

    fn restart_chart<D: ChartSurface>(&mut self, now_ms: u32, surface: &mut D) -> Result<(), AppError> {
        self.epoch_ms = now_ms;
        self.last_sample_ms = None;
        self.notice_until_ms = None;
        self.chart.restart(surface).map_err(AppError::display)
    }
}
