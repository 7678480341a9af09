//! Per-sample chart pipeline
//!
//! [`ForceChart`] owns the window, the axis and the renderer and runs
//! push → scroll → stats → autoscale → render for every accepted sample.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::config::{AutoScaleConfig, ChartConfig};

use super::autoscale::{AutoScaler, ScaleDecision};
use super::axis::{AxisWindow, Viewport};
use super::constants::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
use super::renderer::ScrollRenderer;
use super::sample_window::{SamplePoint, SampleWindow};
use super::stats::WindowStats;
use super::surface::ChartSurface;

/// What a single push changed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartUpdate {
    /// Sample dropped from the window to make room, set once scrolling
    pub evicted: Option<SamplePoint>,
    /// Axis as it was before this push
    pub previous_axis: AxisWindow,
    /// Autoscaler verdict for this push
    pub decision: ScaleDecision,
    /// The newest sample lay past `x_max` and the X window was stretched to it
    pub x_extended: bool,
}

impl ChartUpdate {
    pub fn needs_full_redraw(&self) -> bool {
        // A scrolling push relays out the X axis on its own
        self.decision.is_rescale() || (self.x_extended && self.evicted.is_none())
    }
}

/// Live scrolling chart of `N` samples
pub struct ForceChart<const N: usize> {
    window: SampleWindow<N>,
    axis: AxisWindow,
    initial_axis: AxisWindow,
    scaler: AutoScaler,
    renderer: ScrollRenderer,
}

impl<const N: usize> ForceChart<N> {
    /// Chart covering the whole display
    pub fn new(chart: ChartConfig, autoscale: AutoScaleConfig) -> Self {
        let screen = Rectangle::new(Point::zero(), Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));
        Self::with_viewport(Viewport::new(screen), chart, autoscale)
    }

    pub fn with_viewport(viewport: Viewport, chart: ChartConfig, autoscale: AutoScaleConfig) -> Self {
        Self {
            window: SampleWindow::new(),
            axis: chart.initial_axis,
            initial_axis: chart.initial_axis,
            scaler: AutoScaler::new(autoscale),
            renderer: ScrollRenderer::new(viewport, chart.title),
        }
    }

    pub fn window(&self) -> &SampleWindow<N> {
        &self.window
    }

    pub fn axis(&self) -> &AxisWindow {
        &self.axis
    }

    pub fn renderer(&self) -> &ScrollRenderer {
        &self.renderer
    }

    /// Whether pushes now evict and scroll the X axis
    pub fn is_scrolling(&self) -> bool {
        self.window.is_full()
    }

    /// Add a sample and bring the screen up to date
    pub fn push_sample<S: ChartSurface>(
        &mut self,
        surface: &mut S,
        point: SamplePoint,
    ) -> Result<ChartUpdate, S::Error> {
        let previous_axis = self.axis;
        let evicted = self.window.push(point);

        if let Some(evicted) = evicted
            && let Some(oldest) = self.window.peek_oldest()
        {
            self.axis.scroll_x(oldest.x, oldest.x - evicted.x);
        }

        // Late ticks make the buffered span outgrow the nominal window
        let x_extended = point.x.is_finite() && point.x > self.axis.x_max;
        if x_extended {
            debug!(
                "Sample at {:.2} s past x_max {:.2} s, extending X window",
                point.x, self.axis.x_max
            );
            self.axis.x_max = point.x;
        }

        let decision = self.autoscale(point.y);

        let update = ChartUpdate {
            evicted,
            previous_axis,
            decision,
            x_extended,
        };
        self.renderer.render(surface, &update, &self.axis, &self.window)?;
        Ok(update)
    }

    /// Drop all samples, reset the axis and redraw the empty chart
    pub fn restart<S: ChartSurface>(&mut self, surface: &mut S) -> Result<(), S::Error> {
        self.window.clear();
        self.axis = self.initial_axis;
        self.renderer.redraw(surface, &self.axis, &self.window)
    }

    /// Repaint the chart as it is, e.g. after a notice covered it
    pub fn redraw<S: ChartSurface>(&mut self, surface: &mut S) -> Result<(), S::Error> {
        self.renderer.redraw(surface, &self.axis, &self.window)
    }

    pub fn show_notice<S: ChartSurface>(
        &mut self,
        surface: &mut S,
        title: &str,
        lines: &[&str],
    ) -> Result<(), S::Error> {
        self.renderer.show_notice(surface, title, lines)
    }

    fn autoscale(&mut self, newest_y: f32) -> ScaleDecision {
        if self.window.count() <= self.scaler.config().warmup_samples {
            return ScaleDecision::Unchanged;
        }

        match WindowStats::min_max(&self.window) {
            Some(stats) => self.scaler.evaluate(&mut self.axis, &stats, newest_y),
            None => ScaleDecision::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::test_surface::RecordingSurface;

    fn chart<const N: usize>(warmup_samples: usize) -> ForceChart<N> {
        let config = ChartConfig {
            initial_axis: AxisWindow::new(0.0, 1.0, 0.25, -100.0, 100.0, 25.0),
            title: "Test",
        };
        let autoscale = AutoScaleConfig {
            warmup_samples,
            ..AutoScaleConfig::default()
        };
        ForceChart::new(config, autoscale)
    }

    #[test]
    fn test_filling_keeps_x_axis_fixed() {
        let mut chart = chart::<5>(20);
        let mut surface = RecordingSurface::new();

        for i in 0..5 {
            let update = chart.push_sample(&mut surface, SamplePoint::new(i as f32 * 0.25, 0.0)).unwrap();
            assert_eq!(update.evicted, None);
        }

        assert!(chart.is_scrolling());
        assert_eq!((chart.axis().x_min, chart.axis().x_max), (0.0, 1.0));
    }

    #[test]
    fn test_scroll_shifts_by_oldest_delta() {
        let mut chart = chart::<4>(20);
        let mut surface = RecordingSurface::new();

        for i in 0..4 {
            chart.push_sample(&mut surface, SamplePoint::new(i as f32 * 0.25, 0.0)).unwrap();
        }
        let update = chart.push_sample(&mut surface, SamplePoint::new(1.0, 0.0)).unwrap();

        assert_eq!(update.evicted, Some(SamplePoint::new(0.0, 0.0)));
        assert_eq!(update.previous_axis.x_min, 0.0);
        assert_eq!((chart.axis().x_min, chart.axis().x_max), (0.25, 1.25));
        assert_eq!(chart.window().count(), 4);
    }

    #[test]
    fn test_autoscaler_waits_for_warmup() {
        let mut chart = chart::<30>(3);
        let mut surface = RecordingSurface::new();

        // Three samples: window count never exceeds the warm-up threshold
        for i in 0..3 {
            let update = chart
                .push_sample(&mut surface, SamplePoint::new(i as f32 * 0.1, 500.0))
                .unwrap();
            assert_eq!(update.decision, ScaleDecision::Unchanged);
        }
        assert_eq!(chart.axis().y_max, 100.0);

        surface.reset();
        let update = chart.push_sample(&mut surface, SamplePoint::new(0.3, 500.0)).unwrap();
        assert_eq!(update.decision, ScaleDecision::AboveRange);
        assert_eq!(chart.axis().y_max, 550.0);
        assert_eq!(surface.clears(), 1);
    }

    #[test]
    fn test_late_samples_stay_inside_x_window() {
        let mut chart: ForceChart<90> = ForceChart::new(ChartConfig::default(), AutoScaleConfig::default());
        let mut surface = RecordingSurface::new();

        for i in 0..200 {
            let point = SamplePoint::new(i as f32 * 0.26, 0.0);
            chart.push_sample(&mut surface, point).unwrap();

            let axis = chart.axis();
            assert!(point.x <= axis.x_max, "sample {} at {} past {}", i, point.x, axis.x_max);
            let oldest = chart.window().peek_oldest().unwrap();
            assert!(oldest.x >= axis.x_min);
        }

        // The newest point must not share a column with its predecessor
        let viewport = chart.renderer().viewport();
        let newest = chart.window().peek_newest().unwrap();
        let previous = chart.window().peek_indexed(chart.window().count() - 2).unwrap();
        assert!(viewport.x_to_screen(chart.axis(), previous.x) < viewport.x_to_screen(chart.axis(), newest.x));
    }

    #[test]
    fn test_filling_past_x_max_redraws_once() {
        let mut chart = chart::<8>(20);
        let mut surface = RecordingSurface::new();

        for i in 0..4 {
            chart.push_sample(&mut surface, SamplePoint::new(i as f32 * 0.3, 0.0)).unwrap();
        }
        assert_eq!(chart.axis().x_max, 1.0);

        surface.reset();
        let update = chart.push_sample(&mut surface, SamplePoint::new(1.2, 0.0)).unwrap();

        assert!(update.x_extended);
        assert!(update.needs_full_redraw());
        assert_eq!((chart.axis().x_min, chart.axis().x_max), (0.0, 1.2));
        assert_eq!(surface.clears(), 1);
    }

    #[test]
    fn test_restart_resets_window_and_axis() {
        let mut chart = chart::<4>(0);
        let mut surface = RecordingSurface::new();

        for i in 0..6 {
            chart.push_sample(&mut surface, SamplePoint::new(i as f32, 1000.0)).unwrap();
        }
        assert_ne!(chart.axis().y_max, 100.0);

        surface.reset();
        chart.restart(&mut surface).unwrap();

        assert!(chart.window().is_empty());
        assert_eq!(*chart.axis(), AxisWindow::new(0.0, 1.0, 0.25, -100.0, 100.0, 25.0));
        assert_eq!(surface.clears(), 1);
        assert_eq!(chart.renderer().cursor(), None);
    }
}
