//! Axis bounds and coordinate transformation
//!
//! Handles transformation between data space (seconds, force units) and
//! screen space (pixel coordinates).

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::Y_TICK_DIVISIONS;

use super::constants::{
    MAX_GRIDLINES, RIGHT_MARGIN_PX, TITLE_MARGIN_PX, X_LABEL_MARGIN_PX, Y_LABEL_MARGIN_PX,
};
use super::sample_window::SamplePoint;

/// Displayed data ranges and gridline spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisWindow {
    /// Minimum X value in data space
    pub x_min: f32,
    /// Maximum X value in data space
    pub x_max: f32,
    /// Distance between vertical gridlines
    pub x_tick: f32,
    /// Minimum Y value in data space
    pub y_min: f32,
    /// Maximum Y value in data space
    pub y_max: f32,
    /// Distance between horizontal gridlines
    pub y_tick: f32,
}

impl AxisWindow {
    /// Create new axis bounds
    pub const fn new(x_min: f32, x_max: f32, x_tick: f32, y_min: f32, y_max: f32, y_tick: f32) -> Self {
        Self {
            x_min,
            x_max,
            x_tick,
            y_min,
            y_max,
            y_tick,
        }
    }

    /// Get the X range (width)
    pub fn x_range(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Get the Y range (height)
    pub fn y_range(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Replace the Y bounds; the tick spacing follows the new range
    pub fn set_y_bounds(&mut self, y_min: f32, y_max: f32) {
        self.y_min = y_min;
        self.y_max = y_max;
        self.y_tick = (y_max - y_min) / Y_TICK_DIVISIONS;
    }

    /// Scroll the X window so it starts at `new_x_min`, keeping its width
    /// shifted by `dx`
    pub fn scroll_x(&mut self, new_x_min: f32, dx: f32) {
        self.x_min = new_x_min;
        self.x_max += dx;
    }

    /// Data values of the vertical gridlines, first multiple of the tick at
    /// or after `x_min`
    pub fn x_ticks(&self) -> impl Iterator<Item = f32> {
        ticks(self.x_min, self.x_max, self.x_tick)
    }

    /// Data values of the horizontal gridlines, starting at `y_min`
    pub fn y_ticks(&self) -> impl Iterator<Item = f32> {
        let (start, end, step) = (self.y_min, self.y_max, self.y_tick);
        let usable = step.is_finite() && step > 0.0;
        (0..MAX_GRIDLINES)
            .map(move |i| start + step * i as f32)
            .take_while(move |v| usable && *v <= end + step * 1e-3)
    }
}

fn ticks(min: f32, max: f32, step: f32) -> impl Iterator<Item = f32> {
    let usable = step.is_finite() && step > 0.0 && min.is_finite();
    let first = if usable { ceil_f32(min / step) * step } else { 0.0 };
    (0..MAX_GRIDLINES)
        .map(move |i| first + step * i as f32)
        .take_while(move |v| usable && *v <= max)
}

// `f32::ceil` needs std
fn ceil_f32(v: f32) -> f32 {
    let truncated = v as i64 as f32;
    if truncated < v { truncated + 1.0 } else { truncated }
}

/// Margins around the plot area for title and labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportPadding {
    /// Top padding in pixels
    pub top: u32,
    /// Right padding in pixels
    pub right: u32,
    /// Bottom padding in pixels
    pub bottom: u32,
    /// Left padding in pixels
    pub left: u32,
}

impl Default for ViewportPadding {
    fn default() -> Self {
        Self {
            top: TITLE_MARGIN_PX,
            right: RIGHT_MARGIN_PX,
            bottom: X_LABEL_MARGIN_PX,
            left: Y_LABEL_MARGIN_PX,
        }
    }
}

/// Screen geometry of the chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen space bounds (full area including padding)
    screen_bounds: Rectangle,
    /// Padding around the plotting area
    padding: ViewportPadding,
}

impl Viewport {
    /// Create a new viewport
    pub fn new(screen_bounds: Rectangle) -> Self {
        Self {
            screen_bounds,
            padding: ViewportPadding::default(),
        }
    }

    /// Create viewport with custom padding
    pub fn with_padding(mut self, padding: ViewportPadding) -> Self {
        self.padding = padding;
        self
    }

    /// Get the screen bounds
    pub fn screen_bounds(&self) -> Rectangle {
        self.screen_bounds
    }

    /// Get the plot area (screen bounds minus padding)
    pub fn plot_area(&self) -> Rectangle {
        let top_left = Point::new(
            self.screen_bounds.top_left.x + self.padding.left as i32,
            self.screen_bounds.top_left.y + self.padding.top as i32,
        );

        let width = self
            .screen_bounds
            .size
            .width
            .saturating_sub(self.padding.left + self.padding.right);
        let height = self
            .screen_bounds
            .size
            .height
            .saturating_sub(self.padding.top + self.padding.bottom);

        Rectangle::new(top_left, Size::new(width, height))
    }

    /// Screen column of data value `x`, clamped to the plot area
    pub fn x_to_screen(&self, axis: &AxisWindow, x: f32) -> i32 {
        let plot = self.plot_area();
        let norm = normalize(x, axis.x_min, axis.x_range());
        plot.top_left.x + (norm * plot.size.width as f32) as i32
    }

    /// Screen row of data value `y`, clamped to the plot area
    ///
    /// Screen Y grows downward, so `y_max` maps to the top edge.
    pub fn y_to_screen(&self, axis: &AxisWindow, y: f32) -> i32 {
        let plot = self.plot_area();
        let norm = normalize(y, axis.y_min, axis.y_range());
        plot.top_left.y + ((1.0 - norm) * plot.size.height as f32) as i32
    }

    /// Transform a sample to screen coordinates
    pub fn to_screen(&self, axis: &AxisWindow, point: SamplePoint) -> Point {
        Point::new(
            self.x_to_screen(axis, point.x),
            self.y_to_screen(axis, point.y),
        )
    }
}

/// Position of `value` within `[min, min + range]` as 0.0..=1.0
///
/// Degenerate ranges and non-finite values collapse to 0.0.
fn normalize(value: f32, min: f32, range: f32) -> f32 {
    let norm = (value - min) / range;
    if norm.is_finite() {
        norm.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::vec::Vec;

    fn viewport() -> Viewport {
        Viewport::new(Rectangle::new(Point::zero(), Size::new(320, 240)))
            .with_padding(ViewportPadding {
                top: 20,
                right: 10,
                bottom: 20,
                left: 10,
            })
    }

    fn axis() -> AxisWindow {
        AxisWindow::new(0.0, 10.0, 2.0, -100.0, 100.0, 25.0)
    }

    #[test]
    fn test_plot_area_excludes_padding() {
        let area = viewport().plot_area();
        assert_eq!(area.top_left, Point::new(10, 20));
        assert_eq!(area.size, Size::new(300, 200));
    }

    #[test]
    fn test_corners_map_to_plot_edges() {
        let vp = viewport();
        assert_eq!(vp.to_screen(&axis(), SamplePoint::new(0.0, -100.0)), Point::new(10, 220));
        assert_eq!(vp.to_screen(&axis(), SamplePoint::new(10.0, 100.0)), Point::new(310, 20));
        assert_eq!(vp.to_screen(&axis(), SamplePoint::new(5.0, 0.0)), Point::new(160, 120));
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let vp = viewport();
        assert_eq!(vp.y_to_screen(&axis(), 500.0), 20);
        assert_eq!(vp.y_to_screen(&axis(), -500.0), 220);
        assert_eq!(vp.x_to_screen(&axis(), f32::NAN), 10);
    }

    #[test]
    fn test_rescale_updates_tick() {
        let mut axis = axis();
        axis.set_y_bounds(-100.0, 300.0);
        assert_eq!(axis.y_tick, 50.0);
    }

    #[test]
    fn test_scroll_shifts_both_edges() {
        let mut axis = axis();
        axis.scroll_x(0.25, 0.25);
        assert_eq!((axis.x_min, axis.x_max), (0.25, 10.25));
    }

    #[test]
    fn test_ticks_cover_range() {
        let ticks: Vec<f32> = axis().x_ticks().collect();
        assert_eq!(ticks, [0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);

        let mut scrolled = axis();
        scrolled.scroll_x(1.5, 1.5);
        let ticks: Vec<f32> = scrolled.x_ticks().collect();
        assert_eq!(ticks, [2.0, 4.0, 6.0, 8.0, 10.0]);

        let ticks: Vec<f32> = axis().y_ticks().collect();
        assert_eq!(ticks.len(), 9);
        assert_eq!(ticks[0], -100.0);
        assert_eq!(ticks[8], 100.0);
    }

    #[test]
    fn test_zero_tick_yields_nothing() {
        let flat = AxisWindow::new(0.0, 10.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(flat.x_ticks().count(), 0);
        assert_eq!(flat.y_ticks().count(), 0);
    }
}
