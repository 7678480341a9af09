//! Framebuffer-free incremental chart renderer
//!
//! The renderer works in two regimes:
//!
//! - **Filling**: the window is not full yet, so each new sample only adds a
//!   segment from the previous newest point.
//! - **Scrolling**: every push evicts the oldest sample and shifts the X axis.
//!   All buffered segments are erased at their old position and redrawn at
//!   the new one.
//!
//! A Y rescale or a chart restart clears the screen and redraws everything.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Alignment;
use heapless::String;
use log::debug;

use super::axis::{AxisWindow, Viewport};
use super::constants::{
    COLOR_AXIS, COLOR_BACKGROUND, COLOR_GRID, COLOR_NOTICE, COLOR_TEXT, COLOR_TRACE,
    MAX_AXIS_LABEL_LENGTH, NOTICE_LINE_SPACING_PX, TRACE_THICKNESS_PX, X_LABEL_OFFSET_PX,
    Y_LABEL_OFFSET_PX,
};
use super::pipeline::ChartUpdate;
use super::sample_window::{SamplePoint, SampleWindow};
use super::surface::ChartSurface;

type Label = String<MAX_AXIS_LABEL_LENGTH>;

/// Turns window mutations into draw and erase calls
///
/// The only state carried between ticks is the screen position of the last
/// drawn sample.
#[derive(Debug, Clone)]
pub struct ScrollRenderer {
    viewport: Viewport,
    title: &'static str,
    cursor: Option<Point>,
}

impl ScrollRenderer {
    pub fn new(viewport: Viewport, title: &'static str) -> Self {
        Self {
            viewport,
            title,
            cursor: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Screen position of the last drawn sample
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Reflect one push into the window on screen
    pub fn render<S: ChartSurface, const N: usize>(
        &mut self,
        surface: &mut S,
        update: &ChartUpdate,
        axis: &AxisWindow,
        window: &SampleWindow<N>,
    ) -> Result<(), S::Error> {
        if update.needs_full_redraw() {
            return self.redraw(surface, axis, window);
        }

        match update.evicted {
            Some(evicted) => self.scroll(surface, evicted, &update.previous_axis, axis, window),
            None => self.extend(surface, axis, window),
        }
    }

    /// Clear the screen and draw title, grid, labels and the whole trace
    pub fn redraw<S: ChartSurface, const N: usize>(
        &mut self,
        surface: &mut S,
        axis: &AxisWindow,
        window: &SampleWindow<N>,
    ) -> Result<(), S::Error> {
        debug!(
            "Full redraw: x = [{:.2}, {:.2}], y = [{:.1}, {:.1}]",
            axis.x_min, axis.x_max, axis.y_min, axis.y_max
        );

        surface.fill_screen(COLOR_BACKGROUND)?;
        self.draw_title(surface)?;
        self.draw_grid(surface, axis)?;
        self.draw_y_labels(surface, axis)?;
        self.draw_x_labels(surface, axis)?;

        for (older, newer) in window.segments() {
            self.draw_segment(surface, axis, older, newer, COLOR_TRACE)?;
        }

        self.cursor = window.peek_newest().map(|p| self.viewport.to_screen(axis, p));
        Ok(())
    }

    /// Full-screen message in place of the chart
    ///
    /// The chart must be redrawn afterwards.
    pub fn show_notice<S: ChartSurface>(
        &mut self,
        surface: &mut S,
        title: &str,
        lines: &[&str],
    ) -> Result<(), S::Error> {
        self.cursor = None;
        surface.fill_screen(COLOR_BACKGROUND)?;

        let bounds = surface.bounding_box();
        let center_x = bounds.top_left.x + bounds.size.width as i32 / 2;
        let block_height = NOTICE_LINE_SPACING_PX * lines.len() as i32;
        let mut y = bounds.top_left.y + (bounds.size.height as i32 - block_height) / 2;

        surface.draw_text(title, Point::new(center_x, y), COLOR_NOTICE, Alignment::Center)?;
        for line in lines {
            y += NOTICE_LINE_SPACING_PX;
            surface.draw_text(line, Point::new(center_x, y), COLOR_TEXT, Alignment::Center)?;
        }
        Ok(())
    }

    fn extend<S: ChartSurface, const N: usize>(
        &mut self,
        surface: &mut S,
        axis: &AxisWindow,
        window: &SampleWindow<N>,
    ) -> Result<(), S::Error> {
        let Some(newest) = window.peek_newest() else {
            return Ok(());
        };
        let end = self.viewport.to_screen(axis, newest);

        if let Some(start) = self.cursor {
            self.draw_thick(surface, start, end, COLOR_TRACE)?;
        }
        self.cursor = Some(end);
        Ok(())
    }

    fn scroll<S: ChartSurface, const N: usize>(
        &mut self,
        surface: &mut S,
        evicted: SamplePoint,
        old_axis: &AxisWindow,
        axis: &AxisWindow,
        window: &SampleWindow<N>,
    ) -> Result<(), S::Error> {
        // Everything that was on screen before this push: the evicted sample
        // followed by all buffered samples except the one just added.
        let mut previous = evicted;
        for point in window.iter().take(window.count().saturating_sub(1)) {
            self.draw_segment(surface, old_axis, previous, *point, COLOR_BACKGROUND)?;
            previous = *point;
        }
        self.erase_vertical_gridlines(surface, old_axis)?;

        self.draw_grid(surface, axis)?;
        for (older, newer) in window.segments() {
            self.draw_segment(surface, axis, older, newer, COLOR_TRACE)?;
        }

        self.clear_x_label_strip(surface)?;
        self.draw_x_labels(surface, axis)?;

        self.cursor = window.peek_newest().map(|p| self.viewport.to_screen(axis, p));
        Ok(())
    }

    fn draw_segment<S: ChartSurface>(
        &self,
        surface: &mut S,
        axis: &AxisWindow,
        from: SamplePoint,
        to: SamplePoint,
        color: Rgb565,
    ) -> Result<(), S::Error> {
        let start = self.viewport.to_screen(axis, from);
        let end = self.viewport.to_screen(axis, to);
        self.draw_thick(surface, start, end, color)
    }

    /// Stack of one-pixel lines offset vertically around the segment
    fn draw_thick<S: ChartSurface>(
        &self,
        surface: &mut S,
        start: Point,
        end: Point,
        color: Rgb565,
    ) -> Result<(), S::Error> {
        let half = TRACE_THICKNESS_PX / 2;
        for offset in -half..TRACE_THICKNESS_PX - half {
            let shift = Point::new(0, offset);
            surface.draw_line(start + shift, end + shift, color)?;
        }
        Ok(())
    }

    fn draw_title<S: ChartSurface>(&self, surface: &mut S) -> Result<(), S::Error> {
        let plot = self.viewport.plot_area();
        let center_x = plot.top_left.x + plot.size.width as i32 / 2;
        let baseline = plot.top_left.y - 6;
        surface.draw_text(self.title, Point::new(center_x, baseline), COLOR_TEXT, Alignment::Center)
    }

    /// Gridlines, the zero line and the two axis edges
    fn draw_grid<S: ChartSurface>(&self, surface: &mut S, axis: &AxisWindow) -> Result<(), S::Error> {
        let plot = self.viewport.plot_area();
        let left = plot.top_left.x;
        let right = left + plot.size.width as i32;
        let top = plot.top_left.y;
        let bottom = top + plot.size.height as i32;

        for y in axis.y_ticks() {
            let row = self.viewport.y_to_screen(axis, y);
            surface.draw_line(Point::new(left, row), Point::new(right, row), COLOR_GRID)?;
        }

        for x in axis.x_ticks() {
            let column = self.viewport.x_to_screen(axis, x);
            surface.draw_line(Point::new(column, top), Point::new(column, bottom), COLOR_GRID)?;
        }

        if axis.y_min <= 0.0 && axis.y_max >= 0.0 {
            let row = self.viewport.y_to_screen(axis, 0.0);
            surface.draw_line(Point::new(left, row), Point::new(right, row), COLOR_AXIS)?;
        }

        surface.draw_line(Point::new(left, top), Point::new(left, bottom), COLOR_AXIS)?;
        surface.draw_line(Point::new(left, bottom), Point::new(right, bottom), COLOR_AXIS)
    }

    fn erase_vertical_gridlines<S: ChartSurface>(
        &self,
        surface: &mut S,
        axis: &AxisWindow,
    ) -> Result<(), S::Error> {
        let plot = self.viewport.plot_area();
        let top = plot.top_left.y;
        let bottom = top + plot.size.height as i32;

        for x in axis.x_ticks() {
            let column = self.viewport.x_to_screen(axis, x);
            surface.draw_line(Point::new(column, top), Point::new(column, bottom), COLOR_BACKGROUND)?;
        }
        Ok(())
    }

    fn draw_y_labels<S: ChartSurface>(&self, surface: &mut S, axis: &AxisWindow) -> Result<(), S::Error> {
        let plot = self.viewport.plot_area();
        let column = plot.top_left.x - Y_LABEL_OFFSET_PX;

        for y in axis.y_ticks() {
            let mut label = Label::new();
            if write!(label, "{:.0}", y).is_err() {
                continue;
            }
            let row = self.viewport.y_to_screen(axis, y) + 3;
            surface.draw_text(&label, Point::new(column, row), COLOR_AXIS, Alignment::Left)?;
        }
        Ok(())
    }

    fn draw_x_labels<S: ChartSurface>(&self, surface: &mut S, axis: &AxisWindow) -> Result<(), S::Error> {
        let plot = self.viewport.plot_area();
        let row = plot.top_left.y + plot.size.height as i32 + X_LABEL_OFFSET_PX;

        for x in axis.x_ticks() {
            let mut label = Label::new();
            if write!(label, "{:.1}", x).is_err() {
                continue;
            }
            let column = self.viewport.x_to_screen(axis, x);
            surface.draw_text(&label, Point::new(column, row), COLOR_AXIS, Alignment::Center)?;
        }
        Ok(())
    }

    fn clear_x_label_strip<S: ChartSurface>(&self, surface: &mut S) -> Result<(), S::Error> {
        let screen = self.viewport.screen_bounds();
        let plot = self.viewport.plot_area();
        let top = plot.top_left.y + plot.size.height as i32 + 2;
        let height = (screen.top_left.y + screen.size.height as i32 - top).max(0) as u32;
        let strip = Rectangle::new(
            Point::new(screen.top_left.x, top),
            Size::new(screen.size.width, height),
        );
        surface.fill_rect(strip, COLOR_BACKGROUND)
    }
}
