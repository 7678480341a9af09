//! Recording surface for renderer tests

extern crate std;

use core::convert::Infallible;
use std::string::{String, ToString};
use std::vec::Vec;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Alignment;

use super::constants::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
use super::surface::ChartSurface;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Line { start: Point, end: Point, color: Rgb565 },
    Rect { area: Rectangle, color: Rgb565 },
    Clear(Rgb565),
    Text { text: String, position: Point, color: Rgb565 },
}

/// Records every call instead of drawing
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.ops.clear();
    }

    pub fn clears(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Clear(_))).count()
    }

    pub fn lines_in(&self, color: Rgb565) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { color: c, .. } if *c == color))
            .count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ChartSurface for RecordingSurface {
    type Error = Infallible;

    fn bounding_box(&self) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX))
    }

    fn draw_line(&mut self, start: Point, end: Point, color: Rgb565) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Line { start, end, color });
        Ok(())
    }

    fn fill_rect(&mut self, area: Rectangle, color: Rgb565) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Rect { area, color });
        Ok(())
    }

    fn fill_screen(&mut self, color: Rgb565) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Clear(color));
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        position: Point,
        color: Rgb565,
        _alignment: Alignment,
    ) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            position,
            color,
        });
        Ok(())
    }
}
