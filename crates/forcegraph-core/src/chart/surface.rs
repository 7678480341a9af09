//! Narrow drawing interface consumed by the renderer
//!
//! The renderer only ever needs lines, filled rectangles, a screen clear and
//! single-line text. [`DisplaySurface`] provides these on top of any
//! `embedded-graphics` draw target.

use core::fmt::Debug;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Text};

/// Line drawing surface
pub trait ChartSurface {
    type Error: Debug;

    /// Full drawable area
    fn bounding_box(&self) -> Rectangle;

    /// One pixel wide line between two points, both ends inclusive
    fn draw_line(&mut self, start: Point, end: Point, color: Rgb565) -> Result<(), Self::Error>;

    fn fill_rect(&mut self, area: Rectangle, color: Rgb565) -> Result<(), Self::Error>;

    fn fill_screen(&mut self, color: Rgb565) -> Result<(), Self::Error>;

    /// Single line of text; `position` is the baseline anchor for `alignment`
    fn draw_text(
        &mut self,
        text: &str,
        position: Point,
        color: Rgb565,
        alignment: Alignment,
    ) -> Result<(), Self::Error>;
}

/// [`ChartSurface`] over an `embedded-graphics` display
pub struct DisplaySurface<D> {
    display: D,
}

impl<D> DisplaySurface<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(display: D) -> Self {
        Self { display }
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

impl<D> ChartSurface for DisplaySurface<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: Debug,
{
    type Error = D::Error;

    fn bounding_box(&self) -> Rectangle {
        self.display.bounding_box()
    }

    fn draw_line(&mut self, start: Point, end: Point, color: Rgb565) -> Result<(), Self::Error> {
        Line::new(start, end)
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.display)
    }

    fn fill_rect(&mut self, area: Rectangle, color: Rgb565) -> Result<(), Self::Error> {
        area.into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.display)
    }

    fn fill_screen(&mut self, color: Rgb565) -> Result<(), Self::Error> {
        self.display.clear(color)
    }

    fn draw_text(
        &mut self,
        text: &str,
        position: Point,
        color: Rgb565,
        alignment: Alignment,
    ) -> Result<(), Self::Error> {
        let style = MonoTextStyle::new(&FONT_6X10, color);
        Text::with_alignment(text, position, style, alignment).draw(&mut self.display)?;
        Ok(())
    }
}
