//! Streaming scroll chart for embedded displays
//!
//! This module draws a live time series without a framebuffer. It supports:
//!
//! - A fixed-capacity FIFO window of samples ([`SampleWindow`])
//! - Min/max statistics over the window ([`WindowStats`])
//! - Hysteresis-based Y autoscaling ([`AutoScaler`])
//! - Incremental erase/redraw of the trace as the window scrolls
//!   ([`ScrollRenderer`])
//!
//! # Memory Characteristics
//!
//! The window uses a const generic capacity `N`; a `ForceChart<90>` holds
//! 90 points (720 bytes) plus a few hundred bytes of renderer state. No
//! allocator is required.
//!
//! # Examples
//!
//! ```ignore
//! use forcegraph_core::chart::*;
//!
//! let mut chart = ForceChart::<90>::new(ChartConfig::default(), AutoScaleConfig::default());
//! let mut surface = DisplaySurface::new(display);
//!
//! chart.redraw(&mut surface)?;
//! chart.push_sample(&mut surface, SamplePoint::new(0.25, 12.5))?;
//! ```

pub mod autoscale;
pub mod axis;
pub mod constants;
pub mod pipeline;
pub mod renderer;
pub mod sample_window;
pub mod stats;
pub mod surface;

pub use autoscale::{AutoScaler, ScaleDecision};
pub use axis::{AxisWindow, Viewport};
pub use pipeline::{ChartUpdate, ForceChart};
pub use renderer::ScrollRenderer;
pub use sample_window::{SamplePoint, SampleWindow};
pub use stats::WindowStats;
pub use surface::{ChartSurface, DisplaySurface};

#[cfg(test)]
pub(crate) mod test_surface;
