//! Constants for chart rendering
//!
//! All magic numbers for the scroll chart are defined here with descriptive
//! names and units.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{RgbColor, WebColors};

/// Display width in pixels (landscape)
pub const DISPLAY_WIDTH_PX: u32 = 320;

/// Display height in pixels (landscape)
pub const DISPLAY_HEIGHT_PX: u32 = 240;

/// Space above the plot for the title
pub const TITLE_MARGIN_PX: u32 = 20;

/// Space left of the plot for Y labels
pub const Y_LABEL_MARGIN_PX: u32 = 30;

/// Space below the plot for X labels
pub const X_LABEL_MARGIN_PX: u32 = 25;

/// Space right of the plot
pub const RIGHT_MARGIN_PX: u32 = 5;

/// Horizontal offset of Y labels from the plot's left edge
pub const Y_LABEL_OFFSET_PX: i32 = 28;

/// Vertical offset of X labels below the plot's bottom edge
pub const X_LABEL_OFFSET_PX: i32 = 12;

/// Upper bound on gridlines per axis, guards against tiny ticks
pub const MAX_GRIDLINES: usize = 24;

/// Maximum length of formatted axis labels (characters)
pub const MAX_AXIS_LABEL_LENGTH: usize = 12;

/// Vertical distance between notice lines
pub const NOTICE_LINE_SPACING_PX: i32 = 20;

/// Trace is drawn as this many stacked one-pixel lines
pub const TRACE_THICKNESS_PX: i32 = 3;

/// Background color
pub const COLOR_BACKGROUND: Rgb565 = Rgb565::BLACK;

/// Gridline color (dark blue)
pub const COLOR_GRID: Rgb565 = Rgb565::new(0, 0, 16);

/// Zero line and axis label color
pub const COLOR_AXIS: Rgb565 = Rgb565::RED;

/// Sample trace color
pub const COLOR_TRACE: Rgb565 = Rgb565::YELLOW;

/// Title and tick label color
pub const COLOR_TEXT: Rgb565 = Rgb565::WHITE;

/// Notice headline color
pub const COLOR_NOTICE: Rgb565 = Rgb565::CSS_GOLD;
