//! Hysteresis-based Y axis autoscaling
//!
//! The scaler looks at the window's min/max and the newest sample and decides
//! whether the visible Y range must change. Rules are evaluated as a strict
//! priority chain; the first matching rule wins and the rest are skipped for
//! that tick.

use log::debug;

use crate::config::AutoScaleConfig;

use super::axis::AxisWindow;
use super::stats::WindowStats;

/// Outcome of one autoscale evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDecision {
    /// Bounds untouched
    Unchanged,
    /// Newest sample fell below `y_min`, the lower bound was extended
    BelowRange,
    /// Newest sample rose above `y_max`, the upper bound was extended
    AboveRange,
    /// Visible range was much wider than the data and was shrunk around it
    TooWide,
    /// Data sat off-center and the range was shifted to center it
    OffCenter,
}

impl ScaleDecision {
    /// Whether the axis changed and the chart needs a full redraw
    pub fn is_rescale(self) -> bool {
        self != ScaleDecision::Unchanged
    }
}

/// Stateless rule evaluator; the state it adjusts is the caller's [`AxisWindow`]
#[derive(Debug, Clone, Copy)]
pub struct AutoScaler {
    config: AutoScaleConfig,
}

impl AutoScaler {
    pub fn new(config: AutoScaleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AutoScaleConfig {
        &self.config
    }

    /// Apply the first matching rule to `axis`
    ///
    /// A flat (or non-finite) window only suppresses the two relative rules,
    /// so a constant signal outside the visible range still pulls the range
    /// out to include it.
    pub fn evaluate(&self, axis: &mut AxisWindow, stats: &WindowStats, newest_y: f32) -> ScaleDecision {
        if !newest_y.is_finite() {
            return ScaleDecision::Unchanged;
        }

        let grow = self.config.grow_factor * newest_y.abs();

        if newest_y < axis.y_min {
            axis.set_y_bounds(newest_y - grow, axis.y_max);
            return self.report(ScaleDecision::BelowRange, axis);
        }

        if newest_y > axis.y_max {
            axis.set_y_bounds(axis.y_min, newest_y + grow);
            return self.report(ScaleDecision::AboveRange, axis);
        }

        if stats.is_degenerate() {
            return ScaleDecision::Unchanged;
        }

        let span = stats.span();
        let mid = stats.midpoint();
        let range = axis.y_range();

        if range > self.config.expand_factor * span {
            let limit = span * (self.config.expand_factor - 2.0) / 2.0;
            axis.set_y_bounds(mid - limit, mid + limit);
            return self.report(ScaleDecision::TooWide, axis);
        }

        let headroom_top = axis.y_max - stats.max;
        let headroom_bottom = stats.min - axis.y_min;
        if (headroom_top - headroom_bottom).abs() > self.config.centering_factor * span {
            let half_range = range / 2.0;
            axis.set_y_bounds(mid - half_range, mid + half_range);
            return self.report(ScaleDecision::OffCenter, axis);
        }

        ScaleDecision::Unchanged
    }

    fn report(&self, decision: ScaleDecision, axis: &AxisWindow) -> ScaleDecision {
        debug!(
            "Autoscale {:?}: y = [{:.1}, {:.1}], tick {:.2}",
            decision, axis.y_min, axis.y_max, axis.y_tick
        );
        decision
    }
}

impl Default for AutoScaler {
    fn default() -> Self {
        Self::new(AutoScaleConfig::default())
    }
}
