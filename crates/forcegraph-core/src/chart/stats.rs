//! Statistics calculations over the sample window

use super::sample_window::SampleWindow;

/// Minimum and maximum Y value currently buffered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub min: f32,
    pub max: f32,
}

impl WindowStats {
    /// Full linear scan over the window's Y values
    ///
    /// Returns `None` for an empty window.
    pub fn min_max<const N: usize>(window: &SampleWindow<N>) -> Option<Self> {
        let mut points = window.iter();
        let first = points.next()?;

        let (min, max) = points.fold((first.y, first.y), |(min, max), point| {
            (min.min(point.y), max.max(point.y))
        });

        Some(Self { min, max })
    }

    /// Distance between max and min
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Center of the data
    pub fn midpoint(&self) -> f32 {
        self.min + self.span() / 2.0
    }

    /// A flat or non-finite window cannot be used for relative scaling
    pub fn is_degenerate(&self) -> bool {
        let span = self.span();
        !span.is_finite() || span <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::SamplePoint;

    #[test]
    fn test_empty_window_has_no_stats() {
        let window: SampleWindow<4> = SampleWindow::new();
        assert_eq!(WindowStats::min_max(&window), None);
    }

    #[test]
    fn test_min_max_scans_all_points() {
        let mut window: SampleWindow<8> = SampleWindow::new();
        for (i, y) in [3.0, -7.5, 12.0, 0.0].into_iter().enumerate() {
            window.push(SamplePoint::new(i as f32, y));
        }

        let stats = WindowStats::min_max(&window).unwrap();

        assert_eq!(stats.min, -7.5);
        assert_eq!(stats.max, 12.0);
        assert_eq!(stats.span(), 19.5);
        assert_eq!(stats.midpoint(), 2.25);
    }

    #[test]
    fn test_evicted_points_leave_the_stats() {
        let mut window: SampleWindow<2> = SampleWindow::new();
        window.push(SamplePoint::new(0.0, 100.0));
        window.push(SamplePoint::new(1.0, 1.0));
        window.push(SamplePoint::new(2.0, 2.0));

        let stats = WindowStats::min_max(&window).unwrap();
        assert_eq!((stats.min, stats.max), (1.0, 2.0));
    }

    #[test]
    fn test_flat_window_is_degenerate() {
        let stats = WindowStats { min: 4.0, max: 4.0 };
        assert!(stats.is_degenerate());
        assert!(!WindowStats { min: 4.0, max: 5.0 }.is_degenerate());
    }
}
