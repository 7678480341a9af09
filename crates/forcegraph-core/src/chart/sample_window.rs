//! Fixed-capacity FIFO window of time-stamped samples

use heapless::Deque;

/// A single sample on the chart
///
/// `x` is the time offset in seconds since the chart was (re)started and `y`
/// the scaled force reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Time offset in seconds
    pub x: f32,
    /// Sensor value
    pub y: f32,
}

impl SamplePoint {
    /// Create a new sample point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Ring buffer of the most recent `N` samples, oldest first
///
/// Pushing onto a full window evicts exactly one (the oldest) sample.
pub struct SampleWindow<const N: usize> {
    points: Deque<SamplePoint, N>,
}

impl<const N: usize> SampleWindow<N> {
    /// Create an empty window
    pub const fn new() -> Self {
        Self {
            points: Deque::new(),
        }
    }

    /// Append a sample, evicting the oldest one first if the window is full
    ///
    /// Returns the evicted sample, if any.
    pub fn push(&mut self, point: SamplePoint) -> Option<SamplePoint> {
        let evicted = if self.points.is_full() {
            self.points.pop_front()
        } else {
            None
        };
        // Cannot fail: there is always room after the eviction above.
        let _ = self.points.push_back(point);
        evicted
    }

    /// Sample at logical position `index` (0 = oldest)
    pub fn peek_indexed(&self, index: usize) -> Option<SamplePoint> {
        self.points.iter().nth(index).copied()
    }

    /// Oldest buffered sample
    pub fn peek_oldest(&self) -> Option<SamplePoint> {
        self.points.front().copied()
    }

    /// Most recently pushed sample
    pub fn peek_newest(&self) -> Option<SamplePoint> {
        self.points.back().copied()
    }

    /// Remove and return the oldest sample
    pub fn pop_oldest(&mut self) -> Option<SamplePoint> {
        self.points.pop_front()
    }

    /// Number of buffered samples
    pub fn count(&self) -> usize {
        self.points.len()
    }

    /// Maximum number of samples
    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn is_full(&self) -> bool {
        self.points.is_full()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &SamplePoint> + '_ {
        self.points.iter()
    }

    /// Iterate over consecutive `(older, newer)` pairs
    pub fn segments(&self) -> impl Iterator<Item = (SamplePoint, SamplePoint)> + '_ {
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .map(|(a, b)| (*a, *b))
    }

    /// Drop every sample
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(i: usize) -> SamplePoint {
        SamplePoint::new(i as f32, (i * 10) as f32)
    }

    #[test]
    fn test_push_evicts_oldest_when_full() {
        let mut window: SampleWindow<3> = SampleWindow::new();
        let (a, b, c, d) = (point(0), point(1), point(2), point(3));

        assert_eq!(window.push(a), None);
        assert_eq!(window.push(b), None);
        assert_eq!(window.push(c), None);
        assert!(window.is_full());
        assert_eq!(window.push(d), Some(a));

        assert_eq!(window.count(), 3);
        assert_eq!(window.peek_indexed(0), Some(b));
        assert_eq!(window.peek_indexed(1), Some(c));
        assert_eq!(window.peek_indexed(2), Some(d));
        assert_eq!(window.peek_oldest(), Some(b));
        assert_eq!(window.peek_newest(), Some(d));
    }

    #[test]
    fn test_count_never_exceeds_capacity() {
        let mut window: SampleWindow<5> = SampleWindow::new();
        for total in 1..=23 {
            window.push(point(total - 1));
            assert!(window.count() <= 5);
            if total > 5 {
                // Oldest retained sample is the (total - N)th push, zero-based.
                assert_eq!(window.peek_indexed(0), Some(point(total - 5)));
            }
        }
    }

    #[test]
    fn test_peek_beyond_count_is_none() {
        let mut window: SampleWindow<4> = SampleWindow::new();
        window.push(point(0));
        assert_eq!(window.peek_indexed(1), None);
    }

    #[test]
    fn test_pop_oldest_is_fifo() {
        let mut window: SampleWindow<4> = SampleWindow::new();
        window.push(point(0));
        window.push(point(1));
        assert_eq!(window.pop_oldest(), Some(point(0)));
        assert_eq!(window.pop_oldest(), Some(point(1)));
        assert_eq!(window.pop_oldest(), None);
        assert!(window.is_empty());
    }

    #[test]
    fn test_segments_pair_neighbours() {
        let mut window: SampleWindow<4> = SampleWindow::new();
        for i in 0..3 {
            window.push(point(i));
        }
        let mut segments = window.segments();
        assert_eq!(segments.next(), Some((point(0), point(1))));
        assert_eq!(segments.next(), Some((point(1), point(2))));
        assert_eq!(segments.next(), None);
    }
}
