//! Per-tag location history and statistics.

use kurbo::Point;
use std::collections::VecDeque;

/// Number of past positions kept per tag unless configured otherwise.
pub const DEFAULT_HISTORY_LEN: usize = 20;
/// Side length of a tag marker in logical units.
pub const DEFAULT_TAG_SIZE: f64 = 0.3;

/// Bounded trail of recent positions for one tag, plus its R95 radius.
#[derive(Debug, Clone)]
pub struct TagTrack {
    history: VecDeque<Point>,
    capacity: usize,
    r95: Option<f64>,
    show_history: bool,
}

impl Default for TagTrack {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

impl TagTrack {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
            r95: None,
            show_history: true,
        }
    }

    /// Record a new position, dropping the oldest once full.
    pub fn push(&mut self, pos: Point) {
        if self.capacity == 0 {
            return;
        }
        while self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(pos);
    }

    /// Change the trail length; shrinking drops the oldest samples.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.history.len() > capacity {
            self.history.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn history(&self) -> impl Iterator<Item = Point> + '_ {
        self.history.iter().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.history.back().copied()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn r95(&self) -> Option<f64> {
        self.r95
    }

    pub fn set_r95(&mut self, radius: Option<f64>) {
        self.r95 = radius.filter(|r| r.is_finite() && *r >= 0.0);
    }

    pub fn show_history(&self) -> bool {
        self.show_history
    }

    pub fn set_show_history(&mut self, show: bool) {
        self.show_history = show;
    }
}

/// Centre of gravity of a set of positions.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}
