//! Positions, rectangles and the little bit of vector math the game needs

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// World coordinates. +y points down the slope.
pub type Position = Vec2;

/// Axis-aligned rectangle given by its edges
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Position, width: f32, height: f32) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            center.x + width / 2.0,
            center.y + height / 2.0,
        )
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Grow (or shrink, for negative `amount`) every edge outward
    pub fn expanded(&self, amount: f32) -> Self {
        Self::new(
            self.left - amount,
            self.top - amount,
            self.right + amount,
            self.bottom + amount,
        )
    }
}

/// Overlap test with inclusive edges: rectangles that only touch still intersect.
#[inline]
pub fn intersect_rects(a: &Rect, b: &Rect) -> bool {
    !(b.left > a.right || b.right < a.left || b.top > a.bottom || b.bottom < a.top)
}

/// Unit vector from `start` toward `end`, or zero when the points coincide
pub fn direction_vector(start: Position, end: Position) -> Position {
    let delta = end - start;
    let distance = delta.length();
    if distance > 0.0 {
        delta / distance
    } else {
        Vec2::ZERO
    }
}

/// Random integer in `[min, max]`, both ends inclusive.
///
/// An empty range (min > max) yields `min`.
pub fn random_int<R: Rng>(rng: &mut R, min: i32, max: i32) -> i32 {
    if min >= max {
        return min;
    }
    rng.random_range(min..=max)
}
