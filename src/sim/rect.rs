//! Axis-aligned rectangle, the sole collision primitive
//!
//! World space, pixels, y grows downward:
//! - (x, y): top-left corner
//! - width, height: extent, never negative

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Negative sizes are clamped to zero
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Strict overlap test (touching edges do not intersect)
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Length of the shared horizontal span (negative when apart)
    #[inline]
    pub fn horizontal_overlap(&self, other: &Rect) -> f32 {
        self.right().min(other.right()) - self.left().max(other.left())
    }

    /// Length of the shared vertical span (negative when apart)
    #[inline]
    pub fn vertical_overlap(&self, other: &Rect) -> f32 {
        self.bottom().min(other.bottom()) - self.top().max(other.top())
    }

    /// Grow the rectangle by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_size_clamped() {
        let r = Rect::new(10.0, 10.0, -5.0, 20.0);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 20.0);
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert_eq!(a.horizontal_overlap(&b), 0.0);

        let c = Rect::new(9.0, 9.0, 10.0, 10.0);
        assert!(a.intersects(&c));
        assert_eq!(a.horizontal_overlap(&c), 1.0);
        assert_eq!(a.vertical_overlap(&c), 1.0);
    }

    #[test]
    fn test_edges_and_center() {
        let r = Rect::new(100.0, 200.0, 32.0, 48.0);
        assert_eq!(r.right(), 132.0);
        assert_eq!(r.bottom(), 248.0);
        assert_eq!(r.center(), Vec2::new(116.0, 224.0));
    }

    #[test]
    fn test_inflate() {
        let r = Rect::new(10.0, 10.0, 10.0, 10.0).inflate(5.0);
        assert_eq!(r, Rect::new(5.0, 5.0, 20.0, 20.0));
    }
}
