//! Axis-aligned collision for the side-scrolling world
//!
//! Screen coordinates: x grows right, y grows down. A rectangle's `y` is its
//! top edge, so "landing on top" means the mover's bottom meets a surface's
//! top.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from a top-left position and a size vector
    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Square of the given half extent centred on a point
    #[inline]
    pub fn around(center: Vec2, half: f32) -> Self {
        Self::new(center.x - half, center.y - half, half * 2.0, half * 2.0)
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Anything with a collision box
pub trait Hitbox {
    fn hitbox(&self) -> Rect;
}

impl Hitbox for Rect {
    fn hitbox(&self) -> Rect {
        *self
    }
}

/// Strict overlap on both axes; touching edges don't count
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Overlap test between any two hitboxes
#[inline]
pub fn touching(a: &impl Hitbox, b: &impl Hitbox) -> bool {
    overlaps(&a.hitbox(), &b.hitbox())
}

/// How a moving body meets a solid surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformContact {
    None,
    /// Mover's feet are on the surface top (falling or resting)
    LandingOnTop,
    /// Mover's head struck the surface bottom while rising
    HittingFromBelow,
}

/// Classify contact between a mover and a surface
///
/// Landing is tested before hitting-from-below. Both tolerate penetration of
/// up to half the mover's height.
pub fn classify_platform_contact(mover: &Rect, vel_y: f32, surface: &Rect) -> PlatformContact {
    if !overlaps(mover, surface) {
        return PlatformContact::None;
    }

    let half_height = mover.height / 2.0;

    if mover.bottom() - surface.top() < half_height && vel_y >= 0.0 {
        return PlatformContact::LandingOnTop;
    }

    if surface.bottom() - mover.top() < half_height && vel_y < 0.0 {
        return PlatformContact::HittingFromBelow;
    }

    PlatformContact::None
}
