//! Debug line primitives
//!
//! The AI never renders anything itself. It emits colored line segments into a
//! caller-supplied [`DebugSink`]; boxes, spheres and circles are expanded into
//! lines by the trait's provided methods so a sink only has to implement
//! [`DebugSink::draw_line`].

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgba(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::rgba(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::rgba(0.0, 0.0, 1.0, 1.0);
    pub const YELLOW: Self = Self::rgba(1.0, 1.0, 0.0, 1.0);
    pub const CYAN: Self = Self::rgba(0.0, 1.0, 1.0, 1.0);
    pub const ORANGE: Self = Self::rgba(1.0, 0.5, 0.0, 1.0);
    pub const GRAY: Self = Self::rgba(0.5, 0.5, 0.5, 1.0);

    /// Create from components
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Receiver of debug primitives.
pub trait DebugSink {
    /// Queue a single line segment
    fn draw_line(&mut self, from: Vec3, to: Vec3, color: Color);

    /// Axis-aligned box outline (12 edges)
    fn draw_box(&mut self, center: Vec3, half_extents: Vec3, color: Color) {
        let corner = |sx: f32, sy: f32, sz: f32| {
            center + Vec3::new(sx * half_extents.x, sy * half_extents.y, sz * half_extents.z)
        };
        let c = [
            corner(-1.0, -1.0, -1.0),
            corner(1.0, -1.0, -1.0),
            corner(1.0, -1.0, 1.0),
            corner(-1.0, -1.0, 1.0),
            corner(-1.0, 1.0, -1.0),
            corner(1.0, 1.0, -1.0),
            corner(1.0, 1.0, 1.0),
            corner(-1.0, 1.0, 1.0),
        ];
        for i in 0..4 {
            let j = (i + 1) % 4;
            self.draw_line(c[i], c[j], color);
            self.draw_line(c[i + 4], c[j + 4], color);
            self.draw_line(c[i], c[i + 4], color);
        }
    }

    /// Horizontal circle in the XZ plane
    fn draw_circle(&mut self, center: Vec3, radius: f32, color: Color, segments: u32) {
        let segments = segments.max(3);
        let point = |i: u32| {
            let angle = i as f32 / segments as f32 * TAU;
            center + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
        };
        for i in 0..segments {
            self.draw_line(point(i), point(i + 1), color);
        }
    }

    /// Wire sphere: three great circles on the XY, XZ and YZ planes
    fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Color, segments: u32) {
        let segments = segments.max(3);
        for i in 0..segments {
            let a0 = i as f32 / segments as f32 * TAU;
            let a1 = (i + 1) as f32 / segments as f32 * TAU;
            let (s0, c0) = (a0.sin() * radius, a0.cos() * radius);
            let (s1, c1) = (a1.sin() * radius, a1.cos() * radius);

            self.draw_line(center + Vec3::new(c0, s0, 0.0), center + Vec3::new(c1, s1, 0.0), color);
            self.draw_line(center + Vec3::new(c0, 0.0, s0), center + Vec3::new(c1, 0.0, s1), color);
            self.draw_line(center + Vec3::new(0.0, c0, s0), center + Vec3::new(0.0, c1, s1), color);
        }
    }
}

/// A queued line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub from: Vec3,
    pub to: Vec3,
    pub color: Color,
}

/// Collects lines into a vector, for tests and headless hosts
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    pub lines: Vec<DebugLine>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl DebugSink for LineBuffer {
    fn draw_line(&mut self, from: Vec3, to: Vec3, color: Color) {
        self.lines.push(DebugLine { from, to, color });
    }
}
