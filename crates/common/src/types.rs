use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A lattice vertex in world space.
///
/// Vertices are plain values; identity between two vertices is decided by
/// quantized coordinate equality in the kernel, never by reference.
pub type Vertex = DVec3;

/// Packed `0xRRGGBB` display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Normalized RGBA with full opacity, as consumed by GPU vertex buffers.
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r() as f32 / 255.0,
            self.g() as f32 / 255.0,
            self.b() as f32 / 255.0,
            1.0,
        ]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0 & 0x00ff_ffff)
    }
}

/// The three display colors an edge cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Color of an edge at rest.
    pub rest: Color,
    /// Color while the edge collapses toward its midpoint.
    pub fracture: Color,
    /// Color while the edge grows back to its base position.
    pub heal: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            rest: Color(0x66ccff),
            fracture: Color(0xff3366),
            heal: Color(0x66ffcc),
        }
    }
}
