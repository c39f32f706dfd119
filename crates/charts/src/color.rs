// In crates/charts/src/color.rs

use std::fmt;

use serde::{Serialize, Serializer};

/// An sRGB colour with alpha, rendered as a CSS colour string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }
}

impl fmt::Display for Color {
    /// Opaque colours print as `#rrggbb`, translucent ones as `rgba(r, g, b, a)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_rendering() {
        assert_eq!(Color::rgb(0x4f, 0x9c, 0xff).to_string(), "#4f9cff");
        assert_eq!(Color::rgba(239, 68, 68, 0.1).to_string(), "rgba(239, 68, 68, 0.1)");
        assert_eq!(Color::rgba(10, 19, 38, 0.95).to_string(), "rgba(10, 19, 38, 0.95)");
    }
}
