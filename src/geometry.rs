use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in surface coordinates (points, not pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub const ZERO: Frame = Frame::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// True unless both sides are strictly positive. NaN sides count as empty.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.max_x() && p.y >= self.y && p.y < self.max_y()
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Frame {
        Frame::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Euclidean distance from `p` to the nearest point of the rectangle.
    /// Zero when the point lies inside.
    pub fn distance_to(&self, p: Point) -> f64 {
        let dx = (self.x - p.x).max(0.0).max(p.x - self.max_x());
        let dy = (self.y - p.y).max(0.0).max(p.y - self.max_y());
        (dx * dx + dy * dy).sqrt()
    }

    pub fn pixel_size(&self, scale: f64) -> PixelSize {
        PixelSize::from_points(self.width, self.height, scale)
    }
}

/// Frame size measured in whole device pixels. Used as the pool bucket key,
/// since floating-point sizes cannot be hashed or ordered reliably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PixelSize {
    pub width: i64,
    pub height: i64,
}

impl PixelSize {
    pub fn from_points(width: f64, height: f64, scale: f64) -> Self {
        Self {
            width: (width * scale).round() as i64,
            height: (height * scale).round() as i64,
        }
    }
}

/// Snaps lengths to the device pixel grid so adjacent keys never leave
/// hairline seams between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelGrid {
    pub scale: f64,
}

impl PixelGrid {
    /// Panics on a non-positive scale. User input goes through
    /// `DeviceProfile::validate` first.
    pub fn new(scale: f64) -> Self {
        assert!(scale > 0.0, "pixel scale must be positive");
        Self { scale }
    }

    #[inline]
    pub fn round(&self, v: f64) -> f64 {
        (v * self.scale).round() / self.scale
    }

    pub fn round_frame(&self, f: Frame) -> Frame {
        Frame::new(
            self.round(f.x),
            self.round(f.y),
            self.round(f.width),
            self.round(f.height),
        )
    }

    pub fn is_aligned(&self, v: f64) -> bool {
        ((v * self.scale) - (v * self.scale).round()).abs() < 1e-6
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn of(bounds: &Frame, landscape_ratio: f64) -> Self {
        if bounds.width / bounds.height >= landscape_ratio {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn is_landscape(self) -> bool {
        self == Orientation::Landscape
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    #[default]
    Up,
    Down,
}
