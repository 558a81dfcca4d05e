//! Geometric path model: arc-length parametrized segments composed into
//! trajectories, plus the visibility cone used by agent perception.

use serde::{Deserialize, Serialize};

mod cone;
mod segment;
mod trajectory;

pub use cone::VisibilityCone;
pub use segment::{Arc, Line, Segment};
pub use trajectory::{Trajectory, DEFAULT_CONTINUITY_TOLERANCE};

/// A point on the plane, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// RGB color carried through for rendering collaborators; the core never
/// interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const RED: Color = Color(200, 30, 30);
}
