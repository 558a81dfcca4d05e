use super::Point;

/// A directional query region: everything within `aperture / 2` of the
/// apex-to-far axis and no farther from the apex than the far point.
/// Rebuilt on demand from a trajectory position, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityCone {
    apex: Point,
    far: Point,
    aperture: f64,
}

impl VisibilityCone {
    pub fn new(apex: Point, far: Point, aperture: f64) -> Self {
        Self {
            apex,
            far,
            aperture,
        }
    }

    pub fn apex(&self) -> Point {
        self.apex
    }

    pub fn far(&self) -> Point {
        self.far
    }

    pub fn aperture(&self) -> f64 {
        self.aperture
    }

    pub fn range(&self) -> f64 {
        self.apex.distance_to(self.far)
    }

    pub fn contains(&self, p: Point) -> bool {
        let range = self.range();
        let dist = self.apex.distance_to(p);
        if dist > range {
            return false;
        }
        if dist == 0.0 {
            // The apex itself is always visible.
            return true;
        }
        let ax = (self.far.x - self.apex.x) / range;
        let ay = (self.far.y - self.apex.y) / range;
        let px = (p.x - self.apex.x) / dist;
        let py = (p.y - self.apex.y) / dist;
        let cos_angle = (ax * px + ay * py).clamp(-1.0, 1.0);
        cos_angle.acos() <= self.aperture / 2.0
    }
}
