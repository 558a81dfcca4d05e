use super::{Color, Point, VisibilityCone};
use crate::error::SimError;

const MIN_SEGMENT_LENGTH: f64 = 1e-12;

/// A straight path piece with constant heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    a: Point,
    b: Point,
    color: Color,
}

impl Line {
    pub fn new(a: Point, b: Point) -> Result<Self, SimError> {
        Self::with_color(a, b, Color::BLACK)
    }

    pub fn with_color(a: Point, b: Point, color: Color) -> Result<Self, SimError> {
        if a.distance_to(b) < MIN_SEGMENT_LENGTH {
            return Err(SimError::DegenerateSegment);
        }
        Ok(Self { a, b, color })
    }

    pub fn length(&self) -> f64 {
        self.a.distance_to(self.b)
    }

    /// Unit direction from `a` to `b`.
    fn direction(&self) -> (f64, f64) {
        let len = self.length();
        ((self.b.x - self.a.x) / len, (self.b.y - self.a.y) / len)
    }

    fn point_at(&self, s: f64) -> Point {
        let (dx, dy) = self.direction();
        Point::new(self.a.x + dx * s, self.a.y + dy * s)
    }
}

/// A circular-arc path piece. Angles are radians; the traversal sense is the
/// sign of `end - start`. Points follow the downward-positive-y convention
/// `center + radius * (cos t, -sin t)`, matching the straight segments so
/// composite trajectories stay continuous.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    center: Point,
    radius: f64,
    start: f64,
    end: f64,
    color: Color,
}

impl Arc {
    pub fn new(center: Point, radius: f64, start: f64, end: f64) -> Result<Self, SimError> {
        Self::with_color(center, radius, start, end, Color::BLACK)
    }

    pub fn with_color(
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        color: Color,
    ) -> Result<Self, SimError> {
        if !(radius > 0.0) {
            return Err(SimError::NonPositiveRadius(radius));
        }
        if (end - start).abs() * radius < MIN_SEGMENT_LENGTH {
            return Err(SimError::DegenerateSegment);
        }
        Ok(Self {
            center,
            radius,
            start,
            end,
            color,
        })
    }

    pub fn length(&self) -> f64 {
        self.radius * (self.end - self.start).abs()
    }

    fn sense(&self) -> f64 {
        if self.end < self.start {
            -1.0
        } else {
            1.0
        }
    }

    fn angle_at(&self, s: f64) -> f64 {
        self.start + self.sense() * (s / self.radius)
    }

    fn point_at(&self, s: f64) -> Point {
        let t = self.angle_at(s);
        Point::new(
            self.center.x + self.radius * t.cos(),
            self.center.y - self.radius * t.sin(),
        )
    }

    /// Local direction of travel: the radius vector rotated a quarter turn
    /// toward increasing arc-length.
    fn tangent_at(&self, s: f64) -> (f64, f64) {
        let t = self.angle_at(s);
        let sense = self.sense();
        (-sense * t.sin(), -sense * t.cos())
    }
}

/// A primitive path piece. The variant set is closed; everything downstream
/// dispatches over the two shapes by match.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Line(Line),
    Arc(Arc),
}

impl Segment {
    pub fn length(&self) -> f64 {
        match self {
            Segment::Line(line) => line.length(),
            Segment::Arc(arc) => arc.length(),
        }
    }

    /// Point at arc-length `s` from the segment start. Out-of-range queries
    /// are a hard error here; only `Trajectory` turns past-the-end into the
    /// soft exit signal.
    pub fn point_at(&self, s: f64) -> Result<Point, SimError> {
        let length = self.length();
        if !(0.0..=length).contains(&s) {
            return Err(SimError::OutOfRange {
                position: s,
                length,
            });
        }
        Ok(match self {
            Segment::Line(line) => line.point_at(s),
            Segment::Arc(arc) => arc.point_at(s),
        })
    }

    /// Unit tangent (direction of travel) at arc-length `s`.
    pub fn tangent_at(&self, s: f64) -> Result<(f64, f64), SimError> {
        let length = self.length();
        if !(0.0..=length).contains(&s) {
            return Err(SimError::OutOfRange {
                position: s,
                length,
            });
        }
        Ok(match self {
            Segment::Line(line) => line.direction(),
            Segment::Arc(arc) => arc.tangent_at(s),
        })
    }

    /// Visibility cone anchored at `point_at(s)` and pointing along the
    /// local tangent, reaching `view_distance` meters ahead.
    pub fn tangent_cone_at(
        &self,
        s: f64,
        aperture: f64,
        view_distance: f64,
    ) -> Result<VisibilityCone, SimError> {
        let apex = self.point_at(s)?;
        let (dx, dy) = self.tangent_at(s)?;
        let far = Point::new(apex.x + dx * view_distance, apex.y + dy * view_distance);
        Ok(VisibilityCone::new(apex, far, aperture))
    }

    pub fn start(&self) -> Point {
        match self {
            Segment::Line(line) => line.a,
            Segment::Arc(arc) => arc.point_at(0.0),
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line(line) => line.b,
            Segment::Arc(arc) => arc.point_at(arc.length()),
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Segment::Line(line) => line.color,
            Segment::Arc(arc) => arc.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn close(a: Point, b: Point) -> bool {
        a.distance_to(b) < 1e-9
    }

    #[test]
    fn line_length_and_endpoints() {
        let line = Segment::Line(Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap());
        assert_eq!(line.length(), 10.0);
        assert!(close(line.point_at(0.0).unwrap(), Point::new(0.0, 0.0)));
        assert!(close(line.point_at(5.0).unwrap(), Point::new(5.0, 0.0)));
        assert!(close(line.point_at(10.0).unwrap(), Point::new(10.0, 0.0)));
    }

    #[test]
    fn line_rejects_zero_length() {
        let p = Point::new(1.0, 2.0);
        assert!(matches!(
            Line::new(p, p),
            Err(SimError::DegenerateSegment)
        ));
    }

    #[test]
    fn line_out_of_range_is_error() {
        let line = Segment::Line(Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap());
        assert!(matches!(
            line.point_at(10.01),
            Err(SimError::OutOfRange { .. })
        ));
        assert!(matches!(
            line.point_at(-0.01),
            Err(SimError::OutOfRange { .. })
        ));
    }

    #[test]
    fn quarter_arc_length_and_endpoints() {
        let arc =
            Segment::Arc(Arc::new(Point::new(0.0, 0.0), 5.0, 0.0, FRAC_PI_2).unwrap());
        assert!((arc.length() - 7.853_981_633_974_483).abs() < 1e-9);
        assert!(close(arc.point_at(0.0).unwrap(), Point::new(5.0, 0.0)));
        // y grows downward: sin(pi/2) pulls the endpoint to negative y.
        assert!(close(arc.point_at(arc.length()).unwrap(), Point::new(0.0, -5.0)));
    }

    #[test]
    fn reversed_arc_traverses_backwards() {
        let arc = Segment::Arc(Arc::new(Point::new(0.0, 0.0), 2.0, PI, 0.0).unwrap());
        assert!(close(arc.point_at(0.0).unwrap(), Point::new(-2.0, 0.0)));
        assert!(close(arc.point_at(arc.length()).unwrap(), Point::new(2.0, 0.0)));
    }

    #[test]
    fn arc_rejects_bad_radius_and_empty_sweep() {
        assert!(matches!(
            Arc::new(Point::new(0.0, 0.0), 0.0, 0.0, PI),
            Err(SimError::NonPositiveRadius(_))
        ));
        assert!(matches!(
            Arc::new(Point::new(0.0, 0.0), -1.0, 0.0, PI),
            Err(SimError::NonPositiveRadius(_))
        ));
        assert!(matches!(
            Arc::new(Point::new(0.0, 0.0), 1.0, 1.0, 1.0),
            Err(SimError::DegenerateSegment)
        ));
    }

    #[test]
    fn line_tangent_is_unit_direction() {
        let line = Segment::Line(Line::new(Point::new(0.0, 0.0), Point::new(0.0, 8.0)).unwrap());
        let (dx, dy) = line.tangent_at(4.0).unwrap();
        assert!((dx - 0.0).abs() < 1e-12);
        assert!((dy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn arc_tangent_is_perpendicular_to_radius() {
        let arc = Arc::new(Point::new(0.0, 0.0), 5.0, 0.0, FRAC_PI_2).unwrap();
        let seg = Segment::Arc(arc);
        // At the arc start the point sits at (5, 0) and travel heads in -y.
        let (dx, dy) = seg.tangent_at(0.0).unwrap();
        assert!((dx - 0.0).abs() < 1e-12);
        assert!((dy + 1.0).abs() < 1e-12);
    }

    #[test]
    fn tangent_cone_extends_along_travel() {
        let line = Segment::Line(Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap());
        let cone = line.tangent_cone_at(2.0, FRAC_PI_2, 6.0).unwrap();
        assert!(cone.contains(Point::new(5.0, 0.0)));
        assert!(!cone.contains(Point::new(9.0, 0.0)), "beyond view distance");
        assert!(!cone.contains(Point::new(0.0, 0.0)), "behind the apex");
    }
}
