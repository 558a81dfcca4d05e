use super::{Point, Segment, VisibilityCone};
use crate::error::SimError;

/// Default tolerance, in meters, for the end-to-start joint between
/// consecutive segments.
pub const DEFAULT_CONTINUITY_TOLERANCE: f64 = 1e-3;

/// An ordered, immutable composition of segments addressed by a single
/// arc-length coordinate in `[0, length]`. Queries past the end return
/// `None`; that is the canonical "agent has exited" signal, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    segments: Vec<Segment>,
    length: f64,
}

impl Trajectory {
    pub fn new(segments: Vec<Segment>) -> Result<Self, SimError> {
        Self::with_tolerance(segments, DEFAULT_CONTINUITY_TOLERANCE)
    }

    /// Build a trajectory, accepting joints that gap by at most `tolerance`
    /// meters. Rejects empty segment lists and discontinuous sequences.
    pub fn with_tolerance(segments: Vec<Segment>, tolerance: f64) -> Result<Self, SimError> {
        if segments.is_empty() {
            return Err(SimError::EmptyTrajectory);
        }
        for (index, pair) in segments.windows(2).enumerate() {
            let gap = pair[0].end().distance_to(pair[1].start());
            if gap > tolerance {
                return Err(SimError::Discontinuity { index, gap });
            }
        }
        let length = segments.iter().map(Segment::length).sum();
        Ok(Self { segments, length })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Segment list for static path drawing by a rendering collaborator.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Point at global arc-length `s`, or `None` outside `[0, length]`.
    pub fn point_at(&self, s: f64) -> Option<Point> {
        let (segment, local) = self.locate(s)?;
        segment.point_at(local).ok()
    }

    /// Visibility cone at global arc-length `s`, or `None` past the end.
    pub fn tangent_cone_at(
        &self,
        s: f64,
        aperture: f64,
        view_distance: f64,
    ) -> Option<VisibilityCone> {
        let (segment, local) = self.locate(s)?;
        segment.tangent_cone_at(local, aperture, view_distance).ok()
    }

    /// Linear scan for the segment containing `s`, yielding it with the
    /// local offset. The closing endpoint belongs to the last segment.
    fn locate(&self, s: f64) -> Option<(&Segment, f64)> {
        if !(0.0..=self.length).contains(&s) {
            return None;
        }
        let mut covered = 0.0;
        for segment in &self.segments {
            let len = segment.length();
            if s < covered + len {
                return Some((segment, s - covered));
            }
            covered += len;
        }
        // s == self.length, modulo accumulated rounding
        let last = self.segments.last()?;
        Some((last, last.length().min(s - (covered - last.length()))))
    }
}
