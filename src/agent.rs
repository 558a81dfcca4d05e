//! A moving point-with-radius bound to a shared trajectory, with the
//! perception predicates the car-following controller builds on.

use std::f64::consts::FRAC_PI_4;
use std::sync::Arc;

use crate::geometry::{Color, Point, Trajectory, VisibilityCone};
use crate::error::SimError;

/// Full opening angle of the perception cone, radians.
pub const CONE_APERTURE: f64 = FRAC_PI_4;

/// View distance of the perception cone, in agent radii.
pub const VIEW_RANGE_RADII: f64 = 6.0;

#[derive(Debug, Clone)]
pub struct Agent {
    radius: f64,
    trajectory: Arc<Trajectory>,
    position: f64,
    speed: f64,
    base_speed: f64,
    tag: String,
    color: Color,
    center: Option<Point>,
}

impl Agent {
    /// New agent at the trajectory start. `base_speed` is both the initial
    /// and the target cruise speed.
    pub fn new(
        radius: f64,
        trajectory: Arc<Trajectory>,
        base_speed: f64,
        tag: impl Into<String>,
        color: Color,
    ) -> Result<Self, SimError> {
        if !(radius > 0.0) {
            return Err(SimError::NonPositiveAgentRadius(radius));
        }
        let center = trajectory.point_at(0.0);
        Ok(Self {
            radius,
            trajectory,
            position: 0.0,
            speed: base_speed.max(0.0),
            base_speed: base_speed.max(0.0),
            tag: tag.into(),
            color,
            center,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn base_speed(&self) -> f64 {
        self.base_speed
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Current point on the plane; `None` once the agent has run off the
    /// end of its trajectory.
    pub fn center(&self) -> Option<Point> {
        self.center
    }

    pub fn has_exited(&self) -> bool {
        self.center.is_none()
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.max(0.0);
    }

    /// Integrate one tick of motion and refresh the cached center.
    pub fn advance(&mut self, dt: f64) {
        self.position += self.speed * dt;
        self.center = self.trajectory.point_at(self.position);
    }

    /// Perception cone along the local tangent, reaching
    /// [`VIEW_RANGE_RADII`] of this agent's radii ahead. `None` once exited.
    pub fn cone(&self) -> Option<VisibilityCone> {
        self.trajectory
            .tangent_cone_at(self.position, CONE_APERTURE, VIEW_RANGE_RADII * self.radius)
    }

    pub fn distance_to(&self, other: &Agent) -> Option<f64> {
        Some(self.center?.distance_to(other.center?))
    }

    /// Collision predicate: centers closer than the sum of radii. Exited
    /// agents collide with nothing.
    pub fn intersects(&self, other: &Agent) -> bool {
        match self.distance_to(other) {
            Some(distance) => distance < self.radius + other.radius,
            None => false,
        }
    }

    /// Whether `other` falls inside this agent's perception cone. Kept
    /// independent of [`Agent::intersects`]; call sites compose the two
    /// where overlap should also count as "seen".
    pub fn can_see(&self, other: &Agent) -> bool {
        match (self.cone(), other.center) {
            (Some(cone), Some(center)) => cone.contains(center),
            _ => false,
        }
    }

    /// Closing (< 0) or opening (> 0) rate along the line of sight over one
    /// tick, both agents extrapolated at current speed. `None` if either
    /// agent has exited now or would exit within the tick.
    pub fn relative_speed_to(&self, other: &Agent, dt: f64) -> Option<f64> {
        let now = self.distance_to(other)?;
        let ahead_self = self.trajectory.point_at(self.position + self.speed * dt)?;
        let ahead_other = other
            .trajectory
            .point_at(other.position + other.speed * dt)?;
        Some((ahead_self.distance_to(ahead_other) - now) / dt)
    }
}
