//! Periodic agent generation with normally distributed spawn speeds.

use std::sync::Arc;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

use crate::agent::Agent;
use crate::error::SimError;
use crate::geometry::{Color, Trajectory};

/// Produces one agent at the trajectory start every `period` seconds of
/// simulated time. The first call spawns immediately; afterwards a spawn
/// fires whenever the elapsed-time accumulator crosses a period boundary.
/// At most one agent per call: tick lengths are assumed shorter than the
/// period, and extra boundary crossings within one tick are absorbed.
#[derive(Debug, Clone)]
pub struct Spawner {
    period: f64,
    elapsed: f64,
    trajectory: Arc<Trajectory>,
    speeds: Normal<f64>,
    radius: f64,
    tag: String,
    color: Color,
    rng: ChaCha8Rng,
}

impl Spawner {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        period: f64,
        trajectory: Arc<Trajectory>,
        speed_mean: f64,
        speed_std: f64,
        radius: f64,
        tag: impl Into<String>,
        color: Color,
        rng: ChaCha8Rng,
    ) -> Result<Self, SimError> {
        if !(period > 0.0) {
            return Err(SimError::NonPositivePeriod(period));
        }
        if !(radius > 0.0) {
            return Err(SimError::NonPositiveAgentRadius(radius));
        }
        let speeds =
            Normal::new(speed_mean, speed_std).map_err(|_| SimError::InvalidSpeedSpread(speed_std))?;
        Ok(Self {
            period,
            elapsed: 0.0,
            trajectory,
            speeds,
            radius,
            tag: tag.into(),
            color,
            rng,
        })
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Advance the accumulator by `dt` and return a fresh agent when a
    /// period boundary was crossed. `speed_scale` multiplies the drawn
    /// speed (the time-compression factor, or 1.0).
    pub fn spawn(&mut self, dt: f64, speed_scale: f64) -> Option<Agent> {
        let due = if self.elapsed == 0.0 {
            true
        } else {
            let before = self.elapsed % self.period;
            let after = (self.elapsed + dt) % self.period;
            after < before
        };
        self.elapsed += dt;
        if !due {
            return None;
        }
        let speed = self.rng.sample(self.speeds).max(0.0) * speed_scale;
        // construction is validated up front, so this cannot fail
        Agent::new(
            self.radius,
            Arc::clone(&self.trajectory),
            speed,
            self.tag.clone(),
            self.color,
        )
        .ok()
    }
}
