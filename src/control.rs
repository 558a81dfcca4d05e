//! Car-following speed adjustment and the time-compression contract.

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::error::SimError;

/// Standard gravity, m/s^2.
pub const GRAVITY: f64 = 9.81;

/// Hardest allowed braking, as a fraction of g.
const MAX_DECEL_G: f64 = 0.9;

/// Comfortable cruise acceleration toward base speed, as a fraction of g.
const CRUISE_ACCEL_G: f64 = 0.2;

/// Tick lengths per supported compression factor, milliseconds. Physical
/// rate constants scale with the factor so outcomes stay comparable across
/// settings; this table is part of the external contract.
const TICK_TABLE_MS: [u64; 6] = [20, 40, 60, 80, 120, 160];

/// Time-compression factor: selects the tick length and scales the physical
/// rate constants used by the controller and spawners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeScale {
    factor: u8,
}

impl TimeScale {
    pub const REAL_TIME: TimeScale = TimeScale { factor: 1 };

    pub fn new(factor: u8) -> Result<Self, SimError> {
        if !(1..=TICK_TABLE_MS.len() as u8).contains(&factor) {
            return Err(SimError::UnsupportedTimeScale(factor));
        }
        Ok(Self { factor })
    }

    pub fn factor(&self) -> f64 {
        f64::from(self.factor)
    }

    pub fn tick_seconds(&self) -> f64 {
        TICK_TABLE_MS[usize::from(self.factor) - 1] as f64 / 1_000.0
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::REAL_TIME
    }
}

/// Which speed-adjustment rule the controller applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowModel {
    /// Physically motivated bounded-acceleration braking. Canonical.
    #[default]
    BoundedAcceleration,
    /// The superseded ad-hoc heuristic: fixed multiplicative speed nudges.
    Multiplicative,
}

/// Per-tick car-following pass over the active agent set. O(n^2) in the
/// number of agents; runs to completion within one tick.
#[derive(Debug, Clone, Copy)]
pub struct SpeedController {
    time_scale: TimeScale,
    model: FollowModel,
}

impl SpeedController {
    pub fn new(time_scale: TimeScale, model: FollowModel) -> Self {
        Self { time_scale, model }
    }

    /// Compute every agent's next speed from the current state, then apply.
    /// The two-pass shape keeps the pass order-independent within a tick.
    pub fn adjust(&self, agents: &mut [Agent], dt: f64) {
        let next: Vec<f64> = agents
            .iter()
            .map(|agent| self.next_speed(agent, agents, dt))
            .collect();
        for (agent, speed) in agents.iter_mut().zip(next) {
            agent.set_speed(speed);
        }
    }

    fn next_speed(&self, agent: &Agent, agents: &[Agent], dt: f64) -> f64 {
        if agent.has_exited() {
            return agent.speed();
        }
        let visible: Vec<&Agent> = agents
            .iter()
            .filter(|other| !std::ptr::eq(agent, *other) && agent.can_see(other))
            .collect();
        match self.model {
            FollowModel::BoundedAcceleration => self.bounded(agent, &visible, dt),
            FollowModel::Multiplicative => self.multiplicative(agent, &visible, dt),
        }
    }

    fn bounded(&self, agent: &Agent, visible: &[&Agent], dt: f64) -> f64 {
        let k = self.time_scale.factor();
        if visible.is_empty() {
            // Unimpeded: ease toward base speed, never past it.
            return agent
                .base_speed()
                .min(agent.speed() + CRUISE_ACCEL_G * GRAVITY * k * k * dt);
        }
        let mut speed = agent.speed();
        for leader in visible {
            let (Some(rel), Some(distance)) = (
                agent.relative_speed_to(leader, dt),
                agent.distance_to(leader),
            ) else {
                continue;
            };
            if rel >= 0.0 || distance <= 0.0 {
                // Opening or coincident: hold speed, no upward correction
                // while impeded.
                continue;
            }
            let max_decel = -MAX_DECEL_G * GRAVITY;
            let acc = (0.8 * GRAVITY / distance * (rel / k)).clamp(max_decel, -max_decel) * k * k;
            speed = (speed + acc * dt).max(0.0);
        }
        speed
    }

    fn multiplicative(&self, agent: &Agent, visible: &[&Agent], dt: f64) -> f64 {
        if visible.is_empty() {
            return agent.base_speed().min(agent.speed() * 1.05);
        }
        let mut speed = agent.speed();
        for leader in visible {
            match agent.relative_speed_to(leader, dt) {
                Some(rel) if rel < 0.0 => speed *= 0.8,
                Some(rel) if rel > 0.0 => speed *= 1.05,
                _ => {}
            }
        }
        speed.max(0.0)
    }
}
