//! Per-tick simulation orchestration: spawn, advance, adjust, prune.

use tracing::{debug, trace};

use crate::agent::Agent;
use crate::control::{FollowModel, SpeedController, TimeScale};
use crate::spawner::Spawner;
use crate::stats::CollisionStats;

/// Passive world extent in meters. Consumed only by rendering
/// collaborators mapping meters to pixels; the core never does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct World {
    pub width: f64,
    pub height: f64,
}

impl World {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// What one `step` call did, for drivers that report progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepSummary {
    pub tick: u64,
    pub spawned: usize,
    pub suppressed: usize,
    pub exited: usize,
    pub collisions: usize,
    pub active: usize,
}

/// The simulation core. Owns the active agent set, the spawners and the
/// collision statistics; a driver calls [`Simulation::step`] once per tick.
/// `step` is synchronous and non-reentrant; there is no internal threading.
pub struct Simulation {
    world: World,
    agents: Vec<Agent>,
    spawners: Vec<Spawner>,
    controller: SpeedController,
    time_scale: TimeScale,
    scale_spawn_speeds: bool,
    stats: CollisionStats,
    elapsed: f64,
    tick: u64,
}

impl Simulation {
    pub fn new(
        world: World,
        spawners: Vec<Spawner>,
        time_scale: TimeScale,
        model: FollowModel,
    ) -> Self {
        Self {
            world,
            agents: Vec::new(),
            spawners,
            controller: SpeedController::new(time_scale, model),
            time_scale,
            scale_spawn_speeds: true,
            stats: CollisionStats::new(),
            elapsed: 0.0,
            tick: 0,
        }
    }

    /// Disable (or re-enable) multiplying spawn speeds by the
    /// time-compression factor.
    pub fn with_spawn_speed_scaling(mut self, enabled: bool) -> Self {
        self.scale_spawn_speeds = enabled;
        self
    }

    pub fn world(&self) -> World {
        self.world
    }

    pub fn time_scale(&self) -> TimeScale {
        self.time_scale
    }

    /// Tick length implied by the configured time-compression factor.
    pub fn tick_seconds(&self) -> f64 {
        self.time_scale.tick_seconds()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Read-only view of the active agent set, polled by renderers after
    /// each step.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn stats(&self) -> &CollisionStats {
        &self.stats
    }

    /// Seed an agent directly, subject to the same overlap suppression as
    /// spawned ones. Returns whether it was admitted.
    pub fn admit(&mut self, agent: Agent) -> bool {
        if Self::overlaps_existing(&agent, &self.agents) {
            return false;
        }
        self.agents.push(agent);
        true
    }

    /// One full tick: spawn, advance, adjust speeds, prune exited agents,
    /// then resolve collisions into the statistics. The phase order is
    /// fixed.
    pub fn step(&mut self, dt: f64) -> StepSummary {
        self.tick += 1;
        self.elapsed += dt;
        let mut summary = StepSummary {
            tick: self.tick,
            ..StepSummary::default()
        };

        // 1. spawn, suppressing candidates that would start on top of (or
        //    in sight of) an agent still near the trajectory start
        let speed_scale = if self.scale_spawn_speeds {
            self.time_scale.factor()
        } else {
            1.0
        };
        for spawner in &mut self.spawners {
            let Some(candidate) = spawner.spawn(dt, speed_scale) else {
                continue;
            };
            if Self::overlaps_existing(&candidate, &self.agents) {
                debug!(tag = candidate.tag(), "spawn suppressed by overlap");
                summary.suppressed += 1;
                continue;
            }
            trace!(
                tag = candidate.tag(),
                speed = candidate.speed(),
                "agent spawned"
            );
            self.agents.push(candidate);
            summary.spawned += 1;
        }

        // 2. advance
        for agent in &mut self.agents {
            agent.advance(dt);
        }

        // 3. car-following pass
        self.controller.adjust(&mut self.agents, dt);

        // 4. prune exited
        let before = self.agents.len();
        self.agents.retain(|agent| !agent.has_exited());
        summary.exited = before - self.agents.len();

        // 5. prune collided; each member of a pair detects the same event
        //    independently, worth half a credit each
        let removed = self.resolve_collisions();
        summary.collisions = removed / 2;
        summary.active = self.agents.len();
        if summary.collisions > 0 {
            debug!(
                collisions = summary.collisions,
                active = summary.active,
                "collisions resolved"
            );
        }
        summary
    }

    /// Returns the number of agents removed.
    fn resolve_collisions(&mut self) -> usize {
        let mut doomed = vec![false; self.agents.len()];
        for i in 0..self.agents.len() {
            let partner = (0..self.agents.len())
                .find(|&j| j != i && self.agents[i].intersects(&self.agents[j]));
            if let Some(j) = partner {
                doomed[i] = true;
                self.stats
                    .record(self.agents[i].tag(), self.agents[j].tag());
            }
        }
        let removed = doomed.iter().filter(|&&d| d).count();
        let mut keep = doomed.iter().copied();
        self.agents.retain(|_| !keep.next().unwrap_or(false));
        removed
    }

    fn overlaps_existing(candidate: &Agent, agents: &[Agent]) -> bool {
        agents
            .iter()
            .any(|other| candidate.can_see(other) || candidate.intersects(other))
    }
}
