//! Scenario files: YAML descriptors for the world extent, trajectories and
//! spawners, resolved into a ready [`Simulation`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::control::{FollowModel, TimeScale};
use crate::engine::{Simulation, World};
use crate::error::SimError;
use crate::geometry::{self, Color, Point, Segment, Trajectory, DEFAULT_CONTINUITY_TOLERANCE};
use crate::spawner::Spawner;

fn default_seed() -> u64 {
    7
}

fn default_time_scale() -> u8 {
    1
}

fn default_ticks() -> u64 {
    600
}

fn default_color() -> Color {
    Color::BLACK
}

fn default_agent_color() -> Color {
    Color::RED
}

fn default_radius() -> f64 {
    1.0
}

fn default_speed_std() -> f64 {
    0.0
}

fn default_continuity_tolerance() -> f64 {
    DEFAULT_CONTINUITY_TOLERANCE
}

fn default_scale_spawn_speeds() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Time-compression factor, 1..=6.
    #[serde(default = "default_time_scale")]
    pub time_scale: u8,
    /// Default tick count for headless runs.
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    #[serde(default)]
    pub follow_model: FollowModel,
    /// Whether spawn speeds are multiplied by the time-scale factor.
    #[serde(default = "default_scale_spawn_speeds")]
    pub scale_spawn_speeds: bool,
    pub world: WorldSpec,
    pub trajectories: Vec<TrajectorySpec>,
    pub spawners: Vec<SpawnerSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSpec {
    pub width_m: f64,
    pub height_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectorySpec {
    pub name: String,
    #[serde(default = "default_color")]
    pub color: Color,
    #[serde(default = "default_continuity_tolerance")]
    pub continuity_tolerance_m: f64,
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub segments: Vec<SegmentSpec>,
}

/// One path piece. In YAML the variant is the single mapping key:
/// `- line: { from: [0.0, 69.18], to: [99.76, 69.18] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentSpec {
    Line {
        from: [f64; 2],
        to: [f64; 2],
    },
    Arc {
        center: [f64; 2],
        radius_m: f64,
        start_rad: f64,
        end_rad: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerSpec {
    /// Name of the trajectory the agents ride.
    pub trajectory: String,
    pub period_s: f64,
    pub speed_mean_mps: f64,
    #[serde(default = "default_speed_std")]
    pub speed_std_mps: f64,
    #[serde(default = "default_radius")]
    pub radius_m: f64,
    pub tag: String,
    #[serde(default = "default_agent_color")]
    pub color: Color,
}

impl Scenario {
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).context("failed to parse scenario YAML")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("failed to parse scenario file {}", path.display()))
    }

    /// Resolve the descriptors into a runnable simulation. All geometric
    /// and kinematic validation happens here, before the first tick.
    pub fn build(&self) -> Result<Simulation, SimError> {
        let time_scale = TimeScale::new(self.time_scale)?;
        let mut trajectories: HashMap<&str, Arc<Trajectory>> = HashMap::new();
        for spec in &self.trajectories {
            let segments = spec
                .segments
                .iter()
                .map(|segment| segment.build(spec.color))
                .collect::<Result<Vec<_>, _>>()?;
            let trajectory = Trajectory::with_tolerance(segments, spec.continuity_tolerance_m)?;
            trajectories.insert(spec.name.as_str(), Arc::new(trajectory));
        }

        let mut spawners = Vec::with_capacity(self.spawners.len());
        for (index, spec) in self.spawners.iter().enumerate() {
            let trajectory = trajectories
                .get(spec.trajectory.as_str())
                .ok_or_else(|| SimError::UnknownTrajectory(spec.trajectory.clone()))?;
            let rng = ChaCha8Rng::seed_from_u64(spawner_seed(self.seed, index));
            spawners.push(Spawner::new(
                spec.period_s,
                Arc::clone(trajectory),
                spec.speed_mean_mps,
                spec.speed_std_mps,
                spec.radius_m,
                spec.tag.clone(),
                spec.color,
                rng,
            )?);
        }

        let world = World::new(self.world.width_m, self.world.height_m);
        Ok(
            Simulation::new(world, spawners, time_scale, self.follow_model)
                .with_spawn_speed_scaling(self.scale_spawn_speeds),
        )
    }
}

impl SegmentSpec {
    fn build(&self, color: Color) -> Result<Segment, SimError> {
        match *self {
            SegmentSpec::Line { from, to } => Ok(Segment::Line(geometry::Line::with_color(
                Point::new(from[0], from[1]),
                Point::new(to[0], to[1]),
                color,
            )?)),
            SegmentSpec::Arc {
                center,
                radius_m,
                start_rad,
                end_rad,
            } => Ok(Segment::Arc(geometry::Arc::with_color(
                Point::new(center[0], center[1]),
                radius_m,
                start_rad,
                end_rad,
                color,
            )?)),
        }
    }
}

/// Per-spawner RNG stream derived from the scenario seed, so runs are
/// reproducible and spawners do not share a sequence.
fn spawner_seed(master: u64, index: usize) -> u64 {
    master
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
        ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROSSING: &str = r#"
name: crossing
seed: 11
time_scale: 1
world:
  width_m: 188.0
  height_m: 125.88
trajectories:
  - name: eastbound
    segments:
      - line: { from: [0.0, 69.18], to: [99.76, 69.18] }
  - name: southbound
    segments:
      - line: { from: [50.0, 0.0], to: [50.0, 125.88] }
spawners:
  - trajectory: eastbound
    period_s: 5.0
    speed_mean_mps: 15.0
    speed_std_mps: 2.0
    tag: car
  - trajectory: southbound
    period_s: 7.0
    speed_mean_mps: 5.0
    tag: bike
    color: [30, 160, 30]
"#;

    #[test]
    fn parses_and_builds() {
        let scenario = Scenario::from_yaml_str(CROSSING).unwrap();
        assert_eq!(scenario.name, "crossing");
        assert_eq!(scenario.spawners.len(), 2);
        assert_eq!(scenario.spawners[1].color, Color(30, 160, 30));
        let sim = scenario.build().unwrap();
        assert_eq!(sim.world().width, 188.0);
        assert_eq!(sim.tick_seconds(), 0.02);
    }

    #[test]
    fn defaults_fill_in() {
        let scenario = Scenario::from_yaml_str(CROSSING).unwrap();
        assert_eq!(scenario.seed, 11);
        assert_eq!(scenario.ticks, default_ticks());
        assert_eq!(scenario.follow_model, FollowModel::BoundedAcceleration);
        assert!(scenario.scale_spawn_speeds);
        assert_eq!(scenario.spawners[0].radius_m, 1.0);
    }

    #[test]
    fn unknown_trajectory_is_rejected() {
        let mut scenario = Scenario::from_yaml_str(CROSSING).unwrap();
        scenario.spawners[0].trajectory = "nowhere".into();
        assert!(matches!(
            scenario.build(),
            Err(SimError::UnknownTrajectory(name)) if name == "nowhere"
        ));
    }

    #[test]
    fn bad_time_scale_is_rejected() {
        let mut scenario = Scenario::from_yaml_str(CROSSING).unwrap();
        scenario.time_scale = 9;
        assert!(matches!(
            scenario.build(),
            Err(SimError::UnsupportedTimeScale(9))
        ));
    }

    #[test]
    fn arc_segments_round_trip() {
        let yaml = r#"
name: loop
world: { width_m: 50.0, height_m: 50.0 }
trajectories:
  - name: bend
    segments:
      - line: { from: [0.0, -10.0], to: [10.0, -10.0] }
      - arc: { center: [10.0, -5.0], radius_m: 5.0, start_rad: 1.5707963267948966, end_rad: 0.0 }
spawners:
  - trajectory: bend
    period_s: 5.0
    speed_mean_mps: 3.0
    tag: car
"#;
        let scenario = Scenario::from_yaml_str(yaml).unwrap();
        let sim = scenario.build().unwrap();
        assert!(sim.agents().is_empty());
        let round_trip = serde_yaml::to_string(&scenario).unwrap();
        let parsed = Scenario::from_yaml_str(&round_trip).unwrap();
        assert_eq!(parsed.trajectories[0].segments.len(), 2);
    }

    #[test]
    fn discontinuous_trajectory_fails_to_build() {
        let yaml = r#"
name: broken
world: { width_m: 50.0, height_m: 50.0 }
trajectories:
  - name: gap
    segments:
      - line: { from: [0.0, 0.0], to: [10.0, 0.0] }
      - line: { from: [11.0, 0.0], to: [20.0, 0.0] }
spawners: []
"#;
        let scenario = Scenario::from_yaml_str(yaml).unwrap();
        assert!(matches!(
            scenario.build(),
            Err(SimError::Discontinuity { index: 0, .. })
        ));
    }
}
