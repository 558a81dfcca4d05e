pub mod agent;
pub mod control;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod scenario;
pub mod spawner;
pub mod stats;

pub use agent::Agent;
pub use control::{FollowModel, SpeedController, TimeScale};
pub use engine::{Simulation, StepSummary, World};
pub use error::SimError;
pub use geometry::{Arc, Color, Line, Point, Segment, Trajectory, VisibilityCone};
pub use scenario::Scenario;
pub use spawner::Spawner;
pub use stats::CollisionStats;
