use thiserror::Error;

/// Validation failures reported at construction time, plus the out-of-range
/// segment query. Running past the end of a trajectory is *not* an error;
/// that case is `None` throughout the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("segment has zero length")]
    DegenerateSegment,

    #[error("arc radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    #[error("trajectory needs at least one segment")]
    EmptyTrajectory,

    #[error("segment joint {index} is discontinuous: gap of {gap:.4} m")]
    Discontinuity { index: usize, gap: f64 },

    #[error("arc-length {position:.4} outside [0, {length:.4}]")]
    OutOfRange { position: f64, length: f64 },

    #[error("agent radius must be positive, got {0}")]
    NonPositiveAgentRadius(f64),

    #[error("spawner period must be positive, got {0}")]
    NonPositivePeriod(f64),

    #[error("spawn speed std-dev must be finite and non-negative, got {0}")]
    InvalidSpeedSpread(f64),

    #[error("scenario references unknown trajectory '{0}'")]
    UnknownTrajectory(String),

    #[error("unsupported time-scale factor {0} (supported: 1..=6)")]
    UnsupportedTimeScale(u8),
}
