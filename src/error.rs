use crate::motion_controller::gait::GaitType;
use std::result::Result;
use thiserror::Error;

pub type LocomotionResult<T> = Result<T, LocomotionError>;

#[derive(Error, Debug)]
pub enum LocomotionError {
    #[error("Unsupported leg count {0}, expected 4 or 6")]
    UnsupportedLegCount(usize),
    #[error("Leg count mismatch: body has {body} legs but gait table was built for {table}")]
    LegCountMismatch { body: usize, table: usize },
    #[error("Leg {leg}: {segment} length must be positive, got {length}")]
    InvalidSegmentLength {
        leg: usize,
        segment: &'static str,
        length: f32,
    },
    #[error("Leg {leg}: {joint} limits are inverted ({min} > {max})")]
    InvertedJointLimits {
        leg: usize,
        joint: &'static str,
        min: f32,
        max: f32,
    },
    #[error("Invalid gait pattern {gait:?}: {reason}")]
    InvalidGaitPattern { gait: GaitType, reason: String },
    #[error("Gait {0:?} is not available for this body")]
    UnsupportedGait(GaitType),
    #[error("Invalid setting {name}: {value}")]
    InvalidSetting { name: &'static str, value: f32 },
    #[error("Invalid height map: {0}")]
    InvalidHeightMap(String),
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Toml deserialize error")]
    TomlDeError(#[from] toml::de::Error),
    #[error("Toml serialize error")]
    TomlError(#[from] toml::ser::Error),
    #[error("Yaml serde error")]
    YamlError(#[from] serde_yaml::Error),
}
