use crate::error::{LocomotionError, LocomotionResult};
use crate::ik_controller::leg_positions::LegPositions;
use crate::leg::{JointLimits, LegFlags, LegSide};
use lazy_static::lazy_static;
use nalgebra::{Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Margin kept from the singular ends of the reach envelope
pub const REACH_EPSILON: f32 = 1e-4;

lazy_static! {
    static ref HEXAPOD: BodyConfig = toml::from_str(include_str!("../config/hexapod.toml"))
        .expect("bundled hexapod body config is valid");
    static ref QUADRUPED: BodyConfig = toml::from_str(include_str!("../config/quadruped.toml"))
        .expect("bundled quadruped body config is valid");
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct LegGeometry {
    pub hip_length: f32,
    pub femur_length: f32,
    pub tibia_length: f32,
    pub limits: JointLimits,
    pub side: LegSide,
}

impl LegGeometry {
    /// Closest solvable distance between femur joint and foot
    pub fn min_reach(&self) -> f32 {
        (self.femur_length - self.tibia_length).abs() + REACH_EPSILON
    }

    /// Furthest solvable distance between femur joint and foot
    pub fn max_reach(&self) -> f32 {
        self.femur_length + self.tibia_length - REACH_EPSILON
    }

    fn validate(&self, leg: usize) -> LocomotionResult<()> {
        let segments = [
            ("hip", self.hip_length),
            ("femur", self.femur_length),
            ("tibia", self.tibia_length),
        ];
        for (segment, length) in segments {
            if !(length > 0.0 && length.is_finite()) {
                return Err(LocomotionError::InvalidSegmentLength {
                    leg,
                    segment,
                    length,
                });
            }
        }
        for (joint, range) in self.limits.named() {
            if range.is_inverted() {
                return Err(LocomotionError::InvertedJointLimits {
                    leg,
                    joint,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct LegConfig {
    pub name: String,
    /// Hip mount in body frame
    pub position: Point3<f32>,
    /// Yaw of the leg mount in body frame
    pub angle_offset: f32,
    /// Neutral foot position in body frame
    pub default_foot: Point3<f32>,
    pub geometry: LegGeometry,
}

impl LegConfig {
    fn mount_rotation(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::z_axis(), self.angle_offset)
    }

    /// Express a body frame point in the leg frame
    ///
    /// Leg frame has its origin in the hip mount and x axis pointing along the mount
    pub fn body_to_leg(&self, point: &Point3<f32>) -> Point3<f32> {
        Point3::from(self.mount_rotation().inverse() * (point - self.position))
    }

    pub fn leg_to_body(&self, point: &Point3<f32>) -> Point3<f32> {
        self.position + self.mount_rotation() * point.coords
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct BodyConfig {
    pub legs: Vec<LegConfig>,
}

impl BodyConfig {
    pub fn hexapod() -> BodyConfig {
        HEXAPOD.clone()
    }

    pub fn quadruped() -> BodyConfig {
        QUADRUPED.clone()
    }

    /// Load from toml, or yaml when the extension says so
    pub fn load(path: &Path) -> LocomotionResult<BodyConfig> {
        let text = fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|extension| extension.to_str()),
            Some("yaml") | Some("yml")
        );
        let deserialized_config: BodyConfig = if is_yaml {
            serde_yaml::from_str(&text)?
        } else {
            toml::from_str(&text)?
        };
        Ok(deserialized_config)
    }

    pub fn save_as_toml(&self, path: &Path) -> LocomotionResult<()> {
        fs::write(path, toml::to_string_pretty(&self)?)?;
        Ok(())
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    pub fn all_legs(&self) -> LegFlags {
        LegFlags::first_legs(self.legs.len())
    }

    pub fn default_stance(&self) -> LegPositions {
        self.legs.iter().map(|leg| leg.default_foot).collect()
    }

    /// Reject any body the controller can't drive
    pub fn validate(&self) -> LocomotionResult<()> {
        if !matches!(self.legs.len(), 4 | 6) {
            return Err(LocomotionError::UnsupportedLegCount(self.legs.len()));
        }
        for (index, leg) in self.legs.iter().enumerate() {
            leg.geometry.validate(index)?;
        }
        Ok(())
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self::hexapod()
    }
}
