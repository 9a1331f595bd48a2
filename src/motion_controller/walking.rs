use crate::error::{LocomotionError, LocomotionResult};
use crate::motion_controller::body_motion::BodyMotion;
use crate::motion_controller::gait::LegPhase;
use nalgebra::{Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

const MIN_RADIAL_DISTANCE: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySettings {
    /// Apex of the swing arc above the ground track
    pub step_height: f32,
    /// Stride length as a fraction of the distance the body covers while a foot is planted
    pub stride_factor: f32,
    /// Forward stride used when legs animate without a dominant motion
    pub idle_stride: f32,
    /// Rate of the exponential lag toward default stance while idle, 1/s
    pub relax_rate: f32,
}

impl Default for TrajectorySettings {
    fn default() -> Self {
        Self {
            step_height: 0.03,
            stride_factor: 1.0,
            idle_stride: 0.005,
            relax_rate: 8.0,
        }
    }
}

impl TrajectorySettings {
    pub fn validate(&self) -> LocomotionResult<()> {
        let settings = [
            ("step_height", self.step_height),
            ("stride_factor", self.stride_factor),
            ("idle_stride", self.idle_stride),
            ("relax_rate", self.relax_rate),
        ];
        for (name, value) in settings {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(LocomotionError::InvalidSetting { name, value });
            }
        }
        Ok(())
    }
}

pub fn ease_in_out_quad(progress: f32) -> f32 {
    if progress < 0.5 {
        2.0 * progress * progress
    } else {
        1.0 - (-2.0 * progress + 2.0).powi(2) / 2.0
    }
}

/// Height of the swing arc, zero at both ends and `step_height` half way
pub fn swing_lift(step_height: f32, progress: f32) -> f32 {
    if progress <= 0.0 || progress >= 1.0 {
        return 0.0;
    }
    (progress * PI).sin() * step_height
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootUpdate {
    /// Next foot target in body frame
    pub target: Point3<f32>,
    /// Swing arc height included in `target`
    pub lift: f32,
}

pub struct FootTrajectoryGenerator {
    settings: TrajectorySettings,
}

impl FootTrajectoryGenerator {
    pub fn new(settings: TrajectorySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TrajectorySettings {
        &self.settings
    }

    pub fn next_target(
        &self,
        current: &Point3<f32>,
        default_foot: &Point3<f32>,
        phase: LegPhase,
        motion: &BodyMotion,
        stance_duration: f32,
        dt: f32,
    ) -> FootUpdate {
        if !motion.moving {
            return FootUpdate {
                target: self.relax_target(current, default_foot, dt),
                lift: 0.0,
            };
        }
        match phase {
            LegPhase::Stance => FootUpdate {
                target: self.stance_target(current, motion),
                lift: 0.0,
            },
            LegPhase::Swing { progress } => {
                let stride = self.stride(motion, default_foot, stance_duration);
                let (target, lift) = self.swing_target(default_foot, &stride, progress);
                FootUpdate { target, lift }
            }
        }
    }

    /// Displacement a foot covers over one stance of `stance_duration` seconds, in body frame
    pub fn stride(
        &self,
        motion: &BodyMotion,
        default_foot: &Point3<f32>,
        stance_duration: f32,
    ) -> Vector3<f32> {
        let scale = stance_duration * self.settings.stride_factor;
        if motion.turning_in_place {
            let radial = Vector3::new(default_foot.x, default_foot.y, 0.0);
            let distance = radial.norm();
            if distance > MIN_RADIAL_DISTANCE {
                let tangent = Vector3::z().cross(&(radial / distance));
                return tangent * motion.turn_rate * distance * scale;
            }
        } else if motion.moving {
            return Vector3::x() * motion.speed * scale;
        }
        Vector3::x() * self.settings.idle_stride
    }

    /// Keep a planted foot still in world while the body moves over it.
    ///
    /// `body_delta` is expressed in the body frame before the heading change,
    /// so the foot is shifted first and then turned into the new heading.
    pub fn stance_target(&self, current: &Point3<f32>, motion: &BodyMotion) -> Point3<f32> {
        let turn = Rotation3::from_axis_angle(&Vector3::z_axis(), -motion.rotation_delta);
        turn * (current - motion.body_delta)
    }

    /// Foot position on the swing arc from lift-off to touch-down at `default_foot`
    pub fn swing_target(
        &self,
        default_foot: &Point3<f32>,
        stride: &Vector3<f32>,
        progress: f32,
    ) -> (Point3<f32>, f32) {
        let lift_off = default_foot - stride;
        let eased = ease_in_out_quad(progress.clamp(0.0, 1.0));
        let ground = lift_off.coords.lerp(&default_foot.coords, eased);
        let lift = swing_lift(self.settings.step_height, progress);
        (Point3::from(ground + Vector3::z() * lift), lift)
    }

    /// First order lag toward the default stance
    pub fn relax_target(
        &self,
        current: &Point3<f32>,
        default_foot: &Point3<f32>,
        dt: f32,
    ) -> Point3<f32> {
        let blend = 1.0 - (-self.settings.relax_rate * dt.max(0.0)).exp();
        current + (default_foot - current) * blend
    }
}
