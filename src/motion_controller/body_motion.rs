use crate::error::{LocomotionError, LocomotionResult};
use crate::ik_controller::leg_positions::MoveTowards;
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionLimits {
    /// m/s at full forward command
    pub max_speed: f32,
    /// rad/s at full turn command
    pub max_turn_rate: f32,
    /// m/s² while speed magnitude grows
    pub acceleration: f32,
    /// m/s² while speed magnitude shrinks
    pub deceleration: f32,
    /// rad/s²
    pub turn_acceleration: f32,
    pub speed_epsilon: f32,
    pub turn_epsilon: f32,
}

impl Default for MotionLimits {
    fn default() -> Self {
        Self {
            max_speed: 0.1,
            max_turn_rate: 0.8,
            acceleration: 0.2,
            deceleration: 0.4,
            turn_acceleration: 2.0,
            speed_epsilon: 0.001,
            turn_epsilon: 0.01,
        }
    }
}

impl MotionLimits {
    pub fn validate(&self) -> LocomotionResult<()> {
        let settings = [
            ("max_speed", self.max_speed),
            ("max_turn_rate", self.max_turn_rate),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("turn_acceleration", self.turn_acceleration),
            ("speed_epsilon", self.speed_epsilon),
            ("turn_epsilon", self.turn_epsilon),
        ];
        for (name, value) in settings {
            if !(value > 0.0 && value.is_finite()) {
                return Err(LocomotionError::InvalidSetting { name, value });
            }
        }
        Ok(())
    }
}

/// World pose and velocity state of the body
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyPose {
    pub position: Point3<f32>,
    /// Yaw about world z, in (-π, π]
    pub heading: f32,
    pub speed: f32,
    pub turn_rate: f32,
    pub target_speed: f32,
    pub target_turn_rate: f32,
}

impl BodyPose {
    pub fn at(position: Point3<f32>) -> Self {
        Self {
            position,
            heading: 0.0,
            speed: 0.0,
            turn_rate: 0.0,
            target_speed: 0.0,
            target_turn_rate: 0.0,
        }
    }

    pub fn isometry(&self) -> Isometry3<f32> {
        Isometry3::from_parts(
            Translation3::from(self.position.coords),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.heading),
        )
    }

    /// Body forward axis in world frame
    pub fn forward(&self) -> Vector3<f32> {
        let (sin, cos) = self.heading.sin_cos();
        Vector3::new(cos, sin, 0.0)
    }

    pub fn body_to_world(&self, point: &Point3<f32>) -> Point3<f32> {
        self.isometry().transform_point(point)
    }

    pub fn world_to_body(&self, point: &Point3<f32>) -> Point3<f32> {
        self.isometry().inverse_transform_point(point)
    }
}

/// What the body did during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMotion {
    /// Translation in world frame
    pub position_delta: Vector3<f32>,
    /// Same translation expressed in the body frame at the start of the tick
    pub body_delta: Vector3<f32>,
    pub rotation_delta: f32,
    pub speed: f32,
    pub turn_rate: f32,
    /// Legs animate while set, otherwise they relax to the default stance
    pub moving: bool,
    /// Linear speed is negligible but the body is turning
    pub turning_in_place: bool,
}

impl BodyMotion {
    pub fn idle() -> Self {
        Self {
            position_delta: Vector3::zeros(),
            body_delta: Vector3::zeros(),
            rotation_delta: 0.0,
            speed: 0.0,
            turn_rate: 0.0,
            moving: false,
            turning_in_place: false,
        }
    }
}

fn sanitize_command(command: f32) -> f32 {
    if command.is_nan() {
        0.0
    } else {
        command.clamp(-1.0, 1.0)
    }
}

fn is_speeding_up(current: f32, target: f32) -> bool {
    target.abs() > current.abs() && current * target >= 0.0
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}

/// Turns forward and turn commands into rate limited body motion
pub struct BodyMotionIntegrator {
    limits: MotionLimits,
    pose: BodyPose,
}

impl BodyMotionIntegrator {
    pub fn new(limits: MotionLimits, pose: BodyPose) -> Self {
        Self { limits, pose }
    }

    pub fn pose(&self) -> &BodyPose {
        &self.pose
    }

    pub fn limits(&self) -> &MotionLimits {
        &self.limits
    }

    pub fn integrate(&mut self, forward_command: f32, turn_command: f32, dt: f32) -> BodyMotion {
        let pose = &mut self.pose;
        pose.target_speed = sanitize_command(forward_command) * self.limits.max_speed;
        pose.target_turn_rate = sanitize_command(turn_command) * self.limits.max_turn_rate;

        let rate = if is_speeding_up(pose.speed, pose.target_speed) {
            self.limits.acceleration
        } else {
            self.limits.deceleration
        };
        let (speed, _) = pose.speed.move_towards(&pose.target_speed, &(rate * dt));
        pose.speed = speed;
        let (turn_rate, _) = pose
            .turn_rate
            .move_towards(&pose.target_turn_rate, &(self.limits.turn_acceleration * dt));
        pose.turn_rate = turn_rate;

        let distance = pose.speed * dt;
        let position_delta = pose.forward() * distance;
        let rotation_delta = pose.turn_rate * dt;
        pose.position += position_delta;
        pose.heading = wrap_angle(pose.heading + rotation_delta);

        let linear = pose.speed.abs() > self.limits.speed_epsilon;
        let turning = pose.turn_rate.abs() > self.limits.turn_epsilon;
        BodyMotion {
            position_delta,
            body_delta: Vector3::x() * distance,
            rotation_delta,
            speed: pose.speed,
            turn_rate: pose.turn_rate,
            moving: linear || turning,
            turning_in_place: turning && !linear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn integrator() -> BodyMotionIntegrator {
        BodyMotionIntegrator::new(MotionLimits::default(), BodyPose::at(Point3::origin()))
    }

    #[test]
    fn speed_ramps_with_acceleration() {
        let mut integrator = integrator();
        let motion = integrator.integrate(1.0, 0.0, 0.1);
        assert_relative_eq!(motion.speed, 0.02);
        assert_relative_eq!(integrator.pose().target_speed, 0.1);
    }

    #[test]
    fn speed_drops_with_deceleration() {
        let mut integrator = integrator();
        for _ in 0..100 {
            integrator.integrate(1.0, 0.0, 0.1);
        }
        assert_relative_eq!(integrator.pose().speed, 0.1);
        let motion = integrator.integrate(0.0, 0.0, 0.1);
        assert_relative_eq!(motion.speed, 0.06, epsilon = 1e-6);
    }

    #[test]
    fn speed_does_not_overshoot_target() {
        let mut integrator = integrator();
        for _ in 0..20 {
            let motion = integrator.integrate(0.5, 0.0, 0.5);
            assert!(motion.speed <= 0.05 + f32::EPSILON);
        }
        assert_relative_eq!(integrator.pose().speed, 0.05);
    }

    #[test]
    fn turn_rate_is_rate_limited() {
        let mut integrator = integrator();
        let motion = integrator.integrate(0.0, -1.0, 0.1);
        assert_relative_eq!(motion.turn_rate, -0.2);
        assert_relative_eq!(motion.rotation_delta, -0.02);
        assert!(motion.turning_in_place);
        assert!(motion.moving);
    }

    #[test]
    fn position_follows_heading() {
        let mut pose = BodyPose::at(Point3::origin());
        pose.heading = FRAC_PI_2;
        pose.speed = 0.1;
        let mut integrator = BodyMotionIntegrator::new(MotionLimits::default(), pose);
        let motion = integrator.integrate(1.0, 0.0, 0.5);
        assert_relative_eq!(motion.position_delta, Vector3::new(0.0, 0.05, 0.0), epsilon = 1e-6);
        assert_relative_eq!(motion.body_delta, Vector3::new(0.05, 0.0, 0.0), epsilon = 1e-6);
        let position = integrator.pose().position;
        assert_relative_eq!(position, Point3::new(0.0, 0.05, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn idle_commands_do_not_move() {
        let mut integrator = integrator();
        let motion = integrator.integrate(0.0, 0.0, 0.1);
        assert!(!motion.moving);
        assert_eq!(motion.position_delta, Vector3::zeros());
    }

    #[test]
    fn commands_are_clamped() {
        let mut integrator = integrator();
        integrator.integrate(5.0, f32::NAN, 0.1);
        assert_relative_eq!(integrator.pose().target_speed, 0.1);
        assert_relative_eq!(integrator.pose().target_turn_rate, 0.0);
    }

    #[test]
    fn heading_wraps() {
        assert_relative_eq!(wrap_angle(3.0 * PI / 2.0), -FRAC_PI_2, epsilon = 1e-6);
        assert_relative_eq!(wrap_angle(-PI), PI);
    }

    #[test]
    fn world_body_conversion() {
        let mut pose = BodyPose::at(Point3::new(1.0, 2.0, 0.1));
        pose.heading = FRAC_PI_2;
        let world = pose.body_to_world(&Point3::new(0.2, 0.0, -0.1));
        assert_relative_eq!(world, Point3::new(1.0, 2.2, 0.0), epsilon = 1e-6);
        let body = pose.world_to_body(&world);
        assert_relative_eq!(body, Point3::new(0.2, 0.0, -0.1), epsilon = 1e-6);
    }

    #[test]
    fn rejects_non_positive_limits() {
        let limits = MotionLimits {
            deceleration: 0.0,
            ..MotionLimits::default()
        };
        assert!(matches!(
            limits.validate(),
            Err(LocomotionError::InvalidSetting {
                name: "deceleration",
                ..
            })
        ));
    }
}
