pub mod leg_positions;

use crate::body_config::{BodyConfig, LegConfig, LegGeometry, REACH_EPSILON};
use crate::leg::JointAngles;
use leg_positions::LegPositions;
use nalgebra::Point3;
use std::f32::consts::{FRAC_PI_2, PI};

const NEUTRAL_FEMUR_ANGLE: f32 = 0.0;
const NEUTRAL_TIBIA_ANGLE: f32 = FRAC_PI_2;

/// Solve joint angles for a foot target expressed in the leg frame.
///
/// Never fails. Targets outside the reach envelope are pulled onto it,
/// every angle is clamped to the configured limits and a target sitting on
/// the femur joint yields a fixed neutral pose.
pub fn solve_leg(target: &Point3<f32>, geometry: &LegGeometry) -> JointAngles {
    let limits = &geometry.limits;
    if !target.coords.iter().all(|value| value.is_finite()) {
        return neutral_pose(limits.hip_ref().clamp(0.0), geometry);
    }
    let side = geometry.side.mirror_sign();
    let hip_angle = limits.hip_ref().clamp((side * target.y).atan2(target.x));
    // rotate target into hip joint frame
    let (sin, cos) = (side * hip_angle).sin_cos();
    let horizontal = cos * target.x + sin * target.y - geometry.hip_length;
    let vertical = target.z;
    let distance = horizontal.hypot(vertical);
    if distance < REACH_EPSILON {
        return neutral_pose(hip_angle, geometry);
    }
    let distance = distance
        .max(geometry.min_reach())
        .min(geometry.max_reach());
    // use sss triangle solution to calculate angles
    // use law of cosinus to get angles in two corners
    let knee_angle = get_alpha_angle(&distance, &geometry.femur_length, &geometry.tibia_length);
    let angle_by_femur =
        get_alpha_angle(&geometry.tibia_length, &geometry.femur_length, &distance);
    let femur_angle = vertical.atan2(horizontal) + angle_by_femur;
    JointAngles::new(
        hip_angle,
        limits.femur_ref().clamp(femur_angle),
        limits.tibia_ref().clamp(knee_angle),
    )
}

fn neutral_pose(hip_angle: f32, geometry: &LegGeometry) -> JointAngles {
    JointAngles::new(
        hip_angle,
        geometry.limits.femur_ref().clamp(NEUTRAL_FEMUR_ANGLE),
        geometry.limits.tibia_ref().clamp(NEUTRAL_TIBIA_ANGLE),
    )
}

/// Foot position in the leg frame for the given joint angles
pub fn forward_kinematics(angles: &JointAngles, geometry: &LegGeometry) -> Point3<f32> {
    let yaw = geometry.side.mirror_sign() * angles.hip();
    let femur_angle = angles.femur();
    // tibia turns away from the femur by the knee's exterior angle
    let tibia_angle = femur_angle - (PI - angles.tibia());
    let reach = geometry.hip_length
        + geometry.femur_length * femur_angle.cos()
        + geometry.tibia_length * tibia_angle.cos();
    let height =
        geometry.femur_length * femur_angle.sin() + geometry.tibia_length * tibia_angle.sin();
    Point3::new(reach * yaw.cos(), reach * yaw.sin(), height)
}

/// Pull a leg frame target onto the reach envelope around the femur joint
pub fn clamp_to_reach(target: &Point3<f32>, geometry: &LegGeometry) -> Point3<f32> {
    let min_reach = geometry.min_reach();
    let max_reach = geometry.max_reach();
    if !target.coords.iter().all(|value| value.is_finite()) {
        return Point3::new(geometry.hip_length + min_reach, 0.0, 0.0);
    }
    let yaw = target.y.atan2(target.x);
    let (sin, cos) = yaw.sin_cos();
    let horizontal = target.x.hypot(target.y) - geometry.hip_length;
    let distance = horizontal.hypot(target.z);
    let (horizontal, vertical) = if distance < min_reach {
        // too close, push outward keeping the height
        ((min_reach.powi(2) - target.z.powi(2)).max(0.0).sqrt(), target.z)
    } else if distance > max_reach {
        let scale = max_reach / distance;
        (horizontal * scale, target.z * scale)
    } else {
        return *target;
    };
    let along = geometry.hip_length + horizontal;
    Point3::new(along * cos, along * sin, vertical)
}

pub fn calculate_ik_for_leg(target: &Point3<f32>, leg_config: &LegConfig) -> JointAngles {
    solve_leg(&leg_config.body_to_leg(target), &leg_config.geometry)
}

pub fn calculate_fk_for_leg(angles: &JointAngles, leg_config: &LegConfig) -> Point3<f32> {
    leg_config.leg_to_body(&forward_kinematics(angles, &leg_config.geometry))
}

/// Joint angles for every leg, body frame targets
pub fn calculate_ik(positions: &LegPositions, body_config: &BodyConfig) -> Vec<JointAngles> {
    positions
        .iter()
        .zip(body_config.legs.iter())
        .map(|(target, leg_config)| calculate_ik_for_leg(target, leg_config))
        .collect()
}

/// Body frame foot positions for every leg
pub fn calculate_fk(angles: &[JointAngles], body_config: &BodyConfig) -> LegPositions {
    angles
        .iter()
        .zip(body_config.legs.iter())
        .map(|(angles, leg_config)| calculate_fk_for_leg(angles, leg_config))
        .collect()
}

fn get_alpha_angle(a: &f32, b: &f32, c: &f32) -> f32 {
    let upper = b.powi(2) + c.powi(2) - a.powi(2);
    let bottom = 2.0 * b * c;
    let divident: f32 = (-1_f32).max((1_f32).min(upper / bottom));
    divident.acos()
}
