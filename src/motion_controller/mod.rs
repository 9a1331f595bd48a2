pub mod body_motion;
pub mod gait;
pub mod walking;

use crate::body_config::BodyConfig;
use crate::configuration::{ControllerSettings, GroundAdaptationMode};
use crate::error::{LocomotionError, LocomotionResult};
use crate::ground::GroundQuery;
use crate::ik_controller::leg_positions::{LegPositions, MoveTowards, RotateTowards};
use crate::ik_controller::{calculate_fk, clamp_to_reach, solve_leg};
use crate::leg::JointAngles;
use body_motion::{BodyMotionIntegrator, BodyPose};
use gait::{GaitPatternTable, GaitScheduler, GaitType};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::Serialize;
use tracing::*;
use walking::FootTrajectoryGenerator;

/// Joint angles and world foot position of one leg after a tick.
///
/// `foot_world_position` is the planned target. When that target lies outside
/// the leg's reach the joints solve for the nearest reachable point instead,
/// [`LegState::reachable`] is false and
/// [`LocomotionController::measured_foot_positions`] reports where the foot is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerLegOutput {
    pub hip: f32,
    pub femur: f32,
    pub tibia: f32,
    pub foot_world_position: Point3<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegState {
    /// Planned foot position in body frame
    pub foot_target: Point3<f32>,
    pub joint_angles: JointAngles,
    pub group: usize,
    pub phase_offset: f32,
    pub stance: bool,
    /// Foot is planted, flips on lift-off and touch-down
    pub grounded: bool,
    /// Height of the swing arc included in `foot_target`
    pub lift: f32,
    /// `foot_target` was inside the reach annulus when the joints were solved
    pub reachable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepEventKind {
    LiftOff,
    TouchDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepEvent {
    pub leg: usize,
    pub kind: StepEventKind,
}

/// Body shift relative to the feet, applied before IK
#[derive(Debug, Clone, Copy, PartialEq)]
struct BodyPosture {
    translation: Vector3<f32>,
    rotation: UnitQuaternion<f32>,
    target_translation: Vector3<f32>,
    target_rotation: UnitQuaternion<f32>,
}

impl Default for BodyPosture {
    fn default() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            target_translation: Vector3::zeros(),
            target_rotation: UnitQuaternion::identity(),
        }
    }
}

pub struct LocomotionController {
    body_config: BodyConfig,
    settings: ControllerSettings,
    scheduler: GaitScheduler,
    integrator: BodyMotionIntegrator,
    trajectory: FootTrajectoryGenerator,
    legs: Vec<LegState>,
    posture: BodyPosture,
    step_events: Vec<StepEvent>,
}

impl LocomotionController {
    /// Controller with the bundled gait table for the body's leg count
    pub fn new(body_config: BodyConfig, settings: ControllerSettings) -> LocomotionResult<Self> {
        body_config.validate()?;
        let gait_table = GaitPatternTable::for_leg_count(body_config.leg_count())?;
        let initial_gait = match settings.initial_gait {
            Some(gait) => gait,
            None => gait_table
                .gaits()
                .next()
                .ok_or(LocomotionError::UnsupportedLegCount(body_config.leg_count()))?,
        };
        Self::configure(body_config, gait_table, initial_gait, settings)
    }

    /// Validate everything once, ticks never fail afterwards
    pub fn configure(
        body_config: BodyConfig,
        gait_table: GaitPatternTable,
        initial_gait: GaitType,
        settings: ControllerSettings,
    ) -> LocomotionResult<Self> {
        body_config.validate()?;
        settings.validate()?;
        if gait_table.leg_count() != body_config.leg_count() {
            return Err(LocomotionError::LegCountMismatch {
                body: body_config.leg_count(),
                table: gait_table.leg_count(),
            });
        }
        let gait_table = match settings.gait.duty_threshold {
            Some(duty_threshold) => gait_table.with_duty_threshold(duty_threshold),
            None => gait_table,
        };
        let scheduler = GaitScheduler::new(gait_table, initial_gait, settings.gait.cycle_duration)?;
        let integrator = BodyMotionIntegrator::new(
            settings.motion,
            BodyPose::at(Point3::new(0.0, 0.0, settings.body_height)),
        );
        let trajectory = FootTrajectoryGenerator::new(settings.gait.trajectory());
        let legs = body_config
            .legs
            .iter()
            .enumerate()
            .map(|(index, leg)| {
                let stance = scheduler.leg_phase(index).is_stance();
                LegState {
                    foot_target: leg.default_foot,
                    joint_angles: JointAngles::new(0.0, 0.0, 0.0),
                    group: scheduler.group_of(index),
                    phase_offset: 0.0,
                    stance,
                    grounded: true,
                    lift: 0.0,
                    reachable: true,
                }
            })
            .collect();
        info!(
            "Configured {} legged controller with {} gait",
            body_config.leg_count(),
            initial_gait
        );
        let mut controller = Self {
            body_config,
            settings,
            scheduler,
            integrator,
            trajectory,
            legs,
            posture: BodyPosture::default(),
            step_events: vec![],
        };
        controller.refresh_groups();
        controller.solve_joints();
        Ok(controller)
    }

    pub fn body_config(&self) -> &BodyConfig {
        &self.body_config
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn scheduler(&self) -> &GaitScheduler {
        &self.scheduler
    }

    pub fn current_gait(&self) -> GaitType {
        self.scheduler.current_gait()
    }

    pub fn pose(&self) -> &BodyPose {
        self.integrator.pose()
    }

    pub fn leg_states(&self) -> &[LegState] {
        &self.legs
    }

    /// Lift-offs and touch-downs of the last tick
    pub fn step_events(&self) -> &[StepEvent] {
        &self.step_events
    }

    /// Current posture shift as translation and rotation
    pub fn body_posture(&self) -> (Vector3<f32>, UnitQuaternion<f32>) {
        (self.posture.translation, self.posture.rotation)
    }

    /// Posture the body moves toward, rate limited each tick
    pub fn set_body_posture(&mut self, translation: Vector3<f32>, rotation: UnitQuaternion<f32>) {
        let finite = translation.iter().all(|value| value.is_finite())
            && rotation.coords.iter().all(|value| value.is_finite());
        if !finite {
            warn!("Ignoring non finite body posture");
            return;
        }
        self.posture.target_translation = translation;
        self.posture.target_rotation = rotation;
    }

    pub fn set_body_posture_euler(&mut self, translation: Vector3<f32>, rotation: Vector3<f32>) {
        self.set_body_posture(
            translation,
            UnitQuaternion::from_euler_angles(rotation.x, rotation.y, rotation.z),
        )
    }

    /// Switch gait, legs adopt the new pattern from the start of the cycle.
    ///
    /// Returns false when `gait` is already active.
    pub fn change_gait(&mut self, gait: GaitType) -> LocomotionResult<bool> {
        let changed = self.scheduler.change_gait(gait)?;
        if changed {
            self.refresh_groups();
        }
        Ok(changed)
    }

    /// Advance every leg by `dt` seconds under the given commands
    pub fn tick(&mut self, dt: f32, forward_command: f32, turn_command: f32) -> Vec<PerLegOutput> {
        let dt = self.clamp_tick(dt);
        let motion = self.integrator.integrate(forward_command, turn_command, dt);
        self.scheduler.advance(dt);
        self.shift_posture(dt);
        self.step_events.clear();

        let stance_duration =
            self.scheduler.cycle().cycle_duration() * self.scheduler.pattern().stance_fraction();
        for (index, leg_config) in self.body_config.legs.iter().enumerate() {
            let phase = self.scheduler.leg_phase(index);
            let leg = &mut self.legs[index];
            let update = self.trajectory.next_target(
                &leg.foot_target,
                &leg_config.default_foot,
                phase,
                &motion,
                stance_duration,
                dt,
            );
            leg.foot_target = update.target;
            leg.lift = update.lift;
            leg.stance = phase.is_stance();

            let grounded = leg.stance || !motion.moving;
            if grounded != leg.grounded {
                let kind = if grounded {
                    StepEventKind::TouchDown
                } else {
                    StepEventKind::LiftOff
                };
                trace!(leg = index, ?kind, "step event");
                self.step_events.push(StepEvent { leg: index, kind });
                leg.grounded = grounded;
            }
        }
        self.solve_joints();
        self.outputs()
    }

    /// Bias foot heights onto the terrain and solve joints again.
    ///
    /// By default only planted feet follow the terrain, which is every foot
    /// while the body is idle. Missing terrain falls back to a fixed depth below the body.
    pub fn adapt_to_ground(&mut self, ground: &dyn GroundQuery) -> Vec<PerLegOutput> {
        let pose = *self.integrator.pose();
        let ground_settings = self.settings.ground;
        for (index, leg) in self.legs.iter_mut().enumerate() {
            if ground_settings.mode == GroundAdaptationMode::StanceLegs && !leg.grounded {
                continue;
            }
            let world = pose.body_to_world(&leg.foot_target);
            let ground_height = match ground.query_height(world.x, world.y) {
                Some(height) if height.is_finite() => height + ground_settings.clearance,
                _ => {
                    debug!(leg = index, "No ground under foot, using fallback height");
                    pose.position.z - ground_settings.fallback_clearance
                }
            };
            // heading is a pure yaw so body and world heights differ by the body height
            leg.foot_target.z = ground_height + leg.lift - pose.position.z;
        }
        self.solve_joints();
        self.outputs()
    }

    /// Output of the latest tick
    pub fn outputs(&self) -> Vec<PerLegOutput> {
        let pose = self.integrator.pose();
        self.legs
            .iter()
            .map(|leg| PerLegOutput {
                hip: leg.joint_angles.hip(),
                femur: leg.joint_angles.femur(),
                tibia: leg.joint_angles.tibia(),
                foot_world_position: pose.body_to_world(&leg.foot_target),
            })
            .collect()
    }

    /// Body frame foot positions reached by the solved joint angles
    pub fn measured_foot_positions(&self) -> LegPositions {
        let angles: Vec<_> = self.legs.iter().map(|leg| leg.joint_angles).collect();
        let posed = calculate_fk(&angles, &self.body_config);
        let (translation, rotation) = self.body_posture();
        posed
            .iter()
            .map(|position| rotation * position + translation)
            .collect()
    }

    fn clamp_tick(&self, dt: f32) -> f32 {
        let clamped = if dt.is_nan() {
            0.0
        } else {
            dt.clamp(0.0, self.settings.max_tick)
        };
        if clamped != dt {
            debug!("Clamped tick of {} s to {} s", dt, clamped);
        }
        clamped
    }

    fn refresh_groups(&mut self) {
        let pattern = self.scheduler.pattern();
        for (index, leg) in self.legs.iter_mut().enumerate() {
            leg.group = self.scheduler.group_of(index);
            leg.phase_offset = pattern.groups()[leg.group].phase_offset;
            leg.stance = self.scheduler.group_state(leg.group).is_stance();
        }
    }

    /// shifts posture towards desired posture
    fn shift_posture(&mut self, dt: f32) {
        let rates = self.settings.posture;
        let (translation, _moved) = self
            .posture
            .translation
            .move_towards(&self.posture.target_translation, &(rates.translation_rate * dt));
        self.posture.translation = translation;
        let (rotation, _moved) = self
            .posture
            .rotation
            .rotate_towards(&self.posture.target_rotation, rates.rotation_rate * dt);
        self.posture.rotation = rotation;
    }

    fn solve_joints(&mut self) {
        let targets: LegPositions = self.legs.iter().map(|leg| leg.foot_target).collect();
        let posed = targets.transform(self.posture.translation, self.posture.rotation);
        for ((leg, leg_config), target) in self
            .legs
            .iter_mut()
            .zip(self.body_config.legs.iter())
            .zip(posed.iter())
        {
            let local = leg_config.body_to_leg(target);
            let reachable_local = clamp_to_reach(&local, &leg_config.geometry);
            leg.reachable = reachable_local == local;
            leg.joint_angles = solve_leg(&reachable_local, &leg_config.geometry);
        }
    }
}
