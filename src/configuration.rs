use crate::error::{LocomotionError, LocomotionResult};
use crate::motion_controller::body_motion::MotionLimits;
use crate::motion_controller::gait::GaitType;
use crate::motion_controller::walking::TrajectorySettings;
use config::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::*;

/// Use bundled settings if no path is provided
pub fn get_configuration(config: &Option<PathBuf>) -> Result<ControllerSettings, anyhow::Error> {
    let builder = if let Some(config) = config {
        info!("Using configuration from {:?}", config);
        Config::builder().add_source(config::File::with_name(
            config
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Failed to convert path"))?,
        ))
    } else {
        info!("Using default configuration");
        Config::builder().add_source(config::File::with_name("config/settings").required(false))
    };
    let settings: ControllerSettings = builder
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ControllerSettings {
    /// World height of the body at start
    pub body_height: f32,
    /// Longest tick the controller integrates, longer ticks are clamped
    pub max_tick: f32,
    /// Defaults to the first gait the body supports
    pub initial_gait: Option<GaitType>,
    pub gait: GaitSettings,
    pub motion: MotionLimits,
    pub ground: GroundSettings,
    pub posture: PostureSettings,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            body_height: 0.09,
            max_tick: 0.1,
            initial_gait: None,
            gait: GaitSettings::default(),
            motion: MotionLimits::default(),
            ground: GroundSettings::default(),
            posture: PostureSettings::default(),
        }
    }
}

impl ControllerSettings {
    pub fn validate(&self) -> LocomotionResult<()> {
        if !self.body_height.is_finite() {
            return Err(LocomotionError::InvalidSetting {
                name: "body_height",
                value: self.body_height,
            });
        }
        positive("max_tick", self.max_tick)?;
        self.gait.validate()?;
        self.motion.validate()?;
        self.ground.validate()?;
        self.posture.validate()
    }
}

fn positive(name: &'static str, value: f32) -> LocomotionResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(LocomotionError::InvalidSetting { name, value })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GaitSettings {
    pub cycle_duration: f32,
    /// Replaces the duty threshold of every pattern when set
    pub duty_threshold: Option<f32>,
    pub step_height: f32,
    pub stride_factor: f32,
    pub idle_stride: f32,
    pub relax_rate: f32,
}

impl Default for GaitSettings {
    fn default() -> Self {
        let trajectory = TrajectorySettings::default();
        Self {
            cycle_duration: 0.8,
            duty_threshold: None,
            step_height: trajectory.step_height,
            stride_factor: trajectory.stride_factor,
            idle_stride: trajectory.idle_stride,
            relax_rate: trajectory.relax_rate,
        }
    }
}

impl GaitSettings {
    pub fn trajectory(&self) -> TrajectorySettings {
        TrajectorySettings {
            step_height: self.step_height,
            stride_factor: self.stride_factor,
            idle_stride: self.idle_stride,
            relax_rate: self.relax_rate,
        }
    }

    fn validate(&self) -> LocomotionResult<()> {
        positive("cycle_duration", self.cycle_duration)?;
        if let Some(duty_threshold) = self.duty_threshold {
            if !(duty_threshold > 0.0 && duty_threshold < 1.0) {
                return Err(LocomotionError::InvalidSetting {
                    name: "duty_threshold",
                    value: duty_threshold,
                });
            }
        }
        self.trajectory().validate()
    }
}

/// Which legs follow the terrain
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroundAdaptationMode {
    /// Planted legs only, every leg while the body is idle
    #[default]
    StanceLegs,
    /// Swing legs too, with the arc lift on top of the terrain
    AllLegs,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GroundSettings {
    /// Foot height kept above the queried terrain
    pub clearance: f32,
    /// Foot depth below the body used where terrain is missing
    pub fallback_clearance: f32,
    pub mode: GroundAdaptationMode,
}

impl Default for GroundSettings {
    fn default() -> Self {
        Self {
            clearance: 0.0,
            fallback_clearance: 0.09,
            mode: GroundAdaptationMode::StanceLegs,
        }
    }
}

impl GroundSettings {
    fn validate(&self) -> LocomotionResult<()> {
        let settings = [
            ("clearance", self.clearance),
            ("fallback_clearance", self.fallback_clearance),
        ];
        for (name, value) in settings {
            if !value.is_finite() {
                return Err(LocomotionError::InvalidSetting { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PostureSettings {
    /// m/s
    pub translation_rate: f32,
    /// rad/s
    pub rotation_rate: f32,
}

impl Default for PostureSettings {
    fn default() -> Self {
        Self {
            translation_rate: 0.05,
            rotation_rate: 0.5,
        }
    }
}

impl PostureSettings {
    fn validate(&self) -> LocomotionResult<()> {
        positive("translation_rate", self.translation_rate)?;
        positive("rotation_rate", self.rotation_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static DEFAULT_CONFIG: &str = include_str!("../config/settings.yaml");

    fn parse(yaml: &str) -> ControllerSettings {
        Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize::<ControllerSettings>()
            .unwrap()
    }

    #[test]
    fn test_config() {
        let settings = parse(DEFAULT_CONFIG);
        settings.validate().unwrap();
        assert_eq!(settings, ControllerSettings::default());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let settings =
            parse("gait:\n  cycle_duration: 1.2\n  duty_threshold: 0.75\ninitial_gait: wave\n");
        assert_eq!(settings.gait.cycle_duration, 1.2);
        assert_eq!(settings.gait.duty_threshold, Some(0.75));
        assert_eq!(settings.gait.step_height, 0.03);
        assert_eq!(settings.initial_gait, Some(GaitType::Wave));
        assert_eq!(settings.motion, MotionLimits::default());
    }

    #[test]
    fn ground_mode_parses() {
        let settings = parse("ground:\n  mode: all_legs\n");
        assert_eq!(settings.ground.mode, GroundAdaptationMode::AllLegs);
        assert_eq!(settings.ground.fallback_clearance, 0.09);
    }

    #[test]
    fn rejects_invalid_values() {
        let mut settings = ControllerSettings::default();
        settings.gait.cycle_duration = 0.0;
        assert!(matches!(
            settings.validate(),
            Err(LocomotionError::InvalidSetting {
                name: "cycle_duration",
                ..
            })
        ));

        let mut settings = ControllerSettings::default();
        settings.gait.duty_threshold = Some(1.0);
        assert!(settings.validate().is_err());

        let mut settings = ControllerSettings::default();
        settings.max_tick = -0.1;
        assert!(settings.validate().is_err());

        let mut settings = ControllerSettings::default();
        settings.posture.rotation_rate = f32::INFINITY;
        assert!(settings.validate().is_err());
    }
}
