pub mod body_config;
pub mod configuration;
pub mod error;
pub mod ground;
pub mod ik_controller;
pub mod leg;
pub mod motion_controller;
pub mod utilities;
