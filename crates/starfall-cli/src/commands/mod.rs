//! CLI command implementations

pub mod collide;
pub mod config;
pub mod simulate;
