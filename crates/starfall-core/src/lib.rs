//! Starfall Core - Foundational types for the Starfall engine
//!
//! This crate provides the types every other Starfall crate depends on:
//! - `Vec3` / `Scalar` - Mutable numeric values with change tracking
//! - `NodeId` - Scene node handles
//! - Error types and Result alias

mod error;
mod id;
mod vector;

pub use error::{Result, StarfallError};
pub use id::NodeId;
pub use vector::{Scalar, Vec3};
