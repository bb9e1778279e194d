//! Starfall Particles - pooled, animation-driven scene nodes
//!
//! A [`ParticleSystem`] owns a set of particles, each bound to one scene
//! node and a list of animation instances:
//! - `spawn` recycles a retired particle (or allocates a node under the
//!   spawn parent), runs the owner's init callback and primes it at `t = 0`
//! - `update` advances every live particle's clock and applies its animations
//! - `check` retires particles whose animations all expired or whose
//!   liveness predicate failed, hiding their drawables
//!
//! Nodes are never freed, so after warm-up a pool spawns without allocating.

mod particle;
mod system;

pub use particle::Particle;
pub use system::{CheckFn, InitFn, ParticleParam, ParticleSystem, ParticleSystemAsset};
