//! Animation system for Starfall
//!
//! Animations are authored as immutable [`AnimationAsset`]s (name, kind,
//! field, duration) and cloned into per-owner [`Animation`] instances.
//! Each instance resolves a `src` baseline from its target's current field
//! value once, then is evaluated every tick as a pure function of elapsed
//! time:
//! - **set**: `value = target`
//! - **add**: `value = src + speed * t`
//! - **lerp**: `value = src * (1 - t / duration) + target * (t / duration)`
//!
//! Instances whose duration has elapsed are skipped and leave their field
//! untouched.

pub mod asset;
pub mod field;
pub mod loader;
pub mod player;
pub mod sampler;
pub mod target;

pub use asset::{find_animation, AnimateKind, AnimateType, Animation, AnimationAsset};
pub use field::{AnimateField, FieldValue};
pub use loader::{load_assets_from_file, load_assets_from_str};
pub use player::{animation_fill_src, animation_init, animation_update};
pub use target::AnimationTarget;
