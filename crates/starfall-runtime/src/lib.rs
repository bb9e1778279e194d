//! Starfall Runtime - frame loop infrastructure
//!
//! Provides the host-side building blocks for driving a scene:
//! - `GameClock`: clamped frame delta plus a fixed-step accumulator
//! - `InputState`: pressed keys and named action bindings
//! - `RuntimeSystem`: trait for systems ticked once per frame
//! - `SharedSystem`: registers a system the host still reads between frames
//! - `FrameRunner`: runs registered systems in order, then propagates the scene

mod clock;
mod input;
mod runner;
mod system;

pub use clock::GameClock;
pub use input::{actions, InputBindings, InputState};
pub use runner::FrameRunner;
pub use system::{RuntimeSystem, SharedSystem};
