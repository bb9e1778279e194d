//! Runtime system trait

use crate::input::InputState;
use starfall_core::Result;
use starfall_scene::SceneGraph;
use std::cell::RefCell;
use std::rc::Rc;

/// A system that can be ticked by the frame loop
///
/// Systems are updated in registration order. Fixed update runs at a constant
/// rate, while update runs once per frame with the clamped frame delta.
pub trait RuntimeSystem {
    /// Called once when the system is first registered
    fn initialize(&mut self, scene: &mut SceneGraph) -> Result<()>;

    /// Called at a fixed rate for deterministic simulation
    fn fixed_update(&mut self, _scene: &mut SceneGraph, _dt: f64) -> Result<()> {
        Ok(())
    }

    /// Called once per frame for variable-rate logic
    fn update(&mut self, scene: &mut SceneGraph, input: &InputState, dt: f64) -> Result<()>;

    /// Called when the system is being shut down
    fn shutdown(&mut self, _scene: &mut SceneGraph) -> Result<()> {
        Ok(())
    }

    /// Human-readable name for this system
    fn name(&self) -> &str;
}

/// Registers a system with a [`FrameRunner`](crate::FrameRunner) while the
/// host keeps a handle to read its state between frames.
pub struct SharedSystem<T> {
    system: Rc<RefCell<T>>,
    name: String,
}

impl<T: RuntimeSystem> SharedSystem<T> {
    pub fn new(system: Rc<RefCell<T>>) -> Self {
        let name = system.borrow().name().to_string();
        Self { system, name }
    }
}

impl<T: RuntimeSystem> RuntimeSystem for SharedSystem<T> {
    fn initialize(&mut self, scene: &mut SceneGraph) -> Result<()> {
        self.system.borrow_mut().initialize(scene)
    }

    fn fixed_update(&mut self, scene: &mut SceneGraph, dt: f64) -> Result<()> {
        self.system.borrow_mut().fixed_update(scene, dt)
    }

    fn update(&mut self, scene: &mut SceneGraph, input: &InputState, dt: f64) -> Result<()> {
        self.system.borrow_mut().update(scene, input, dt)
    }

    fn shutdown(&mut self, scene: &mut SceneGraph) -> Result<()> {
        self.system.borrow_mut().shutdown(scene)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FrameRunner, GameClock};

    #[derive(Default)]
    struct Counter {
        updates: u32,
        shut_down: bool,
    }

    impl RuntimeSystem for Counter {
        fn initialize(&mut self, _scene: &mut SceneGraph) -> Result<()> {
            Ok(())
        }

        fn update(&mut self, _scene: &mut SceneGraph, _input: &InputState, _dt: f64) -> Result<()> {
            self.updates += 1;
            Ok(())
        }

        fn shutdown(&mut self, _scene: &mut SceneGraph) -> Result<()> {
            self.shut_down = true;
            Ok(())
        }

        fn name(&self) -> &str {
            "counter"
        }
    }

    #[test]
    fn shared_system_is_readable_between_frames() {
        let mut scene = SceneGraph::new();
        let mut input = InputState::new();
        let counter = Rc::new(RefCell::new(Counter::default()));
        let mut runner = FrameRunner::new(GameClock::with_max_tick(0.1));
        runner
            .add_system(&mut scene, Box::new(SharedSystem::new(Rc::clone(&counter))))
            .unwrap();
        assert_eq!(runner.system_names(), vec!["counter"]);

        for _ in 0..3 {
            runner.frame(&mut scene, &mut input, 0.02);
        }
        assert_eq!(counter.borrow().updates, 3);

        runner.shutdown(&mut scene);
        assert!(counter.borrow().shut_down);
    }
}
