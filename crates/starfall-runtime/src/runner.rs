//! Per-frame driver for registered systems

use crate::clock::GameClock;
use crate::input::InputState;
use crate::system::RuntimeSystem;
use starfall_core::Result;
use starfall_scene::SceneGraph;

/// Owns the clock and the ordered system list.
///
/// One frame is: fixed steps, then every `update`, then one scene
/// propagation pass so presentation sees the frame's final state.
pub struct FrameRunner {
    pub clock: GameClock,
    systems: Vec<Box<dyn RuntimeSystem>>,
}

impl FrameRunner {
    pub fn new(clock: GameClock) -> Self {
        Self {
            clock,
            systems: Vec::new(),
        }
    }

    /// Register and initialize a system
    pub fn add_system(
        &mut self,
        scene: &mut SceneGraph,
        mut system: Box<dyn RuntimeSystem>,
    ) -> Result<()> {
        system.initialize(scene)?;
        log::debug!("registered system '{}'", system.name());
        self.systems.push(system);
        Ok(())
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// Run one frame of `elapsed` wall seconds (clamped by the clock)
    pub fn frame(&mut self, scene: &mut SceneGraph, input: &mut InputState, elapsed: f64) {
        self.clock.advance(elapsed);

        while self.clock.should_fixed_update() {
            let dt = self.clock.fixed_timestep;
            for system in &mut self.systems {
                if let Err(e) = system.fixed_update(scene, dt) {
                    log::warn!("{} fixed update failed: {}", system.name(), e);
                }
            }
            self.clock.consume_fixed_step();
        }

        let dt = self.clock.delta_time;
        for system in &mut self.systems {
            if let Err(e) = system.update(scene, input, dt) {
                log::warn!("{} update failed: {}", system.name(), e);
            }
        }

        scene.propagate();
        input.end_frame();
    }

    pub fn shutdown(&mut self, scene: &mut SceneGraph) {
        for system in &mut self.systems {
            if let Err(e) = system.shutdown(scene) {
                log::warn!("{} shutdown failed: {}", system.name(), e);
            }
        }
        self.systems.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfall_core::{NodeId, Vec3};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Moves one node right at 10 units/s, recording each dt
    struct Mover {
        node: Option<NodeId>,
        log: Rc<RefCell<Vec<f64>>>,
    }

    impl RuntimeSystem for Mover {
        fn initialize(&mut self, scene: &mut SceneGraph) -> Result<()> {
            self.node = Some(scene.spawn_child(scene.root(), "mover", None)?);
            Ok(())
        }

        fn update(&mut self, scene: &mut SceneGraph, _input: &InputState, dt: f64) -> Result<()> {
            self.log.borrow_mut().push(dt);
            let id = self.node.expect("initialized");
            let node = scene.get_node_mut(id)?;
            let x = node.position.x() + 10.0 * dt as f32;
            node.position.set_x(x);
            Ok(())
        }

        fn name(&self) -> &str {
            "mover"
        }
    }

    #[test]
    fn frame_updates_then_propagates() {
        let mut scene = SceneGraph::new();
        let mut input = InputState::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = FrameRunner::new(GameClock::with_max_tick(0.1));
        runner
            .add_system(&mut scene, Box::new(Mover { node: None, log: Rc::clone(&log) }))
            .unwrap();
        assert_eq!(runner.system_names(), vec!["mover"]);

        runner.frame(&mut scene, &mut input, 0.05);
        runner.frame(&mut scene, &mut input, 3.0);

        assert_eq!(log.borrow().len(), 2);
        assert!((log.borrow()[1] - 0.1).abs() < 1e-12);

        let mover = scene.children(scene.root())[0];
        let world = scene.node(mover).unwrap().world_position();
        assert!((world - Vec3::new(1.5, 0.0, 0.0)).length() < 1e-4);
    }
}
