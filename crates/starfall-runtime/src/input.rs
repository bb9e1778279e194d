//! Input state management

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Action names understood by the game
pub mod actions {
    pub const FORWARD: &str = "forward";
    pub const BACKWARD: &str = "backward";
    pub const LEFT: &str = "left";
    pub const RIGHT: &str = "right";
    pub const FIRE: &str = "fire";
}

/// Action name -> key names, as configured in TOML:
/// ```toml
/// [input]
/// forward = ["w", "ArrowUp"]
/// fire = [" "]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputBindings(pub HashMap<String, Vec<String>>);

impl Default for InputBindings {
    fn default() -> Self {
        let mut map = HashMap::new();
        map.insert(actions::FORWARD.into(), vec!["w".into(), "ArrowUp".into()]);
        map.insert(actions::BACKWARD.into(), vec!["s".into(), "ArrowDown".into()]);
        map.insert(actions::LEFT.into(), vec!["a".into(), "ArrowLeft".into()]);
        map.insert(actions::RIGHT.into(), vec!["d".into(), "ArrowRight".into()]);
        map.insert(actions::FIRE.into(), vec![" ".into()]);
        Self(map)
    }
}

/// Tracks which keys are held, by key name
pub struct InputState {
    keys_down: HashSet<String>,
    keys_just_pressed: HashSet<String>,
    bindings: InputBindings,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::with_bindings(InputBindings::default())
    }

    pub fn with_bindings(bindings: InputBindings) -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_just_pressed: HashSet::new(),
            bindings,
        }
    }

    /// Bind an action to one or more keys, replacing earlier bindings
    pub fn bind_action(&mut self, action: impl Into<String>, keys: Vec<String>) {
        self.bindings.0.insert(action.into(), keys);
    }

    pub fn process_key_down(&mut self, key: &str) {
        if self.keys_down.insert(key.to_string()) {
            self.keys_just_pressed.insert(key.to_string());
        }
    }

    pub fn process_key_up(&mut self, key: &str) {
        self.keys_down.remove(key);
    }

    /// Release everything, e.g. when the host loses focus
    pub fn release_all(&mut self) {
        self.keys_down.clear();
    }

    /// Call at end of frame to clear per-frame state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
    }

    pub fn is_key_down(&self, key: &str) -> bool {
        self.keys_down.contains(key)
    }

    /// Is any key bound to `action` held?
    pub fn is_action_pressed(&self, action: &str) -> bool {
        self.bindings
            .0
            .get(action)
            .map(|keys| keys.iter().any(|k| self.keys_down.contains(k)))
            .unwrap_or(false)
    }

    /// Was any key bound to `action` pressed this frame?
    pub fn is_action_just_pressed(&self, action: &str) -> bool {
        self.bindings
            .0
            .get(action)
            .map(|keys| keys.iter().any(|k| self.keys_just_pressed.contains(k)))
            .unwrap_or(false)
    }

    /// All held keys, sorted
    pub fn pressed_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys_down.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
