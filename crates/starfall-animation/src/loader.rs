//! TOML-based animation asset loading

use crate::asset::AnimationAsset;
use serde::Deserialize;
use starfall_core::{Result, StarfallError};
use std::path::Path;

#[derive(Deserialize)]
struct AnimationFile {
    #[serde(default)]
    animations: Vec<AnimationAsset>,
}

/// Load a list of animation assets from a `.anim.toml` file.
///
/// ```toml
/// [[animations]]
/// name = "shrink"
/// type = "lerp"
/// field = "scale"
/// duration = 0.5
/// target = [0.0, 0.0, 0.0]
///
/// [[animations]]
/// name = "move"
/// type = "add"
/// field = "position"
/// duration = 0.5
/// ```
pub fn load_assets_from_file(path: &Path) -> Result<Vec<AnimationAsset>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        StarfallError::AnimationError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    load_assets_from_str(&content).map_err(|e| match e {
        StarfallError::AnimationError(msg) => {
            StarfallError::AnimationError(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Parse animation assets from a TOML string.
pub fn load_assets_from_str(content: &str) -> Result<Vec<AnimationAsset>> {
    let file: AnimationFile = toml::from_str(content)
        .map_err(|e| StarfallError::AnimationError(format!("Failed to parse animations: {}", e)))?;

    // Names are how init callbacks find their instances
    for (i, asset) in file.animations.iter().enumerate() {
        if file.animations[..i].iter().any(|a| a.name == asset.name) {
            return Err(StarfallError::AnimationError(format!(
                "duplicate animation name '{}'",
                asset.name
            )));
        }
    }

    Ok(file.animations)
}
