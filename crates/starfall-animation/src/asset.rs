//! Animation assets and per-owner animation instances

use crate::field::{AnimateField, FieldValue};
use serde::{Deserialize, Serialize};

/// Kind of animation, as written in asset files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimateType {
    Set,
    Add,
    Lerp,
}

/// Kind-specific operands of an animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimateKind {
    /// Write `target` every tick
    Set { target: FieldValue },
    /// `src + speed * t`
    Add { speed: FieldValue },
    /// Blend from `src` to `target` over the duration
    Lerp { target: FieldValue },
}

impl AnimateKind {
    pub fn animate_type(&self) -> AnimateType {
        match self {
            AnimateKind::Set { .. } => AnimateType::Set,
            AnimateKind::Add { .. } => AnimateType::Add,
            AnimateKind::Lerp { .. } => AnimateType::Lerp,
        }
    }
}

/// Immutable authoring-time description of one animation.
///
/// ```toml
/// name = "shrink"
/// type = "lerp"
/// field = "scale"
/// duration = 0.5
/// target = [0, 0, 0]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "AnimationAssetDef")]
pub struct AnimationAsset {
    pub name: String,
    pub kind: AnimateKind,
    pub field: AnimateField,
    /// Seconds; always positive when loaded from a file
    pub duration: f32,
    /// Fixed starting value. Resolved from the target node when absent.
    pub src: Option<FieldValue>,
}

impl AnimationAsset {
    pub fn set(
        name: impl Into<String>,
        field: AnimateField,
        duration: f32,
        target: FieldValue,
    ) -> Self {
        Self::new(name, AnimateKind::Set { target }, field, duration)
    }

    pub fn add(
        name: impl Into<String>,
        field: AnimateField,
        duration: f32,
        speed: FieldValue,
    ) -> Self {
        Self::new(name, AnimateKind::Add { speed }, field, duration)
    }

    pub fn lerp(
        name: impl Into<String>,
        field: AnimateField,
        duration: f32,
        target: FieldValue,
    ) -> Self {
        Self::new(name, AnimateKind::Lerp { target }, field, duration)
    }

    /// Non-positive durations are kept but logged: such an animation applies
    /// once at time zero and expires right after.
    fn new(
        name: impl Into<String>,
        kind: AnimateKind,
        field: AnimateField,
        duration: f32,
    ) -> Self {
        let name = name.into();
        if duration.is_nan() || duration <= 0.0 {
            log::warn!("animation '{}' has non-positive duration: {}", name, duration);
        }
        Self {
            name,
            kind,
            field,
            duration,
            src: None,
        }
    }

    pub fn with_src(mut self, src: FieldValue) -> Self {
        self.src = Some(src);
        self
    }
}

/// Flat on-disk layout, validated into an [`AnimationAsset`]
#[derive(Deserialize)]
struct AnimationAssetDef {
    name: String,
    #[serde(rename = "type")]
    animate_type: AnimateType,
    field: AnimateField,
    duration: f32,
    #[serde(default)]
    src: Option<FieldValue>,
    #[serde(default)]
    target: Option<FieldValue>,
    #[serde(default)]
    speed: Option<FieldValue>,
}

impl TryFrom<AnimationAssetDef> for AnimationAsset {
    type Error = String;

    fn try_from(def: AnimationAssetDef) -> Result<Self, Self::Error> {
        if def.duration.is_nan() || def.duration <= 0.0 {
            return Err(format!(
                "animation '{}' has non-positive duration: {}",
                def.name, def.duration
            ));
        }

        let kind = match def.animate_type {
            AnimateType::Set | AnimateType::Lerp => {
                let target = def.target.ok_or_else(|| {
                    format!("animation '{}' of this type needs a target", def.name)
                })?;
                if def.animate_type == AnimateType::Set {
                    AnimateKind::Set { target }
                } else {
                    AnimateKind::Lerp { target }
                }
            }
            // Speed is often filled in per spawn by an init callback
            AnimateType::Add => AnimateKind::Add {
                speed: def.speed.unwrap_or_else(|| zero_for(def.field)),
            },
        };

        Ok(AnimationAsset {
            name: def.name,
            kind,
            field: def.field,
            duration: def.duration,
            src: def.src,
        })
    }
}

fn zero_for(field: AnimateField) -> FieldValue {
    match field {
        AnimateField::Opacity => FieldValue::Scalar(0.0),
        _ => FieldValue::Vec3(starfall_core::Vec3::ZERO),
    }
}

/// A per-owner copy of an [`AnimationAsset`].
///
/// Instances are plain values: mutating one (e.g. setting a per-particle
/// speed) never affects the asset or any sibling instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub name: String,
    pub kind: AnimateKind,
    pub field: AnimateField,
    pub duration: f32,
    /// Baseline value; `None` until filled from the target
    pub src: Option<FieldValue>,
}

impl Animation {
    pub fn from_asset(asset: &AnimationAsset) -> Self {
        Self {
            name: asset.name.clone(),
            kind: asset.kind,
            field: asset.field,
            duration: asset.duration,
            src: asset.src,
        }
    }

    /// Speed operand of an `add` animation
    pub fn speed_mut(&mut self) -> Option<&mut FieldValue> {
        match &mut self.kind {
            AnimateKind::Add { speed } => Some(speed),
            _ => None,
        }
    }

    /// Target operand of a `set` or `lerp` animation
    pub fn target_mut(&mut self) -> Option<&mut FieldValue> {
        match &mut self.kind {
            AnimateKind::Set { target } | AnimateKind::Lerp { target } => Some(target),
            AnimateKind::Add { .. } => None,
        }
    }

    pub fn is_expired(&self, time: f32) -> bool {
        time > self.duration
    }
}

/// Find an instance by name
pub fn find_animation<'a>(
    animations: &'a mut [Animation],
    name: &str,
) -> Option<&'a mut Animation> {
    animations.iter_mut().find(|a| a.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfall_core::Vec3;

    #[test]
    fn parse_lerp_asset() {
        let asset: AnimationAsset = toml::from_str(
            r#"
name = "shrink"
type = "lerp"
field = "scale"
duration = 0.5
target = [0, 0, 0]
"#,
        )
        .unwrap();
        assert_eq!(asset.field, AnimateField::Scale);
        assert_eq!(asset.kind, AnimateKind::Lerp { target: FieldValue::Vec3(Vec3::ZERO) });
        assert!(asset.src.is_none());
    }

    #[test]
    fn add_without_speed_defaults_to_zero() {
        let asset: AnimationAsset =
            toml::from_str("name = \"move\"\ntype = \"add\"\nfield = \"position\"\nduration = 1")
                .unwrap();
        assert_eq!(asset.kind, AnimateKind::Add { speed: FieldValue::Vec3(Vec3::ZERO) });
    }

    #[test]
    fn reject_invalid_assets() {
        let no_target = toml::from_str::<AnimationAsset>(
            "name = \"x\"\ntype = \"set\"\nfield = \"opacity\"\nduration = 1",
        );
        assert!(no_target.is_err());

        let zero_duration = toml::from_str::<AnimationAsset>(
            "name = \"x\"\ntype = \"set\"\nfield = \"opacity\"\nduration = 0\ntarget = 1",
        );
        assert!(zero_duration.is_err());
    }

    #[test]
    fn instances_are_independent_copies() {
        let asset = AnimationAsset::add("move", AnimateField::Position, 1.0, Vec3::ZERO.into());
        let mut a = Animation::from_asset(&asset);
        let b = Animation::from_asset(&asset);

        *a.speed_mut().unwrap() = Vec3::new(0.0, 5.0, 0.0).into();
        assert_eq!(b.kind, asset.kind);
        assert_ne!(a.kind, b.kind);
    }
}
