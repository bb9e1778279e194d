//! Instancing, baseline resolution and per-tick evaluation

use crate::asset::{Animation, AnimationAsset};
use crate::sampler::evaluate;
use crate::target::AnimationTarget;

/// Copy a list of assets into fresh per-owner instances
pub fn animation_init(assets: &[AnimationAsset]) -> Vec<Animation> {
    assets.iter().map(Animation::from_asset).collect()
}

/// Resolve missing `src` baselines from the target's current field values.
///
/// Instances that already carry a `src` are left alone, so calling this
/// again after the field moved does not shift the baseline.
pub fn animation_fill_src<T: AnimationTarget + ?Sized>(target: &T, animations: &mut [Animation]) {
    for animation in animations.iter_mut().filter(|a| a.src.is_none()) {
        animation.src = Some(target.read_field(animation.field));
    }
}

/// Apply every live instance at elapsed time `time`.
///
/// Instances past their duration are skipped, leaving the field at whatever
/// value it last received. Returns whether any instance wrote its field.
pub fn animation_update<T: AnimationTarget + ?Sized>(
    target: &mut T,
    animations: &[Animation],
    time: f32,
) -> bool {
    let mut updated = false;
    for animation in animations {
        if animation.is_expired(time) {
            continue;
        }
        let src = match animation.src {
            Some(src) => src,
            None => {
                log::debug!("animation '{}' has no baseline yet, resolving now", animation.name);
                target.read_field(animation.field)
            }
        };
        let value = evaluate(&animation.kind, &src, time, animation.duration);
        target.write_field(animation.field, &value);
        updated = true;
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{AnimateField, FieldValue};
    use starfall_core::Vec3;
    use starfall_scene::SceneGraph;

    fn shrink_and_move() -> Vec<AnimationAsset> {
        vec![
            AnimationAsset::lerp("shrink", AnimateField::Scale, 0.5, Vec3::ZERO.into()),
            AnimationAsset::add(
                "move",
                AnimateField::Position,
                0.5,
                Vec3::new(0.0, -35.0, 0.0).into(),
            ),
        ]
    }

    #[test]
    fn fill_src_reads_once() {
        let mut scene = SceneGraph::new();
        let id = scene.spawn_child(scene.root(), "p", None).unwrap();
        let node = scene.node_mut(id).unwrap();
        node.position.set(1.0, 2.0, 0.0);

        let mut anims = animation_init(&shrink_and_move());
        animation_fill_src(&*node, &mut anims);
        assert_eq!(anims[1].src, Some(FieldValue::Vec3(Vec3::new(1.0, 2.0, 0.0))));

        node.position.set(9.0, 9.0, 9.0);
        animation_fill_src(&*node, &mut anims);
        assert_eq!(anims[1].src, Some(FieldValue::Vec3(Vec3::new(1.0, 2.0, 0.0))));
    }

    #[test]
    fn explicit_src_is_kept() {
        let mut scene = SceneGraph::new();
        let id = scene.spawn_child(scene.root(), "p", None).unwrap();
        let assets = vec![AnimationAsset::lerp("fade", AnimateField::Opacity, 1.0, 0.0.into())
            .with_src(FieldValue::Scalar(0.5))];
        let mut anims = animation_init(&assets);
        animation_fill_src(scene.node(id).unwrap(), &mut anims);
        assert_eq!(anims[0].src, Some(FieldValue::Scalar(0.5)));
    }

    #[test]
    fn update_evaluates_from_baseline() {
        let mut scene = SceneGraph::new();
        let id = scene.spawn_child(scene.root(), "p", None).unwrap();
        let node = scene.node_mut(id).unwrap();
        node.position.set(0.0, 10.0, 0.0);

        let mut anims = animation_init(&shrink_and_move());
        animation_fill_src(&*node, &mut anims);

        assert!(animation_update(node, &anims, 0.0));
        assert_eq!(node.scale, Vec3::ONE);
        assert_eq!(node.position, Vec3::new(0.0, 10.0, 0.0));

        assert!(animation_update(node, &anims, 0.25));
        assert!((node.scale.x() - 0.5).abs() < 1e-5);
        assert!((node.position.y() - 1.25).abs() < 1e-4);
    }

    #[test]
    fn expired_animation_leaves_field_alone() {
        let mut scene = SceneGraph::new();
        let id = scene.spawn_child(scene.root(), "p", None).unwrap();
        let node = scene.node_mut(id).unwrap();

        let mut anims = animation_init(&shrink_and_move());
        animation_fill_src(&*node, &mut anims);
        animation_update(node, &anims, 0.5);
        let frozen = node.scale;
        assert!(frozen.length() < 1e-5);

        node.scale.set(3.0, 3.0, 3.0);
        assert!(!animation_update(node, &anims, 0.6));
        assert_eq!(node.scale, Vec3::splat(3.0));
    }

    #[test]
    fn per_instance_speed_does_not_leak() {
        let assets = shrink_and_move();
        let mut first = animation_init(&assets);
        let second = animation_init(&assets);
        *first[1].speed_mut().unwrap() = Vec3::new(1.0, 0.0, 0.0).into();
        assert_eq!(second[1].kind, assets[1].kind);
    }
}
