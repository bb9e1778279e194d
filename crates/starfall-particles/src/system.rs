//! ParticleSystem - the pool, and the reusable factory that builds pools

use crate::particle::Particle;
use starfall_animation::{animation_fill_src, animation_init, AnimationAsset};
use starfall_core::{NodeId, Result, StarfallError};
use starfall_scene::{DrawableAsset, Node, SceneGraph};
use std::rc::Rc;

/// Spawn-time customization: place the node, fill per-spawn animation
/// operands in `particle.animations`, stash `particle.data`.
pub type InitFn<P> = Box<dyn FnMut(&mut Particle<P>, &mut Node, Option<P>)>;

/// Liveness predicate, consulted only for particles whose animations are
/// still running.
pub type CheckFn<P> = Box<dyn FnMut(&Particle<P>, &Node) -> bool>;

/// Static configuration of a pool
#[derive(Debug, Clone)]
pub struct ParticleParam {
    /// Name given to each particle node
    pub particle_name: String,
    /// Drawable template forwarded to every new particle node
    pub drawable: DrawableAsset,
    /// Where particle nodes are attached. A dedicated child of the owner
    /// is created when absent.
    pub spawn_parent: Option<NodeId>,
    pub animations: Vec<AnimationAsset>,
}

/// Object pool of animated particles.
///
/// Every particle ever allocated is in exactly one of `live` or `free`.
pub struct ParticleSystem<P> {
    particle_name: String,
    drawable: DrawableAsset,
    spawn_parent: NodeId,
    animations: Vec<AnimationAsset>,
    live: Vec<Particle<P>>,
    free: Vec<Particle<P>>,
    init: InitFn<P>,
    check: CheckFn<P>,
}

impl<P> ParticleSystem<P> {
    /// Create a pool owned by `owner`.
    ///
    /// Fails if `owner` (or the explicit spawn parent) is not in the scene.
    pub fn new(
        scene: &mut SceneGraph,
        owner: NodeId,
        param: ParticleParam,
        init: InitFn<P>,
        check: CheckFn<P>,
    ) -> Result<Self> {
        let spawn_parent = match param.spawn_parent {
            Some(parent) => {
                if !scene.contains(parent) {
                    return Err(StarfallError::ParticleError(format!(
                        "spawn parent {} for '{}' is not in the scene",
                        parent, param.particle_name
                    )));
                }
                parent
            }
            None => scene.spawn_child(owner, "ParticleSystem", None)?,
        };

        Ok(Self {
            particle_name: param.particle_name,
            drawable: param.drawable,
            spawn_parent,
            animations: param.animations,
            live: Vec::new(),
            free: Vec::new(),
            init,
            check,
        })
    }

    pub fn particle_name(&self) -> &str {
        &self.particle_name
    }

    pub fn spawn_parent(&self) -> NodeId {
        self.spawn_parent
    }

    /// Spawn one particle, recycling a retired one when possible.
    ///
    /// Returns the particle's node, or `None` if no node could be obtained
    /// (logged; the frame goes on).
    pub fn spawn(&mut self, scene: &mut SceneGraph, payload: Option<P>) -> Option<NodeId> {
        let mut particle = match self.free.pop() {
            Some(particle) => particle,
            None => {
                let node = match scene.spawn_child(
                    self.spawn_parent,
                    self.particle_name.as_str(),
                    Some(self.drawable.clone()),
                ) {
                    Ok(node) => node,
                    Err(e) => {
                        log::warn!("cannot spawn '{}': {}", self.particle_name, e);
                        return None;
                    }
                };
                Particle::new(node)
            }
        };

        let Some(node) = scene.node_mut(particle.node()) else {
            log::warn!(
                "particle node {} of '{}' is missing",
                particle.node(),
                self.particle_name
            );
            self.free.push(particle);
            return None;
        };

        particle.reset(animation_init(&self.animations));
        (self.init)(&mut particle, node, payload);
        animation_fill_src(&*node, &mut particle.animations);
        particle.update(node, 0.0);
        node.drawable.set_visible(true);

        let id = particle.node();
        self.live.push(particle);
        Some(id)
    }

    /// Advance every live particle by `dt` seconds
    pub fn update(&mut self, scene: &mut SceneGraph, dt: f32) {
        for particle in &mut self.live {
            match scene.node_mut(particle.node()) {
                Some(node) => particle.update(node, dt),
                None => {
                    log::warn!("particle node {} is missing", particle.node());
                    particle.stall(dt);
                }
            }
        }
    }

    /// Retire particles that stopped animating or fail the predicate.
    ///
    /// Retired particles move to the free list and their drawables are
    /// hidden.
    pub fn check(&mut self, scene: &mut SceneGraph) {
        let Self {
            live, free, check, ..
        } = self;

        let mut i = 0;
        while i < live.len() {
            let alive = live[i].keep_alive()
                && scene
                    .node(live[i].node())
                    .is_some_and(|node| check(&live[i], node));
            if alive {
                i += 1;
                continue;
            }
            let particle = live.swap_remove(i);
            hide(scene, particle.node());
            free.push(particle);
        }
    }

    /// Live particles, for collision and game code
    pub fn particles(&self) -> &[Particle<P>] {
        &self.live
    }

    /// Retire the live particle bound to `node`, e.g. a bullet that hit.
    ///
    /// Returns false if no live particle uses that node.
    pub fn retire(&mut self, scene: &mut SceneGraph, node: NodeId) -> bool {
        let Some(index) = self.live.iter().position(|p| p.node() == node) else {
            return false;
        };
        let particle = self.live.swap_remove(index);
        hide(scene, particle.node());
        self.free.push(particle);
        true
    }

    /// Retire every live particle immediately
    pub fn clear(&mut self, scene: &mut SceneGraph) {
        for particle in self.live.drain(..) {
            hide(scene, particle.node());
            self.free.push(particle);
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Particles ever allocated by this pool
    pub fn allocated(&self) -> usize {
        self.live.len() + self.free.len()
    }
}

fn hide(scene: &mut SceneGraph, id: NodeId) {
    if let Some(node) = scene.node_mut(id) {
        node.drawable.set_visible(false);
    }
}

/// Reusable recipe for building pools of one effect kind.
///
/// `G` parameterizes the generated [`ParticleParam`] (e.g. the owner's
/// colour), `P` is the pool's payload type.
pub struct ParticleSystemAsset<G, P> {
    param_gen: Rc<dyn Fn(&G) -> ParticleParam>,
    init: Rc<dyn Fn(&mut Particle<P>, &mut Node, Option<P>)>,
    check: Rc<dyn Fn(&Particle<P>, &Node) -> bool>,
}

impl<G, P> Clone for ParticleSystemAsset<G, P> {
    fn clone(&self) -> Self {
        Self {
            param_gen: Rc::clone(&self.param_gen),
            init: Rc::clone(&self.init),
            check: Rc::clone(&self.check),
        }
    }
}

impl<G, P: 'static> ParticleSystemAsset<G, P> {
    pub fn new(
        param_gen: impl Fn(&G) -> ParticleParam + 'static,
        init: impl Fn(&mut Particle<P>, &mut Node, Option<P>) + 'static,
        check: impl Fn(&Particle<P>, &Node) -> bool + 'static,
    ) -> Self {
        Self {
            param_gen: Rc::new(param_gen),
            init: Rc::new(init),
            check: Rc::new(check),
        }
    }

    /// Build a pool under `owner`
    pub fn create(
        &self,
        scene: &mut SceneGraph,
        owner: NodeId,
        param: &G,
    ) -> Result<ParticleSystem<P>> {
        let init = Rc::clone(&self.init);
        let check = Rc::clone(&self.check);
        ParticleSystem::new(
            scene,
            owner,
            (self.param_gen)(param),
            Box::new(move |p: &mut Particle<P>, node: &mut Node, payload: Option<P>| {
                init(p, node, payload)
            }),
            Box::new(move |p: &Particle<P>, node: &Node| check(p, node)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfall_animation::{AnimateField, FieldValue};
    use starfall_core::Vec3;
    use std::cell::Cell;
    use std::collections::HashSet;

    fn bullet_param() -> ParticleParam {
        ParticleParam {
            particle_name: "bullet".to_string(),
            drawable: DrawableAsset::Sphere {
                stroke: 1.0,
                color: "#e63".to_string(),
            },
            spawn_parent: None,
            animations: vec![AnimationAsset::add(
                "move",
                AnimateField::Position,
                1.0,
                FieldValue::Vec3(Vec3::ZERO),
            )],
        }
    }

    /// Spawn payload is the start position; speed is fixed
    fn bullet_pool(scene: &mut SceneGraph) -> ParticleSystem<Vec3> {
        let owner = scene.spawn_child(scene.root(), "ship", None).unwrap();
        ParticleSystem::new(
            scene,
            owner,
            bullet_param(),
            Box::new(|p: &mut Particle<Vec3>, node: &mut Node, payload: Option<Vec3>| {
                let start = payload.unwrap_or(Vec3::ZERO);
                node.position.set_vec3(&start);
                if let Some(speed) = p.animations[0].speed_mut() {
                    *speed = FieldValue::Vec3(Vec3::new(0.0, 10.0, 0.0));
                }
                p.data = Some(start);
            }),
            Box::new(|_: &Particle<Vec3>, node: &Node| node.position.y() < 5.0),
        )
        .unwrap()
    }

    fn assert_disjoint(pool: &ParticleSystem<Vec3>) {
        let live: HashSet<_> = pool.live.iter().map(|p| p.node()).collect();
        let free: HashSet<_> = pool.free.iter().map(|p| p.node()).collect();
        assert!(live.is_disjoint(&free));
        assert_eq!(live.len() + free.len(), pool.allocated());
    }

    #[test]
    fn spawn_primes_at_time_zero() {
        let mut scene = SceneGraph::new();
        let mut pool = bullet_pool(&mut scene);
        let id = pool.spawn(&mut scene, Some(Vec3::new(1.0, 2.0, 0.0))).unwrap();

        let node = scene.node(id).unwrap();
        assert_eq!(node.position, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(node.parent(), Some(pool.spawn_parent()));
        assert_eq!(pool.particles()[0].time(), 0.0);
        assert!(pool.particles()[0].keep_alive());
        assert_eq!(pool.particles()[0].data, Some(Vec3::new(1.0, 2.0, 0.0)));
        assert_eq!(scene.node(pool.spawn_parent()).unwrap().name(), "ParticleSystem");
    }

    #[test]
    fn update_moves_from_spawn_point() {
        let mut scene = SceneGraph::new();
        let mut pool = bullet_pool(&mut scene);
        let id = pool.spawn(&mut scene, Some(Vec3::new(1.0, 0.0, 0.0))).unwrap();

        pool.update(&mut scene, 0.25);
        pool.update(&mut scene, 0.25);
        let pos = scene.node(id).unwrap().position;
        assert!((pos.x() - 1.0).abs() < 1e-5);
        assert!((pos.y() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn check_requires_animation_and_predicate() {
        let mut scene = SceneGraph::new();
        let mut pool = bullet_pool(&mut scene);
        let near = pool.spawn(&mut scene, Some(Vec3::ZERO)).unwrap();
        let far = pool.spawn(&mut scene, Some(Vec3::new(0.0, 4.5, 0.0))).unwrap();

        // far crosses y = 5 and fails the predicate
        pool.update(&mut scene, 0.1);
        pool.check(&mut scene);
        assert_eq!(pool.live_count(), 1);
        assert_eq!(pool.particles()[0].node(), near);
        assert!(!scene.node(far).unwrap().drawable.visible());
        assert_disjoint(&pool);

        // near is still on screen but its animation expired
        pool.update(&mut scene, 0.95);
        assert!(!pool.particles()[0].keep_alive());
        pool.check(&mut scene);
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.free_count(), 2);
        assert_disjoint(&pool);
    }

    #[test]
    fn zero_duration_fade_applies_target_once() {
        let mut scene = SceneGraph::new();
        let owner = scene.spawn_child(scene.root(), "ship", None).unwrap();
        let param = ParticleParam {
            particle_name: "flash".to_string(),
            drawable: DrawableAsset::Sphere {
                stroke: 1.0,
                color: "#fff".to_string(),
            },
            spawn_parent: None,
            animations: vec![AnimationAsset::lerp(
                "fade",
                AnimateField::Opacity,
                0.0,
                FieldValue::Scalar(0.0),
            )],
        };
        let mut pool: ParticleSystem<()> = ParticleSystem::new(
            &mut scene,
            owner,
            param,
            Box::new(|_: &mut Particle<()>, _: &mut Node, _: Option<()>| {}),
            Box::new(|_: &Particle<()>, _: &Node| true),
        )
        .unwrap();

        let id = pool.spawn(&mut scene, None).unwrap();
        assert_eq!(scene.node(id).unwrap().opacity.get(), 0.0);

        pool.update(&mut scene, 0.1);
        pool.check(&mut scene);
        assert!(scene.node(id).unwrap().opacity.get().is_finite());
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn recycling_reuses_node_handles() {
        let mut scene = SceneGraph::new();
        let mut pool = bullet_pool(&mut scene);
        let first: HashSet<_> = (0..5)
            .map(|_| pool.spawn(&mut scene, None).unwrap())
            .collect();
        let nodes_after_warmup = scene.node_count();

        pool.update(&mut scene, 2.0);
        pool.check(&mut scene);
        assert_eq!(pool.live_count(), 0);

        let second: HashSet<_> = (0..5)
            .map(|_| pool.spawn(&mut scene, None).unwrap())
            .collect();
        assert_eq!(first, second);
        assert_eq!(scene.node_count(), nodes_after_warmup);
        assert!(second.iter().all(|&id| scene.node(id).unwrap().drawable.visible()));
        assert_disjoint(&pool);
    }

    #[test]
    fn recycled_particle_gets_fresh_state() {
        let mut scene = SceneGraph::new();
        let mut pool = bullet_pool(&mut scene);
        pool.spawn(&mut scene, Some(Vec3::new(3.0, 0.0, 0.0)));
        pool.update(&mut scene, 0.3);
        pool.clear(&mut scene);

        let id = pool.spawn(&mut scene, Some(Vec3::new(-3.0, 0.0, 0.0))).unwrap();
        let p = &pool.particles()[0];
        assert_eq!(p.time(), 0.0);
        assert_eq!(p.data, Some(Vec3::new(-3.0, 0.0, 0.0)));
        assert_eq!(scene.node(id).unwrap().position, Vec3::new(-3.0, 0.0, 0.0));
    }

    #[test]
    fn clear_retires_everything() {
        let mut scene = SceneGraph::new();
        let mut pool = bullet_pool(&mut scene);
        for _ in 0..3 {
            pool.spawn(&mut scene, None);
        }
        pool.clear(&mut scene);
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.free_count(), 3);
        assert_eq!(pool.allocated(), 3);
        assert_disjoint(&pool);

        // Clearing twice is harmless
        pool.clear(&mut scene);
        assert_eq!(pool.allocated(), 3);
    }

    #[test]
    fn retire_moves_one_particle() {
        let mut scene = SceneGraph::new();
        let mut pool = bullet_pool(&mut scene);
        let a = pool.spawn(&mut scene, None).unwrap();
        let b = pool.spawn(&mut scene, None).unwrap();

        assert!(pool.retire(&mut scene, a));
        assert!(!pool.retire(&mut scene, a));
        assert_eq!(pool.live_count(), 1);
        assert_eq!(pool.particles()[0].node(), b);
        assert!(!scene.node(a).unwrap().drawable.visible());
        assert_disjoint(&pool);
    }

    #[test]
    fn explicit_spawn_parent_is_used() {
        let mut scene = SceneGraph::new();
        let layer = scene.spawn_child(scene.root(), "fx", None).unwrap();
        let owner = scene.spawn_child(scene.root(), "ship", None).unwrap();
        let mut param = bullet_param();
        param.spawn_parent = Some(layer);

        let mut pool: ParticleSystem<()> = ParticleSystem::new(
            &mut scene,
            owner,
            param,
            Box::new(|_: &mut Particle<()>, _: &mut Node, _: Option<()>| {}),
            Box::new(|_: &Particle<()>, _: &Node| true),
        )
        .unwrap();
        let id = pool.spawn(&mut scene, None).unwrap();
        assert_eq!(scene.parent(id), Some(layer));
        assert!(scene.children(owner).is_empty());

        let mut bad = bullet_param();
        bad.spawn_parent = Some(NodeId(999));
        let result: Result<ParticleSystem<()>> = ParticleSystem::new(
            &mut scene,
            owner,
            bad,
            Box::new(|_: &mut Particle<()>, _: &mut Node, _: Option<()>| {}),
            Box::new(|_: &Particle<()>, _: &Node| true),
        );
        assert!(result.is_err());
    }

    #[test]
    fn asset_creates_independent_pools() {
        let inits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&inits);
        let asset: ParticleSystemAsset<String, ()> = ParticleSystemAsset::new(
            |color: &String| ParticleParam {
                particle_name: format!("spark-{}", color),
                ..bullet_param()
            },
            move |_: &mut Particle<()>, _: &mut Node, _: Option<()>| counter.set(counter.get() + 1),
            |_: &Particle<()>, _: &Node| true,
        );

        let mut scene = SceneGraph::new();
        let a = scene.spawn_child(scene.root(), "a", None).unwrap();
        let b = scene.spawn_child(scene.root(), "b", None).unwrap();
        let mut pool_a = asset.create(&mut scene, a, &"#e63".to_string()).unwrap();
        let mut pool_b = asset.create(&mut scene, b, &"#2e3".to_string()).unwrap();

        pool_a.spawn(&mut scene, None);
        pool_b.spawn(&mut scene, None);
        pool_b.spawn(&mut scene, None);
        assert_eq!(inits.get(), 3);
        assert_eq!(pool_a.particle_name(), "spark-#e63");
        assert_eq!(pool_a.live_count(), 1);
        assert_eq!(pool_b.live_count(), 2);
    }
}
