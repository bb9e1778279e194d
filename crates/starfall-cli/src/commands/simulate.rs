//! Headless scripted match

use anyhow::{Context, Result};
use starfall_game::{GameConfig, GameLogic, LevelPhase};
use starfall_runtime::{actions, FrameRunner, GameClock, InputState, SharedSystem};
use starfall_scene::SceneGraph;
use std::cell::RefCell;
use std::rc::Rc;

/// Wall time fed per frame
const FRAME_TIME: f64 = 1.0 / 60.0;
/// Frames per pass of the input script
const SCRIPT_PERIOD: u64 = 120;

pub struct SimulateArgs {
    pub frames: u64,
    pub config: Option<String>,
    pub seed: Option<u64>,
    pub tree: bool,
}

/// Actions held on `frame`: always firing, sweeping left and right while
/// thrusting, then backing off.
fn scripted_actions(frame: u64) -> Vec<&'static str> {
    let mut held = vec![actions::FIRE];
    match frame % SCRIPT_PERIOD {
        0..=39 => held.extend([actions::FORWARD, actions::LEFT]),
        40..=79 => held.extend([actions::FORWARD, actions::RIGHT]),
        _ => held.push(actions::BACKWARD),
    }
    held
}

/// Press the first key bound to each held action, release everything else
fn apply_script(input: &mut InputState, config: &GameConfig, frame: u64) {
    input.release_all();
    for action in scripted_actions(frame) {
        match config.input.0.get(action).and_then(|keys| keys.first()) {
            Some(key) => input.process_key_down(key),
            None => log::debug!("action '{}' has no key bound", action),
        }
    }
}

/// A finished headless match, before shutdown
struct Match {
    scene: SceneGraph,
    runner: FrameRunner,
    logic: Rc<RefCell<GameLogic>>,
}

/// Load the level and run `frames` scripted frames through a [`FrameRunner`]
fn play(config: &GameConfig, frames: u64) -> Result<Match> {
    let mut scene = SceneGraph::new();
    let mut runner = FrameRunner::new(GameClock::with_max_tick(config.renderer.max_tick));
    let mut input = InputState::with_bindings(config.input.clone());
    let logic = Rc::new(RefCell::new(GameLogic::new(config.clone())));
    runner
        .add_system(&mut scene, Box::new(SharedSystem::new(Rc::clone(&logic))))
        .context("Failed to load level")?;

    for frame in 0..frames {
        apply_script(&mut input, config, frame);
        runner.frame(&mut scene, &mut input, FRAME_TIME);
    }

    Ok(Match {
        scene,
        runner,
        logic,
    })
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let mut config = super::config::resolve(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.level.seed = seed;
    }

    let Match {
        mut scene,
        mut runner,
        logic,
    } = play(&config, args.frames)?;

    {
        let logic = logic.borrow();
        let level = logic.level().context("Level was not loaded")?;
        let stats = level.stats();
        let phase = match level.phase() {
            LevelPhase::Loading => "loading".to_string(),
            LevelPhase::Playing => "playing".to_string(),
            LevelPhase::PlayerDead { since } => format!("player dead since {:.2}s", since),
            LevelPhase::WaveCleared { since } => format!("wave cleared at {:.2}s", since),
        };

        println!(
            "Simulated {} frames ({:.2}s game time, seed {})",
            stats.frames, runner.clock.total_time, config.level.seed
        );
        println!("  Wave:              {}", level.wave() + 1);
        println!("  Phase:             {}", phase);
        println!("  Enemies alive:     {}", level.enemies_alive());
        println!("  Enemies destroyed: {}", stats.enemies_destroyed);
        println!("  Waves cleared:     {}", stats.waves_cleared);
        println!("  Player deaths:     {}", stats.player_deaths);
        println!("  Shots fired:       {}", stats.shots_fired);
        println!("  Scene nodes:       {}", scene.node_count());
    }

    if args.tree {
        println!();
        print!("{}", scene.print_tree());
    }

    runner.shutdown(&mut scene);
    Ok(())
}
