/*
 * Boid Flocking Demo
 *
 * A window full of boids driven by the engine. Each frame the demo:
 * 1. Turns the pointer into an attraction target (none after a second of stillness)
 * 2. Ticks the universe once
 * 3. Reads every boid back and draws it as a tinted triangle
 *
 * Window resizes are forwarded to the universe without repositioning.
 */

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use nannou::prelude::*;
use rand::Rng;

use boid_universe::{Rules, SimulationConfig, Universe};

const BOID_SIZE: f32 = 20.0;
const POINTER_IDLE: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(name = "boid-demo", about = "Flocking boids in a wrapping window")]
struct Args {
    /// TOML simulation config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of boids
    #[arg(long)]
    agents: Option<usize>,
}

struct Model {
    universe: Universe,
    tints: Vec<Rgb<u8>>,
    pointer: Option<(Point2, Instant)>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    nannou::app(model).update(update).run();
}

// Preset bucket for boid `i`: mostly small, every 10th and 100th larger.
fn preset(i: usize) -> u32 {
    if i % 100 == 0 {
        15
    } else if i % 10 == 0 {
        8
    } else if i % 2 == 0 {
        6
    } else {
        3
    }
}

fn tint(preset: u32) -> Rgb<u8> {
    let r = if preset > 10 { 0xff } else { 0xaa };
    let g = if preset % 3 != 0 { 0xff } else { 0x22 };
    let b = if preset > 5 { 0xff } else { 0x77 };
    rgb(r, g, b)
}

fn model(app: &App) -> Model {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path).expect("Failed to load config"),
        None => SimulationConfig::default(),
    };
    if let Some(agents) = args.agents {
        config.agent_count = agents;
    }

    app.new_window()
        .title("Boid Flocking")
        .size(config.world.width as u32, config.world.height as u32)
        .view(view)
        .mouse_moved(mouse_moved)
        .resized(resized)
        .build()
        .unwrap();

    let mut universe = config.build_universe().expect("Invalid world config");
    let mut tints = Vec::with_capacity(config.agent_count);
    let mut rng = rand::thread_rng();

    for i in 0..config.agent_count {
        let x = rng.gen_range(0.0..universe.width());
        let y = rng.gen_range(0.0..universe.height());
        let heading = rng.gen_range(0..360) as f32 * (PI / 180.0);

        let bucket = preset(i);
        let scale = (2.0 + bucket as f32 / 2.0) / 10.0;
        let rules: Rules = config.rules.with_speed_and_size(2.0 / scale.sqrt(), scale);

        universe.add_agent(x, y, heading, rules);
        tints.push(tint(bucket));
    }

    tracing::info!(agents = universe.agent_count(), "demo ready");

    Model {
        universe,
        tints,
        pointer: None,
    }
}

// Engine space has its origin top-left with y down; nannou is centered with y up.
fn to_world(universe: &Universe, pos: Point2) -> boid_universe::Vec2 {
    boid_universe::Vec2::new(pos.x + universe.width() / 2.0, universe.height() / 2.0 - pos.y)
}

fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    model.pointer = Some((pos, Instant::now()));
}

fn resized(_app: &App, model: &mut Model, size: Vec2) {
    if let Err(err) = model.universe.resize(size.x, size.y, false) {
        tracing::warn!(%err, "ignoring window resize");
    }
}

fn update(_app: &App, model: &mut Model, _update: Update) {
    let target = match model.pointer {
        Some((pos, moved_at)) if moved_at.elapsed() < POINTER_IDLE => Some(to_world(&model.universe, pos)),
        _ => None,
    };
    model.universe.tick(target);
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let half_width = model.universe.width() / 2.0;
    let half_height = model.universe.height() / 2.0;

    for (boid, &color) in model.universe.agents().iter().zip(&model.tints) {
        let agent = boid.view();
        let size = BOID_SIZE * boid.rules().size;
        let points = [
            pt2(size, 0.0),
            pt2(-size, size / 2.0),
            pt2(-size, -size / 2.0),
        ];

        draw.polygon()
            .color(color)
            .points(points)
            .x_y(agent.x - half_width, half_height - agent.y)
            .rotate(-agent.heading);
    }

    let stats = model.universe.last_tick_stats();
    draw.text(&format!(
        "tick {}  {:.2} ms  {:.1} neighbors/boid",
        stats.tick,
        stats.duration.as_secs_f64() * 1000.0,
        stats.average_neighbors()
    ))
    .x_y(-half_width + 140.0, half_height - 20.0)
    .color(WHITE)
    .font_size(14);

    draw.to_frame(app, &frame).unwrap();
}
