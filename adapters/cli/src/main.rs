#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Simulation Garden.
//!
//! Runs the interactive macroquad window by default. `--headless` steps the
//! simulation a fixed number of times and prints the final grid together with
//! its population report.

mod config;

use std::{
    io::{self, Write},
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Parser;
use config::{ConfigLayer, SimulationConfig};
use glam::Vec2;
use sim_garden_controller::{ControllerConfig, SimulationController};
use sim_garden_core::{GridSnapshot, Pattern, PopulationReport, SimulationOption};
use sim_garden_rendering::{
    AgentPresentation, Color, ControlPanelView, Presentation, RenderingBackend, ScreenRect,
    ToastQueue,
};
use sim_garden_rendering_macroquad::MacroquadBackend;

/// Width of the control panel docked to the right of the grid.
const CONTROL_PANEL_WIDTH: f32 = 260.0;

/// Shortest window that still fits the control panel widgets.
const MIN_WINDOW_HEIGHT: f32 = 560.0;

#[derive(Debug, Parser)]
#[command(
    name = "sim-garden",
    version,
    about = "Cellular automata, Langton's Ant and Turmites on a zoomable grid"
)]
struct Args {
    /// TOML file with default settings; flags take precedence.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Simulation to run, e.g. `classic/conway` or `ants/turmites`.
    #[arg(long, value_name = "ID")]
    option: Option<String>,
    /// Pattern stamped at startup, e.g. `glider` or `random`.
    #[arg(long, value_name = "ID")]
    pattern: Option<String>,
    /// Steps per second.
    #[arg(long)]
    tick_rate: Option<i64>,
    /// Number of grid rows.
    #[arg(long)]
    rows: Option<u32>,
    /// Number of grid columns.
    #[arg(long)]
    columns: Option<u32>,
    /// Seed of the random pattern.
    #[arg(long)]
    seed: Option<u64>,
    /// Probability of a live cell in the random pattern.
    #[arg(long)]
    density: Option<f32>,
    /// On-screen size of one cell in pixels at zoom 1.
    #[arg(long)]
    cell_size: Option<f32>,
    /// Step without opening a window and print the result.
    #[arg(long)]
    headless: bool,
    /// Number of steps taken by a headless run.
    #[arg(long, default_value_t = 100)]
    ticks: u64,
    /// Compute generations on the calling thread instead of a worker.
    #[arg(long)]
    inline: bool,
    /// Print the option and pattern catalogs and exit.
    #[arg(long)]
    list: bool,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
}

impl Args {
    fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            rows: self.rows,
            columns: self.columns,
            tick_rate: self.tick_rate,
            option: self.option.clone(),
            pattern: self.pattern.clone(),
            seed: self.seed,
            density: self.density,
            cell_size: self.cell_size,
        }
    }
}

/// Entry point for the Simulation Garden command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list {
        return print_catalog(&mut io::stdout().lock());
    }

    let file = match &args.config {
        Some(path) => ConfigLayer::load(path)?,
        None => ConfigLayer::default(),
    };
    let config =
        SimulationConfig::resolve(args.layer().or(file)).context("invalid configuration")?;
    log::info!(
        "{} on a {}x{} grid at {} ticks/s",
        config.option,
        config.rows,
        config.columns,
        config.tick_rate.get()
    );

    if args.headless {
        run_headless(&config, args.ticks, !args.inline)
    } else {
        run_window(&config, !args.inline, args.show_fps)
    }
}

fn controller_config(
    config: &SimulationConfig,
    viewport: ScreenRect,
    background: bool,
) -> ControllerConfig {
    ControllerConfig {
        rows: config.rows,
        columns: config.columns,
        option: config.option,
        pattern: config.pattern,
        tick_rate: config.tick_rate,
        seed: config.seed,
        density: config.density,
        background,
        viewport,
    }
}

fn run_headless(config: &SimulationConfig, ticks: u64, background: bool) -> Result<()> {
    let grid_size = Vec2::new(
        config.columns as f32 * config.cell_size,
        config.rows as f32 * config.cell_size,
    );
    let mut controller = SimulationController::new(controller_config(
        config,
        ScreenRect::new(Vec2::ZERO, grid_size),
        background,
    ));
    controller.start();
    let steps = controller.run_ticks(ticks);
    if steps < ticks {
        log::warn!("stopped after {steps} of {ticks} steps");
    }

    let scene = controller.scene();
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(render_ascii(&scene.grid, &scene.agents).as_bytes())
        .context("failed to write grid")?;
    if let Some(report) = controller.population() {
        writeln!(stdout, "{}", describe_report(report)).context("failed to write report")?;
    }
    Ok(())
}

fn run_window(config: &SimulationConfig, background: bool, show_fps: bool) -> Result<()> {
    let grid_size = Vec2::new(
        config.columns as f32 * config.cell_size,
        config.rows as f32 * config.cell_size,
    );
    let window_width = (grid_size.x + CONTROL_PANEL_WIDTH).round() as i32;
    let window_height = grid_size.y.max(MIN_WINDOW_HEIGHT).round() as i32;

    let mut controller = SimulationController::new(controller_config(
        config,
        ScreenRect::new(Vec2::ZERO, grid_size),
        background,
    ));
    let mut scene = controller.scene();
    scene.control_panel = Some(ControlPanelView {
        width: CONTROL_PANEL_WIDTH,
        background: Color::from_rgb_u8(0x1e, 0x22, 0x2a),
    });
    let presentation = Presentation::new("Simulation Garden", scene.palette.background, scene);

    let started = Instant::now();
    let mut toasts = ToastQueue::default();
    MacroquadBackend::new()
        .with_vsync(true)
        .with_show_fps(show_fps)
        .with_window_size(window_width, window_height)
        .run(presentation, move |dt, input, scene| {
            controller.handle_input(input);
            controller.frame(started.elapsed());

            toasts.advance(dt);
            for notification in controller.drain_notifications() {
                toasts.push(notification);
            }

            controller.populate_scene(scene);
            scene.toasts = toasts.visible().to_vec();
        })
}

fn print_catalog(out: &mut impl Write) -> Result<()> {
    writeln!(out, "Simulations:")?;
    for option in SimulationOption::ALL {
        writeln!(out, "  {:<20} {}", option.to_string(), option.name())?;
        for line in option.description().lines() {
            writeln!(out, "  {:<20}   {}", "", line.trim())?;
        }
    }
    writeln!(out, "Patterns:")?;
    for pattern in Pattern::ALL {
        writeln!(out, "  {:<20} {}", pattern.id(), pattern.name())?;
    }
    Ok(())
}

/// Draws the grid as text, one line per row, with agents shown as `@`.
fn render_ascii(grid: &GridSnapshot, agents: &[AgentPresentation]) -> String {
    let columns = grid.columns() as usize;
    if columns == 0 {
        return String::new();
    }
    let mut text = String::with_capacity((columns + 1) * grid.rows() as usize);
    for (index, &state) in grid.cells().iter().enumerate() {
        text.push(match state {
            0 => '.',
            1 => '#',
            2 => '+',
            _ => '*',
        });
        if (index + 1) % columns == 0 {
            text.push('\n');
        }
    }

    for agent in agents {
        let line = agent.row as usize * (columns + 1);
        let at = line + agent.column as usize;
        if agent.column as usize >= columns || at >= text.len() {
            continue;
        }
        text.replace_range(at..at + 1, "@");
    }
    text
}

fn describe_report(report: &PopulationReport) -> String {
    let per_state = report
        .per_state()
        .iter()
        .enumerate()
        .map(|(state, count)| format!("{state}:{count}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "step {}: population {}/{} ({:.1}%) [{}]",
        report.step(),
        report.population(),
        report.total_cells(),
        report.density() * 100.0,
        per_state
    )
}
