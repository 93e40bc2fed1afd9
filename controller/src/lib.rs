#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation controller composing the world with its systems.
//!
//! [`SimulationController`] is the only mutation surface offered to shells.
//! Every request becomes a [`Command`] applied to the world; the resulting
//! events are fed to the scheduler, the steppers and analytics, whose answers
//! are applied in turn until the batch settles.

mod notify;

use std::time::Duration;

use glam::Vec2;
use sim_garden_core::{
    CellCoord, Command, Event, Family, GridSnapshot, Notification, Pattern, PopulationReport,
    Rule, SimulationOption, SimulationState, TickRate, TickRateError, DEFAULT_GRID_COLUMNS,
    DEFAULT_GRID_ROWS, DEFAULT_RANDOM_DENSITY, MAX_GRID_EDGE,
};
use sim_garden_rendering::{
    AgentPresentation, ControlAction, FrameInput, Palette, PointerInput, Scene, ScreenRect,
    StatusPresentation, Viewport, ViewportTransform,
};
use sim_garden_system_analytics::Analytics;
use sim_garden_system_ants::Ants;
use sim_garden_system_automaton::Automaton;
use sim_garden_system_scheduler::TickScheduler;
use sim_garden_world::{self as world, query, World, DEFAULT_SEED};

/// Longest time a headless run waits for a background generation.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Startup parameters of a controller.
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerConfig {
    /// Number of grid rows, clamped to `1..=MAX_GRID_EDGE`.
    pub rows: u32,
    /// Number of grid columns, clamped to `1..=MAX_GRID_EDGE`.
    pub columns: u32,
    /// Option active at startup.
    pub option: SimulationOption,
    /// Pattern stamped at startup, if any.
    pub pattern: Option<Pattern>,
    /// Initial tick rate.
    pub tick_rate: TickRate,
    /// Seed of the random pattern.
    pub seed: u64,
    /// Probability of a live cell in the random pattern.
    pub density: f32,
    /// Whether generations are computed on a background thread.
    pub background: bool,
    /// Screen area the grid fills at zoom 1.
    pub viewport: ScreenRect,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_ROWS,
            columns: DEFAULT_GRID_COLUMNS,
            option: SimulationOption::default(),
            pattern: None,
            tick_rate: TickRate::DEFAULT,
            seed: DEFAULT_SEED,
            density: DEFAULT_RANDOM_DENSITY,
            background: false,
            viewport: ScreenRect::new(Vec2::ZERO, Vec2::splat(800.0)),
        }
    }
}

/// Owns the simulation and translates shell requests into commands.
#[derive(Debug)]
pub struct SimulationController {
    world: World,
    automaton: Automaton,
    ants: Ants,
    scheduler: TickScheduler,
    analytics: Analytics,
    viewport: Viewport,
    grid_area: ScreenRect,
    notifications: Vec<Notification>,
    population: Option<PopulationReport>,
    classic_rule: Rule,
    pattern: Pattern,
}

impl SimulationController {
    /// Creates a controller and seeds the world from `config`.
    ///
    /// Falls back to inline stepping when the background worker cannot be
    /// spawned. Grid edges are clamped to `1..=MAX_GRID_EDGE`.
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        let rows = clamp_edge("rows", config.rows);
        let columns = clamp_edge("columns", config.columns);
        let automaton = if config.background {
            Automaton::background().unwrap_or_else(|error| {
                log::warn!("{error}; computing generations inline");
                Automaton::inline()
            })
        } else {
            Automaton::inline()
        };

        let mut controller = Self {
            world: World::new(),
            automaton,
            ants: Ants::new(),
            scheduler: TickScheduler::default(),
            analytics: Analytics::new(),
            viewport: Viewport::new(config.viewport.fit_grid(rows, columns)),
            grid_area: config.viewport,
            notifications: Vec::new(),
            population: None,
            classic_rule: config.option.rule().unwrap_or(Rule::Conway),
            pattern: config.pattern.unwrap_or(Pattern::Random),
        };

        let mut commands = vec![
            Command::ConfigureGrid { rows, columns },
            Command::ConfigureRandomFill {
                density: config.density,
                seed: config.seed,
            },
            Command::SelectOption {
                option: config.option,
            },
            Command::SetTickRate {
                requested: i64::from(config.tick_rate.get()),
            },
        ];
        if let Some(pattern) = config.pattern {
            commands.push(Command::ApplyPattern { pattern });
        }
        controller.dispatch_all(commands);
        controller.notifications.clear();

        log::info!(
            "controller ready: {}x{} grid running {}",
            rows,
            columns,
            config.option
        );
        controller
    }

    /// Switches to a classic cellular automaton rule.
    pub fn select_rule(&mut self, rule: Rule) {
        self.select_option(SimulationOption::Classic(rule));
    }

    /// Switches family; the classic family resumes its last rule.
    pub fn select_family(&mut self, family: Family) {
        let option = match family {
            Family::Classic => SimulationOption::Classic(self.classic_rule),
            Family::Langton => SimulationOption::Langton,
            Family::Turmites => SimulationOption::Turmites,
        };
        self.select_option(option);
    }

    /// Switches the active option, resetting the grid and step counter.
    pub fn select_option(&mut self, option: SimulationOption) {
        if let Some(rule) = option.rule() {
            self.classic_rule = rule;
        }
        self.dispatch(Command::SelectOption { option });
    }

    /// Switches to the option after the current one in menu order.
    pub fn next_option(&mut self) {
        let current = self.option();
        let index = SimulationOption::ALL
            .iter()
            .position(|option| *option == current)
            .unwrap_or(0);
        let next = SimulationOption::ALL[(index + 1) % SimulationOption::ALL.len()];
        self.select_option(next);
    }

    /// Requests an absolute tick rate; invalid values are rejected.
    pub fn set_tick_rate(&mut self, requested: i64) {
        self.dispatch(Command::SetTickRate { requested });
    }

    /// Requests a tick rate typed by the user.
    pub fn set_tick_rate_text(&mut self, text: &str) {
        match text.trim().parse::<i64>() {
            Ok(requested) => self.set_tick_rate(requested),
            Err(_) => {
                let error = TickRateError::NotANumber {
                    input: text.trim().to_owned(),
                };
                log::warn!("rejected tick rate: {error}");
                self.observe(&[Event::TickRateRejected { error }]);
            }
        }
    }

    /// Nudges the tick rate, saturating at one and the family cap.
    pub fn adjust_speed(&mut self, delta: i64) {
        self.dispatch(Command::AdjustSpeed { delta });
    }

    /// Starts stepping.
    pub fn start(&mut self) {
        self.dispatch(Command::Start);
    }

    /// Stops stepping; no tick fires after this returns.
    pub fn stop(&mut self) {
        self.dispatch(Command::Stop);
    }

    /// Starts when stopped and stops when running.
    pub fn toggle_running(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Restores the initial grid, step counter and viewport.
    pub fn reset(&mut self) {
        self.dispatch(Command::Reset);
    }

    /// Flips a single cell.
    pub fn toggle_cell(&mut self, cell: CellCoord) {
        self.dispatch(Command::ToggleCell { cell });
    }

    /// Reseeds the grid from the pattern catalog.
    pub fn apply_pattern(&mut self, pattern: Pattern) {
        self.pattern = pattern;
        self.dispatch(Command::ApplyPattern { pattern });
    }

    /// Stamps the pattern after the last applied one.
    pub fn next_pattern(&mut self) {
        self.apply_pattern(self.pattern.next());
    }

    /// Applies a wheel notch anchored at the cursor.
    pub fn wheel(&mut self, delta_y: f32, cursor: Vec2) {
        self.viewport.wheel(delta_y, cursor);
    }

    /// Applies a pinch gesture.
    pub fn pinch(&mut self, scale: f32, center: Vec2) {
        self.viewport.pinch(scale, center);
    }

    /// Begins a drag or click at `point`.
    pub fn drag_start(&mut self, point: Vec2) {
        self.viewport.drag_start(point);
    }

    /// Pans with the pointer.
    pub fn drag_move(&mut self, point: Vec2) {
        self.viewport.drag_move(point);
    }

    /// Ends the gesture; a press that never moved toggles the cell under it.
    pub fn drag_end(&mut self, point: Vec2) {
        if !self.viewport.drag_end(point) {
            return;
        }
        let view = query::grid_view(&self.world);
        if let Some(cell) = self.viewport.cell_at(point, view.rows(), view.columns()) {
            log::debug!("click toggles {cell:?}");
            self.toggle_cell(cell);
        }
    }

    /// Restores zoom 1 and a centered grid.
    pub fn reset_viewport(&mut self) {
        self.viewport.reset();
    }

    /// Fits the grid inside a new screen area.
    pub fn set_grid_area(&mut self, area: ScreenRect) {
        self.grid_area = area;
        let view = query::grid_view(&self.world);
        self.viewport
            .set_bounds(area.fit_grid(view.rows(), view.columns()));
    }

    /// Applies one frame's worth of shell input.
    pub fn handle_input(&mut self, input: FrameInput) {
        let FrameInput {
            grid_area,
            pointer,
            actions,
        } = input;

        if let Some(area) = grid_area {
            self.set_grid_area(area);
        }
        for action in actions {
            self.handle_action(action);
        }
        self.handle_pointer(pointer);
    }

    /// Advances the clock: collects finished generations and lets the
    /// scheduler fire at most one tick.
    ///
    /// `now` must come from a monotonic clock.
    pub fn frame(&mut self, now: Duration) {
        let mut commands = Vec::new();
        self.automaton.poll(&mut commands);
        self.dispatch_all(commands);

        let mut commands = Vec::new();
        self.scheduler.poll(now, &mut commands);
        self.dispatch_all(commands);
    }

    /// Requests one step immediately, bypassing the scheduler.
    ///
    /// Ignored while stopped.
    pub fn tick(&mut self) {
        self.dispatch(Command::Tick);
    }

    /// Waits for an in-flight background generation and applies it.
    ///
    /// Returns `true` when a result was collected.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let mut commands = Vec::new();
        let collected = self.automaton.wait(timeout, &mut commands);
        self.dispatch_all(commands);
        collected
    }

    /// Runs up to `ticks` steps back to back and returns how many completed.
    ///
    /// Used by headless shells; does nothing while stopped.
    pub fn run_ticks(&mut self, ticks: u64) -> u64 {
        let before = self.step_count();
        for _ in 0..ticks {
            if !self.is_running() {
                break;
            }
            self.tick();
            if !self.automaton.is_idle() && !self.settle(GENERATION_TIMEOUT) {
                log::warn!("background generation did not finish in time");
                break;
            }
        }
        self.step_count().saturating_sub(before)
    }

    /// Run state, tick rate and step counter.
    #[must_use]
    pub fn state(&self) -> SimulationState {
        query::simulation_state(&self.world)
    }

    /// Steps since the last reset.
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.state().step_count
    }

    /// Whether ticks currently advance the simulation.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state().running
    }

    /// Current tick rate.
    #[must_use]
    pub fn tick_rate(&self) -> TickRate {
        self.state().tick_rate
    }

    /// Active option.
    #[must_use]
    pub fn option(&self) -> SimulationOption {
        query::option(&self.world)
    }

    /// Last applied pattern, or the one the next-pattern action starts from.
    #[must_use]
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Read-only snapshot of the latest completed generation.
    #[must_use]
    pub fn grid(&self) -> GridSnapshot {
        query::grid_snapshot(&self.world)
    }

    /// Zoom and offset to apply when drawing the grid.
    #[must_use]
    pub fn transform(&self) -> ViewportTransform {
        self.viewport.transform()
    }

    /// Pointer-driven viewport state.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Most recent population statistics.
    #[must_use]
    pub fn population(&self) -> Option<&PopulationReport> {
        self.population.as_ref()
    }

    /// Ticks skipped because a generation was still computing.
    #[must_use]
    pub fn dropped_ticks(&self) -> u64 {
        self.automaton.dropped_ticks()
    }

    /// Removes and returns notifications raised since the last call.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Refreshes `scene` with the current simulation state.
    pub fn populate_scene(&self, scene: &mut Scene) {
        let state = self.state();
        let option = self.option();
        if scene.status.option != option {
            scene.palette = Palette::for_option(option);
        }
        scene.grid = self.grid();
        scene.agents.clear();
        scene
            .agents
            .extend(query::agents(&self.world).iter().map(AgentPresentation::from));
        scene.transform = self.viewport.transform();
        scene.status = StatusPresentation {
            option,
            running: state.running,
            step_count: state.step_count,
            tick_rate: state.tick_rate,
            population: self.population().map(PopulationReport::population),
        };
    }

    /// Builds a fresh scene for the current state.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let state = self.state();
        let mut scene = Scene::new(
            self.grid(),
            StatusPresentation {
                option: self.option(),
                running: state.running,
                step_count: state.step_count,
                tick_rate: state.tick_rate,
                population: None,
            },
        );
        self.populate_scene(&mut scene);
        scene
    }

    fn handle_action(&mut self, action: ControlAction) {
        match action {
            ControlAction::ToggleRunning => self.toggle_running(),
            ControlAction::Reset => self.reset(),
            ControlAction::NextPattern => self.next_pattern(),
            ControlAction::ApplyPattern(pattern) => self.apply_pattern(pattern),
            ControlAction::NextOption => self.next_option(),
            ControlAction::SelectOption(option) => self.select_option(option),
            ControlAction::AdjustSpeed(delta) => self.adjust_speed(delta),
            ControlAction::SetTickRate(text) => self.set_tick_rate_text(&text),
            ControlAction::ResetViewport => self.reset_viewport(),
        }
    }

    fn handle_pointer(&mut self, pointer: PointerInput) {
        let Some(position) = pointer.position else {
            if pointer.released {
                let _ = self.viewport.drag_end(Vec2::splat(f32::INFINITY));
            }
            return;
        };

        if pointer.wheel_delta != 0.0 {
            self.wheel(pointer.wheel_delta, position);
        }
        if let Some(scale) = pointer.pinch {
            self.pinch(scale, position);
        }
        if pointer.pressed {
            self.drag_start(position);
        } else if self.viewport.is_dragging() {
            self.drag_move(position);
        }
        if pointer.released {
            self.drag_end(position);
        }
    }

    fn dispatch(&mut self, command: Command) {
        self.dispatch_all(vec![command]);
    }

    fn dispatch_all(&mut self, commands: Vec<Command>) {
        let mut pending = commands;
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            if events.is_empty() {
                break;
            }
            pending = self.react(&events);
        }
    }

    fn react(&mut self, events: &[Event]) -> Vec<Command> {
        self.scheduler.handle(events);

        let mut commands = Vec::new();
        self.automaton
            .handle(events, &query::grid_snapshot(&self.world), &mut commands);
        self.ants.handle(
            events,
            query::grid_view(&self.world),
            query::agents(&self.world),
            &mut commands,
        );

        let mut published = Vec::new();
        self.analytics.handle(
            events,
            query::grid_view(&self.world),
            query::cell_states(&self.world),
            self.step_count(),
            &mut published,
        );

        if events
            .iter()
            .any(|event| matches!(event, Event::SimulationReset { .. }))
        {
            self.viewport.reset();
        }
        if events
            .iter()
            .any(|event| matches!(event, Event::GridConfigured { .. }))
        {
            self.set_grid_area(self.grid_area);
        }

        self.observe(events);
        self.observe(&published);
        commands
    }

    fn observe(&mut self, events: &[Event]) {
        for event in events {
            if let Event::PopulationReported { report } = event {
                log::debug!(
                    "step {}: population {}/{}",
                    report.step(),
                    report.population(),
                    report.total_cells()
                );
                self.population = Some(report.clone());
            }
        }
        self.notifications
            .extend(events.iter().filter_map(notify::notification_for));
    }
}

impl Default for SimulationController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

fn clamp_edge(axis: &str, requested: u32) -> u32 {
    let edge = requested.clamp(1, MAX_GRID_EDGE);
    if edge != requested {
        log::warn!("grid {axis} {requested} outside 1..={MAX_GRID_EDGE}, using {edge}");
    }
    edge
}
