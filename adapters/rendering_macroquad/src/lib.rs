#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Simulation Garden.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The adapter uses Macroquad's immediate-mode UI module for the control
//! panel. All UI-specific calls live inside the local `ui` module.

mod ui;

use self::ui::{draw_control_panel_ui, ControlPanelUiContext};
use anyhow::Result;
use glam::Vec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, is_mouse_button_released, mouse_position,
    mouse_wheel, touches, KeyCode, MouseButton,
};
use macroquad::math::Vec2 as MacroquadVec2;
use sim_garden_core::{Heading, NotificationKind};
use sim_garden_rendering::{
    ControlAction, ControlPanelView, FrameInput, PointerInput, Presentation, RenderingBackend,
    Scene, ScreenRect, ToastPresentation,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct ControlPanelInputState {
    latched: Vec<ControlAction>,
    rate_text: String,
}

impl ControlPanelInputState {
    /// Returns the actions requested through the panel and clears the latch so
    /// each fires only once.
    pub fn take_actions(&mut self) -> Vec<ControlAction> {
        std::mem::take(&mut self.latched)
    }

    /// Records an action requested through the panel this frame.
    pub fn register(&mut self, action: ControlAction) {
        self.latched.push(action);
    }

    /// Text currently typed into the tick rate field.
    pub fn rate_text_mut(&mut self) -> &mut String {
        &mut self.rate_text
    }

    /// Latches a tick rate request carrying the typed text.
    pub fn submit_rate_text(&mut self) {
        let text = self.rate_text.trim().to_owned();
        if !text.is_empty() {
            self.register(ControlAction::SetTickRate(text));
        }
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the loop.
    quit_requested: bool,
    /// `Space` starts or stops the simulation.
    toggle_running: bool,
    /// `R` resets the simulation.
    reset: bool,
    /// `N` stamps the next pattern.
    next_pattern: bool,
    /// `Tab` switches to the next option.
    next_option: bool,
    /// `Up`, `+` or `=` speeds up.
    faster: bool,
    /// `Down` or `-` slows down.
    slower: bool,
    /// `0` restores the default zoom.
    reset_viewport: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            toggle_running: is_key_pressed(KeyCode::Space),
            reset: is_key_pressed(KeyCode::R),
            next_pattern: is_key_pressed(KeyCode::N),
            next_option: is_key_pressed(KeyCode::Tab),
            faster: is_key_pressed(KeyCode::Up)
                || is_key_pressed(KeyCode::Equal)
                || is_key_pressed(KeyCode::KpAdd),
            slower: is_key_pressed(KeyCode::Down)
                || is_key_pressed(KeyCode::Minus)
                || is_key_pressed(KeyCode::KpSubtract),
            reset_viewport: is_key_pressed(KeyCode::Key0) || is_key_pressed(KeyCode::Kp0),
        }
    }

    fn actions(self, speed_step: i64) -> Vec<ControlAction> {
        let mut actions = Vec::new();
        let mut push = |enabled: bool, action: ControlAction| {
            if enabled {
                actions.push(action);
            }
        };
        push(self.toggle_running, ControlAction::ToggleRunning);
        push(self.reset, ControlAction::Reset);
        push(self.next_pattern, ControlAction::NextPattern);
        push(self.next_option, ControlAction::NextOption);
        push(self.faster, ControlAction::AdjustSpeed(speed_step));
        push(self.slower, ControlAction::AdjustSpeed(-speed_step));
        push(self.reset_viewport, ControlAction::ResetViewport);
        actions
    }
}

/// Turns two-finger touches into frame-to-frame pinch scale factors.
#[derive(Clone, Copy, Debug, Default)]
struct PinchTracker {
    previous_span: Option<f32>,
}

impl PinchTracker {
    fn observe(&mut self, points: Option<(Vec2, Vec2)>) -> Option<(f32, Vec2)> {
        let Some((first, second)) = points else {
            self.previous_span = None;
            return None;
        };
        let span = first.distance(second);
        let center = (first + second) * 0.5;
        let previous = self.previous_span.replace(span)?;
        if previous <= f32::EPSILON || span <= f32::EPSILON {
            return None;
        }
        Some((span / previous, center))
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    window_size: Option<(i32, i32)>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Requests an initial window size in pixels.
    #[must_use]
    pub fn with_window_size(mut self, width: i32, height: i32) -> Self {
        self.window_size = Some((width.max(1), height.max(1)));
        self
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing
    /// ten-second averages once one second has elapsed.
    fn record_frame(
        &mut self,
        frame: Duration,
        update: Duration,
        render: Duration,
    ) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += update;
        self.render_accum += render;

        self.frame_times.push_back(frame);
        self.window_duration += frame;
        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            let Some(removed) = self.frame_times.pop_front() else {
                break;
            };
            self.window_duration = self.window_duration.saturating_sub(removed);
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_update: self.update_accum / self.frames.max(1),
            avg_render: self.render_accum / self.frames.max(1),
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.update_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            window_size,
        } = self;
        let (window_width, window_height) = window_size.unwrap_or((1100, 800));

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width,
            window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut control_panel_input = ControlPanelInputState::default();
            let mut pinch = PinchTracker::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let frame_dt =
                    Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));

                let metrics_before = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let speed_step = scene
                    .status
                    .option
                    .family()
                    .speed_nudges()
                    .first()
                    .copied()
                    .map_or(1, i64::from);
                let mut actions = control_panel_input.take_actions();
                actions.extend(keyboard.actions(speed_step));
                let frame_input = FrameInput {
                    grid_area: Some(metrics_before.grid_area),
                    pointer: gather_pointer_input(&metrics_before, &mut pinch),
                    actions,
                };

                let update_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();

                let render_start = Instant::now();
                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                draw_grid(&scene, &metrics, screen_width, screen_height);
                draw_agents(&scene, &metrics);
                if let Some(panel_context) = draw_control_panel(&scene, screen_width, screen_height)
                {
                    let mut control_panel_ui = macroquad::ui::root_ui();
                    draw_control_panel_ui(
                        &mut control_panel_ui,
                        panel_context,
                        &mut control_panel_input,
                    );
                }
                draw_toasts(&scene.toasts, &metrics);
                let render_duration = render_start.elapsed();

                if let Some(FpsMetrics {
                    per_second,
                    trailing_ten_seconds,
                    avg_update,
                    avg_render,
                }) = fps_counter.record_frame(frame_dt, update_duration, render_duration)
                {
                    if show_fps {
                        log::info!(
                            "FPS: {:.2} (10s avg: {:.2}) | update: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_update.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Screen-space layout of the grid for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    /// Area left of the control panel.
    grid_area: ScreenRect,
    /// Rectangle the grid fills at zoom 1.
    bounds: ScreenRect,
    /// Edge length of one cell on screen, zoom included.
    cell_step: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let panel_width = scene
            .control_panel
            .map_or(0.0, |panel| panel.width.max(0.0))
            .min(screen_width);
        let grid_area = ScreenRect::new(
            Vec2::ZERO,
            Vec2::new((screen_width - panel_width).max(0.0), screen_height.max(0.0)),
        );
        let rows = scene.grid.rows();
        let columns = scene.grid.columns();
        let bounds = grid_area.fit_grid(rows, columns);
        let cell_step = if columns == 0 {
            0.0
        } else {
            bounds.size.x / columns as f32 * scene.transform.zoom
        };
        Self {
            grid_area,
            bounds,
            cell_step,
        }
    }

    /// Top-left corner of a cell on screen.
    fn cell_origin(&self, scene: &Scene, column: u32, row: u32) -> Vec2 {
        let unscaled = if scene.transform.zoom <= f32::EPSILON {
            0.0
        } else {
            self.cell_step / scene.transform.zoom
        };
        let local = Vec2::new(column as f32 * unscaled, row as f32 * unscaled);
        scene.transform.grid_to_screen(self.bounds, local)
    }

    /// Columns and rows that intersect the visible screen, as half-open ranges.
    fn visible_cells(
        &self,
        scene: &Scene,
        screen_width: f32,
        screen_height: f32,
    ) -> (std::ops::Range<u32>, std::ops::Range<u32>) {
        let columns = scene.grid.columns();
        let rows = scene.grid.rows();
        if self.cell_step <= f32::EPSILON {
            return (0..0, 0..0);
        }
        let origin = self.cell_origin(scene, 0, 0);
        let first_column = ((-origin.x) / self.cell_step).floor().max(0.0) as u32;
        let last_column = ((screen_width - origin.x) / self.cell_step).ceil().max(0.0) as u32;
        let first_row = ((-origin.y) / self.cell_step).floor().max(0.0) as u32;
        let last_row = ((screen_height - origin.y) / self.cell_step).ceil().max(0.0) as u32;
        (
            first_column.min(columns)..last_column.min(columns),
            first_row.min(rows)..last_row.min(rows),
        )
    }
}

fn gather_pointer_input(metrics: &SceneMetrics, pinch: &mut PinchTracker) -> PointerInput {
    let (cursor_x, cursor_y) = mouse_position();
    let (_, wheel_y) = mouse_wheel();
    let touch_points = touches();
    let two_fingers = match touch_points.as_slice() {
        [first, second] => Some((
            Vec2::new(first.position.x, first.position.y),
            Vec2::new(second.position.x, second.position.y),
        )),
        _ => None,
    };

    gather_pointer_input_from_observations(
        metrics,
        Vec2::new(cursor_x, cursor_y),
        is_mouse_button_pressed(MouseButton::Left),
        is_mouse_button_released(MouseButton::Left),
        wheel_y,
        pinch.observe(two_fingers),
    )
}

fn gather_pointer_input_from_observations(
    metrics: &SceneMetrics,
    cursor: Vec2,
    pressed: bool,
    released: bool,
    wheel_y: f32,
    pinch: Option<(f32, Vec2)>,
) -> PointerInput {
    let area = metrics.grid_area;
    let inside = cursor.x >= area.origin.x
        && cursor.y >= area.origin.y
        && cursor.x < area.origin.x + area.size.x
        && cursor.y < area.origin.y + area.size.y;

    let mut input = PointerInput {
        released,
        ..PointerInput::default()
    };
    if let Some((scale, center)) = pinch {
        input.position = Some(center);
        input.pinch = Some(scale);
        return input;
    }
    if !inside {
        return input;
    }

    input.position = Some(cursor);
    input.pressed = pressed;
    // Macroquad reports positive values when scrolling up; the viewport
    // zooms in on negative deltas.
    input.wheel_delta = -wheel_y;
    input
}

fn draw_grid(scene: &Scene, metrics: &SceneMetrics, screen_width: f32, screen_height: f32) {
    let palette = &scene.palette;
    let top_left = metrics.cell_origin(scene, 0, 0);
    let size = metrics.bounds.size * scene.transform.zoom;
    macroquad::shapes::draw_rectangle(
        top_left.x,
        top_left.y,
        size.x,
        size.y,
        to_macroquad_color(palette.cell(0)),
    );

    let view = scene.grid.view();
    let (columns, rows) = metrics.visible_cells(scene, screen_width, screen_height);
    let gap = if metrics.cell_step > 4.0 { 1.0 } else { 0.0 };
    for row in rows {
        for column in columns.clone() {
            let state = view
                .state(sim_garden_core::CellCoord::new(column, row))
                .unwrap_or(0);
            if state == 0 {
                continue;
            }
            let origin = metrics.cell_origin(scene, column, row);
            macroquad::shapes::draw_rectangle(
                origin.x,
                origin.y,
                metrics.cell_step - gap,
                metrics.cell_step - gap,
                to_macroquad_color(palette.cell(state)),
            );
        }
    }

    macroquad::shapes::draw_rectangle_lines(
        top_left.x,
        top_left.y,
        size.x,
        size.y,
        1.0,
        to_macroquad_color(palette.grid_line),
    );
}

fn draw_agents(scene: &Scene, metrics: &SceneMetrics) {
    let color = to_macroquad_color(scene.palette.agent);
    for agent in &scene.agents {
        let origin = metrics.cell_origin(scene, agent.column, agent.row);
        let center = origin + Vec2::splat(metrics.cell_step * 0.5);
        let [tip, left, right] = agent_triangle(agent.heading, center, metrics.cell_step);
        macroquad::shapes::draw_triangle(
            MacroquadVec2::new(tip.x, tip.y),
            MacroquadVec2::new(left.x, left.y),
            MacroquadVec2::new(right.x, right.y),
            color,
        );
    }
}

/// Triangle pointing along `heading`, inscribed in a cell of edge `size`.
fn agent_triangle(heading: Heading, center: Vec2, size: f32) -> [Vec2; 3] {
    let (dx, dy) = heading.offset();
    let forward = Vec2::new(dx as f32, dy as f32);
    let side = forward.perp();
    let reach = size * 0.5;
    [
        center + forward * reach,
        center - forward * reach + side * reach,
        center - forward * reach - side * reach,
    ]
}

fn draw_toasts(toasts: &[ToastPresentation], metrics: &SceneMetrics) {
    const TOAST_HEIGHT: f32 = 32.0;
    const TOAST_WIDTH: f32 = 320.0;
    const MARGIN: f32 = 12.0;

    let area = metrics.grid_area;
    for (index, toast) in toasts.iter().rev().enumerate() {
        let y = area.origin.y + area.size.y - (index as f32 + 1.0) * (TOAST_HEIGHT + MARGIN);
        let x = area.origin.x + MARGIN;
        let fade = (toast.remaining.as_secs_f32() / 0.25).min(1.0);
        let mut fill = to_macroquad_color(toast_color(toast.kind));
        fill.a *= fade;
        macroquad::shapes::draw_rectangle(x, y, TOAST_WIDTH, TOAST_HEIGHT, fill);
        let mut text = macroquad::color::WHITE;
        text.a = fade;
        let _ = macroquad::text::draw_text(&toast.message, x + 10.0, y + 21.0, 20.0, text);
    }
}

fn toast_color(kind: NotificationKind) -> sim_garden_rendering::Color {
    match kind {
        NotificationKind::Info => sim_garden_rendering::Color::from_rgb_u8(0x2d, 0x5b, 0xa8),
        NotificationKind::Success => sim_garden_rendering::Color::from_rgb_u8(0x2f, 0x95, 0x32),
        NotificationKind::Error => sim_garden_rendering::Color::from_rgb_u8(0xc8, 0x2a, 0x36),
    }
}

fn draw_control_panel(
    scene: &Scene,
    screen_width: f32,
    screen_height: f32,
) -> Option<ControlPanelUiContext> {
    let Some(ControlPanelView { width, background }) = scene.control_panel else {
        return None;
    };
    if width <= f32::EPSILON {
        return None;
    }

    let left = (screen_width - width).max(0.0);
    let background_color = to_macroquad_color(background);
    macroquad::shapes::draw_rectangle(left, 0.0, width, screen_height, background_color);

    Some(ControlPanelUiContext {
        origin: MacroquadVec2::new(left, 0.0),
        size: MacroquadVec2::new(width, screen_height),
        background: background_color,
        status: scene.status.clone(),
    })
}

fn to_macroquad_color(color: sim_garden_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_garden_core::{GridSnapshot, SimulationOption, TickRate};
    use sim_garden_rendering::{StatusPresentation, ViewportTransform};
    use std::sync::Arc;

    fn scene(rows: u32, columns: u32) -> Scene {
        let grid = GridSnapshot::new(
            rows,
            columns,
            Arc::new(vec![0; rows as usize * columns as usize]),
        );
        let mut scene = Scene::new(
            grid,
            StatusPresentation {
                option: SimulationOption::default(),
                running: false,
                step_count: 0,
                tick_rate: TickRate::DEFAULT,
                population: None,
            },
        );
        scene.control_panel = Some(ControlPanelView {
            width: 300.0,
            background: sim_garden_rendering::Color::from_rgb_u8(0, 0, 0),
        });
        scene
    }

    #[test]
    fn grid_fills_the_area_left_of_the_panel() {
        let metrics = SceneMetrics::from_scene(&scene(100, 100), 1100.0, 800.0);
        assert_eq!(metrics.grid_area.size, Vec2::new(800.0, 800.0));
        assert_eq!(metrics.bounds.origin, Vec2::ZERO);
        assert!((metrics.cell_step - 8.0).abs() < 1e-5);
    }

    #[test]
    fn zoom_scales_cells_and_shrinks_the_visible_range() {
        let mut scene = scene(100, 100);
        scene.transform = ViewportTransform {
            zoom: 2.0,
            offset: Vec2::ZERO,
        };
        let metrics = SceneMetrics::from_scene(&scene, 1100.0, 800.0);
        assert!((metrics.cell_step - 16.0).abs() < 1e-5);

        // The origin cell sits a quarter of the grid off screen.
        let origin = metrics.cell_origin(&scene, 0, 0);
        assert!(origin.distance(Vec2::new(-400.0, -400.0)) < 1e-3);

        let (columns, rows) = metrics.visible_cells(&scene, 800.0, 800.0);
        assert_eq!(columns, 25..75);
        assert_eq!(rows, 25..75);
    }

    #[test]
    fn clicks_outside_the_grid_area_are_ignored() {
        let metrics = SceneMetrics::from_scene(&scene(100, 100), 1100.0, 800.0);
        let outside = gather_pointer_input_from_observations(
            &metrics,
            Vec2::new(900.0, 100.0),
            true,
            false,
            1.0,
            None,
        );
        assert!(outside.position.is_none());
        assert!(!outside.pressed);

        let inside = gather_pointer_input_from_observations(
            &metrics,
            Vec2::new(100.0, 100.0),
            true,
            false,
            1.0,
            None,
        );
        assert_eq!(inside.position, Some(Vec2::new(100.0, 100.0)));
        assert!(inside.pressed);
        assert_eq!(inside.wheel_delta, -1.0);
    }

    #[test]
    fn pinch_reports_span_ratio() {
        let mut tracker = PinchTracker::default();
        let first = (Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0));
        let second = (Vec2::new(50.0, 100.0), Vec2::new(250.0, 100.0));
        assert!(tracker.observe(Some(first)).is_none());
        let (scale, center) = tracker.observe(Some(second)).expect("pinch in progress");
        assert!((scale - 2.0).abs() < 1e-5);
        assert_eq!(center, Vec2::new(150.0, 100.0));
        assert!(tracker.observe(None).is_none());
    }

    #[test]
    fn agent_triangle_points_along_heading() {
        let [tip, _, _] = agent_triangle(Heading::Left, Vec2::new(10.0, 10.0), 8.0);
        assert_eq!(tip, Vec2::new(6.0, 10.0));
        let [tip, _, _] = agent_triangle(Heading::Up, Vec2::new(10.0, 10.0), 8.0);
        assert_eq!(tip, Vec2::new(10.0, 6.0));
    }

    #[test]
    fn keyboard_speed_nudges_use_the_family_step() {
        let shortcuts = KeyboardShortcuts {
            faster: true,
            slower: true,
            ..KeyboardShortcuts::default()
        };
        assert_eq!(
            shortcuts.actions(10),
            vec![
                ControlAction::AdjustSpeed(10),
                ControlAction::AdjustSpeed(-10)
            ]
        );
    }
}
