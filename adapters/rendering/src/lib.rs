#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Simulation Garden adapters.

mod viewport;

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use sim_garden_core::{
    AgentSnapshot, GridSnapshot, Heading, Notification, NotificationKind, Pattern,
    SimulationOption, TickRate,
};

pub use viewport::{
    Viewport, ViewportTransform, CLICK_SLOP, MAX_ZOOM, MIN_ZOOM, WHEEL_ZOOM_STEP,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Colors used to draw one simulation option.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    /// Fill drawn behind the grid.
    pub background: Color,
    /// Color of each cell state, indexed by state.
    pub cells: Vec<Color>,
    /// Color of agent markers.
    pub agent: Color,
    /// Thin lines separating cells.
    pub grid_line: Color,
}

impl Palette {
    /// Palette matching the option's cell alphabet.
    #[must_use]
    pub fn for_option(option: SimulationOption) -> Self {
        let dead = Color::from_rgb_u8(0x12, 0x14, 0x1c);
        let cells = match option {
            SimulationOption::Classic(rule) if rule.cell_states() > 2 => vec![
                dead,
                Color::from_rgb_u8(0x5a, 0xc8, 0xfa),
                Color::from_rgb_u8(0x1e, 0x4d, 0x8c),
            ],
            SimulationOption::Classic(_) => vec![dead, Color::from_rgb_u8(0x7c, 0xe0, 0x8a)],
            SimulationOption::Langton | SimulationOption::Turmites => {
                vec![dead, Color::from_rgb_u8(0xe8, 0xe8, 0xe8)]
            }
        };
        Self {
            background: Color::from_rgb_u8(0x0b, 0x0c, 0x10),
            cells,
            agent: Color::from_rgb_u8(0xf2, 0x5c, 0x54),
            grid_line: dead.lighten(0.08),
        }
    }

    /// Color of a cell state; unknown states use the last entry.
    #[must_use]
    pub fn cell(&self, state: u8) -> Color {
        let index = usize::from(state).min(self.cells.len().saturating_sub(1));
        self.cells
            .get(index)
            .copied()
            .unwrap_or(self.background)
    }
}

/// Axis-aligned screen rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner in pixels.
    pub origin: Vec2,
    /// Width and height in pixels.
    pub size: Vec2,
}

impl ScreenRect {
    /// Creates a rectangle from its corner and size.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Largest rectangle with square cells that fits a `rows x columns` grid
    /// centered inside `self`.
    #[must_use]
    pub fn fit_grid(&self, rows: u32, columns: u32) -> Self {
        if rows == 0 || columns == 0 {
            return Self::new(self.center(), Vec2::ZERO);
        }
        let cell = (self.size.x / columns as f32)
            .min(self.size.y / rows as f32)
            .max(0.0);
        let size = Vec2::new(cell * columns as f32, cell * rows as f32);
        Self::new(self.center() - size * 0.5, size)
    }
}

/// Pointer state captured for a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PointerInput {
    /// Cursor position in screen pixels, if the pointer is inside the window.
    pub position: Option<Vec2>,
    /// Whether the primary button went down on this frame.
    pub pressed: bool,
    /// Whether the primary button went up on this frame.
    pub released: bool,
    /// Vertical wheel movement; negative values scroll up.
    pub wheel_delta: f32,
    /// Pinch scale factor reported by touch input.
    pub pinch: Option<f32>,
}

/// Discrete user requests raised by buttons or keyboard shortcuts.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    /// Start when stopped, stop when running.
    ToggleRunning,
    /// Return the simulation to its initial state.
    Reset,
    /// Stamp the next pattern of the catalog.
    NextPattern,
    /// Stamp a specific pattern.
    ApplyPattern(Pattern),
    /// Switch to the next option of the catalog.
    NextOption,
    /// Switch to a specific option.
    SelectOption(SimulationOption),
    /// Nudge the tick rate by a signed amount.
    AdjustSpeed(i64),
    /// Replace the tick rate with user supplied text.
    SetTickRate(String),
    /// Restore zoom 1 and a centered grid.
    ResetViewport,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Screen area available to the grid on this frame.
    pub grid_area: Option<ScreenRect>,
    /// Pointer observations.
    pub pointer: PointerInput,
    /// Requests raised since the previous frame, in order.
    pub actions: Vec<ControlAction>,
}

/// Agent marker drawn over the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentPresentation {
    /// Column of the occupied cell.
    pub column: u32,
    /// Row of the occupied cell.
    pub row: u32,
    /// Direction the marker points to.
    pub heading: Heading,
}

impl From<&AgentSnapshot> for AgentPresentation {
    fn from(agent: &AgentSnapshot) -> Self {
        Self {
            column: agent.cell.column(),
            row: agent.cell.row(),
            heading: agent.heading,
        }
    }
}

/// Status line shown by the control panel.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusPresentation {
    /// Active option.
    pub option: SimulationOption,
    /// Whether the simulation is running.
    pub running: bool,
    /// Steps since the last reset.
    pub step_count: u64,
    /// Current tick rate.
    pub tick_rate: TickRate,
    /// Cells in a non-zero state, when known.
    pub population: Option<u64>,
}

/// Notification currently visible on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct ToastPresentation {
    /// Severity of the message.
    pub kind: NotificationKind,
    /// Text to show.
    pub message: String,
    /// Time left before the toast disappears.
    pub remaining: Duration,
}

/// Queue of notifications that expire after a fixed time on screen.
#[derive(Clone, Debug)]
pub struct ToastQueue {
    duration: Duration,
    toasts: Vec<ToastPresentation>,
}

impl ToastQueue {
    /// Most toasts kept on screen at once; older ones are evicted first.
    pub const CAPACITY: usize = 4;

    /// Creates a queue showing every toast for `duration`.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            toasts: Vec::new(),
        }
    }

    /// Shows a notification.
    pub fn push(&mut self, notification: Notification) {
        if self.toasts.len() == Self::CAPACITY {
            let _ = self.toasts.remove(0);
        }
        self.toasts.push(ToastPresentation {
            kind: notification.kind,
            message: notification.message,
            remaining: self.duration,
        });
    }

    /// Ages every toast by `dt` and drops the expired ones.
    pub fn advance(&mut self, dt: Duration) {
        for toast in &mut self.toasts {
            toast.remaining = toast.remaining.saturating_sub(dt);
        }
        self.toasts.retain(|toast| !toast.remaining.is_zero());
    }

    /// Toasts currently on screen, oldest first.
    #[must_use]
    pub fn visible(&self) -> &[ToastPresentation] {
        &self.toasts
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Notification::DEFAULT_DURATION)
    }
}

/// Side panel hosting the controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPanelView {
    /// Width of the panel in pixels.
    pub width: f32,
    /// Fill behind the widgets.
    pub background: Color,
}

/// Scene description consumed by rendering backends every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Latest completed generation.
    pub grid: GridSnapshot,
    /// Agents drawn over the grid.
    pub agents: Vec<AgentPresentation>,
    /// Zoom and pan applied to the grid.
    pub transform: ViewportTransform,
    /// Colors of the active option.
    pub palette: Palette,
    /// Status line content.
    pub status: StatusPresentation,
    /// Visible notifications.
    pub toasts: Vec<ToastPresentation>,
    /// Control panel, if the backend should draw one.
    pub control_panel: Option<ControlPanelView>,
}

impl Scene {
    /// Creates a scene showing `grid` with an identity transform.
    #[must_use]
    pub fn new(grid: GridSnapshot, status: StatusPresentation) -> Self {
        Self {
            palette: Palette::for_option(status.option),
            grid,
            agents: Vec::new(),
            transform: ViewportTransform::IDENTITY,
            status,
            toasts: Vec::new(),
            control_panel: None,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Simulation Garden scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_garden_core::Rule;

    #[test]
    fn fit_grid_uses_square_cells_centered_in_the_area() {
        let area = ScreenRect::new(Vec2::new(0.0, 0.0), Vec2::new(800.0, 400.0));
        let fitted = area.fit_grid(100, 100);
        assert_eq!(fitted.size, Vec2::new(400.0, 400.0));
        assert_eq!(fitted.origin, Vec2::new(200.0, 0.0));
    }

    #[test]
    fn fit_grid_handles_rectangular_grids() {
        let area = ScreenRect::new(Vec2::new(10.0, 10.0), Vec2::new(300.0, 300.0));
        let fitted = area.fit_grid(50, 100);
        assert_eq!(fitted.size, Vec2::new(300.0, 150.0));
        assert_eq!(fitted.center(), area.center());
    }

    #[test]
    fn palette_covers_every_cell_state() {
        for option in SimulationOption::ALL {
            let palette = Palette::for_option(option);
            assert_eq!(palette.cells.len(), usize::from(option.cell_states()));
        }
        let brain = Palette::for_option(SimulationOption::Classic(Rule::BriansBrain));
        assert_eq!(brain.cell(7), brain.cells[2]);
    }

    #[test]
    fn toasts_expire_after_their_duration() {
        let mut toasts = ToastQueue::new(Duration::from_millis(2000));
        toasts.push(Notification::new(NotificationKind::Info, "started"));
        toasts.advance(Duration::from_millis(1500));
        assert_eq!(toasts.visible().len(), 1);
        assert_eq!(toasts.visible()[0].remaining, Duration::from_millis(500));

        toasts.advance(Duration::from_millis(500));
        assert!(toasts.visible().is_empty());
    }

    #[test]
    fn toast_queue_evicts_the_oldest_entry() {
        let mut toasts = ToastQueue::default();
        for index in 0..=ToastQueue::CAPACITY {
            toasts.push(Notification::new(NotificationKind::Info, format!("{index}")));
        }
        assert_eq!(toasts.visible().len(), ToastQueue::CAPACITY);
        assert_eq!(toasts.visible()[0].message, "1");
    }
}
