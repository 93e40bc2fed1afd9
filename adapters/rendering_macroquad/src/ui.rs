//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use crate::ControlPanelInputState;
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};
use sim_garden_rendering::{ControlAction, StatusPresentation};

/// Snapshot of the control panel's UI layout and data for the current frame.
#[derive(Clone, Debug)]
pub(crate) struct ControlPanelUiContext {
    /// Top-left corner of the panel in screen coordinates.
    pub(crate) origin: Vec2,
    /// Panel dimensions in screen space.
    pub(crate) size: Vec2,
    /// Background colour applied to the window skin so the UI matches the
    /// adapter's solid rectangle.
    pub(crate) background: Color,
    /// Status shown at the top of the panel.
    pub(crate) status: StatusPresentation,
}

/// Renders the control panel and latches every button press into `input`.
pub(crate) fn draw_control_panel_ui(
    ui: &mut Ui,
    context: ControlPanelUiContext,
    input: &mut ControlPanelInputState,
) {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .color_selected(Color::from_rgba(70, 70, 70, 255))
        .color_selected_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_inactive(Color::from_rgba(56, 56, 56, 200))
        .margin(RectOffset::new(0.0, 0.0, 8.0, 8.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let status = context.status;
    let _ = ui.window(hash!("control_panel"), context.origin, context.size, |ui| {
        ui.label(None, status.option.name());
        ui.label(
            None,
            if status.running {
                "Status: running"
            } else {
                "Status: stopped"
            },
        );
        ui.label(None, &format!("Steps: {}", status.step_count));
        ui.label(None, &format!("Speed: {} ticks/s", status.tick_rate.get()));
        let population = match status.population {
            Some(population) => format!("Population: {population}"),
            None => "Population: -".to_string(),
        };
        ui.label(None, population.as_str());

        let toggle_label = if status.running { "Stop" } else { "Start" };
        if ui.button(None, toggle_label) {
            input.register(ControlAction::ToggleRunning);
        }
        if ui.button(None, "Reset") {
            input.register(ControlAction::Reset);
        }
        if ui.button(None, "Next pattern") {
            input.register(ControlAction::NextPattern);
        }
        if ui.button(None, "Next simulation") {
            input.register(ControlAction::NextOption);
        }

        for &nudge in status.option.family().speed_nudges() {
            let step = i64::from(nudge);
            if ui.button(None, format!("-{nudge}").as_str()) {
                input.register(ControlAction::AdjustSpeed(-step));
            }
            ui.same_line(0.0);
            if ui.button(None, format!("+{nudge}").as_str()) {
                input.register(ControlAction::AdjustSpeed(step));
            }
        }

        ui.input_text(hash!("tick_rate"), "Ticks/s", input.rate_text_mut());
        if ui.button(None, "Apply speed") {
            input.submit_rate_text();
        }

        if ui.button(None, "Reset view") {
            input.register(ControlAction::ResetViewport);
        }
        ui.label(None, "Space start/stop, R reset, N pattern");
        ui.label(None, "Tab simulation, 0 reset view");
    });

    ui.pop_skin();
}
