use eframe::egui;

use crate::types::player_state::PlayerState;

/// User interactions reported by the control column.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    PlayPausePressed,
    LoopToggled(bool),
    VolumeChanged(f32),
    PickRequested,
}

/// Renders the control column and reports interactions as events instead of
/// mutating state; the app applies them afterwards.
pub fn controls_panel(ui: &mut egui::Ui, state: &PlayerState) -> Vec<ControlEvent> {
    let mut events = Vec::new();

    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);

        let mut looping = state.looping;
        if ui.checkbox(&mut looping, "Looping").changed() {
            events.push(ControlEvent::LoopToggled(looping));
        }

        ui.add_space(16.0);

        let play_label = if state.is_playing { "Pause" } else { "Play" };
        if ui
            .add_sized([96.0, 28.0], egui::Button::new(play_label))
            .clicked()
        {
            events.push(ControlEvent::PlayPausePressed);
        }

        ui.add_space(16.0);

        let mut volume = state.volume;
        if ui
            .add(egui::Slider::new(&mut volume, 0.0..=1.0).show_value(false))
            .changed()
        {
            events.push(ControlEvent::VolumeChanged(volume));
        }

        ui.add_space(16.0);

        if ui.button("Select Audio").clicked() {
            events.push(ControlEvent::PickRequested);
        }

        ui.add_space(8.0);
        ui.label(
            egui::RichText::new(state.track.display_name())
                .size(11.0)
                .color(egui::Color32::LIGHT_GRAY),
        );
    });

    events
}
