//! Settings dialog for the detector connection and render sizes.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::{AppConfig, DETECTOR_KEY_ENV, SaveConfigRequest};

/// Editable copy of the settings while the dialog is open
#[derive(Resource, Default)]
pub struct SettingsDialogState {
    pub is_open: bool,
    pub endpoint: String,
    pub api_key: String,
    pub timeout_secs: u64,
    pub windowed_width: u32,
    pub fullscreen_width: u32,
}

impl SettingsDialogState {
    pub fn open_from_config(&mut self, config: &AppConfig) {
        let data = &config.data;
        self.endpoint = data.detector.endpoint.clone();
        self.api_key = data.detector.api_key.clone().unwrap_or_default();
        self.timeout_secs = data.detector.timeout_secs;
        self.windowed_width = data.render.windowed_width;
        self.fullscreen_width = data.render.fullscreen_width;
        self.is_open = true;
    }

    fn apply_to(&self, config: &mut AppConfig) {
        let data = &mut config.data;
        data.detector.endpoint = self.endpoint.trim().to_string();
        data.detector.api_key = Some(self.api_key.trim().to_string()).filter(|k| !k.is_empty());
        data.detector.timeout_secs = self.timeout_secs.max(1);
        data.render.windowed_width = self.windowed_width.max(200);
        data.render.fullscreen_width = self.fullscreen_width.max(200);
        config.dirty = true;
    }
}

pub fn settings_dialog_ui(
    mut contexts: EguiContexts,
    mut dialog_state: ResMut<SettingsDialogState>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    if !dialog_state.is_open {
        return Ok(());
    }

    let mut should_save = false;
    let mut should_close = false;

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label(egui::RichText::new("Suggestion service").strong());
            egui::Grid::new("detector_settings")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Endpoint:");
                    ui.add(
                        egui::TextEdit::singleline(&mut dialog_state.endpoint)
                            .hint_text("https://...")
                            .desired_width(260.0),
                    );
                    ui.end_row();

                    ui.label("API key:");
                    ui.add(
                        egui::TextEdit::singleline(&mut dialog_state.api_key)
                            .password(true)
                            .desired_width(260.0),
                    );
                    ui.end_row();

                    ui.label("Timeout:");
                    ui.add(
                        egui::DragValue::new(&mut dialog_state.timeout_secs)
                            .range(1..=300)
                            .suffix(" s"),
                    );
                    ui.end_row();
                });
            ui.label(
                egui::RichText::new(format!("{} overrides the key when set", DETECTOR_KEY_ENV))
                    .weak()
                    .size(11.0),
            );

            ui.add_space(8.0);
            ui.label(egui::RichText::new("Page rendering").strong());
            egui::Grid::new("render_settings")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Windowed width:");
                    ui.add(
                        egui::DragValue::new(&mut dialog_state.windowed_width)
                            .range(200..=8000)
                            .suffix(" px"),
                    );
                    ui.end_row();

                    ui.label("Fullscreen width:");
                    ui.add(
                        egui::DragValue::new(&mut dialog_state.fullscreen_width)
                            .range(200..=8000)
                            .suffix(" px"),
                    );
                    ui.end_row();
                });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    should_save = true;
                }
                if ui.button("Cancel").clicked() {
                    should_close = true;
                }
            });
        });

    if should_save {
        dialog_state.apply_to(&mut config);
        save_events.write(SaveConfigRequest);
        should_close = true;
    }
    if should_close {
        dialog_state.is_open = false;
    }
    Ok(())
}
