use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::AppConfig;
use crate::constants::TOOLBAR_HEIGHT;
use crate::detector::{DetectionKind, DetectorStatus, RequestDetection};
use crate::document::{ClearMasksRequest, EditorSession, RenderCoordinator, RequestPageChange};
use crate::editor::EditorMode;
use crate::export::{ExportKind, ExportRequest, ExportStatus};
use crate::masks::MaskStore;

use super::file_menu::FileMenuState;
use super::settings_dialog::SettingsDialogState;

/// Message writers the toolbar can emit
#[derive(bevy::ecs::system::SystemParam)]
pub struct ToolbarWriters<'w> {
    pub pages: MessageWriter<'w, RequestPageChange>,
    pub detection: MessageWriter<'w, RequestDetection>,
    pub export: MessageWriter<'w, ExportRequest>,
    pub clear: MessageWriter<'w, ClearMasksRequest>,
}

fn mode_button_label(mode: &EditorMode) -> &'static str {
    match mode {
        EditorMode::Crop => "✂ Crop",
        EditorMode::Mask => "▭ Mask",
    }
}

/// Main toolbar: file, mode, navigation, suggestions and export
#[allow(clippy::too_many_arguments)]
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut session: ResMut<EditorSession>,
    store: Res<MaskStore>,
    config: Res<AppConfig>,
    coordinator: Res<RenderCoordinator>,
    detector: Res<DetectorStatus>,
    export: Res<ExportStatus>,
    mut menu_state: ResMut<FileMenuState>,
    mut settings: ResMut<SettingsDialogState>,
    mut writers: ToolbarWriters,
) -> Result {
    if session.fullscreen {
        return Ok(());
    }

    egui::TopBottomPanel::top("main_toolbar")
        .exact_height(TOOLBAR_HEIGHT)
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                if ui.button("Open...").clicked() {
                    menu_state.start_open_dialog(&config);
                }

                let loaded = session.document.is_some();
                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                // Mode buttons with keyboard shortcuts
                for mode in EditorMode::all() {
                    let selected = session.mode == *mode;
                    let button = egui::Button::new(
                        egui::RichText::new(mode_button_label(mode)).size(14.0).strong(),
                    )
                    .min_size(egui::vec2(0.0, 28.0))
                    .selected(selected);

                    let response = ui.add(button);
                    if response.clicked() && !selected {
                        session.mode = *mode;
                    }
                    response.on_hover_text(mode.display_name());
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                // Page navigation
                let page_count = session.page_count();
                let current = session.current_page;
                if ui
                    .add_enabled(loaded && current > 0, egui::Button::new("◀"))
                    .clicked()
                {
                    writers.pages.write(RequestPageChange::Previous);
                }
                let page_label = if loaded {
                    format!("Page {} / {}", current + 1, page_count)
                } else {
                    "No document".to_string()
                };
                ui.label(page_label);
                if ui
                    .add_enabled(loaded && current + 1 < page_count, egui::Button::new("▶"))
                    .clicked()
                {
                    writers.pages.write(RequestPageChange::Next);
                }
                if coordinator.is_rendering() {
                    ui.spinner();
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                // Suggestions for the current page
                let can_detect = loaded && !detector.is_busy();
                let kind = match session.mode {
                    EditorMode::Crop => DetectionKind::Margins,
                    EditorMode::Mask => DetectionKind::Masks,
                };
                let response = ui.add_enabled(can_detect, egui::Button::new(kind.display_name()));
                if response.clicked() {
                    writers.detection.write(RequestDetection { kind });
                }
                if detector.is_busy() {
                    ui.spinner();
                }

                if session.mode == EditorMode::Mask
                    && ui
                        .add_enabled(loaded && !store.is_empty(), egui::Button::new("Clear masks"))
                        .clicked()
                {
                    writers.clear.write(ClearMasksRequest);
                }

                // Right-aligned export and session controls
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙").on_hover_text("Settings").clicked() {
                        settings.open_from_config(&config);
                    }
                    if ui.add_enabled(loaded, egui::Button::new("Reset")).clicked() {
                        menu_state.show_reset_confirmation = true;
                    }
                    if ui
                        .add_enabled(loaded, egui::Button::new("Fullscreen (F)"))
                        .clicked()
                    {
                        session.fullscreen = true;
                    }

                    let kind = match session.mode {
                        EditorMode::Crop => ExportKind::Crop,
                        EditorMode::Mask => ExportKind::Mask,
                    };
                    if ui
                        .add_enabled(
                            loaded && !export.busy,
                            egui::Button::new(egui::RichText::new(kind.display_name()).strong()),
                        )
                        .clicked()
                    {
                        writers.export.write(ExportRequest { kind });
                    }
                });
            });
        });
    Ok(())
}
