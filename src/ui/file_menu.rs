use std::path::PathBuf;

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use bevy_egui::{EguiContexts, egui};
use futures_lite::future;

use crate::config::{AppConfig, ConfigResetNotification};
use crate::document::{EditorSession, NoticeLevel, OpenDocumentRequest, ResetSessionRequest};

#[derive(Resource, Default)]
pub struct FileMenuState {
    pub show_reset_confirmation: bool,
    /// Native open dialog awaiting a choice
    pub pending_open: Option<Task<Option<PathBuf>>>,
}

impl FileMenuState {
    /// Show the native open dialog, starting in the last used folder
    pub fn start_open_dialog(&mut self, config: &AppConfig) {
        if self.pending_open.is_some() {
            return;
        }
        let start_dir = config
            .data
            .last_open_dir
            .clone()
            .unwrap_or_else(crate::paths::default_documents_dir);
        self.pending_open = Some(AsyncComputeTaskPool::get().spawn(async move {
            rfd::AsyncFileDialog::new()
                .set_title("Open presentation")
                .set_directory(&start_dir)
                .add_filter("PDF", &["pdf"])
                .pick_file()
                .await
                .map(|h| h.path().to_path_buf())
        }));
    }
}

/// Forward the picked file to the document loader
pub fn poll_open_dialog(
    mut menu_state: ResMut<FileMenuState>,
    mut open_events: MessageWriter<OpenDocumentRequest>,
) {
    let Some(task) = menu_state.pending_open.as_mut() else {
        return;
    };
    let Some(result) = future::block_on(future::poll_once(task)) else {
        return;
    };
    menu_state.pending_open = None;
    if let Some(path) = result {
        open_events.write(OpenDocumentRequest { path });
    }
}

fn notice_color(level: NoticeLevel) -> egui::Color32 {
    match level {
        NoticeLevel::Info => egui::Color32::from_rgb(140, 200, 255),
        NoticeLevel::Warning => egui::Color32::from_rgb(255, 200, 80),
        NoticeLevel::Error => egui::Color32::from_rgb(255, 110, 110),
    }
}

/// Status notice in the bottom-left corner
pub fn notice_ui(mut contexts: EguiContexts, mut session: ResMut<EditorSession>) -> Result {
    let Some(notice) = session.notice.clone() else {
        return Ok(());
    };

    let mut dismiss = false;
    egui::Area::new(egui::Id::new("session_notice"))
        .anchor(egui::Align2::LEFT_BOTTOM, [12.0, -12.0])
        .show(contexts.ctx_mut()?, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(notice_color(notice.level), &notice.message);

                    if let Some(folder) = &notice.folder
                        && ui.button("Open folder").clicked()
                        && let Err(e) = open::that(folder)
                    {
                        warn!("Failed to open {:?}: {}", folder, e);
                    }

                    if ui.small_button("✕").clicked() {
                        dismiss = true;
                    }
                });
            });
        });

    if dismiss {
        session.notice = None;
    }
    Ok(())
}

/// Confirmation before dropping the document, masks and margins
pub fn reset_confirmation_ui(
    mut contexts: EguiContexts,
    mut menu_state: ResMut<FileMenuState>,
    mut reset_events: MessageWriter<ResetSessionRequest>,
) -> Result {
    if !menu_state.show_reset_confirmation {
        return Ok(());
    }

    egui::Window::new("Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Close the document and discard all masks and margins?");
            ui.horizontal(|ui| {
                if ui.button("Reset").clicked() {
                    reset_events.write(ResetSessionRequest);
                    menu_state.show_reset_confirmation = false;
                }
                if ui.button("Cancel").clicked() {
                    menu_state.show_reset_confirmation = false;
                }
            });
        });
    Ok(())
}

/// Renders the notification shown when the config file had to be reset
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    egui::Window::new("Settings Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Your settings could not be loaded and were reset to defaults.");
            if let Some(reason) = &notification.reason {
                ui.add_space(5.0);
                ui.label(egui::RichText::new(reason).weak());
            }
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                notification.show = false;
                notification.reason = None;
            }
        });
    Ok(())
}

/// Prompt shown in the page area before a document is loaded
pub fn empty_state_ui(
    mut contexts: EguiContexts,
    session: Res<EditorSession>,
    config: Res<AppConfig>,
    mut menu_state: ResMut<FileMenuState>,
) -> Result {
    if session.document.is_some() {
        return Ok(());
    }

    egui::Area::new(egui::Id::new("empty_state"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("No presentation open").size(20.0).strong());
                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new(format!(
                        "Open a PDF up to {} MB to crop margins or mask watermarks",
                        crate::constants::MAX_INPUT_BYTES / (1024 * 1024)
                    ))
                    .weak(),
                );
                ui.add_space(12.0);
                if ui
                    .add_sized([160.0, 32.0], egui::Button::new("Open PDF..."))
                    .clicked()
                {
                    menu_state.start_open_dialog(&config);
                }
            });
        });
    Ok(())
}
