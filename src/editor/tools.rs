use bevy::prelude::*;
use bevy::window::{CursorIcon, SystemCursorIcon};
use bevy_egui::EguiContexts;

use crate::document::{EditorSession, RequestPageChange};
use crate::masks::MaskStore;

use super::interaction::InteractionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    Crop,
    #[default]
    Mask,
}

impl EditorMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            EditorMode::Crop => "Crop (C)",
            EditorMode::Mask => "Mask (M)",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            EditorMode::Crop => CursorIcon::System(SystemCursorIcon::Default),
            EditorMode::Mask => CursorIcon::System(SystemCursorIcon::Crosshair),
        }
    }

    pub fn all() -> &'static [EditorMode] {
        &[EditorMode::Crop, EditorMode::Mask]
    }
}

/// Keyboard shortcuts for mode, page navigation, fullscreen and mask deletion
pub fn handle_editor_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<EditorSession>,
    mut interaction: ResMut<InteractionState>,
    mut store: ResMut<MaskStore>,
    mut page_requests: MessageWriter<RequestPageChange>,
    mut contexts: EguiContexts,
) {
    // Don't react while typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyM) && session.mode != EditorMode::Mask {
        session.mode = EditorMode::Mask;
    } else if keyboard.just_pressed(KeyCode::KeyC) && session.mode != EditorMode::Crop {
        session.mode = EditorMode::Crop;
    }

    if keyboard.just_pressed(KeyCode::KeyF) && session.document.is_some() {
        session.fullscreen = !session.fullscreen;
    } else if keyboard.just_pressed(KeyCode::Escape) {
        if session.fullscreen {
            session.fullscreen = false;
        } else if interaction.interaction.is_idle() {
            interaction.selected = None;
        }
    }

    if keyboard.just_pressed(KeyCode::ArrowRight) || keyboard.just_pressed(KeyCode::PageDown) {
        page_requests.write(RequestPageChange::Next);
    } else if keyboard.just_pressed(KeyCode::ArrowLeft) || keyboard.just_pressed(KeyCode::PageUp) {
        page_requests.write(RequestPageChange::Previous);
    }

    let delete_pressed =
        keyboard.just_pressed(KeyCode::Delete) || keyboard.just_pressed(KeyCode::Backspace);
    if delete_pressed
        && session.mode == EditorMode::Mask
        && interaction.interaction.is_idle()
        && let Some(id) = interaction.selected.take()
    {
        store.remove(id);
    }
}
