//! Cursor icon feedback for mask handles and bodies.

use bevy::prelude::*;
use bevy::window::{CursorIcon, SystemCursorIcon};
use bevy_egui::EguiContexts;

use crate::document::EditorSession;
use crate::editor::params::{PageSurfaceParams, is_cursor_over_ui};
use crate::editor::tools::EditorMode;
use crate::masks::MaskStore;

use super::hit_detection::hit_test;
use super::{Interaction, InteractionState, PointerTarget};

/// Cursor for the current gesture or for what sits under the pointer
pub fn cursor_for(
    interaction: &Interaction,
    target: Option<PointerTarget>,
    mode: EditorMode,
) -> CursorIcon {
    match interaction {
        Interaction::Resizing { handle, .. } => return handle.cursor_icon(),
        Interaction::Dragging { .. } => return CursorIcon::System(SystemCursorIcon::Grabbing),
        Interaction::Drawing { .. } => return CursorIcon::System(SystemCursorIcon::Crosshair),
        Interaction::Idle => {}
    }

    match (mode, target) {
        (EditorMode::Mask, Some(PointerTarget::Handle(_, handle))) => handle.cursor_icon(),
        (EditorMode::Mask, Some(PointerTarget::Mask(_))) => {
            CursorIcon::System(SystemCursorIcon::Move)
        }
        (_, Some(PointerTarget::Outside)) | (_, None) => {
            CursorIcon::System(SystemCursorIcon::Default)
        }
        (mode, _) => mode.cursor_icon(),
    }
}

/// Update the window cursor from hover and gesture state
pub fn update_interaction_cursor(
    surface: PageSurfaceParams,
    session: Res<EditorSession>,
    store: Res<MaskStore>,
    state: Res<InteractionState>,
    mut commands: Commands,
    mut contexts: EguiContexts,
    mut current: Local<Option<CursorIcon>>,
) {
    let Some(window_entity) = surface.window_entity() else {
        return;
    };

    let icon = if state.is_active() {
        cursor_for(&state.interaction, None, session.mode)
    } else if is_cursor_over_ui(&mut contexts) {
        CursorIcon::System(SystemCursorIcon::Default)
    } else {
        let target = surface
            .relative_pointer()
            .map(|pointer| hit_test(&store, state.selected, session.current_page, &pointer));
        cursor_for(&state.interaction, target, session.mode)
    };

    if current.as_ref() != Some(&icon) {
        commands.entity(window_entity).insert(icon.clone());
        *current = Some(icon);
    }
}
