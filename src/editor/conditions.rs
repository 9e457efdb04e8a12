//! Run conditions for controlling when editor systems execute.
//!
//! Pointer-move and release handling only runs while a gesture is active, and
//! pointer-down handling only while idle, so no input system outlives its gesture.

use bevy::prelude::*;

use crate::document::EditorSession;
use crate::editor::interaction::InteractionState;
use crate::editor::tools::EditorMode;
use crate::ui::DialogState;

/// Run condition: returns true when the editor is in the given mode.
///
/// Usage: `.run_if(mode_is(EditorMode::Mask))`
pub fn mode_is(mode: EditorMode) -> impl FnMut(Res<EditorSession>) -> bool + Clone {
    move |session: Res<EditorSession>| session.mode == mode
}

/// Run condition: returns true when no pointer gesture is running.
pub fn interaction_idle(state: Res<InteractionState>) -> bool {
    !state.is_active()
}

/// Run condition: returns true while a draw, drag or resize is in progress.
pub fn interaction_active(state: Res<InteractionState>) -> bool {
    state.is_active()
}

/// Run condition: returns true when a document is loaded.
pub fn document_loaded(session: Res<EditorSession>) -> bool {
    session.document.is_some()
}

/// Run condition: returns true when no modal dialog is open.
///
/// Usage: `.run_if(no_dialog_open)`
pub fn no_dialog_open(dialog_state: Res<DialogState>) -> bool {
    !dialog_state.any_modal_open
}
