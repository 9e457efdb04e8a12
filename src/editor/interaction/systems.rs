//! Bevy adapters feeding pointer input into the interaction state machine.

use bevy::prelude::*;
use bevy::window::WindowFocused;
use bevy_egui::EguiContexts;

use crate::document::{CurrentRaster, EditorSession};
use crate::editor::coords::RelativePointer;
use crate::editor::params::{PageSurfaceParams, is_cursor_over_ui};
use crate::editor::tools::EditorMode;
use crate::masks::MaskStore;

use super::hit_detection::hit_test;
use super::machine::{cancel, pointer_down, pointer_move, pointer_up};
use super::InteractionState;

/// Start a draw, drag or resize on left press over the page
pub fn handle_pointer_down(
    mouse_button: Res<ButtonInput<MouseButton>>,
    surface: PageSurfaceParams,
    session: Res<EditorSession>,
    store: Res<MaskStore>,
    mut state: ResMut<InteractionState>,
    mut contexts: EguiContexts,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    if is_cursor_over_ui(&mut contexts) {
        return;
    }
    let Some(pointer) = surface.relative_pointer() else {
        return;
    };

    let target = hit_test(&store, state.selected, session.current_page, &pointer);
    pointer_down(&mut state, &store, session.mode, target, pointer.position());
}

/// Track the pointer while a gesture runs, even over panels or outside the page
pub fn handle_pointer_drag(
    surface: PageSurfaceParams,
    mut store: ResMut<MaskStore>,
    mut state: ResMut<InteractionState>,
) {
    let Some(pointer) = surface.relative_pointer() else {
        return;
    };
    pointer_move(&mut state, &mut store, &pointer);
}

/// Commit the gesture when the left button is released.
///
/// The last seen pointer is kept so a release outside the window still commits.
pub fn handle_pointer_release(
    mouse_button: Res<ButtonInput<MouseButton>>,
    surface: PageSurfaceParams,
    session: Res<EditorSession>,
    raster: Res<CurrentRaster>,
    mut store: ResMut<MaskStore>,
    mut state: ResMut<InteractionState>,
    mut last_pointer: Local<Option<RelativePointer>>,
) {
    if let Some(pointer) = surface.relative_pointer() {
        *last_pointer = Some(pointer);
    }

    let released =
        mouse_button.just_released(MouseButton::Left) || !mouse_button.pressed(MouseButton::Left);
    if !released {
        return;
    }

    let Some(pointer) = last_pointer.take() else {
        cancel(&mut state);
        return;
    };

    let page = session.current_page;
    let page_raster = session
        .document_generation()
        .and_then(|generation| raster.for_page(generation, page))
        .map(|r| r.image.as_ref());
    pointer_up(&mut state, &mut store, &pointer, page, page_raster);
}

/// Gesture context: mode, page, document and fullscreen flag
type GestureContext = (EditorMode, usize, Option<u64>, bool);

/// Abandon gestures when the page, document, mode or fullscreen flag changes
pub fn cancel_on_context_change(
    session: Res<EditorSession>,
    mut state: ResMut<InteractionState>,
    mut previous: Local<Option<GestureContext>>,
) {
    let context = (
        session.mode,
        session.current_page,
        session.document_generation(),
        session.fullscreen,
    );
    let Some(before) = previous.replace(context) else {
        return;
    };
    if before == context {
        return;
    }

    if cancel(&mut state) {
        debug!("Gesture cancelled by context change");
    }
    let page_changed = before.1 != context.1 || before.2 != context.2;
    if page_changed && state.selected.is_some() {
        state.selected = None;
    }
}

/// Abandon gestures when the window loses focus
pub fn cancel_on_focus_loss(
    mut focus_events: MessageReader<WindowFocused>,
    mut state: ResMut<InteractionState>,
) {
    let lost_focus = focus_events.read().any(|event| !event.focused);
    if lost_focus && state.is_active() && cancel(&mut state) {
        debug!("Gesture cancelled by focus loss");
    }
}

/// Drop the selection when the mask is gone or no longer visible on this page
pub fn prune_selection(
    session: Res<EditorSession>,
    store: Res<MaskStore>,
    mut state: ResMut<InteractionState>,
) {
    let Some(id) = state.selected else {
        return;
    };
    let visible = store
        .get(id)
        .is_some_and(|mask| mask.applies_to_page(session.current_page));
    if !visible && !state.is_active() {
        state.selected = None;
    }
}
