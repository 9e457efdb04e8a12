//! Transitions of the pointer interaction state machine.

use bevy::prelude::*;
use image::RgbaImage;

use crate::constants::{DEFAULT_MASK_COLOR, MIN_DRAW_PIXELS};
use crate::editor::coords::{
    PixelRect, RelativePointer, canvas_pixels_to_percent_rect, pixel_delta_to_percent,
};
use crate::editor::sampler::dominant_color;
use crate::editor::tools::EditorMode;
use crate::masks::{Mask, MaskId, MaskStore};

use super::resize::{apply_move, apply_resize};
use super::{Interaction, InteractionState, PointerTarget};

/// Starts a gesture from `Idle`. Ignored while another gesture is running or outside mask mode.
pub fn pointer_down(
    state: &mut InteractionState,
    store: &MaskStore,
    mode: EditorMode,
    target: PointerTarget,
    pointer: Vec2,
) {
    if state.is_active() || mode != EditorMode::Mask {
        return;
    }

    match target {
        PointerTarget::Handle(mask_id, handle) => {
            let Some(mask) = store.get(mask_id) else {
                return;
            };
            state.selected = Some(mask_id);
            state.interaction = Interaction::Resizing {
                mask_id,
                baseline: mask.clone(),
                handle,
                start: pointer,
            };
        }
        PointerTarget::Mask(mask_id) => {
            let Some(mask) = store.get(mask_id) else {
                return;
            };
            state.selected = Some(mask_id);
            state.interaction = Interaction::Dragging {
                mask_id,
                baseline: mask.clone(),
                start: pointer,
            };
        }
        PointerTarget::Surface => {
            state.selected = None;
            state.interaction = Interaction::Drawing {
                start: pointer,
                current: pointer,
            };
        }
        PointerTarget::Outside => {}
    }
}

/// Recomputes live geometry from the baseline and the pointer delta.
///
/// Drag and resize results are written to the store immediately.
pub fn pointer_move(state: &mut InteractionState, store: &mut MaskStore, pointer: &RelativePointer) {
    let position = pointer.position();
    match &mut state.interaction {
        Interaction::Idle => {}
        Interaction::Drawing { current, .. } => {
            *current = position;
        }
        Interaction::Dragging {
            baseline, start, ..
        } => {
            let delta = position - *start;
            let delta_pct = pixel_delta_to_percent(delta.x, delta.y, pointer.width, pointer.height);
            let mut moved = baseline.clone();
            moved.set_rect(apply_move(&baseline.rect(), delta_pct));
            store.update(moved);
        }
        Interaction::Resizing {
            mask_id,
            baseline,
            handle,
            start,
        } => {
            let delta = position - *start;
            let delta_pct = pixel_delta_to_percent(delta.x, delta.y, pointer.width, pointer.height);
            let live = store
                .get(*mask_id)
                .map(|m| m.rect())
                .unwrap_or_else(|| baseline.rect());
            let mut resized = baseline.clone();
            resized.set_rect(apply_resize(&baseline.rect(), &live, *handle, delta_pct));
            store.update(resized);
        }
    }
}

/// Ends the gesture and returns to `Idle`.
///
/// A drawn rectangle larger than the minimum on both axes becomes a solid mask on `page`,
/// colored from `raster` under its top-left corner. Returns the id of a newly drawn mask.
pub fn pointer_up(
    state: &mut InteractionState,
    store: &mut MaskStore,
    pointer: &RelativePointer,
    page: usize,
    raster: Option<&RgbaImage>,
) -> Option<MaskId> {
    pointer_move(state, store, pointer);

    let finished = std::mem::take(&mut state.interaction);
    let Interaction::Drawing { start, current } = finished else {
        return None;
    };

    let rect = PixelRect::from_corners(start, current);
    if rect.w <= MIN_DRAW_PIXELS || rect.h <= MIN_DRAW_PIXELS {
        debug!("Discarding {}x{} px draw", rect.w, rect.h);
        return None;
    }

    let color = raster
        .map(|r| dominant_color(r, &rect, pointer.width))
        .unwrap_or_else(|| DEFAULT_MASK_COLOR.to_string());
    let percent = canvas_pixels_to_percent_rect(&rect, pointer.width, pointer.height);

    let id = store.allocate_id();
    store.add(Mask::solid(id, percent, color, Some(page)));
    state.selected = Some(id);
    info!("Drew mask {:?} on page {}", id, page + 1);
    Some(id)
}

/// Abandons the current gesture without committing a draw. Returns whether one was running.
pub fn cancel(state: &mut InteractionState) -> bool {
    let was_active = state.is_active();
    state.interaction = Interaction::Idle;
    was_active
}
