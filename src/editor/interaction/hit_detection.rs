//! Hit detection for resize handles and mask bodies.

use bevy::prelude::*;

use crate::common::ResizeHandle;
use crate::editor::coords::{PixelRect, RelativePointer, percent_rect_to_canvas_pixels};
use crate::masks::{MaskId, MaskStore};

use super::{HANDLE_SIZE, PointerTarget};

/// Handle of `rect` (display pixels) under `pointer`, corners taking priority over edges.
pub fn handle_at_position(rect: &PixelRect, pointer: Vec2) -> Option<ResizeHandle> {
    let hit_size = HANDLE_SIZE * 1.5;
    let anchor_pos = |handle: ResizeHandle| {
        let (ax, ay) = handle.anchor();
        Vec2::new(rect.x + rect.w * ax, rect.y + rect.h * ay)
    };

    let corners = ResizeHandle::ALL.into_iter().filter(|h| h.is_corner());
    let edges = ResizeHandle::ALL.into_iter().filter(|h| !h.is_corner());

    corners
        .chain(edges)
        .find(|handle| (pointer - anchor_pos(*handle)).length() < hit_size)
}

/// Resolves what a pointer-down at `pointer` would grab on `page`.
///
/// Priority: handle of the selected mask, then the topmost (last inserted) mask body,
/// then empty surface.
pub fn hit_test(
    store: &MaskStore,
    selected: Option<MaskId>,
    page: usize,
    pointer: &RelativePointer,
) -> PointerTarget {
    if pointer.width <= 0.0 || pointer.height <= 0.0 {
        return PointerTarget::Outside;
    }

    let position = pointer.position();

    if let Some(mask) = selected
        .and_then(|id| store.get(id))
        .filter(|m| m.applies_to_page(page))
    {
        let rect = percent_rect_to_canvas_pixels(&mask.rect(), pointer.width, pointer.height);
        if let Some(handle) = handle_at_position(&rect, position) {
            return PointerTarget::Handle(mask.id, handle);
        }
    }

    let inside = position.x >= 0.0
        && position.y >= 0.0
        && position.x <= pointer.width
        && position.y <= pointer.height;
    if !inside {
        return PointerTarget::Outside;
    }

    let point_pct = pointer.to_percent();
    store
        .list_for_page(page)
        .into_iter()
        .rev()
        .find(|m| m.contains(point_pct))
        .map(|m| PointerTarget::Mask(m.id))
        .unwrap_or(PointerTarget::Surface)
}
