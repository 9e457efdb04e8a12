//! Geometry for drag and resize gestures, computed from the gesture baseline.

use bevy::prelude::*;

use crate::common::ResizeHandle;
use crate::constants::MIN_MASK_SIZE_PCT;
use crate::editor::coords::PercentRect;

/// Baseline translated by the gesture delta. No clamping; masks may overscan the page.
pub fn apply_move(baseline: &PercentRect, delta_pct: Vec2) -> PercentRect {
    baseline.translated(delta_pct)
}

/// Resizes `baseline` by `delta_pct` for the grabbed handle.
///
/// East/south edges grow freely down to the minimum size. West/north edges commit a new
/// origin only if the resulting size stays at or above the minimum; otherwise that axis
/// keeps its `live` values for this event.
pub fn apply_resize(
    baseline: &PercentRect,
    live: &PercentRect,
    handle: ResizeHandle,
    delta_pct: Vec2,
) -> PercentRect {
    let mut rect = *live;

    if handle.moves_east() {
        rect.x = baseline.x;
        rect.width = (baseline.width + delta_pct.x).max(MIN_MASK_SIZE_PCT);
    } else if handle.moves_west() {
        let width = baseline.width - delta_pct.x;
        if width >= MIN_MASK_SIZE_PCT {
            rect.x = baseline.x + delta_pct.x;
            rect.width = width;
        }
    }

    if handle.moves_south() {
        rect.y = baseline.y;
        rect.height = (baseline.height + delta_pct.y).max(MIN_MASK_SIZE_PCT);
    } else if handle.moves_north() {
        let height = baseline.height - delta_pct.y;
        if height >= MIN_MASK_SIZE_PCT {
            rect.y = baseline.y + delta_pct.y;
            rect.height = height;
        }
    }

    rect
}
