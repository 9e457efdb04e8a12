//! Selection and crop guide gizmos drawn over the page.

use bevy::camera::visibility::RenderLayers;
use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::prelude::*;

use crate::common::ResizeHandle;
use crate::document::EditorSession;
use crate::editor::coords::{PixelRect, percent_rect_to_canvas_pixels};
use crate::editor::params::PageSurfaceParams;
use crate::masks::MaskStore;

use super::{HANDLE_SIZE, Interaction, InteractionState};

/// Custom gizmo group for interaction overlays (editor layer only)
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct InteractionGizmoGroup;

/// Configure the interaction gizmo group to only render on layer 1
pub fn configure_interaction_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<InteractionGizmoGroup>();
    config.render_layers = RenderLayers::layer(1);
    config.line.width = 1.5;
}

/// Outline a container-relative pixel rectangle
fn outline(
    gizmos: &mut Gizmos<InteractionGizmoGroup>,
    surface: &PageSurfaceParams,
    rect: &PixelRect,
    color: Color,
) {
    let center = Vec2::new(rect.x + rect.w / 2.0, rect.y + rect.h / 2.0);
    let Some(world_center) = surface.relative_to_world(center) else {
        return;
    };
    gizmos.rect_2d(
        Isometry2d::from_translation(world_center),
        Vec2::new(rect.w, rect.h),
        color,
    );
}

/// Outline and handles for the selected mask, plus the rubber band while drawing
pub fn draw_selection_gizmos(
    mut gizmos: Gizmos<InteractionGizmoGroup>,
    surface: PageSurfaceParams,
    session: Res<EditorSession>,
    store: Res<MaskStore>,
    state: Res<InteractionState>,
) {
    let selection_color = Color::srgb(0.2, 0.6, 1.0);
    let Some(bounds) = surface.container_bounds() else {
        return;
    };

    if let Interaction::Drawing { start, current } = &state.interaction {
        let band = PixelRect::from_corners(*start, *current);
        outline(&mut gizmos, &surface, &band, Color::srgba(0.2, 0.6, 1.0, 0.8));
    }

    let Some(mask) = state
        .selected
        .and_then(|id| store.get(id))
        .filter(|m| m.applies_to_page(session.current_page))
    else {
        return;
    };

    let rect = percent_rect_to_canvas_pixels(&mask.rect(), bounds.size.x, bounds.size.y);
    outline(&mut gizmos, &surface, &rect, selection_color);

    for handle in ResizeHandle::ALL {
        let (ax, ay) = handle.anchor();
        let anchor = Vec2::new(rect.x + rect.w * ax, rect.y + rect.h * ay);
        let Some(world) = surface.relative_to_world(anchor) else {
            continue;
        };
        let size = if handle.is_corner() {
            HANDLE_SIZE
        } else {
            HANDLE_SIZE * 0.75
        };
        gizmos.rect_2d(
            Isometry2d::from_translation(world),
            Vec2::splat(size),
            selection_color,
        );
    }
}

/// Crop guides: the kept area outline plus lines marking each trimmed strip
pub fn draw_crop_guides(
    mut gizmos: Gizmos<InteractionGizmoGroup>,
    surface: PageSurfaceParams,
    session: Res<EditorSession>,
) {
    let guide_color = Color::srgb(1.0, 0.35, 0.2);
    let trimmed_color = Color::srgba(1.0, 0.35, 0.2, 0.35);
    let Some(bounds) = surface.container_bounds() else {
        return;
    };

    let kept = percent_rect_to_canvas_pixels(
        &session.margins.kept_area(),
        bounds.size.x,
        bounds.size.y,
    );
    outline(&mut gizmos, &surface, &kept, guide_color);

    // Hatch the trimmed strips so they read as removed
    let step = 12.0;
    let mut y = step / 2.0;
    while y < bounds.size.y {
        let in_kept_rows = y >= kept.y && y <= kept.y + kept.h;
        let spans: Vec<(f32, f32)> = if in_kept_rows {
            vec![(0.0, kept.x), (kept.x + kept.w, bounds.size.x)]
        } else {
            vec![(0.0, bounds.size.x)]
        };
        for (from, to) in spans {
            if to - from < 1.0 {
                continue;
            }
            let (Some(a), Some(b)) = (
                surface.relative_to_world(Vec2::new(from, y)),
                surface.relative_to_world(Vec2::new(to, y)),
            ) else {
                continue;
            };
            gizmos.line_2d(a, b, trimmed_color);
        }
        y += step;
    }
}
