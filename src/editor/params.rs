//! Common SystemParam bundles to reduce parameter counts in editor systems.
//!
//! Pointer systems all need the same trio of window, camera and page sprite to project
//! the cursor onto the page surface, so they share [`PageSurfaceParams`].
//!
//! ## Helper Functions
//!
//! - [`is_cursor_over_ui`]: Check if cursor is over egui UI (for input gating)

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::document::PageSurface;
use crate::editor::coords::{ContainerBounds, RelativePointer, pointer_to_relative};

use super::EditorCamera;

/// Bundled window, camera and page sprite queries for pointer projection
#[derive(SystemParam)]
pub struct PageSurfaceParams<'w, 's> {
    pub window: Query<'w, 's, (Entity, &'static Window), With<PrimaryWindow>>,
    pub camera: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<EditorCamera>>,
    pub surface: Query<
        'w,
        's,
        (&'static Sprite, &'static GlobalTransform, &'static Visibility),
        With<PageSurface>,
    >,
}

impl PageSurfaceParams<'_, '_> {
    pub fn window_entity(&self) -> Option<Entity> {
        self.window.single().ok().map(|(entity, _)| entity)
    }

    /// Cursor position in logical window pixels, top-left origin
    pub fn cursor_position(&self) -> Option<Vec2> {
        let (_, window) = self.window.single().ok()?;
        window.cursor_position()
    }

    /// Viewport rectangle currently covered by the page sprite
    pub fn container_bounds(&self) -> Option<ContainerBounds> {
        let (camera, camera_transform) = self.camera.single().ok()?;
        let (sprite, transform, visibility) = self.surface.single().ok()?;
        if *visibility == Visibility::Hidden {
            return None;
        }
        let size = sprite.custom_size?;

        let center = transform.translation();
        let top_left = center + Vec3::new(-size.x / 2.0, size.y / 2.0, 0.0);
        let min = camera.world_to_viewport(camera_transform, top_left).ok()?;

        let bounds = ContainerBounds::new(min, size);
        (!bounds.is_degenerate()).then_some(bounds)
    }

    /// The cursor relative to the page surface (may lie outside it)
    pub fn relative_pointer(&self) -> Option<RelativePointer> {
        let cursor = self.cursor_position()?;
        let bounds = self.container_bounds()?;
        Some(pointer_to_relative(cursor, &bounds))
    }

    /// Converts a container-relative point back into world space for gizmos
    pub fn relative_to_world(&self, point: Vec2) -> Option<Vec2> {
        let (camera, camera_transform) = self.camera.single().ok()?;
        let bounds = self.container_bounds()?;
        camera
            .viewport_to_world_2d(camera_transform, bounds.min + point)
            .ok()
    }
}

/// Check if the cursor is over egui UI
pub fn is_cursor_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false)
}
