mod camera;
pub mod conditions;
pub mod coords;
pub mod interaction;
mod overlay;
pub mod params;
pub mod sampler;
pub mod tools;

pub use camera::EditorCamera;
pub use interaction::InteractionState;
pub use tools::EditorMode;

use bevy::prelude::*;

use conditions::{document_loaded, interaction_active, interaction_idle, mode_is, no_dialog_open};

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InteractionState>()
            // Register interaction gizmo group for editor-only rendering
            .init_gizmo_group::<interaction::InteractionGizmoGroup>()
            .add_systems(
                Startup,
                (camera::spawn_camera, interaction::configure_interaction_gizmos),
            )
            .add_systems(
                Update,
                (
                    interaction::cancel_on_focus_loss,
                    interaction::cancel_on_context_change,
                    tools::handle_editor_shortcuts.run_if(no_dialog_open),
                    interaction::handle_pointer_down.run_if(
                        interaction_idle
                            .and(mode_is(EditorMode::Mask))
                            .and(document_loaded)
                            .and(no_dialog_open),
                    ),
                    interaction::handle_pointer_drag.run_if(interaction_active),
                    interaction::handle_pointer_release.run_if(interaction_active),
                    interaction::prune_selection,
                    overlay::sync_mask_sprites,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    interaction::update_interaction_cursor.run_if(no_dialog_open),
                    interaction::draw_selection_gizmos.run_if(mode_is(EditorMode::Mask)),
                    interaction::draw_crop_guides
                        .run_if(mode_is(EditorMode::Crop).and(document_loaded)),
                ),
            );
    }
}
