//! PDF export: cropped and masked copies of the loaded document.

mod color;
mod pdf;
mod systems;

#[cfg(test)]
mod tests;

pub use color::{parse_hex_color, pdf_rgb};
pub use pdf::{export_with_margins, export_with_masks};
pub use systems::{ExportKind, ExportRequest, ExportStatus, export_file_name};

use bevy::prelude::*;

pub struct ExportPlugin;

impl Plugin for ExportPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ExportStatus>()
            .add_message::<ExportRequest>()
            .add_systems(
                Update,
                (
                    systems::handle_export_requests.run_if(on_message::<ExportRequest>),
                    systems::poll_export_tasks,
                ),
            );
    }
}
