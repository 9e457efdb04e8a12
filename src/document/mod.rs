//! The loaded document, page rendering and the page surface.

mod coordinator;
mod load;
mod reconcile;
mod render;
mod session;
mod surface;
mod systems;

#[cfg(test)]
pub(crate) mod test_support;

pub use coordinator::{CurrentRaster, PageRaster, RenderCoordinator};
pub use load::OpenDocumentRequest;
pub use render::{PageRenderer, PdfiumRenderer};
pub use session::{
    ClearMasksRequest, EditorSession, LoadedDocument, Notice, NoticeLevel, RequestPageChange,
    ResetSessionRequest,
};
pub use surface::{PageSurface, rgba_to_image};
pub use systems::render_idle;

use std::sync::Arc;

use bevy::prelude::*;

use crate::config::ConfigLoaded;
use crate::editor::conditions::document_loaded;

pub struct DocumentPlugin;

impl Plugin for DocumentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EditorSession>()
            .init_resource::<RenderCoordinator>()
            .init_resource::<CurrentRaster>()
            .insert_resource(systems::ActivePageRenderer(Arc::new(PdfiumRenderer)))
            .add_message::<OpenDocumentRequest>()
            .add_message::<RequestPageChange>()
            .add_message::<ResetSessionRequest>()
            .add_message::<ClearMasksRequest>()
            .add_systems(Startup, surface::spawn_page_surface.after(ConfigLoaded))
            .add_systems(
                Update,
                (
                    load::handle_open_requests.run_if(on_message::<OpenDocumentRequest>),
                    load::poll_load_tasks,
                    session::apply_page_changes.run_if(on_message::<RequestPageChange>),
                    systems::handle_session_requests,
                    systems::request_page_render.run_if(document_loaded),
                    systems::poll_render_tasks,
                    surface::update_surface_image.run_if(resource_changed::<CurrentRaster>),
                    surface::layout_page_surface,
                    systems::reconcile_current_page.run_if(render_idle),
                    systems::sync_window_mode.run_if(resource_changed::<EditorSession>),
                )
                    .chain(),
            );
    }
}
