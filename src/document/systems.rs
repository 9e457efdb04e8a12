//! Bevy systems driving renders, reconciliation and session resets.

use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use bevy::window::{MonitorSelection, PrimaryWindow, WindowMode};
use futures_lite::future;
use image::RgbaImage;

use crate::config::AppConfig;
use crate::editor::interaction::InteractionState;
use crate::error::RenderError;
use crate::masks::MaskStore;

use super::coordinator::{CurrentRaster, PageRaster, RenderCoordinator, RenderKey, RenderTicket};
use super::load::LoadDocumentTask;
use super::reconcile::reconcile_snapshots;
use super::render::PageRenderer;
use super::session::{ClearMasksRequest, EditorSession, NoticeLevel, ResetSessionRequest};

/// The renderer used for page rasters
#[derive(Resource, Clone)]
pub struct ActivePageRenderer(pub Arc<dyn PageRenderer>);

/// Background page render
#[derive(Component)]
pub struct RenderTask {
    pub ticket: RenderTicket,
    pub task: Task<Result<RgbaImage, RenderError>>,
}

/// Run condition: returns true when no page render is in flight.
pub fn render_idle(coordinator: Res<RenderCoordinator>) -> bool {
    !coordinator.is_rendering()
}

/// Request a render when the document, page or fullscreen flag changed
pub fn request_page_render(
    mut commands: Commands,
    session: Res<EditorSession>,
    config: Res<AppConfig>,
    renderer: Res<ActivePageRenderer>,
    mut coordinator: ResMut<RenderCoordinator>,
) {
    let Some(document) = &session.document else {
        return;
    };

    let key = RenderKey {
        document_generation: document.generation,
        page: session.current_page,
        fullscreen: session.fullscreen,
    };
    if !coordinator.needs_render(key) {
        return;
    }

    let target_width = if session.fullscreen {
        config.data.render.fullscreen_width
    } else {
        config.data.render.windowed_width
    };
    let ticket = coordinator.request(key, target_width);
    debug!(
        "Render #{} of page {} at {}px",
        ticket.id,
        key.page + 1,
        target_width
    );

    let bytes = document.bytes.clone();
    let renderer = renderer.0.clone();
    let task = AsyncComputeTaskPool::get()
        .spawn(async move { renderer.render_page(&bytes, key.page, target_width) });
    commands.spawn(RenderTask { ticket, task });
}

/// Poll render tasks, accepting only the latest ticket
pub fn poll_render_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut RenderTask)>,
    mut coordinator: ResMut<RenderCoordinator>,
    mut raster: ResMut<CurrentRaster>,
    mut session: ResMut<EditorSession>,
) {
    for (entity, mut render) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut render.task)) else {
            continue;
        };
        commands.entity(entity).despawn();
        let ticket = render.ticket;

        match result {
            Ok(image) => match coordinator.complete(ticket.id) {
                Some(generation) => {
                    debug!(
                        "Render #{} finished: {}x{}",
                        ticket.id,
                        image.width(),
                        image.height()
                    );
                    raster.0 = Some(PageRaster {
                        image: Arc::new(image),
                        page: ticket.key.page,
                        document_generation: ticket.key.document_generation,
                        generation,
                    });
                }
                None => debug!("Dropping stale render #{}", ticket.id),
            },
            Err(e) => {
                if coordinator.fail(ticket.id) {
                    error!("Render of page {} failed: {}", ticket.key.page + 1, e);
                    session.notify(NoticeLevel::Error, format!("Could not render page: {}", e));
                } else {
                    debug!("Ignoring failure of stale render #{}: {}", ticket.id, e);
                }
            }
        }
    }
}

/// Backfill missing edge snapshots for the page on screen
pub fn reconcile_current_page(
    session: Res<EditorSession>,
    raster: Res<CurrentRaster>,
    mut store: ResMut<MaskStore>,
) {
    let Some(generation) = session.document_generation() else {
        return;
    };
    let page = session.current_page;
    let Some(current) = raster.for_page(generation, page) else {
        return;
    };

    // Read through Deref first so idle frames don't flag the store as changed
    if !store.list_for_page(page).iter().any(|m| m.needs_snapshot()) {
        return;
    }
    reconcile_snapshots(&mut store, page, &current.image);
}

/// Handle reset and clear-masks requests
#[allow(clippy::too_many_arguments)]
pub fn handle_session_requests(
    mut commands: Commands,
    mut resets: MessageReader<ResetSessionRequest>,
    mut clears: MessageReader<ClearMasksRequest>,
    mut session: ResMut<EditorSession>,
    mut store: ResMut<MaskStore>,
    mut interaction: ResMut<InteractionState>,
    mut raster: ResMut<CurrentRaster>,
    mut coordinator: ResMut<RenderCoordinator>,
    tasks: Query<Entity, Or<(With<RenderTask>, With<LoadDocumentTask>)>>,
) {
    let reset = resets.read().count() > 0;
    let clear = clears.read().count() > 0;

    if reset {
        for entity in tasks.iter() {
            commands.entity(entity).despawn();
        }
        session.reset();
        store.clear();
        *interaction = InteractionState::default();
        raster.0 = None;
        coordinator.invalidate();
        info!("Session reset");
        return;
    }

    if clear {
        store.clear();
        *interaction = InteractionState::default();
        session.notify(NoticeLevel::Info, "All masks removed");
    }
}

/// Mirror the fullscreen flag onto the primary window
pub fn sync_window_mode(
    session: Res<EditorSession>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    let wanted = if session.fullscreen {
        WindowMode::BorderlessFullscreen(MonitorSelection::Current)
    } else {
        WindowMode::Windowed
    };
    if window.mode != wanted {
        window.mode = wanted;
    }
}
