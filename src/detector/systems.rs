use std::sync::Arc;
use std::time::{Duration, Instant};

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;

use crate::config::AppConfig;
use crate::document::{CurrentRaster, EditorSession, NoticeLevel};
use crate::error::DetectorError;
use crate::masks::MaskStore;

use super::apply::{assign_detected_masks, resolve_margins, resolve_masks};
use super::client::{Detector, HttpDetector};
use super::state::{
    DetectionKind, DetectionOutcome, DetectorStatus, DetectorTask, RequestDetection,
};

/// Grace period on top of the transport timeout before a call is abandoned
const DEADLINE_GRACE: Duration = Duration::from_secs(2);

/// Start a detector call for the page on screen
pub fn handle_detection_requests(
    mut commands: Commands,
    mut requests: MessageReader<RequestDetection>,
    mut session: ResMut<EditorSession>,
    mut status: ResMut<DetectorStatus>,
    raster: Res<CurrentRaster>,
    config: Res<AppConfig>,
) {
    let Some(request) = requests.read().last().copied() else {
        return;
    };
    if status.is_busy() {
        debug!("Ignoring {:?} request while another is running", request.kind);
        return;
    }

    let Some(generation) = session.document_generation() else {
        return;
    };
    let page = session.current_page;
    let Some(page_raster) = raster.for_page(generation, page) else {
        session.notify(NoticeLevel::Warning, "Page is still rendering, try again shortly");
        return;
    };

    let detector = match HttpDetector::from_settings(&config.data.detector) {
        Ok(detector) => detector,
        Err(e) => {
            warn!("Detector unavailable: {}", e);
            session.notify(NoticeLevel::Warning, format!("{}", e));
            return;
        }
    };

    let image = Arc::clone(&page_raster.image);
    let kind = request.kind;
    info!("Requesting {} for page {}", kind.task_name(), page + 1);
    let task = IoTaskPool::get().spawn(async move {
        match kind {
            DetectionKind::Margins => DetectionOutcome::Margins(detector.suggest_margins(&image)),
            DetectionKind::Masks => DetectionOutcome::Masks(detector.suggest_masks(&image)),
        }
    });

    let timeout = Duration::from_secs(config.data.detector.timeout_secs.max(1));
    commands.spawn(DetectorTask {
        kind,
        page,
        document_generation: generation,
        deadline: Instant::now() + timeout + DEADLINE_GRACE,
        task,
    });
    status.busy = Some(kind);
}

/// Poll detector calls, applying results or falling back
pub fn poll_detector_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut DetectorTask)>,
    mut session: ResMut<EditorSession>,
    mut store: ResMut<MaskStore>,
    mut status: ResMut<DetectorStatus>,
) {
    for (entity, mut detector_task) in tasks.iter_mut() {
        let outcome = match future::block_on(future::poll_once(&mut detector_task.task)) {
            Some(outcome) => outcome,
            None if Instant::now() >= detector_task.deadline => match detector_task.kind {
                DetectionKind::Margins => DetectionOutcome::Margins(Err(DetectorError::Timeout)),
                DetectionKind::Masks => DetectionOutcome::Masks(Err(DetectorError::Timeout)),
            },
            None => continue,
        };
        commands.entity(entity).despawn();
        status.busy = None;

        if session.document_generation() != Some(detector_task.document_generation) {
            debug!("Dropping detector result for a closed document");
            continue;
        }

        match outcome {
            DetectionOutcome::Margins(result) => {
                let resolved = resolve_margins(result);
                if let Some(margins) = resolved.margins {
                    session.margins = margins;
                }
                session.notify(resolved.level, resolved.message);
            }
            DetectionOutcome::Masks(result) => {
                let (masks, level, message) = resolve_masks(result);
                let ids = assign_detected_masks(&mut store, &masks, detector_task.page);
                if !ids.is_empty() {
                    info!(
                        "Added {} detected masks to page {}",
                        ids.len(),
                        detector_task.page + 1
                    );
                }
                session.notify(level, message);
            }
        }
    }
}

/// Abandon in-flight calls when the document is closed or replaced
pub fn drop_stale_detector_tasks(
    mut commands: Commands,
    session: Res<EditorSession>,
    tasks: Query<(Entity, &DetectorTask)>,
    mut status: ResMut<DetectorStatus>,
) {
    for (entity, task) in tasks.iter() {
        if session.document_generation() != Some(task.document_generation) {
            commands.entity(entity).despawn();
            status.busy = None;
        }
    }
}
