//! Save dialog, background export and result reporting.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use futures_lite::future;

use crate::config::{AppConfig, SaveConfigRequest};
use crate::document::{EditorSession, NoticeLevel};
use crate::error::ExportError;
use crate::masks::{CropMargins, Mask, MaskStore};

use super::pdf::{export_with_margins, export_with_masks};

/// Which transform an export applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Crop,
    Mask,
}

impl ExportKind {
    pub fn file_prefix(&self) -> &'static str {
        match self {
            ExportKind::Crop => "cropped_",
            ExportKind::Mask => "masked_",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExportKind::Crop => "Export cropped PDF",
            ExportKind::Mask => "Export masked PDF",
        }
    }
}

/// Default output file name for an input stem
pub fn export_file_name(kind: ExportKind, stem: &str) -> String {
    format!("{}{}.pdf", kind.file_prefix(), stem)
}

/// Message to export the loaded document
#[derive(Message, Debug, Clone, Copy)]
pub struct ExportRequest {
    pub kind: ExportKind,
}

/// Snapshot of everything an export needs, taken when the request is made
enum ExportPayload {
    Crop(CropMargins),
    Mask(Vec<Mask>),
}

/// Applies the payload and writes the result to `path`
fn run_export(document: &[u8], payload: &ExportPayload, path: &Path) -> Result<(), ExportError> {
    let bytes = match payload {
        ExportPayload::Crop(margins) => export_with_margins(document, margins)?,
        ExportPayload::Mask(masks) => export_with_masks(document, masks)?,
    };
    std::fs::write(path, bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// `None` when the user cancelled the save dialog
#[derive(Component)]
pub struct ExportTask(pub Task<Option<Result<PathBuf, ExportError>>>);

/// Tracks the in-flight export so the buttons can be disabled
#[derive(Resource, Default)]
pub struct ExportStatus {
    pub busy: bool,
}

/// Open the save dialog and export on a background task
pub fn handle_export_requests(
    mut commands: Commands,
    mut requests: MessageReader<ExportRequest>,
    session: Res<EditorSession>,
    store: Res<MaskStore>,
    config: Res<AppConfig>,
    mut status: ResMut<ExportStatus>,
) {
    let Some(request) = requests.read().last().copied() else {
        return;
    };
    if status.busy {
        warn!("Export already in progress");
        return;
    }
    let Some(document) = &session.document else {
        return;
    };

    let payload = match request.kind {
        ExportKind::Crop => ExportPayload::Crop(session.margins),
        ExportKind::Mask => ExportPayload::Mask(store.iter().cloned().collect()),
    };
    let file_name = export_file_name(request.kind, document.stem());
    let start_dir = config
        .data
        .last_export_dir
        .clone()
        .or_else(|| crate::paths::parent_dir(&document.path))
        .unwrap_or_else(crate::paths::default_documents_dir);
    let bytes = Arc::clone(&document.bytes);
    let title = request.kind.display_name();

    info!("Exporting {:?} from {}", request.kind, document.file_name);
    let task = AsyncComputeTaskPool::get().spawn(async move {
        let handle = rfd::AsyncFileDialog::new()
            .set_title(title)
            .set_directory(&start_dir)
            .set_file_name(&file_name)
            .add_filter("PDF", &["pdf"])
            .save_file()
            .await?;
        let path = handle.path().to_path_buf();
        Some(run_export(&bytes, &payload, &path).map(|_| path))
    });
    commands.spawn(ExportTask(task));
    status.busy = true;
}

/// Poll export tasks and report the outcome
pub fn poll_export_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ExportTask)>,
    mut session: ResMut<EditorSession>,
    mut status: ResMut<ExportStatus>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();
        status.busy = false;

        match result {
            None => debug!("Export cancelled"),
            Some(Ok(path)) => {
                info!("Exported to {:?}", path);
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                match crate::paths::parent_dir(&path) {
                    Some(folder) => {
                        config.data.last_export_dir = Some(folder.clone());
                        config.dirty = true;
                        save_events.write(SaveConfigRequest);
                        session.notify_with_folder(format!("Saved {}", name), folder);
                    }
                    None => session.notify(NoticeLevel::Info, format!("Saved {}", name)),
                }
            }
            Some(Err(e)) => {
                error!("Export failed: {}", e);
                session.notify(NoticeLevel::Error, format!("Export failed: {}", e));
            }
        }
    }
}
