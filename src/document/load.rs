//! PDF ingestion: validation and background loading.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use futures_lite::future;

use crate::config::{AppConfig, SaveConfigRequest};
use crate::constants::MAX_INPUT_BYTES;
use crate::editor::interaction::InteractionState;
use crate::error::DocumentError;
use crate::masks::MaskStore;

use super::session::{EditorSession, NoticeLevel};

/// Request to open a PDF from disk
#[derive(Message)]
pub struct OpenDocumentRequest {
    pub path: PathBuf,
}

/// A PDF that passed validation
pub struct ValidatedDocument {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

#[derive(Component)]
pub struct LoadDocumentTask(pub Task<Result<ValidatedDocument, DocumentError>>);

pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Checks the header and structure of PDF bytes, returning the page count.
pub fn validate_pdf_bytes(bytes: &[u8]) -> Result<usize, DocumentError> {
    if !bytes.starts_with(b"%PDF-") {
        return Err(DocumentError::MissingHeader);
    }

    let document = lopdf::Document::load_mem(bytes).map_err(DocumentError::Parse)?;
    let page_count = document.get_pages().len();
    if page_count == 0 {
        return Err(DocumentError::NoPages);
    }
    Ok(page_count)
}

/// Reads and validates a PDF from disk. Checks run cheapest first: extension, size,
/// header, structure.
pub fn read_document(path: &Path) -> Result<ValidatedDocument, DocumentError> {
    if !has_pdf_extension(path) {
        return Err(DocumentError::NotPdf {
            path: path.to_path_buf(),
        });
    }

    let read_error = |source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(read_error)?.len();
    if size > MAX_INPUT_BYTES {
        return Err(DocumentError::TooLarge {
            size,
            limit: MAX_INPUT_BYTES,
        });
    }

    let bytes = std::fs::read(path).map_err(read_error)?;
    let page_count = validate_pdf_bytes(&bytes)?;

    Ok(ValidatedDocument {
        path: path.to_path_buf(),
        bytes,
        page_count,
    })
}

/// System to start loading requested documents on the IO pool
pub fn handle_open_requests(
    mut commands: Commands,
    mut requests: MessageReader<OpenDocumentRequest>,
    existing: Query<Entity, With<LoadDocumentTask>>,
) {
    // Only the most recent request matters
    let Some(request) = requests.read().last() else {
        return;
    };

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    let path = request.path.clone();
    info!("Opening {:?}", path);
    let task = IoTaskPool::get().spawn(async move { read_document(&path) });
    commands.spawn(LoadDocumentTask(task));
}

/// System to poll document load tasks and install the result
#[allow(clippy::too_many_arguments)]
pub fn poll_load_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut LoadDocumentTask)>,
    mut session: ResMut<EditorSession>,
    mut store: ResMut<MaskStore>,
    mut interaction: ResMut<InteractionState>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();

        match result {
            Ok(document) => {
                if let Some(dir) = crate::paths::parent_dir(&document.path) {
                    config.data.last_open_dir = Some(dir);
                    config.dirty = true;
                    save_events.write(SaveConfigRequest);
                }

                store.clear();
                *interaction = InteractionState::default();
                let page_count = document.page_count;
                session.install_document(Arc::new(document.bytes), document.path, page_count);
                let name = session
                    .document
                    .as_ref()
                    .map(|d| d.file_name.clone())
                    .unwrap_or_default();
                info!("Loaded {} ({} pages)", name, page_count);
                session.notify(
                    NoticeLevel::Info,
                    format!("Opened {} ({} pages)", name, page_count),
                );
            }
            Err(e) => {
                warn!("Failed to open document: {}", e);
                session.notify(NoticeLevel::Error, format!("Could not open file: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::test_support::pdf_with_pages;

    #[test]
    fn test_extension_check_is_case_insensitive() {
        assert!(has_pdf_extension(Path::new("deck.PDF")));
        assert!(has_pdf_extension(Path::new("/a/b/deck.pdf")));
        assert!(!has_pdf_extension(Path::new("deck.pptx")));
        assert!(!has_pdf_extension(Path::new("deck")));
    }

    #[test]
    fn test_read_rejects_non_pdf_before_touching_disk() {
        let err = read_document(Path::new("/definitely/missing/deck.png")).err().unwrap();
        assert!(matches!(err, DocumentError::NotPdf { .. }));
    }

    #[test]
    fn test_read_reports_missing_file() {
        let err = read_document(Path::new("/definitely/missing/deck.pdf")).err().unwrap();
        assert!(matches!(err, DocumentError::Read { .. }));
    }

    #[test]
    fn test_validate_counts_pages() {
        assert_eq!(validate_pdf_bytes(&pdf_with_pages(3)).unwrap(), 3);
    }

    #[test]
    fn test_validate_rejects_missing_header() {
        let err = validate_pdf_bytes(b"hello world").err().unwrap();
        assert!(matches!(err, DocumentError::MissingHeader));
    }

    #[test]
    fn test_validate_rejects_garbage_after_header() {
        let err = validate_pdf_bytes(b"%PDF-1.4\nnot really a pdf").err().unwrap();
        assert!(matches!(
            err,
            DocumentError::Parse(_) | DocumentError::NoPages
        ));
    }
}
