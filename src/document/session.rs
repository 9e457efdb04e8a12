use std::path::PathBuf;
use std::sync::Arc;

use bevy::prelude::*;

use crate::editor::tools::EditorMode;
use crate::masks::{CropMargins, MaskStore};

/// A validated PDF held in memory for rendering and export
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub bytes: Arc<Vec<u8>>,
    pub path: PathBuf,
    pub file_name: String,
    pub page_count: usize,
    /// Incremented on every successful load; renders and detections are tagged with it
    pub generation: u64,
}

impl LoadedDocument {
    /// File name without the `.pdf` extension, used to build export names.
    pub fn stem(&self) -> &str {
        self.file_name
            .strip_suffix(".pdf")
            .or_else(|| self.file_name.strip_suffix(".PDF"))
            .unwrap_or(&self.file_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// User-visible status message shown in the corner of the page area
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Folder offered to open after an export
    pub folder: Option<PathBuf>,
}

/// Page navigation requests from the toolbar and keyboard
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPageChange {
    Next,
    Previous,
    Goto(usize),
}

/// Drops the document, all masks and margins
#[derive(Message)]
pub struct ResetSessionRequest;

/// Drops all masks but keeps the document
#[derive(Message)]
pub struct ClearMasksRequest;

/// The editing session: loaded document, current page, view flags, margins and notice.
#[derive(Resource, Debug, Default)]
pub struct EditorSession {
    pub document: Option<LoadedDocument>,
    pub current_page: usize,
    pub fullscreen: bool,
    pub mode: EditorMode,
    pub margins: CropMargins,
    pub notice: Option<Notice>,
    last_generation: u64,
}

impl EditorSession {
    pub fn page_count(&self) -> usize {
        self.document.as_ref().map(|d| d.page_count).unwrap_or(0)
    }

    pub fn document_generation(&self) -> Option<u64> {
        self.document.as_ref().map(|d| d.generation)
    }

    /// Moves to `page` if it exists. Returns whether the page changed.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page >= self.page_count() || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        match self.current_page.checked_sub(1) {
            Some(page) => self.go_to_page(page),
            None => false,
        }
    }

    /// Installs a freshly loaded document: first page, zero margins, new generation.
    pub fn install_document(
        &mut self,
        bytes: Arc<Vec<u8>>,
        path: PathBuf,
        page_count: usize,
    ) -> u64 {
        self.last_generation += 1;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        self.document = Some(LoadedDocument {
            bytes,
            path,
            file_name,
            page_count,
            generation: self.last_generation,
        });
        self.current_page = 0;
        self.margins = CropMargins::default();
        self.last_generation
    }

    /// Drops the document and margins and leaves fullscreen.
    pub fn reset(&mut self) {
        self.document = None;
        self.current_page = 0;
        self.fullscreen = false;
        self.margins = CropMargins::default();
        self.notice = None;
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            message: message.into(),
            folder: None,
        });
    }

    pub fn notify_with_folder(&mut self, message: impl Into<String>, folder: PathBuf) {
        self.notice = Some(Notice {
            level: NoticeLevel::Info,
            message: message.into(),
            folder: Some(folder),
        });
    }
}

/// Applies one navigation request. Global clone masks lose their strip on a page change
/// so the next reconcile recaptures it from the new page.
pub fn change_page(
    session: &mut EditorSession,
    store: &mut MaskStore,
    request: RequestPageChange,
) -> bool {
    let changed = match request {
        RequestPageChange::Next => session.next_page(),
        RequestPageChange::Previous => session.previous_page(),
        RequestPageChange::Goto(page) => session.go_to_page(page),
    };
    if changed {
        let dropped = store.invalidate_global_snapshots();
        debug!(
            "Now on page {} ({} snapshots to recapture)",
            session.current_page + 1,
            dropped
        );
    }
    changed
}

/// System applying queued page navigation requests
pub fn apply_page_changes(
    mut requests: MessageReader<RequestPageChange>,
    mut session: ResMut<EditorSession>,
    mut store: ResMut<MaskStore>,
) {
    for request in requests.read() {
        change_page(&mut session, &mut store, *request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masks::MarginEdge;

    fn session_with_pages(pages: usize) -> EditorSession {
        let mut session = EditorSession::default();
        session.install_document(Arc::new(Vec::new()), PathBuf::from("/tmp/deck.pdf"), pages);
        session
    }

    #[test]
    fn test_default_mode_is_mask() {
        assert_eq!(EditorSession::default().mode, EditorMode::Mask);
    }

    #[test]
    fn test_page_navigation_stays_in_range() {
        let mut session = session_with_pages(3);
        assert!(!session.previous_page());
        assert!(session.next_page());
        assert!(session.next_page());
        assert!(!session.next_page());
        assert_eq!(session.current_page, 2);
        assert!(!session.go_to_page(3));
        assert!(session.go_to_page(0));
    }

    #[test]
    fn test_install_resets_page_and_margins() {
        let mut session = session_with_pages(3);
        session.go_to_page(2);
        session.margins.set_edge(MarginEdge::Top, 10.0);

        let generation = session.install_document(
            Arc::new(Vec::new()),
            PathBuf::from("other.pdf"),
            5,
        );
        assert_eq!(generation, 2);
        assert_eq!(session.current_page, 0);
        assert!(session.margins.is_zero());
        assert_eq!(session.page_count(), 5);
    }

    #[test]
    fn test_reset_drops_document() {
        let mut session = session_with_pages(2);
        session.fullscreen = true;
        session.reset();
        assert!(session.document.is_none());
        assert!(!session.fullscreen);
        assert_eq!(session.page_count(), 0);
    }

    #[test]
    fn test_page_change_releases_global_clone_snapshot() {
        use crate::editor::coords::PercentRect;
        use crate::masks::{EdgeDirection, EdgeSnapshot, FillType, Mask, MaskId};
        use image::{Rgba, RgbaImage};

        let mut session = session_with_pages(3);
        let mut store = MaskStore::default();
        let rect = PercentRect::new(10.0, 10.0, 20.0, 5.0);
        let mut mask = Mask::solid(MaskId(1), rect, "#000000", None);
        mask.fill_type = FillType::CloneTop;
        mask.image_snapshot = Some(Arc::new(EdgeSnapshot {
            direction: EdgeDirection::Top,
            strip: RgbaImage::from_pixel(4, 1, Rgba([255, 0, 0, 255])),
        }));
        store.add(mask);

        // Staying put keeps the strip
        assert!(!change_page(&mut session, &mut store, RequestPageChange::Previous));
        assert!(store.get(MaskId(1)).unwrap().image_snapshot.is_some());

        assert!(change_page(&mut session, &mut store, RequestPageChange::Goto(2)));
        assert!(store.get(MaskId(1)).unwrap().needs_snapshot());
    }

    #[test]
    fn test_document_stem() {
        let session = session_with_pages(1);
        assert_eq!(session.document.as_ref().unwrap().stem(), "deck");
    }
}
