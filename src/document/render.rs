//! Page rasterization.

use image::RgbaImage;
use pdfium_render::prelude::*;

use crate::error::RenderError;

/// Turns one page of a PDF into an RGBA raster of a given pixel width.
pub trait PageRenderer: Send + Sync {
    fn render_page(
        &self,
        document: &[u8],
        page: usize,
        target_width: u32,
    ) -> Result<RgbaImage, RenderError>;
}

/// Renderer backed by a dynamically linked PDFium.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumRenderer;

/// Create a new Pdfium instance (dynamically linked).
///
/// Searches for libpdfium in:
/// 1. Current directory
/// 2. vendor/pdfium/lib/
/// 3. System library paths
fn create_pdfium() -> Result<Pdfium, RenderError> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "./vendor/pdfium/lib/",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| RenderError::LibraryUnavailable {
            message: format!("{:?}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

impl PageRenderer for PdfiumRenderer {
    fn render_page(
        &self,
        document: &[u8],
        page: usize,
        target_width: u32,
    ) -> Result<RgbaImage, RenderError> {
        let pdfium = create_pdfium()?;
        let pdf = pdfium
            .load_pdf_from_byte_slice(document, None)
            .map_err(|e| RenderError::Open {
                message: e.to_string(),
            })?;

        let pages = pdf.pages();
        let page_count = pages.len() as usize;
        if page >= page_count {
            return Err(RenderError::PageOutOfRange { page, page_count });
        }

        let pdf_page = pages.get(page as u16).map_err(|e| RenderError::Render {
            page,
            message: e.to_string(),
        })?;

        let config = PdfRenderConfig::new().set_target_width(target_width.max(1) as i32);
        let bitmap = pdf_page
            .render_with_config(&config)
            .map_err(|e| RenderError::Render {
                page,
                message: e.to_string(),
            })?;

        Ok(bitmap.as_image().to_rgba8())
    }
}
