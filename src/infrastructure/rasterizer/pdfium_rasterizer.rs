use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use image::ImageFormat;
use pdfium_render::prelude::*;

use crate::application::ports::{Rasterizer, RasterizerError};

pub const DEFAULT_RENDER_DPI: f32 = 200.0;
pub const DEFAULT_MAX_PAGES: usize = 500;

/// Renders PDF pages to PNG with pdfium. Rendering is CPU bound and runs on the
/// blocking pool.
pub struct PdfiumRasterizer {
    library_path: Option<PathBuf>,
    render_dpi: f32,
    max_pages: usize,
}

impl PdfiumRasterizer {
    /// `library_path` points at a directory holding the pdfium shared library;
    /// `None` binds to the system library.
    pub fn new(library_path: Option<PathBuf>, render_dpi: f32, max_pages: usize) -> Self {
        Self {
            library_path,
            render_dpi,
            max_pages,
        }
    }
}

impl Default for PdfiumRasterizer {
    fn default() -> Self {
        Self::new(None, DEFAULT_RENDER_DPI, DEFAULT_MAX_PAGES)
    }
}

#[async_trait]
impl Rasterizer for PdfiumRasterizer {
    async fn rasterize(&self, document: &[u8]) -> Result<Vec<Vec<u8>>, RasterizerError> {
        let data = document.to_vec();
        let library_path = self.library_path.clone();
        let render_dpi = self.render_dpi;
        let max_pages = self.max_pages;

        run_cancellable(move |cancelled| {
            rasterize_pages(&data, library_path, render_dpi, max_pages, cancelled)
        })
        .await
    }
}

/// Raises the flag when the awaiting future goes away, e.g. on job timeout.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Runs `work` on the blocking pool. If the returned future is dropped, the flag
/// passed to `work` is raised; `work` is expected to poll it between units of
/// work and return [`RasterizerError::Cancelled`].
pub async fn run_cancellable<T, F>(work: F) -> Result<T, RasterizerError>
where
    T: Send + 'static,
    F: FnOnce(&AtomicBool) -> Result<T, RasterizerError> + Send + 'static,
{
    let cancelled = Arc::new(AtomicBool::new(false));
    let _guard = CancelOnDrop(Arc::clone(&cancelled));

    tokio::task::spawn_blocking(move || work(&cancelled))
        .await
        .map_err(|e| RasterizerError::Unavailable(format!("rasterizer task failed: {e}")))?
}

/// Refuses documents longer than `max` instead of truncating them.
pub fn check_page_limit(count: usize, max: usize) -> Result<(), RasterizerError> {
    if count > max {
        return Err(RasterizerError::TooManyPages { count, max });
    }
    Ok(())
}

fn rasterize_pages(
    data: &[u8],
    library_path: Option<PathBuf>,
    render_dpi: f32,
    max_pages: usize,
    cancelled: &AtomicBool,
) -> Result<Vec<Vec<u8>>, RasterizerError> {
    let bindings = match library_path {
        Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir)),
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| RasterizerError::Unavailable(format!("pdfium bind failed: {e}")))?;
    let pdfium = Pdfium::new(bindings);

    let doc = pdfium
        .load_pdf_from_byte_slice(data, None)
        .map_err(|e| RasterizerError::OpenFailed(e.to_string()))?;

    let page_count = doc.pages().len() as usize;
    check_page_limit(page_count, max_pages)?;

    let mut png_buffers: Vec<Vec<u8>> = Vec::with_capacity(page_count);

    for index in 0..page_count {
        if cancelled.load(Ordering::Relaxed) {
            tracing::debug!(page = index, page_count, "Rasterization cancelled");
            return Err(RasterizerError::Cancelled);
        }

        let page = doc
            .pages()
            .get(index as u16)
            .map_err(|e| RasterizerError::RenderFailed {
                page: index,
                reason: e.to_string(),
            })?;

        let width = (page.width().value * render_dpi / 72.0) as i32;
        let height = (page.height().value * render_dpi / 72.0) as i32;

        let bitmap = page
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(width)
                    .set_target_height(height),
            )
            .map_err(|e| RasterizerError::RenderFailed {
                page: index,
                reason: e.to_string(),
            })?;

        let mut png_bytes: Vec<u8> = Vec::new();
        bitmap
            .as_image()
            .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|e| RasterizerError::RenderFailed {
                page: index,
                reason: format!("PNG encode failed: {e}"),
            })?;

        png_buffers.push(png_bytes);
    }

    Ok(png_buffers)
}
