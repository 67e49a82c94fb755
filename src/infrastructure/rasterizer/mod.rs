mod pdfium_rasterizer;

pub use pdfium_rasterizer::{
    DEFAULT_MAX_PAGES, DEFAULT_RENDER_DPI, PdfiumRasterizer, check_page_limit, run_cancellable,
};
