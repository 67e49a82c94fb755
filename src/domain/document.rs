use super::StoragePath;

/// How the worker has to treat a stored upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Paginated document; rasterized into one image per page.
    Pdf,
    /// Anything else is handed to the OCR engine as a single image.
    Image,
}

impl DocumentKind {
    pub fn of(path: &StoragePath) -> Self {
        if path.as_str().to_ascii_lowercase().ends_with(".pdf") {
            Self::Pdf
        } else {
            Self::Image
        }
    }
}
