use async_trait::async_trait;

/// Turns a paginated document into page images, in document order.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, document: &[u8]) -> Result<Vec<Vec<u8>>, RasterizerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RasterizerError {
    #[error("rasterizer unavailable: {0}")]
    Unavailable(String),
    #[error("document could not be opened: {0}")]
    OpenFailed(String),
    #[error("page {page} failed to render: {reason}")]
    RenderFailed { page: usize, reason: String },
    #[error("document has {count} pages, limit is {max}")]
    TooManyPages { count: usize, max: usize },
    #[error("rasterization cancelled")]
    Cancelled,
}
