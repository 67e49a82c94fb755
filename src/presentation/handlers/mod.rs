mod download;
mod error_response;
mod health;
mod job_status;
mod languages;
mod upload;

pub use download::download_handler;
pub use error_response::ErrorResponse;
pub use health::health_handler;
pub use job_status::job_status_handler;
pub use languages::languages_handler;
pub use upload::{UploadResponse, upload_handler};
