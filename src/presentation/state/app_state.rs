use std::sync::Arc;

use crate::application::services::{RetrievalService, SubmissionService};
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub submission_service: Arc<SubmissionService>,
    pub retrieval_service: Arc<RetrievalService>,
    pub settings: Arc<Settings>,
}
