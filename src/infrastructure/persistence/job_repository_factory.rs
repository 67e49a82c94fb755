use std::sync::Arc;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::presentation::config::{DatabaseProvider, DatabaseSettings};

use super::pg_pool::create_pool;
use super::repositories::{InMemoryJobRepository, PgJobRepository};

pub struct JobRepositoryFactory;

impl JobRepositoryFactory {
    pub async fn create(
        settings: &DatabaseSettings,
    ) -> Result<Arc<dyn JobRepository>, RepositoryError> {
        match settings.provider {
            DatabaseProvider::Memory => {
                tracing::info!("Using in-memory job store");
                Ok(Arc::new(InMemoryJobRepository::new()))
            }
            DatabaseProvider::Postgres => {
                let url = settings.url.as_deref().ok_or_else(|| {
                    RepositoryError::ConnectionFailed("database.url required for postgres".into())
                })?;
                let pool = create_pool(url, settings.max_connections).await?;
                Ok(Arc::new(PgJobRepository::new(pool)))
            }
        }
    }
}
