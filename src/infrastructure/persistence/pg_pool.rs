use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::application::ports::RepositoryError;

const CONNECT_RETRIES: u32 = 5;

/// Connects with exponential backoff and applies the bundled migrations.
#[instrument(skip(url))]
pub async fn create_pool(url: &str, max_connections: u32) -> Result<PgPool, RepositoryError> {
    let mut retries_left = CONNECT_RETRIES;
    let mut delay = Duration::from_millis(500);

    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) if retries_left > 0 => {
                retries_left -= 1;
                warn!(
                    error = %e,
                    retries_left,
                    delay_ms = delay.as_millis(),
                    "PostgreSQL connection failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(e) => return Err(RepositoryError::ConnectionFailed(e.to_string())),
        }
    };

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| RepositoryError::ConnectionFailed(format!("migration failed: {e}")))?;

    info!("PostgreSQL job store ready");
    Ok(pool)
}
