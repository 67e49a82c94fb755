mod job_repository_factory;
mod pg_pool;
mod repositories;

pub use job_repository_factory::JobRepositoryFactory;
pub use pg_pool::create_pool;
pub use repositories::{InMemoryJobRepository, PgJobRepository};
