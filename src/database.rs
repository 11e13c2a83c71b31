use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::adapters::StorageError;

/// Opens the pool and brings the schema up to date.
pub async fn connection_pool(
	url: &str,
	max_connections: u32,
) -> Result<PgPool, StorageError> {
	let pool = PgPoolOptions::new().max_connections(max_connections).connect(url).await.map_err(|err| {
		tracing::error!("Error occurred while connecting to the database : {:?}", err);
		StorageError::Database(err)
	})?;

	sqlx::migrate!("./migrations").run(&pool).await?;
	tracing::info!("Database migrations applied");

	Ok(pool)
}
