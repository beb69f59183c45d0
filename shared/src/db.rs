//! Database connection management.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::secrets::get_database_credentials;
use crate::{Config, Error, Result};

/// AWS SDK configuration pinned to the configured region.
pub async fn sdk_config(config: &Config) -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await
}

/// Create a database connection pool using credentials from Secrets Manager.
pub async fn create_pool(config: &Config) -> Result<PgPool> {
    let aws_config = sdk_config(config).await;
    let secrets_client = aws_sdk_secretsmanager::Client::new(&aws_config);

    let creds = get_database_credentials(&secrets_client, &config.db_secret_arn).await?;
    let database_url = creds.database_url(&config.db_host, &config.db_name);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&database_url)
        .await
        .map_err(Error::Database)?;

    info!("Connected to database {} on {}", config.db_name, config.db_host);

    Ok(pool)
}
