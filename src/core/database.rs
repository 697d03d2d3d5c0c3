use mongodb::{options::ClientOptions, Client, Database};

use crate::core::config::DatabaseConfig;

/// Create the MongoDB client. The client owns the connection pool and is
/// cheap to clone, so one instance is shared by every handler.
pub async fn create_client(config: &DatabaseConfig) -> Result<Client, mongodb::error::Error> {
    let mut options = ClientOptions::parse(&config.uri).await?;
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);

    Client::with_options(options)
}

pub fn database(client: &Client, config: &DatabaseConfig) -> Database {
    client.database(&config.name)
}
