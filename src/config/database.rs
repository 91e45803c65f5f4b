use mongodb::Client;
use tracing::info;

use crate::config::Settings;
use crate::error::Result;
use crate::modules::events::crud::EventCrud;

pub async fn connect(settings: &Settings) -> Result<Client> {
    let client = Client::with_uri_str(&settings.mongodb_uri).await?;
    info!(database = %settings.database, "connected to MongoDB");
    Ok(client)
}

/// The configured event collection on `client`.
pub fn events(client: &Client, settings: &Settings) -> EventCrud {
    EventCrud::new(client, &settings.database, &settings.collection)
}
