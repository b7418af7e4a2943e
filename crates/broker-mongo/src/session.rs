use async_trait::async_trait;
use mongodb::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use broker_core::error::{BrokerError, BrokerResult};
use broker_core::session::SessionManager;
use broker_core::storage::Storage;

use crate::connection_config::ConnectionConfig;
use crate::dial::DialDescriptor;

/// The backend's cached MongoDB client.
///
/// Dialed lazily from the stored connection record, so a client always
/// reflects the configuration that was current when it was created.
pub struct MongoSession {
    storage: Arc<dyn Storage>,
    dial_timeout: Duration,
    client: Mutex<Option<Client>>,
}

impl MongoSession {
    pub fn new(storage: Arc<dyn Storage>, dial_timeout: Duration) -> Self {
        Self {
            storage,
            dial_timeout,
            client: Mutex::new(None),
        }
    }

    /// Return the cached client, dialing from storage if there is none.
    ///
    /// This is the entry point for anything in the backend that talks to the
    /// configured database. Callers get a clone; after an `invalidate` the
    /// next call dials again from whatever record is stored then.
    pub async fn client(&self) -> BrokerResult<Client> {
        let mut cached = self.client.lock().await;
        if let Some(client) = cached.as_ref() {
            return Ok(client.clone());
        }

        let config = ConnectionConfig::load(self.storage.as_ref())
            .await?
            .ok_or_else(|| {
                BrokerError::Config("configure the MongoDB connection first".into())
            })?;
        let dial = DialDescriptor::parse(&config.uri)
            .await
            .map_err(|e| BrokerError::Config(format!("invalid uri: {e}")))?;

        tracing::debug!(hosts = ?dial.hosts, "Opening MongoDB session");
        let options = dial.with_default_timeout(self.dial_timeout).into_client_options();
        let client = Client::with_options(options).map_err(connection_failed)?;

        *cached = Some(client.clone());
        Ok(client)
    }

    pub async fn is_cached(&self) -> bool {
        self.client.lock().await.is_some()
    }
}

fn connection_failed(e: mongodb::error::Error) -> BrokerError {
    BrokerError::Connection(anyhow::Error::new(e).context("MongoDB connection failed"))
}

#[async_trait]
impl SessionManager for MongoSession {
    async fn invalidate(&self) {
        // Clones handed out earlier stay usable until their holders drop them.
        if self.client.lock().await.take().is_some() {
            tracing::info!("MongoDB session reset");
        }
    }
}
