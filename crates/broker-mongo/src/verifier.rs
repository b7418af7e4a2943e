use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::Client;
use std::time::Duration;

use crate::dial::DialDescriptor;

/// Checks that a dial descriptor reaches a live, usable server.
#[async_trait]
pub trait ConnectionVerifier: Send + Sync {
    async fn verify(&self, dial: &DialDescriptor) -> anyhow::Result<()>;
}

/// Dials the target and runs `{ping: 1}` against `admin`.
///
/// The client is shut down on every exit path; nothing outlives the call.
#[derive(Debug, Clone)]
pub struct MongoVerifier {
    timeout: Duration,
}

impl MongoVerifier {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl ConnectionVerifier for MongoVerifier {
    async fn verify(&self, dial: &DialDescriptor) -> anyhow::Result<()> {
        let options = dial
            .clone()
            .with_default_timeout(self.timeout)
            .into_client_options();
        let client = Client::with_options(options)?;

        tracing::debug!(
            hosts = ?dial.hosts,
            timeout = ?self.timeout,
            "Verifying MongoDB connection"
        );
        let outcome = tokio::time::timeout(self.timeout, ping(&client)).await;
        client.shutdown().await;

        match outcome {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "connection verification timed out after {:?}",
                self.timeout
            )),
        }
    }
}

async fn ping(client: &Client) -> anyhow::Result<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;
    Ok(())
}
