use clap::Args;
use std::path::Path;
use std::sync::Arc;

use broker_core::http;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides the settings file)
    #[arg(long)]
    pub listen: Option<String>,
}

pub async fn execute(args: ServeArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let (settings, backend) = super::open_backend(config).await?;
    let listen = args.listen.unwrap_or(settings.listen);

    tracing::info!(
        verify_timeout = ?settings.verify_timeout,
        storage = ?settings.storage,
        "Broker starting"
    );
    http::serve(&listen, Arc::new(backend)).await
}
