use clap::Args;
use std::path::Path;

use broker_core::backend::LogicalBackend;
use broker_core::request::Request;
use broker_mongo::connection_config::CONNECTION_CONFIG_KEY;

#[derive(Args)]
pub struct ReadArgs {}

pub async fn execute(_args: ReadArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let (_, backend) = super::open_backend(config).await?;

    match backend
        .handle_request(&Request::read(CONNECTION_CONFIG_KEY))
        .await?
    {
        Some(resp) => {
            let data = resp.data.unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        None => println!("No connection configured"),
    }
    Ok(())
}
