use clap::Args;
use std::path::Path;

use broker_core::backend::LogicalBackend;
use broker_core::request::Request;
use broker_mongo::connection_config::CONNECTION_CONFIG_KEY;

#[derive(Args)]
pub struct DescribeArgs {
    /// Backend path to describe
    #[arg(default_value = CONNECTION_CONFIG_KEY)]
    pub path: String,
}

pub async fn execute(args: DescribeArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let (_, backend) = super::open_backend(config).await?;

    let resp = backend
        .handle_request(&Request::help(args.path))
        .await?
        .unwrap_or_default();
    let help = resp
        .data
        .as_ref()
        .and_then(|d| d.get("help"))
        .and_then(|h| h.as_str())
        .unwrap_or_default();
    println!("{help}");
    Ok(())
}
