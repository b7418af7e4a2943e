use clap::Args;
use std::path::Path;

use broker_core::backend::LogicalBackend;
use broker_core::request::{Operation, Request};
use broker_mongo::connection_config::CONNECTION_CONFIG_KEY;

#[derive(Args)]
pub struct WriteArgs {
    /// MongoDB standard connection string (URI)
    #[arg(long)]
    pub uri: String,
    /// Verify the URI by connecting to the database before storing it
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verify_connection: bool,
}

pub async fn execute(args: WriteArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let (_, backend) = super::open_backend(config).await?;

    let req = Request::new(Operation::Write, CONNECTION_CONFIG_KEY)
        .with_field("uri", args.uri)
        .with_field("verify_connection", args.verify_connection);

    let resp = backend.handle_request(&req).await?.unwrap_or_default();
    if let Some(error) = resp.error {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }

    for warning in &resp.warnings {
        eprintln!("WARNING: {warning}");
    }
    println!("Success! Data written to: {CONNECTION_CONFIG_KEY}");
    Ok(())
}
