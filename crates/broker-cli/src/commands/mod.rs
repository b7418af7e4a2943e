use clap::Subcommand;
use std::path::Path;

use broker_core::config::BrokerSettings;
use broker_mongo::MongoBackend;

pub mod describe;
pub mod read;
pub mod serve;
pub mod validate;
pub mod write;

#[derive(Subcommand)]
pub enum Commands {
    /// Show the stored MongoDB connection configuration
    Read(read::ReadArgs),
    /// Store a new MongoDB connection URI
    Write(write::WriteArgs),
    /// Print the help text of a backend path
    Describe(describe::DescribeArgs),
    /// Serve the backend over HTTP
    Serve(serve::ServeArgs),
    /// Validate a settings file without starting anything
    Validate(validate::ValidateArgs),
}

pub async fn open_backend(config: Option<&Path>) -> anyhow::Result<(BrokerSettings, MongoBackend)> {
    let settings = BrokerSettings::load(config)?;
    let storage = settings.open_storage().await?;
    let backend = MongoBackend::new(storage, &settings);
    Ok((settings, backend))
}
