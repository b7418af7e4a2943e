use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "mongo-broker",
    about = "Mongo Broker - manage the MongoDB connection a secrets backend brokers access to",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Settings file (YAML). Defaults apply when omitted.
    #[arg(short, long, global = true, env = "MONGO_BROKER_CONFIG")]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        commands::Commands::Read(args) => commands::read::execute(args, config).await,
        commands::Commands::Write(args) => commands::write::execute(args, config).await,
        commands::Commands::Describe(args) => commands::describe::execute(args, config).await,
        commands::Commands::Serve(args) => commands::serve::execute(args, config).await,
        commands::Commands::Validate(args) => commands::validate::execute(args).await,
    }
}
