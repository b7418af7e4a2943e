use clap::Args;
use std::path::PathBuf;

use broker_core::config::{BrokerSettings, StorageSettings};

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the settings file to validate
    pub file: PathBuf,
}

pub async fn execute(args: ValidateArgs) -> anyhow::Result<()> {
    println!("Validating {}...", args.file.display());

    match BrokerSettings::from_file(&args.file) {
        Ok(settings) => {
            println!("  YAML parsing: OK");
            match &settings.storage {
                StorageSettings::File { path } => println!("  Storage: file ({})", path.display()),
                StorageSettings::Memory => println!("  Storage: memory"),
            }
            println!("  Verify timeout: {:?}", settings.verify_timeout);
            println!("  Listen: {}", settings.listen);
            println!();
            println!("Validation PASSED");
        }
        Err(e) => {
            println!();
            println!("Validation FAILED");
            eprintln!("  - {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
