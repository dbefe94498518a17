//! codestart's command-line entry point.
//! Parses arguments, loads configuration and runs the download or publish path.

use codestart::{
    cli::{get_args, Args, Command},
    config::load_config,
    error::{default_error_handler, Error, Result},
    pipeline::Pipeline,
};
use log::info;

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Arguments
/// * `args` - Parsed command line arguments
///
/// # Returns
/// * `Result<()>` - Success or the first failure of the pipeline
fn run(args: Args) -> Result<()> {
    let config = load_config(&args.config)?;
    let pipeline = Pipeline::from_config(&config)?;

    match args.command {
        Command::Download { definition, output } => {
            let archive = pipeline.download_project(&definition.into_raw())?;
            std::fs::write(&output, archive)?;
            info!("Project archive written to '{}'", output.display());
        }
        Command::Publish { definition, code, state } => {
            let repository = pipeline.publish_project(&definition.into_raw(), &code, &state)?;
            let json = serde_json::to_string_pretty(&repository)
                .map_err(|e| Error::Publish(format!("cannot serialize result: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}
