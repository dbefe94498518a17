//! Command-line interface implementation for codestart.
//! Provides argument parsing and help text formatting using clap.

use crate::definition::RawDefinition;
use clap::{error::ErrorKind, Args as ClapArgs, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments structure for codestart.
#[derive(Parser, Debug)]
#[command(author, version, about = "codestart: generate and publish application skeletons", long_about = None)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Directory containing codestart.json, codestart.yml or codestart.yaml
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a project and write it as a zip archive
    Download {
        #[command(flatten)]
        definition: DefinitionArgs,

        /// Archive file to write
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Generate a project and push it to a new GitHub repository
    Publish {
        #[command(flatten)]
        definition: DefinitionArgs,

        /// OAuth authorization code
        #[arg(long)]
        code: String,

        /// OAuth state nonce
        #[arg(long)]
        state: String,
    },
}

/// Project definition flags shared by both commands.
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct DefinitionArgs {
    #[arg(short, long)]
    pub group_id: Option<String>,

    #[arg(short, long)]
    pub artifact_id: Option<String>,

    /// Project version
    #[arg(short = 'v', long = "version")]
    pub project_version: Option<String>,

    /// Fully qualified name of the example resource class
    #[arg(short, long)]
    pub class_name: Option<String>,

    /// Path of the example resource
    #[arg(short, long)]
    pub path: Option<String>,

    /// MAVEN, GRADLE or GRADLE_KOTLIN_DSL
    #[arg(short, long)]
    pub build_tool: Option<String>,

    #[arg(short = 'j', long)]
    pub java_version: Option<String>,

    /// Generate the build files only
    #[arg(long)]
    pub no_code: bool,

    /// Extension id, `artifactId` or `groupId:artifactId` (repeatable)
    #[arg(short = 'e', long = "extension", value_name = "ID")]
    pub extensions: Vec<String>,

    /// Platform stream, `platformKey:streamId` or `streamId`
    #[arg(short = 'S', long = "stream")]
    pub stream_key: Option<String>,
}

impl DefinitionArgs {
    pub fn into_raw(self) -> RawDefinition {
        RawDefinition {
            stream_key: self.stream_key,
            group_id: self.group_id,
            artifact_id: self.artifact_id,
            version: self.project_version,
            class_name: self.class_name,
            path: self.path,
            build_tool: self.build_tool,
            language_version: self.java_version,
            no_code: self.no_code,
            no_examples: false,
            extensions: self.extensions,
        }
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument
                || e.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
