//! codestart generates application skeletons from a project definition and
//! delivers them either as a zip archive or as a freshly created, populated
//! GitHub repository.

/// Zip archive construction, including Maven wrapper injection
pub mod archive;

/// Maven wrapper resources keyed by logical path
pub mod assets;

/// Command-line interface module for the codestart binary
pub mod cli;

/// Pipeline configuration
/// Supports JSON and YAML formats (codestart.json, codestart.yml, codestart.yaml)
pub mod config;

/// Defaults, grammars and fixed names
pub mod constants;

/// Validated project definitions
pub mod definition;

/// Error types and handling for codestart
pub mod error;

/// Scaffold generation from embedded templates
pub mod generator;

/// Local repository init, commit and push
pub mod git;

/// GitHub OAuth and REST API client
pub mod github;

/// Download and publish orchestration
pub mod pipeline;

/// Staged publishing to a new remote repository
pub mod publisher;

/// Template rendering
pub mod renderer;

/// Bounded polling
pub mod retry;

/// In-memory source tree
pub mod tree;

/// Temporary publish workspaces
pub mod workspace;
