//! Error handling for the codestart pipeline.
//! Defines the error taxonomy shared by validation, generation, archiving
//! and publishing, together with the category each error belongs to.

use std::fmt;
use std::io;
use thiserror::Error;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the offending field, e.g. `artifactId`
    pub field: &'static str,
    /// Human-readable reason
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Stages of the publish state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    TokenExchange,
    AccountLookup,
    CollisionCheck,
    RepoCreate,
    RepoConfirm,
    GitInitCommit,
    GitPush,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::TokenExchange => "token exchange",
            Stage::AccountLookup => "account lookup",
            Stage::CollisionCheck => "collision check",
            Stage::RepoCreate => "repository creation",
            Stage::RepoConfirm => "repository confirmation",
            Stage::GitInitCommit => "git init/commit",
            Stage::GitPush => "git push",
        };
        f.write_str(name)
    }
}

/// Custom error types for codestart operations.
#[derive(Error, Debug)]
pub enum Error {
    /// One or more fields of the project definition are invalid.
    /// All violations are reported at once.
    #[error("Validation error: {}.", join_violations(.violations))]
    Validation { violations: Vec<Violation> },

    /// The scaffold could not be generated (unresolvable extension, template failure).
    #[error("Generation error: {0}.")]
    Generation(String),

    /// An embedded wrapper asset is absent. This is a packaging defect.
    #[error("Missing resource: {path}.")]
    MissingResource { path: String },

    /// The identity provider rejected the code, state or token.
    #[error("Authentication error: {0}.")]
    Auth(String),

    /// A repository with the requested name already exists.
    #[error("Repository '{name}' already exists for '{owner}'.")]
    Conflict { owner: String, name: String },

    /// The repository-hosting API failed or never confirmed the repository.
    #[error("Remote service error: {message} (attempts: {attempts}).")]
    RemoteService { message: String, attempts: u32 },

    /// Local git operation or push failed.
    #[error("Publish error: {0}.")]
    Publish(String),

    /// The pipeline is not configured for the requested operation.
    #[error("Configuration error: {0}.")]
    Configuration(String),

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    Io(#[from] io::Error),

    /// A publish stage failed; wraps the cause.
    #[error("Publishing failed at {stage}: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },
}

fn join_violations(violations: &[Violation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Error categories exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Generation,
    MissingResource,
    Auth,
    Conflict,
    RemoteService,
    Publish,
    Configuration,
    Internal,
}

impl Error {
    /// Builds a remote service error for a single attempt.
    pub fn remote<S: Into<String>>(message: S) -> Self {
        Error::RemoteService { message: message.into(), attempts: 1 }
    }

    /// Returns the category of this error, looking through stage wrappers.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Validation { .. } => ErrorCategory::Validation,
            Error::Generation(_) => ErrorCategory::Generation,
            Error::MissingResource { .. } => ErrorCategory::MissingResource,
            Error::Auth(_) => ErrorCategory::Auth,
            Error::Conflict { .. } => ErrorCategory::Conflict,
            Error::RemoteService { .. } => ErrorCategory::RemoteService,
            Error::Publish(_) => ErrorCategory::Publish,
            Error::Configuration(_) => ErrorCategory::Configuration,
            Error::Io(_) => ErrorCategory::Internal,
            Error::Stage { source, .. } => source.category(),
        }
    }

    /// The stage a publish failure happened in, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Whether the caller may reasonably retry the same request later.
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::RemoteService
    }

    /// Violations carried by a validation error.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Error::Validation { violations } => violations,
            Error::Stage { source, .. } => source.violations(),
            _ => &[],
        }
    }
}

/// Convenience type alias for Results with codestart's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
