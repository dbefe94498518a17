//! Publishing of a materialized project to a newly created remote repository.
//!
//! The publisher runs a fixed sequence of stages:
//! token exchange, account lookup, collision check, repository creation,
//! confirmation poll, local init + commit and a single push. The first failing
//! stage aborts the run and is reported as `Error::Stage`.

use crate::error::{Error, Result, Stage};
use crate::git::GitTransport;
use crate::github::{RemoteRepository, RepositoryHost};
use crate::retry::{PollOutcome, RetryPolicy};
use log::{debug, info, warn};
use std::path::Path;

/// Runs one stage, wrapping its failure with the stage it happened in.
fn run_stage<T, F>(stage: Stage, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    debug!("Publish stage: {}", stage);
    f().map_err(|source| {
        warn!("Publish stage '{}' failed: {}", stage, source);
        Error::Stage { stage, source: Box::new(source) }
    })
}

/// Publishes project directories through a `RepositoryHost` and a `GitTransport`.
pub struct RemotePublisher<'a> {
    host: &'a dyn RepositoryHost,
    git: &'a dyn GitTransport,
    confirm: RetryPolicy,
}

impl<'a> RemotePublisher<'a> {
    pub fn new(host: &'a dyn RepositoryHost, git: &'a dyn GitTransport) -> Self {
        Self { host, git, confirm: RetryPolicy::default() }
    }

    /// Replaces the confirmation poll policy.
    pub fn with_confirm_policy(mut self, confirm: RetryPolicy) -> Self {
        self.confirm = confirm;
        self
    }

    /// Publishes the project at `project_root` as repository `name`.
    ///
    /// # Arguments
    /// * `name` - Repository name, the project's artifact id
    /// * `code` - OAuth authorization code
    /// * `state` - OAuth state nonce
    /// * `project_root` - Materialized project directory
    ///
    /// # Returns
    /// * `Result<RemoteRepository>` - The repository, once pushed
    ///
    /// # Errors
    /// * `Error::Configuration` if the host integration is disabled
    /// * `Error::Stage` wrapping the failure of any stage
    pub fn publish(
        &self,
        name: &str,
        code: &str,
        state: &str,
        project_root: &Path,
    ) -> Result<RemoteRepository> {
        if !self.host.is_enabled() {
            return Err(Error::Configuration("GitHub is not enabled".to_string()));
        }

        let token =
            run_stage(Stage::TokenExchange, || self.host.fetch_access_token(code, state))?;
        let owner = run_stage(Stage::AccountLookup, || self.host.login(&token))?;

        run_stage(Stage::CollisionCheck, || {
            if self.host.repository_exists(&owner, &token, name)? {
                return Err(Error::Conflict { owner: owner.clone(), name: name.to_string() });
            }
            Ok(())
        })?;

        let repository =
            run_stage(Stage::RepoCreate, || self.host.create_repository(&owner, &token, name))?;

        run_stage(Stage::RepoConfirm, || {
            let max = self.confirm.max_attempts();
            let outcome = self.confirm.poll(|attempt| {
                let exists = self.host.repository_exists(&repository.owner_name, &token, name)?;
                if !exists {
                    info!("Repository not yet created, retrying: {}/{}", attempt, max);
                }
                Ok(exists)
            })?;
            match outcome {
                PollOutcome::Confirmed { attempts } => {
                    debug!("Repository '{}' confirmed after {} attempt(s)", name, attempts);
                    Ok(())
                }
                PollOutcome::Exhausted { attempts } => Err(Error::RemoteService {
                    message: "repository not visible after creation".to_string(),
                    attempts,
                }),
            }
        })?;

        run_stage(Stage::GitInitCommit, || self.git.init_commit(project_root))?;
        run_stage(Stage::GitPush, || {
            self.git.push(project_root, &repository.url, &repository.owner_name, &token)
        })?;

        info!("Published '{}' to {}", name, repository.url);
        Ok(repository)
    }
}
