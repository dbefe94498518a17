//! Pipeline orchestration for both delivery paths.
//! Download: validate, generate, archive. Publish: validate, generate,
//! materialize into a temporary workspace, publish. A `Pipeline` holds no
//! per-request state and may serve concurrent requests.

use crate::archive::ArchiveWriter;
use crate::assets::AssetBundle;
use crate::config::Config;
use crate::definition::{ProjectDefinition, RawDefinition};
use crate::error::{Error, Result};
use crate::generator::{ScaffoldGenerator, TemplateGenerator};
use crate::git::{Git2Transport, GitTransport};
use crate::github::{GitHubClient, RemoteRepository, RepositoryHost};
use crate::publisher::RemotePublisher;
use crate::retry::RetryPolicy;
use crate::workspace::Workspace;
use log::{debug, info};
use std::path::PathBuf;

pub struct Pipeline {
    generator: Box<dyn ScaffoldGenerator>,
    assets: AssetBundle,
    host: Box<dyn RepositoryHost>,
    git: Box<dyn GitTransport>,
    confirm: RetryPolicy,
    workspace_root: Option<PathBuf>,
}

impl Pipeline {
    /// Creates a pipeline with the embedded wrapper assets and the default
    /// confirmation policy.
    pub fn new(
        generator: Box<dyn ScaffoldGenerator>,
        host: Box<dyn RepositoryHost>,
        git: Box<dyn GitTransport>,
    ) -> Self {
        Self {
            generator,
            assets: AssetBundle::embedded().clone(),
            host,
            git,
            confirm: RetryPolicy::default(),
            workspace_root: None,
        }
    }

    pub fn with_assets(mut self, assets: AssetBundle) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_confirm_policy(mut self, confirm: RetryPolicy) -> Self {
        self.confirm = confirm;
        self
    }

    /// Creates publish workspaces below `root` instead of the system
    /// temporary directory.
    pub fn with_workspace_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Builds the production pipeline from configuration.
    ///
    /// # Errors
    /// * `Error::MissingResource` if `assets_dir` lacks a wrapper asset
    /// * `Error::Configuration` if the HTTP client cannot be built
    pub fn from_config(config: &Config) -> Result<Self> {
        config.github.log_status();
        let host = GitHubClient::new(config.github.clone())?;
        let mut pipeline = Self::new(
            Box::new(TemplateGenerator::default()),
            Box::new(host),
            Box::new(Git2Transport::new()),
        )
        .with_confirm_policy(config.publish.retry_policy());

        if let Some(dir) = &config.assets_dir {
            debug!("Using wrapper assets from {}", dir.display());
            pipeline = pipeline.with_assets(AssetBundle::from_dir(dir)?);
        }
        Ok(pipeline)
    }

    /// Generates a project and returns it as zip archive bytes.
    ///
    /// # Errors
    /// * `Error::Validation` for an invalid definition
    /// * `Error::Generation` if the scaffold cannot be generated
    /// * `Error::MissingResource` if a wrapper asset is absent
    pub fn download_project(&self, raw: &RawDefinition) -> Result<Vec<u8>> {
        let definition = ProjectDefinition::validate(raw)?;
        let tree = self.generator.generate(&definition)?;
        let archive = ArchiveWriter::new(&self.assets).write(&tree, definition.build_tool())?;
        info!("Created archive for '{}' ({} bytes)", definition.artifact_id(), archive.len());
        Ok(archive)
    }

    /// Generates a project and publishes it to a new remote repository named
    /// after the artifact id.
    ///
    /// # Arguments
    /// * `raw` - Unvalidated project definition
    /// * `code` - OAuth authorization code
    /// * `state` - OAuth state nonce
    ///
    /// # Errors
    /// * `Error::Validation` or `Error::Generation` before anything is written
    /// * `Error::Configuration` if the host integration is disabled, before
    ///   any generation or disk work
    /// * `Error::Stage` for publisher failures; the workspace is removed either way
    pub fn publish_project(
        &self,
        raw: &RawDefinition,
        code: &str,
        state: &str,
    ) -> Result<RemoteRepository> {
        let definition = ProjectDefinition::validate(raw)?;
        if !self.host.is_enabled() {
            return Err(Error::Configuration("GitHub is not enabled".to_string()));
        }
        let tree = self.generator.generate(&definition)?;

        let workspace = match &self.workspace_root {
            Some(root) => Workspace::create_in(root)?,
            None => Workspace::create()?,
        };
        let project_root = workspace.materialize(&tree)?;

        RemotePublisher::new(self.host.as_ref(), self.git.as_ref())
            .with_confirm_policy(self.confirm)
            .publish(definition.artifact_id(), code, state, &project_root)
    }
}
