//! Local git operations for publishing.
//! Initializes a repository in the materialized project, commits every file
//! and pushes the single branch to the newly created remote.

use crate::constants::{COMMIT_AUTHOR_EMAIL, COMMIT_AUTHOR_NAME, COMMIT_MESSAGE, DEFAULT_BRANCH};
use crate::error::{Error, Result};
use crate::github::AccessToken;
use git2::{
    Cred, IndexAddOption, PushOptions, RemoteCallbacks, Repository, RepositoryInitOptions,
    Signature,
};
use log::debug;
use std::cell::{Cell, RefCell};
use std::path::Path;

/// Git operations the publisher needs.
pub trait GitTransport: Send + Sync {
    /// Initializes a repository at `root` and commits all files on the
    /// default branch.
    fn init_commit(&self, root: &Path) -> Result<()>;

    /// Pushes the default branch of the repository at `root` to `url`,
    /// authenticating as `owner` with `token`.
    fn push(&self, root: &Path, url: &str, owner: &str, token: &AccessToken) -> Result<()>;
}

fn git_error(e: git2::Error) -> Error {
    Error::Publish(e.message().to_string())
}

/// `GitTransport` backed by libgit2.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Transport;

impl Git2Transport {
    pub fn new() -> Self {
        Self
    }
}

impl GitTransport for Git2Transport {
    fn init_commit(&self, root: &Path) -> Result<()> {
        debug!("Initializing git repository in '{}'", root.display());
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head(DEFAULT_BRANCH);
        let repo = Repository::init_opts(root, &opts).map_err(git_error)?;

        let mut index = repo.index().map_err(git_error)?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None).map_err(git_error)?;
        index.write().map_err(git_error)?;
        let tree_id = index.write_tree().map_err(git_error)?;
        let tree = repo.find_tree(tree_id).map_err(git_error)?;

        let signature = Signature::now(COMMIT_AUTHOR_NAME, COMMIT_AUTHOR_EMAIL).map_err(git_error)?;
        let commit = repo
            .commit(Some("HEAD"), &signature, &signature, COMMIT_MESSAGE, &tree, &[])
            .map_err(git_error)?;
        debug!("Committed {} entries as {}", index.len(), commit);
        Ok(())
    }

    /// Pushes once. Credentials are offered a single time so a rejected
    /// token fails fast instead of looping inside libgit2.
    ///
    /// # Errors
    /// * `Error::Publish` if the push fails or the remote rejects the ref
    fn push(&self, root: &Path, url: &str, owner: &str, token: &AccessToken) -> Result<()> {
        let repo = Repository::open(root).map_err(git_error)?;
        let mut remote = repo.remote_anonymous(url).map_err(git_error)?;
        let refspec = format!("refs/heads/{0}:refs/heads/{0}", DEFAULT_BRANCH);

        let offered = Cell::new(false);
        let rejection = RefCell::new(None);
        {
            let mut callbacks = RemoteCallbacks::new();
            callbacks.credentials(|_url, _username, _allowed| {
                if offered.replace(true) {
                    return Err(git2::Error::from_str("credentials rejected"));
                }
                Cred::userpass_plaintext(owner, token.secret())
            });
            callbacks.push_update_reference(|refname, status| {
                if let Some(message) = status {
                    *rejection.borrow_mut() = Some(format!("{refname} rejected: {message}"));
                }
                Ok(())
            });

            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);
            debug!("Pushing {} to {}", refspec, url);
            remote.push(&[refspec.as_str()], Some(&mut options)).map_err(git_error)?;
        }

        match rejection.into_inner() {
            Some(message) => Err(Error::Publish(message)),
            None => Ok(()),
        }
    }
}
