#![allow(dead_code)]

use codestart::error::{Error, Result};
use codestart::git::GitTransport;
use codestart::github::{AccessToken, RemoteRepository, RepositoryHost};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

pub const OWNER: &str = "octocat";
pub const TOKEN: &str = "gho_test_token";

/// Calls seen by the fakes, shared with the test body.
#[derive(Debug, Default)]
pub struct Calls {
    pub log: Mutex<Vec<String>>,
    pub exists_checks: AtomicU32,
    pub pushed_roots: Mutex<Vec<PathBuf>>,
}

impl Calls {
    pub fn record(&self, call: impl Into<String>) {
        self.log.lock().unwrap().push(call.into());
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.log().iter().filter(|call| call.starts_with(prefix)).count()
    }
}

/// Scripted repository host.
pub struct FakeHost {
    pub calls: Arc<Calls>,
    pub enabled: bool,
    pub reject_code: bool,
    /// Answer of the collision check
    pub already_exists: bool,
    /// Number of confirmation checks answering "not yet" before "exists";
    /// `None` never confirms
    pub visible_after: Option<u32>,
}

impl FakeHost {
    pub fn new(calls: Arc<Calls>) -> Self {
        Self {
            calls,
            enabled: true,
            reject_code: false,
            already_exists: false,
            visible_after: Some(0),
        }
    }
}

impl RepositoryHost for FakeHost {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn fetch_access_token(&self, code: &str, state: &str) -> Result<AccessToken> {
        self.calls.record(format!("token {code} {state}"));
        if self.reject_code {
            return Err(Error::Auth("bad_verification_code".to_string()));
        }
        Ok(AccessToken::new(TOKEN))
    }

    fn login(&self, token: &AccessToken) -> Result<String> {
        assert_eq!(token.secret(), TOKEN);
        self.calls.record("login");
        Ok(OWNER.to_string())
    }

    fn repository_exists(&self, owner: &str, _token: &AccessToken, name: &str) -> Result<bool> {
        self.calls.record(format!("exists {owner}/{name}"));
        if self.calls.count("create") == 0 {
            return Ok(self.already_exists);
        }
        let confirm = self.calls.exists_checks.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(self.visible_after.is_some_and(|after| confirm > after))
    }

    fn create_repository(
        &self,
        owner: &str,
        _token: &AccessToken,
        name: &str,
    ) -> Result<RemoteRepository> {
        self.calls.record(format!("create {owner}/{name}"));
        Ok(RemoteRepository {
            owner_name: owner.to_string(),
            url: format!("https://github.com/{owner}/{name}.git"),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
        })
    }
}

/// Git transport that records calls and inspects the project root.
pub struct FakeGit {
    pub calls: Arc<Calls>,
    pub fail_push: bool,
}

impl FakeGit {
    pub fn new(calls: Arc<Calls>) -> Self {
        Self { calls, fail_push: false }
    }
}

impl GitTransport for FakeGit {
    fn init_commit(&self, root: &Path) -> Result<()> {
        assert!(root.is_dir(), "{} is not materialized", root.display());
        self.calls.record("init_commit");
        Ok(())
    }

    fn push(&self, root: &Path, url: &str, owner: &str, token: &AccessToken) -> Result<()> {
        assert_eq!(token.secret(), TOKEN);
        self.calls.record(format!("push {url} as {owner}"));
        self.calls.pushed_roots.lock().unwrap().push(root.to_path_buf());
        if self.fail_push {
            return Err(Error::Publish("remote rejected refs/heads/main".to_string()));
        }
        Ok(())
    }
}
