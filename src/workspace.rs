//! Per-request temporary workspace for the publish path.
//! The directory and everything below it is removed when the workspace is
//! dropped, whether publishing succeeded or not.

use crate::constants::WORKSPACE_PREFIX;
use crate::error::Result;
use crate::tree::SourceTree;
use log::debug;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Uniquely named temporary directory owned by one publish request.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates a workspace in the system temporary directory.
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix(WORKSPACE_PREFIX).tempdir()?;
        debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Creates a workspace below `parent`.
    pub fn create_in<P: AsRef<Path>>(parent: P) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix(WORKSPACE_PREFIX).tempdir_in(parent)?;
        debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `tree` into the workspace and returns the project root.
    pub fn materialize(&self, tree: &SourceTree) -> Result<PathBuf> {
        tree.materialize(self.dir.path())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        debug!("Removing workspace {}", self.dir.path().display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_is_removed_on_drop() {
        let parent = tempfile::tempdir().unwrap();
        let workspace = Workspace::create_in(parent.path()).unwrap();
        let mut tree = SourceTree::new("demo");
        tree.add_file("mvnw", "#!/bin/sh\n", true).unwrap();
        let root = workspace.materialize(&tree).unwrap();
        assert!(root.join("mvnw").is_file());

        let path = workspace.path().to_path_buf();
        drop(workspace);
        assert!(!path.exists());
    }
}
