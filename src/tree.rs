//! In-memory source tree produced by the scaffold generator.
//! Entries keep the order in which they were added, with every directory
//! marker placed immediately before its first child.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// One entry of a source tree. Paths are relative to the tree root and use `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    Directory { path: String },
    File { path: String, content: Vec<u8>, executable: bool },
}

impl TreeEntry {
    pub fn path(&self) -> &str {
        match self {
            TreeEntry::Directory { path } | TreeEntry::File { path, .. } => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeEntry::Directory { .. })
    }
}

/// Ordered file and directory entries rooted at a single top-level folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    root: String,
    entries: IndexMap<String, TreeEntry>,
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

impl SourceTree {
    /// Creates an empty tree whose top-level folder is `root`.
    pub fn new<S: Into<String>>(root: S) -> Self {
        Self { root: root.into(), entries: IndexMap::new() }
    }

    /// Name of the top-level folder.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Adds a directory marker (and any missing parents).
    pub fn add_dir(&mut self, path: &str) -> Result<()> {
        let path = normalize(path);
        if path.is_empty() {
            return Ok(());
        }
        if let Some(TreeEntry::File { .. }) = self.entries.get(&path) {
            return Err(Error::Generation(format!("'{path}' is already a file")));
        }
        if let Some((parent, _)) = path.rsplit_once('/') {
            self.add_dir(parent)?;
        }
        if !self.entries.contains_key(&path) {
            self.entries.insert(path.clone(), TreeEntry::Directory { path });
        }
        Ok(())
    }

    /// Adds a file. Missing parent directory markers are inserted first.
    ///
    /// # Errors
    /// * `Error::Generation` if the path is empty or already present
    pub fn add_file<C: Into<Vec<u8>>>(
        &mut self,
        path: &str,
        content: C,
        executable: bool,
    ) -> Result<()> {
        let path = normalize(path);
        if path.is_empty() {
            return Err(Error::Generation("file path must not be empty".to_string()));
        }
        if self.entries.contains_key(&path) {
            return Err(Error::Generation(format!("duplicate entry '{path}'")));
        }
        if let Some((parent, _)) = path.rsplit_once('/') {
            self.add_dir(parent)?;
        }
        debug!("Adding file: {}/{}", self.root, path);
        self.entries.insert(
            path.clone(),
            TreeEntry::File { path, content: content.into(), executable },
        );
        Ok(())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(&normalize(path))
    }

    /// Content of a file entry.
    pub fn file(&self, path: &str) -> Option<&[u8]> {
        match self.entries.get(&normalize(path)) {
            Some(TreeEntry::File { content, .. }) => Some(content),
            _ => None,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the tree below `dest`, creating `dest/<root>`.
    ///
    /// # Arguments
    /// * `dest` - Existing directory that receives the top-level folder
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Path of the materialized top-level folder
    pub fn materialize<P: AsRef<Path>>(&self, dest: P) -> Result<PathBuf> {
        let project_root = dest.as_ref().join(&self.root);
        fs::create_dir_all(&project_root)?;
        for entry in self.entries() {
            let target = project_root.join(entry.path());
            match entry {
                TreeEntry::Directory { .. } => fs::create_dir_all(&target)?,
                TreeEntry::File { content, executable, .. } => {
                    fs::write(&target, content)?;
                    if *executable {
                        set_executable(&target)?;
                    }
                }
            }
        }
        debug!("Materialized {} entries in {}", self.len(), project_root.display());
        Ok(project_root)
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(crate::constants::EXECUTABLE_MODE))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parents_precede_first_child() {
        let mut tree = SourceTree::new("app");
        tree.add_file("pom.xml", "<project/>", false).unwrap();
        tree.add_file("src/main/java/App.java", "class App {}", false).unwrap();
        tree.add_file("src/main/resources/application.properties", "", false).unwrap();

        let paths: Vec<&str> = tree.entries().map(TreeEntry::path).collect();
        assert_eq!(
            paths,
            vec![
                "pom.xml",
                "src",
                "src/main",
                "src/main/java",
                "src/main/java/App.java",
                "src/main/resources",
                "src/main/resources/application.properties",
            ]
        );
    }

    #[test]
    fn test_duplicate_file_is_rejected() {
        let mut tree = SourceTree::new("app");
        tree.add_file("README.md", "a", false).unwrap();
        assert!(tree.add_file("README.md", "b", false).is_err());
        assert_eq!(tree.file("README.md"), Some(&b"a"[..]));
    }

    #[test]
    fn test_file_cannot_become_directory() {
        let mut tree = SourceTree::new("app");
        tree.add_file("src", "", false).unwrap();
        assert!(tree.add_file("src/Main.java", "", false).is_err());
    }
}
