//! Zip archive construction for the download path.
//! Streams a `SourceTree` into a fresh in-memory zip under `<artifactId>/` and,
//! for Maven projects, adds the wrapper resources that the tree does not
//! already contain.

use crate::assets::AssetBundle;
use crate::constants::{
    DIRECTORY_MODE, EXECUTABLE_MODE, FILE_MODE, MAVEN_WRAPPER_DIR, MAVEN_WRAPPER_DOWNLOADER,
    MAVEN_WRAPPER_JAR, MAVEN_WRAPPER_PARENT_DIR, MAVEN_WRAPPER_PROPS, MVNW, MVNW_CMD,
};
use crate::definition::BuildTool;
use crate::error::{Error, Result};
use crate::tree::{SourceTree, TreeEntry};
use log::debug;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Wrapper files in the order they are appended, with their executable flag.
const MAVEN_WRAPPER_FILES: [(&str, bool); 5] = [
    (MAVEN_WRAPPER_JAR, false),
    (MAVEN_WRAPPER_PROPS, false),
    (MAVEN_WRAPPER_DOWNLOADER, false),
    (MVNW_CMD, true),
    (MVNW, true),
];

fn zip_error(e: zip::result::ZipError) -> Error {
    Error::Io(std::io::Error::other(e))
}

/// Sink for a single archive. Never shared between requests.
struct ArchiveSink<'t> {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    prefix: String,
    tree: &'t SourceTree,
}

impl<'t> ArchiveSink<'t> {
    fn new(tree: &'t SourceTree) -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            prefix: format!("{}/", tree.root()),
            tree,
        }
    }

    fn options(mode: u32) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(mode)
    }

    fn mkdir(&mut self, path: &str) -> Result<()> {
        let name = if path.is_empty() {
            self.prefix.clone()
        } else {
            format!("{}{}/", self.prefix, path)
        };
        debug!("Archiving directory: {}", name);
        self.zip.add_directory(name, Self::options(DIRECTORY_MODE)).map_err(zip_error)
    }

    fn write(&mut self, path: &str, content: &[u8], executable: bool) -> Result<()> {
        let name = format!("{}{}", self.prefix, path);
        let mode = if executable { EXECUTABLE_MODE } else { FILE_MODE };
        debug!("Archiving file: {} ({:o})", name, mode);
        self.zip.start_file(name, Self::options(mode)).map_err(zip_error)?;
        self.zip.write_all(content)?;
        Ok(())
    }

    /// Adds a directory unless the tree already has it.
    fn mkdir_absent(&mut self, path: &str) -> Result<()> {
        if self.tree.contains(path) {
            return Ok(());
        }
        self.mkdir(path)
    }

    fn finish(self) -> Result<Vec<u8>> {
        Ok(self.zip.finish().map_err(zip_error)?.into_inner())
    }
}

/// Writes source trees into zip archives.
pub struct ArchiveWriter<'a> {
    assets: &'a AssetBundle,
}

impl<'a> ArchiveWriter<'a> {
    pub fn new(assets: &'a AssetBundle) -> Self {
        Self { assets }
    }

    /// Writes `tree` into a new archive.
    ///
    /// # Arguments
    /// * `tree` - Generated source tree
    /// * `build_tool` - Decides whether Maven wrapper files are added
    ///
    /// # Returns
    /// * `Result<Vec<u8>>` - The archive bytes
    ///
    /// # Errors
    /// * `Error::MissingResource` if a wrapper asset is absent from the bundle
    /// * `Error::Io` if the archive cannot be written
    pub fn write(&self, tree: &SourceTree, build_tool: BuildTool) -> Result<Vec<u8>> {
        let mut sink = ArchiveSink::new(tree);
        sink.mkdir("")?;

        for entry in tree.entries() {
            match entry {
                TreeEntry::Directory { path } => sink.mkdir(path)?,
                TreeEntry::File { path, content, executable } => {
                    sink.write(path, content, *executable)?
                }
            }
        }

        match build_tool {
            BuildTool::Maven => self.add_maven_wrapper(&mut sink)?,
            // TODO: add the Gradle wrapper once a gradlew bundle is shipped
            BuildTool::Gradle | BuildTool::GradleKotlinDsl => {}
        }

        sink.finish()
    }

    fn add_maven_wrapper(&self, sink: &mut ArchiveSink<'_>) -> Result<()> {
        sink.mkdir_absent(MAVEN_WRAPPER_PARENT_DIR)?;
        sink.mkdir_absent(MAVEN_WRAPPER_DIR)?;
        for (path, executable) in MAVEN_WRAPPER_FILES {
            if sink.tree.contains(path) {
                debug!("Keeping existing {}", path);
                continue;
            }
            let content = self.assets.get(path)?;
            sink.write(path, content, executable)?;
        }
        Ok(())
    }
}
