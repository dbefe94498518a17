//! Maven wrapper assets injected into Maven archives.
//! Assets are looked up by their logical path inside the generated project
//! (e.g. `.mvn/wrapper/maven-wrapper.jar`). The embedded bundle is compiled
//! into the binary; an on-disk bundle is checked for completeness when loaded.

use crate::constants::{
    MAVEN_WRAPPER_DOWNLOADER, MAVEN_WRAPPER_JAR, MAVEN_WRAPPER_PROPS, MVNW, MVNW_CMD,
};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// Logical paths every bundle must provide.
pub const REQUIRED_ASSETS: [&str; 5] =
    [MAVEN_WRAPPER_JAR, MAVEN_WRAPPER_PROPS, MAVEN_WRAPPER_DOWNLOADER, MVNW_CMD, MVNW];

static EMBEDDED: Lazy<AssetBundle> = Lazy::new(|| {
    let embedded: [(&str, &'static [u8]); 5] = [
        (MAVEN_WRAPPER_JAR, include_bytes!("../resources/mvnw/.mvn/wrapper/maven-wrapper.jar")),
        (
            MAVEN_WRAPPER_PROPS,
            include_bytes!("../resources/mvnw/.mvn/wrapper/maven-wrapper.properties"),
        ),
        (
            MAVEN_WRAPPER_DOWNLOADER,
            include_bytes!("../resources/mvnw/.mvn/wrapper/MavenWrapperDownloader.java"),
        ),
        (MVNW_CMD, include_bytes!("../resources/mvnw/mvnw.cmd")),
        (MVNW, include_bytes!("../resources/mvnw/mvnw")),
    ];
    let assets = embedded
        .into_iter()
        .map(|(logical, bytes)| (logical.to_string(), Cow::Borrowed(bytes)))
        .collect();
    AssetBundle { assets }
});

/// Read-only table of wrapper resources keyed by logical path.
#[derive(Debug, Clone)]
pub struct AssetBundle {
    assets: IndexMap<String, Cow<'static, [u8]>>,
}

impl AssetBundle {
    /// The bundle compiled into the binary.
    pub fn embedded() -> &'static AssetBundle {
        &EMBEDDED
    }

    /// Loads a bundle from a directory laid out like a project root
    /// (`mvnw`, `mvnw.cmd`, `.mvn/wrapper/...`).
    ///
    /// # Errors
    /// * `Error::MissingResource` for the first required asset that is absent
    /// * `Error::Io` if an asset exists but cannot be read
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut assets = IndexMap::new();
        for logical in REQUIRED_ASSETS {
            let path = dir.join(logical);
            if !path.is_file() {
                return Err(Error::MissingResource { path: path.display().to_string() });
            }
            debug!("Loading wrapper asset {}", path.display());
            assets.insert(logical.to_string(), Cow::Owned(fs::read(&path)?));
        }
        Ok(Self { assets })
    }

    /// Builds a bundle from explicit entries. Completeness is not checked, so
    /// lookups of absent entries fail at write time.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<u8>)>,
        K: Into<String>,
    {
        let assets = entries.into_iter().map(|(k, v)| (k.into(), Cow::Owned(v))).collect();
        Self { assets }
    }

    /// Returns the bytes of an asset.
    ///
    /// # Errors
    /// * `Error::MissingResource` if the bundle has no such entry
    pub fn get(&self, logical_path: &str) -> Result<&[u8]> {
        self.assets
            .get(logical_path)
            .map(|bytes| bytes.as_ref())
            .ok_or_else(|| Error::MissingResource { path: logical_path.to_string() })
    }

    pub fn contains(&self, logical_path: &str) -> bool {
        self.assets.contains_key(logical_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_bundle_is_complete() {
        let bundle = AssetBundle::embedded();
        for logical in REQUIRED_ASSETS {
            assert!(!bundle.get(logical).unwrap().is_empty(), "{logical} is empty");
        }
        assert!(bundle.get(MVNW).unwrap().starts_with(b"#!/bin/sh"));
    }

    #[test]
    fn test_wrapper_jar_has_launcher() {
        use std::io::{Cursor, Read};

        let jar = AssetBundle::embedded().get(MAVEN_WRAPPER_JAR).unwrap();
        let mut jar = zip::ZipArchive::new(Cursor::new(jar)).unwrap();
        assert!(jar.by_name("org/apache/maven/wrapper/MavenWrapperMain.class").is_ok());

        let mut manifest = String::new();
        jar.by_name("META-INF/MANIFEST.MF").unwrap().read_to_string(&mut manifest).unwrap();
        assert!(manifest.contains("Main-Class: org.apache.maven.wrapper.MavenWrapperMain"));
    }

    #[test]
    fn test_missing_entry_is_missing_resource() {
        let bundle = AssetBundle::from_entries([(MVNW, b"#!/bin/sh\n".to_vec())]);
        assert!(matches!(bundle.get(MVNW_CMD), Err(Error::MissingResource { .. })));
    }
}
