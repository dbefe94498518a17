use codestart::archive::ArchiveWriter;
use codestart::assets::AssetBundle;
use codestart::definition::BuildTool;
use codestart::error::Error;
use codestart::tree::SourceTree;
use std::io::{Cursor, Read};
use zip::ZipArchive;

fn sample_tree() -> SourceTree {
    let mut tree = SourceTree::new("demo");
    tree.add_file("pom.xml", "<project/>", false).unwrap();
    tree.add_file("src/main/java/org/acme/App.java", "class App {}", false).unwrap();
    tree.add_file("README.md", "# demo", false).unwrap();
    tree
}

fn open(bytes: Vec<u8>) -> ZipArchive<Cursor<Vec<u8>>> {
    ZipArchive::new(Cursor::new(bytes)).unwrap()
}

fn listing(bytes: &[u8]) -> Vec<String> {
    open(bytes.to_vec()).file_names().map(str::to_string).collect()
}

fn ordered_listing(bytes: &[u8]) -> Vec<String> {
    let mut archive = open(bytes.to_vec());
    (0..archive.len()).map(|i| archive.by_index(i).unwrap().name().to_string()).collect()
}

#[test]
fn test_maven_archive_listing() {
    let bytes = ArchiveWriter::new(AssetBundle::embedded())
        .write(&sample_tree(), BuildTool::Maven)
        .unwrap();
    assert_eq!(
        ordered_listing(&bytes),
        vec![
            "demo/",
            "demo/pom.xml",
            "demo/src/",
            "demo/src/main/",
            "demo/src/main/java/",
            "demo/src/main/java/org/",
            "demo/src/main/java/org/acme/",
            "demo/src/main/java/org/acme/App.java",
            "demo/README.md",
            "demo/.mvn/",
            "demo/.mvn/wrapper/",
            "demo/.mvn/wrapper/maven-wrapper.jar",
            "demo/.mvn/wrapper/maven-wrapper.properties",
            "demo/.mvn/wrapper/MavenWrapperDownloader.java",
            "demo/mvnw.cmd",
            "demo/mvnw",
        ]
    );
}

#[test]
fn test_wrapper_launchers_are_executable() {
    let bytes = ArchiveWriter::new(AssetBundle::embedded())
        .write(&sample_tree(), BuildTool::Maven)
        .unwrap();
    let mut archive = open(bytes);

    for launcher in ["demo/mvnw", "demo/mvnw.cmd"] {
        let mode = archive.by_name(launcher).unwrap().unix_mode().unwrap();
        assert_eq!(mode & 0o777, 0o755, "{launcher}");
    }
    let mode = archive.by_name("demo/pom.xml").unwrap().unix_mode().unwrap();
    assert_eq!(mode & 0o777, 0o644);

    let mut script = String::new();
    archive.by_name("demo/mvnw").unwrap().read_to_string(&mut script).unwrap();
    assert!(script.starts_with("#!/bin/sh"));
}

#[test]
fn test_gradle_archives_have_no_wrapper() {
    for build_tool in [BuildTool::Gradle, BuildTool::GradleKotlinDsl] {
        let bytes =
            ArchiveWriter::new(AssetBundle::embedded()).write(&sample_tree(), build_tool).unwrap();
        let names = listing(&bytes);
        assert!(names.iter().all(|name| !name.contains("mvnw") && !name.contains(".mvn")));
        assert!(names.iter().all(|name| !name.contains("gradlew")));
    }
}

#[test]
fn test_existing_wrapper_files_are_kept() {
    let mut tree = sample_tree();
    tree.add_file("mvnw", "#!/bin/sh\necho custom\n", true).unwrap();
    let bytes = ArchiveWriter::new(AssetBundle::embedded()).write(&tree, BuildTool::Maven).unwrap();

    let names = ordered_listing(&bytes);
    assert_eq!(names.iter().filter(|name| *name == "demo/mvnw").count(), 1);
    assert!(names.contains(&"demo/mvnw.cmd".to_string()));

    let mut archive = open(bytes);
    let mut script = String::new();
    archive.by_name("demo/mvnw").unwrap().read_to_string(&mut script).unwrap();
    assert!(script.contains("echo custom"));
}

#[test]
fn test_identical_input_gives_identical_bytes() {
    let writer = ArchiveWriter::new(AssetBundle::embedded());
    let first = writer.write(&sample_tree(), BuildTool::Maven).unwrap();
    let second = writer.write(&sample_tree(), BuildTool::Maven).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_missing_asset_is_reported() {
    let bundle = AssetBundle::from_entries([("mvnw", b"#!/bin/sh\n".to_vec())]);
    let err = ArchiveWriter::new(&bundle).write(&sample_tree(), BuildTool::Maven).unwrap_err();
    match err {
        Error::MissingResource { path } => assert_eq!(path, ".mvn/wrapper/maven-wrapper.jar"),
        other => panic!("unexpected error: {other}"),
    }

    // Gradle never touches the bundle
    assert!(ArchiveWriter::new(&bundle).write(&sample_tree(), BuildTool::Gradle).is_ok());
}

#[test]
fn test_bundle_from_incomplete_dir_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("mvnw"), "#!/bin/sh\n").unwrap();
    assert!(matches!(AssetBundle::from_dir(dir.path()), Err(Error::MissingResource { .. })));
}
