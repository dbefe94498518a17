//! Common constants used throughout codestart.

use std::time::Duration;

/// Supported configuration file names
pub const CONFIG_FILES: [&str; 3] = ["codestart.json", "codestart.yml", "codestart.yaml"];

pub const DEFAULT_GROUP_ID: &str = "org.acme";
pub const DEFAULT_ARTIFACT_ID: &str = "code-with-quarkus";
pub const DEFAULT_VERSION: &str = "1.0.0-SNAPSHOT";
pub const DEFAULT_BUILD_TOOL: &str = "MAVEN";
pub const DEFAULT_LANGUAGE_VERSION: &str = "17";
pub const DEFAULT_CLASS_SIMPLE_NAME: &str = "ExampleResource";
pub const DEFAULT_PATH: &str = "/hello";

/// Group used for extension ids given without a `group:` prefix
pub const DEFAULT_EXTENSION_GROUP: &str = "io.quarkus";

pub const GROUP_ID_PATTERN: &str = r"^([a-zA-Z_$][a-zA-Z\d_$]*\.)*[a-zA-Z_$][a-zA-Z\d_$]*$";
pub const ARTIFACT_ID_PATTERN: &str = r"^[a-z][a-z0-9\-._]*$";
pub const CLASS_NAME_PATTERN: &str = GROUP_ID_PATTERN;
pub const PATH_PATTERN: &str = r"^/([a-z0-9\-._~%!$&'()*+,;=:@]+/?)*$";
pub const LANGUAGE_VERSION_PATTERN: &str = r"^(?:1\.)?(\d+)(?:\..*)?$";
pub const STREAM_KEY_PATTERN: &str = r"^([\w.-]+:)?[\w.-]+$";
pub const EXTENSION_ID_PATTERN: &str = r"^([a-z0-9][a-z0-9._-]*:)?[a-z0-9][a-z0-9._-]*$";

/// Maven wrapper resources injected into Maven archives
pub const MAVEN_WRAPPER_PARENT_DIR: &str = ".mvn";
pub const MAVEN_WRAPPER_DIR: &str = ".mvn/wrapper";
pub const MAVEN_WRAPPER_JAR: &str = ".mvn/wrapper/maven-wrapper.jar";
pub const MAVEN_WRAPPER_PROPS: &str = ".mvn/wrapper/maven-wrapper.properties";
pub const MAVEN_WRAPPER_DOWNLOADER: &str = ".mvn/wrapper/MavenWrapperDownloader.java";
pub const MVNW_CMD: &str = "mvnw.cmd";
pub const MVNW: &str = "mvnw";

/// Description attached to every created repository
pub const REPOSITORY_DESCRIPTION: &str = "Generated by code.quarkus.io";

/// Identity used for the initial commit
pub const COMMIT_AUTHOR_NAME: &str = "quarkusio";
pub const COMMIT_AUTHOR_EMAIL: &str = "no-reply@quarkus.io";
pub const COMMIT_MESSAGE: &str = "Initial commit";
pub const DEFAULT_BRANCH: &str = "main";

pub const GITHUB_OAUTH_URL: &str = "https://github.com/login/oauth/access_token";
pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const USER_AGENT: &str = concat!("codestart/", env!("CARGO_PKG_VERSION"));

/// Number of existence checks after repository creation
pub const CONFIRM_ATTEMPTS: u32 = 5;
/// Delay between two existence checks
pub const CONFIRM_DELAY: Duration = Duration::from_millis(500);

/// Prefix of per-request temporary workspaces
pub const WORKSPACE_PREFIX: &str = "codestart-";

pub const EXECUTABLE_MODE: u32 = 0o755;
pub const FILE_MODE: u32 = 0o644;
pub const DIRECTORY_MODE: u32 = 0o755;
