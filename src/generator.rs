//! Scaffold generation.
//! Turns a validated `ProjectDefinition` into a `SourceTree`. The pipeline only
//! relies on the `ScaffoldGenerator` trait; `TemplateGenerator` is the built-in
//! implementation rendering the templates embedded in the binary.

use crate::constants::{DEFAULT_EXTENSION_GROUP, EXTENSION_ID_PATTERN};
use crate::definition::{BuildTool, ProjectDefinition};
use crate::error::{Error, Result};
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
use crate::tree::SourceTree;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const PLATFORM_GROUP_ID: &str = "io.quarkus.platform";
const PLATFORM_VERSION: &str = "3.15.1";
const REST_EXTENSION: &str = "quarkus-rest";

static EXTENSION_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(EXTENSION_ID_PATTERN).expect("Invalid extension id pattern"));

const POM_XML: &str = include_str!("../templates/maven/pom.xml.j2");
const BUILD_GRADLE: &str = include_str!("../templates/gradle/build.gradle.j2");
const BUILD_GRADLE_KTS: &str = include_str!("../templates/gradle/build.gradle.kts.j2");
const SETTINGS_GRADLE: &str = include_str!("../templates/gradle/settings.gradle.j2");
const SETTINGS_GRADLE_KTS: &str = include_str!("../templates/gradle/settings.gradle.kts.j2");
const GRADLE_PROPERTIES: &str = include_str!("../templates/gradle/gradle.properties.j2");
const RESOURCE_JAVA: &str = include_str!("../templates/code/Resource.java.j2");
const RESOURCE_TEST_JAVA: &str = include_str!("../templates/code/ResourceTest.java.j2");
const NATIVE_IT_JAVA: &str = include_str!("../templates/code/NativeResourceIT.java.j2");
const INDEX_HTML: &str = include_str!("../templates/code/index.html.j2");
const DOCKERFILE_NATIVE: &str = include_str!("../templates/docker/Dockerfile.native.j2");
const DOCKERFILE_JVM: &str = include_str!("../templates/docker/Dockerfile.jvm.j2");
const DOCKERIGNORE: &str = include_str!("../templates/common/dockerignore.j2");
const APPLICATION_PROPERTIES: &str =
    include_str!("../templates/common/application.properties.j2");
const GITIGNORE: &str = include_str!("../templates/common/gitignore.j2");
const README_MD: &str = include_str!("../templates/common/README.md.j2");

/// Capability that produces a scaffold for a project definition.
///
/// Implementations must be deterministic, must root the tree at the
/// definition's artifact id and must not add build-tool wrapper scripts.
pub trait ScaffoldGenerator: Send + Sync {
    fn generate(&self, definition: &ProjectDefinition) -> Result<SourceTree>;
}

/// Maven coordinates of an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionCoordinates {
    pub group_id: String,
    pub artifact_id: String,
}

/// Resolves an extension id (`artifactId` or `groupId:artifactId`).
///
/// # Errors
/// * `Error::Generation` if the id is not resolvable
pub fn resolve_extension(id: &str) -> Result<ExtensionCoordinates> {
    if !EXTENSION_ID_RE.is_match(id) {
        return Err(Error::Generation(format!("unresolvable extension '{id}'")));
    }
    let (group_id, artifact_id) = match id.split_once(':') {
        Some((group, artifact)) => (group, artifact),
        None => (DEFAULT_EXTENSION_GROUP, id),
    };
    Ok(ExtensionCoordinates {
        group_id: group_id.to_string(),
        artifact_id: artifact_id.to_string(),
    })
}

/// Built-in generator rendering embedded templates.
pub struct TemplateGenerator {
    renderer: Box<dyn TemplateRenderer>,
}

impl TemplateGenerator {
    pub fn new(renderer: Box<dyn TemplateRenderer>) -> Self {
        Self { renderer }
    }

    fn render_into(
        &self,
        tree: &mut SourceTree,
        path: &str,
        template: &str,
        context: &serde_json::Value,
    ) -> Result<()> {
        let content = self.renderer.render(path, template, context)?;
        tree.add_file(path, content, false)
    }
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self::new(Box::new(MiniJinjaRenderer::new()))
    }
}

fn build_context(definition: &ProjectDefinition) -> Result<serde_json::Value> {
    let mut extensions = definition
        .extensions()
        .iter()
        .map(|id| resolve_extension(id))
        .collect::<Result<Vec<_>>>()?;

    if !definition.no_code()
        && !extensions
            .iter()
            .any(|e| e.group_id == DEFAULT_EXTENSION_GROUP && e.artifact_id == REST_EXTENSION)
    {
        extensions.push(ExtensionCoordinates {
            group_id: DEFAULT_EXTENSION_GROUP.to_string(),
            artifact_id: REST_EXTENSION.to_string(),
        });
    }

    let class_name = definition.resolved_class_name();
    let (package_name, class_simple_name) = match class_name.rsplit_once('.') {
        Some((package, simple)) => (package.to_string(), simple.to_string()),
        None => (definition.group_id().to_string(), class_name.clone()),
    };

    let build_tool = definition.build_tool();
    let (build_output, dev_command, package_command) = if build_tool.is_gradle() {
        ("build", "./gradlew quarkusDev", "./gradlew build")
    } else {
        ("target", "./mvnw quarkus:dev", "./mvnw package")
    };

    Ok(serde_json::json!({
        "group_id": definition.group_id(),
        "artifact_id": definition.artifact_id(),
        "version": definition.version(),
        "language_version": definition.language_version_number(),
        "build_tool": build_tool.as_str(),
        "stream_key": definition.stream_key(),
        "no_code": definition.no_code(),
        "package_name": package_name,
        "class_simple_name": class_simple_name,
        "path": definition.resolved_path(),
        "extensions": extensions,
        "platform_group_id": PLATFORM_GROUP_ID,
        "platform_version": PLATFORM_VERSION,
        "build_output": build_output,
        "dev_command": dev_command,
        "package_command": package_command,
    }))
}

impl ScaffoldGenerator for TemplateGenerator {
    /// Generates the scaffold in a fixed entry order.
    ///
    /// # Errors
    /// * `Error::Generation` for unresolvable extensions or template failures
    fn generate(&self, definition: &ProjectDefinition) -> Result<SourceTree> {
        debug!("Generating scaffold for '{}'", definition.artifact_id());
        let context = build_context(definition)?;
        let mut tree = SourceTree::new(definition.artifact_id());

        match definition.build_tool() {
            BuildTool::Maven => self.render_into(&mut tree, "pom.xml", POM_XML, &context)?,
            BuildTool::Gradle => {
                self.render_into(&mut tree, "build.gradle", BUILD_GRADLE, &context)?;
                self.render_into(&mut tree, "settings.gradle", SETTINGS_GRADLE, &context)?;
                self.render_into(&mut tree, "gradle.properties", GRADLE_PROPERTIES, &context)?;
            }
            BuildTool::GradleKotlinDsl => {
                self.render_into(&mut tree, "build.gradle.kts", BUILD_GRADLE_KTS, &context)?;
                self.render_into(
                    &mut tree,
                    "settings.gradle.kts",
                    SETTINGS_GRADLE_KTS,
                    &context,
                )?;
                self.render_into(&mut tree, "gradle.properties", GRADLE_PROPERTIES, &context)?;
            }
        }

        if !definition.no_code() {
            let package_dir = context["package_name"].as_str().unwrap_or_default().replace('.', "/");
            let simple = context["class_simple_name"].as_str().unwrap_or_default();
            self.render_into(
                &mut tree,
                &format!("src/main/java/{package_dir}/{simple}.java"),
                RESOURCE_JAVA,
                &context,
            )?;
            self.render_into(
                &mut tree,
                &format!("src/test/java/{package_dir}/{simple}Test.java"),
                RESOURCE_TEST_JAVA,
                &context,
            )?;
            self.render_into(
                &mut tree,
                &format!("src/test/java/{package_dir}/Native{simple}IT.java"),
                NATIVE_IT_JAVA,
                &context,
            )?;
            self.render_into(
                &mut tree,
                "src/main/resources/META-INF/resources/index.html",
                INDEX_HTML,
                &context,
            )?;
        }

        for (path, template) in [
            ("src/main/docker/Dockerfile.native", DOCKERFILE_NATIVE),
            ("src/main/docker/Dockerfile.jvm", DOCKERFILE_JVM),
        ] {
            self.render_into(&mut tree, path, template, &context)?;
        }
        self.render_into(&mut tree, ".dockerignore", DOCKERIGNORE, &context)?;
        self.render_into(
            &mut tree,
            "src/main/resources/application.properties",
            APPLICATION_PROPERTIES,
            &context,
        )?;
        self.render_into(&mut tree, ".gitignore", GITIGNORE, &context)?;
        self.render_into(&mut tree, "README.md", README_MD, &context)?;

        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_extension() {
        let ext = resolve_extension("ext-a").unwrap();
        assert_eq!(ext.group_id, "io.quarkus");
        assert_eq!(ext.artifact_id, "ext-a");

        let ext = resolve_extension("io.quarkus:quarkus-neo4j").unwrap();
        assert_eq!(ext.group_id, "io.quarkus");
        assert_eq!(ext.artifact_id, "quarkus-neo4j");

        assert!(resolve_extension("Not An Extension").is_err());
        assert!(resolve_extension("a:b:c").is_err());
    }
}
