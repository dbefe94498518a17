//! Project definition parsing and validation.
//! A `RawDefinition` carries whatever the caller supplied; `ProjectDefinition::validate`
//! applies defaults, checks every field against its grammar and returns an
//! immutable definition or every violation at once.

use crate::constants::{
    ARTIFACT_ID_PATTERN, CLASS_NAME_PATTERN, DEFAULT_ARTIFACT_ID, DEFAULT_BUILD_TOOL,
    DEFAULT_CLASS_SIMPLE_NAME, DEFAULT_GROUP_ID, DEFAULT_LANGUAGE_VERSION, DEFAULT_PATH,
    DEFAULT_VERSION, GROUP_ID_PATTERN, LANGUAGE_VERSION_PATTERN, PATH_PATTERN,
    STREAM_KEY_PATTERN,
};
use crate::error::{Error, Result, Violation};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

static GROUP_ID_RE: Lazy<Regex> = Lazy::new(|| compile(GROUP_ID_PATTERN));
static ARTIFACT_ID_RE: Lazy<Regex> = Lazy::new(|| compile(ARTIFACT_ID_PATTERN));
static CLASS_NAME_RE: Lazy<Regex> = Lazy::new(|| compile(CLASS_NAME_PATTERN));
static PATH_RE: Lazy<Regex> = Lazy::new(|| compile(PATH_PATTERN));
static LANGUAGE_VERSION_RE: Lazy<Regex> = Lazy::new(|| compile(LANGUAGE_VERSION_PATTERN));
static STREAM_KEY_RE: Lazy<Regex> = Lazy::new(|| compile(STREAM_KEY_PATTERN));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid built-in pattern")
}

/// Build tool of the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildTool {
    Maven,
    Gradle,
    GradleKotlinDsl,
}

impl BuildTool {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildTool::Maven => "MAVEN",
            BuildTool::Gradle => "GRADLE",
            BuildTool::GradleKotlinDsl => "GRADLE_KOTLIN_DSL",
        }
    }

    pub fn is_gradle(&self) -> bool {
        matches!(self, BuildTool::Gradle | BuildTool::GradleKotlinDsl)
    }
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildTool {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "MAVEN" => Ok(BuildTool::Maven),
            "GRADLE" => Ok(BuildTool::Gradle),
            "GRADLE_KOTLIN_DSL" => Ok(BuildTool::GradleKotlinDsl),
            other => Err(format!(
                "must be one of MAVEN, GRADLE or GRADLE_KOTLIN_DSL (got '{other}')"
            )),
        }
    }
}

/// Unvalidated project definition as received from a caller.
///
/// Every field is optional; omitted fields take their documented default
/// during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDefinition {
    pub stream_key: Option<String>,
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub class_name: Option<String>,
    pub path: Option<String>,
    pub build_tool: Option<String>,
    #[serde(alias = "javaVersion")]
    pub language_version: Option<String>,
    pub no_code: bool,
    /// Deprecated alias of `no_code`
    pub no_examples: bool,
    pub extensions: Vec<String>,
}

/// Validated, immutable description of the project to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDefinition {
    stream_key: Option<String>,
    group_id: String,
    artifact_id: String,
    version: String,
    class_name: Option<String>,
    path: Option<String>,
    build_tool: BuildTool,
    language_version: String,
    #[serde(skip)]
    language_version_number: u32,
    no_code: bool,
    extensions: BTreeSet<String>,
}

/// Leading integer of a language version, `None` if absent or out of range.
fn leading_number(version: &str) -> Option<u32> {
    LANGUAGE_VERSION_RE
        .captures(version)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn violation(&mut self, field: &'static str, message: impl Into<String>) {
        self.violations.push(Violation { field, message: message.into() });
    }

    /// Checks a required field against a grammar, falling back to its default.
    fn required(
        &mut self,
        field: &'static str,
        value: &Option<String>,
        default: &str,
        re: Option<&Regex>,
    ) -> String {
        let value = value.clone().unwrap_or_else(|| default.to_string());
        if value.is_empty() {
            self.violation(field, "must not be empty");
        } else if let Some(re) = re {
            if !re.is_match(&value) {
                self.violation(field, format!("'{value}' does not match {}", re.as_str()));
            }
        }
        value
    }

    fn optional(
        &mut self,
        field: &'static str,
        value: &Option<String>,
        re: &Regex,
    ) -> Option<String> {
        let value = value.as_ref().filter(|v| !v.is_empty())?;
        if !re.is_match(value) {
            self.violation(field, format!("'{value}' does not match {}", re.as_str()));
        }
        Some(value.clone())
    }
}

impl ProjectDefinition {
    /// Validates a raw definition, applying defaults for omitted fields.
    ///
    /// # Arguments
    /// * `raw` - Caller-supplied fields
    ///
    /// # Returns
    /// * `Result<ProjectDefinition>` - The immutable definition
    ///
    /// # Errors
    /// * `Error::Validation` listing every offending field
    pub fn validate(raw: &RawDefinition) -> Result<Self> {
        let mut checker = Checker { violations: Vec::new() };

        let group_id =
            checker.required("groupId", &raw.group_id, DEFAULT_GROUP_ID, Some(&GROUP_ID_RE));
        let artifact_id = checker.required(
            "artifactId",
            &raw.artifact_id,
            DEFAULT_ARTIFACT_ID,
            Some(&ARTIFACT_ID_RE),
        );
        let version = checker.required("version", &raw.version, DEFAULT_VERSION, None);
        let class_name = checker.optional("className", &raw.class_name, &CLASS_NAME_RE);
        let path = checker.optional("path", &raw.path, &PATH_RE);
        let stream_key = checker.optional("streamKey", &raw.stream_key, &STREAM_KEY_RE);
        let language_version = checker.required(
            "languageVersion",
            &raw.language_version,
            DEFAULT_LANGUAGE_VERSION,
            Some(&LANGUAGE_VERSION_RE),
        );
        let language_version_number = match leading_number(&language_version) {
            Some(number) => number,
            None => {
                if LANGUAGE_VERSION_RE.is_match(&language_version) {
                    checker.violation(
                        "languageVersion",
                        format!("'{language_version}' is not a supported version number"),
                    );
                }
                0
            }
        };

        let build_tool = raw.build_tool.as_deref().unwrap_or(DEFAULT_BUILD_TOOL);
        let build_tool = match build_tool.parse::<BuildTool>() {
            Ok(tool) => tool,
            Err(message) => {
                checker.violation("buildTool", message);
                BuildTool::Maven
            }
        };

        let mut extensions = BTreeSet::new();
        for extension in &raw.extensions {
            let extension = extension.trim();
            if extension.is_empty() {
                checker.violation("extensions", "must not contain empty ids");
            } else {
                extensions.insert(extension.to_string());
            }
        }

        if !checker.violations.is_empty() {
            return Err(Error::Validation { violations: checker.violations });
        }

        Ok(Self {
            stream_key,
            group_id,
            artifact_id,
            version,
            class_name,
            path,
            build_tool,
            language_version,
            language_version_number,
            no_code: raw.no_code || raw.no_examples,
            extensions,
        })
    }

    pub fn stream_key(&self) -> Option<&str> {
        self.stream_key.as_deref()
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Fully qualified resource class name, derived from the group id when absent.
    pub fn resolved_class_name(&self) -> String {
        match &self.class_name {
            Some(name) => name.clone(),
            None => format!("{}.{}", self.group_id, DEFAULT_CLASS_SIMPLE_NAME),
        }
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn resolved_path(&self) -> &str {
        self.path.as_deref().unwrap_or(DEFAULT_PATH)
    }

    pub fn build_tool(&self) -> BuildTool {
        self.build_tool
    }

    pub fn language_version(&self) -> &str {
        &self.language_version
    }

    /// Leading integer of the language version (`1.8` gives 8, `17.0.2` gives 17).
    pub fn language_version_number(&self) -> u32 {
        self.language_version_number
    }

    pub fn no_code(&self) -> bool {
        self.no_code
    }

    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_patterns_compile() {
        for re in [
            &*GROUP_ID_RE,
            &*ARTIFACT_ID_RE,
            &*CLASS_NAME_RE,
            &*PATH_RE,
            &*LANGUAGE_VERSION_RE,
            &*STREAM_KEY_RE,
        ] {
            assert!(!re.as_str().is_empty());
        }
    }

    #[test]
    fn test_build_tool_from_str() {
        assert_eq!("MAVEN".parse::<BuildTool>(), Ok(BuildTool::Maven));
        assert_eq!("GRADLE".parse::<BuildTool>(), Ok(BuildTool::Gradle));
        assert_eq!("GRADLE_KOTLIN_DSL".parse::<BuildTool>(), Ok(BuildTool::GradleKotlinDsl));
        assert!("ant".parse::<BuildTool>().is_err());
        assert!("maven".parse::<BuildTool>().is_err());
        assert!(" MAVEN".parse::<BuildTool>().is_err());
    }

    #[test]
    fn test_path_pattern() {
        assert!(PATH_RE.is_match("/hello"));
        assert!(PATH_RE.is_match("/test/it"));
        assert!(PATH_RE.is_match("/"));
        assert!(!PATH_RE.is_match("hello"));
        assert!(!PATH_RE.is_match("/Upper"));
    }
}
