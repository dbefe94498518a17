use codestart::definition::{BuildTool, ProjectDefinition, RawDefinition};
use codestart::error::{Error, ErrorCategory};

fn raw() -> RawDefinition {
    RawDefinition::default()
}

fn invalid_fields(raw: &RawDefinition) -> Vec<&'static str> {
    match ProjectDefinition::validate(raw) {
        Err(err @ Error::Validation { .. }) => {
            err.violations().iter().map(|violation| violation.field).collect()
        }
        Err(other) => panic!("expected validation error, got {other}"),
        Ok(_) => panic!("expected validation error"),
    }
}

#[test]
fn test_defaults() {
    let definition = ProjectDefinition::validate(&raw()).unwrap();
    assert_eq!(definition.group_id(), "org.acme");
    assert_eq!(definition.artifact_id(), "code-with-quarkus");
    assert_eq!(definition.version(), "1.0.0-SNAPSHOT");
    assert_eq!(definition.build_tool(), BuildTool::Maven);
    assert_eq!(definition.language_version_number(), 17);
    assert_eq!(definition.resolved_class_name(), "org.acme.ExampleResource");
    assert_eq!(definition.resolved_path(), "/hello");
    assert!(!definition.no_code());
    assert!(definition.extensions().is_empty());
}

#[test]
fn test_invalid_artifact_id() {
    let raw = RawDefinition { artifact_id: Some("Invalid Name!".to_string()), ..raw() };
    assert_eq!(invalid_fields(&raw), vec!["artifactId"]);
}

#[test]
fn test_empty_version() {
    let raw = RawDefinition { version: Some(String::new()), ..raw() };
    let err = ProjectDefinition::validate(&raw).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(err.violations()[0].field, "version");
    assert_eq!(err.violations()[0].message, "must not be empty");
}

#[test]
fn test_invalid_group_id() {
    let raw = RawDefinition { group_id: Some("1bad.name".to_string()), ..raw() };
    assert_eq!(invalid_fields(&raw), vec!["groupId"]);
}

#[test]
fn test_all_violations_are_reported() {
    let raw = RawDefinition {
        group_id: Some("1bad.name".to_string()),
        artifact_id: Some("Invalid Name!".to_string()),
        path: Some("no-leading-slash".to_string()),
        build_tool: Some("ANT".to_string()),
        ..raw()
    };
    let err = ProjectDefinition::validate(&raw).unwrap_err();
    let message = err.to_string();
    for field in ["groupId", "artifactId", "path", "buildTool"] {
        assert!(message.contains(field), "{field} missing from '{message}'");
    }
    assert_eq!(err.violations().len(), 4);
}

#[test]
fn test_language_version_legacy_form() {
    let raw = RawDefinition { language_version: Some("1.8".to_string()), ..raw() };
    let definition = ProjectDefinition::validate(&raw).unwrap();
    assert_eq!(definition.language_version(), "1.8");
    assert_eq!(definition.language_version_number(), 8);

    let raw = RawDefinition { language_version: Some("java17".to_string()), ..self::raw() };
    assert_eq!(invalid_fields(&raw), vec!["languageVersion"]);
}

#[test]
fn test_no_examples_alias() {
    let raw = RawDefinition { no_examples: true, ..raw() };
    assert!(ProjectDefinition::validate(&raw).unwrap().no_code());
}

#[test]
fn test_build_tool_must_match_exactly() {
    let raw = RawDefinition { build_tool: Some("GRADLE_KOTLIN_DSL".to_string()), ..raw() };
    let definition = ProjectDefinition::validate(&raw).unwrap();
    assert_eq!(definition.build_tool(), BuildTool::GradleKotlinDsl);
    assert!(definition.build_tool().is_gradle());

    let raw = RawDefinition { build_tool: Some("gradle".to_string()), ..self::raw() };
    assert_eq!(invalid_fields(&raw), vec!["buildTool"]);
}

#[test]
fn test_language_version_out_of_range() {
    let raw = RawDefinition { language_version: Some("99999999999".to_string()), ..raw() };
    let err = ProjectDefinition::validate(&raw).unwrap_err();
    assert_eq!(err.violations().len(), 1);
    assert_eq!(err.violations()[0].field, "languageVersion");

    let raw = RawDefinition { language_version: Some("4294967295".to_string()), ..self::raw() };
    let definition = ProjectDefinition::validate(&raw).unwrap();
    assert_eq!(definition.language_version_number(), u32::MAX);
}

#[test]
fn test_extensions_are_unique_and_sorted() {
    let raw = RawDefinition {
        extensions: vec![
            "quarkus-jackson".to_string(),
            "io.quarkus:quarkus-arc".to_string(),
            "quarkus-jackson".to_string(),
        ],
        ..raw()
    };
    let definition = ProjectDefinition::validate(&raw).unwrap();
    let extensions: Vec<&str> = definition.extensions().iter().map(String::as_str).collect();
    assert_eq!(extensions, vec!["io.quarkus:quarkus-arc", "quarkus-jackson"]);
}

#[test]
fn test_deserialize_query_style_keys() {
    let raw: RawDefinition = serde_json::from_str(
        r#"{"groupId":"com.example","artifactId":"test-app","javaVersion":"21","noExamples":true}"#,
    )
    .unwrap();
    let definition = ProjectDefinition::validate(&raw).unwrap();
    assert_eq!(definition.group_id(), "com.example");
    assert_eq!(definition.artifact_id(), "test-app");
    assert_eq!(definition.language_version_number(), 21);
    assert!(definition.no_code());
}
