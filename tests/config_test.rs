//! Integration tests for Settings config loading with layered merge semantics.
//!
//! These tests use temp directories as project dirs and assume no global
//! config file exists on the test machine.

use std::fs;

use rstest::rstest;
use tempfile::TempDir;

use bomtree::application::ApplicationError;
use bomtree::config::{local_config_path, RawSettings, Settings};
use bomtree::domain::NodeKind;

#[test]
fn given_no_local_config_when_load_then_defaults() {
    let project = TempDir::new().unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(settings.new_item.unit, "EA");
    assert_eq!(settings.label_separator, " / ");
}

#[test]
fn given_local_config_when_load_then_overrides_only_given_fields() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        r#"
label_separator = " > "

[new_item]
description = "Unnamed"
quantity = 4.0
kind = "assembly"
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.label_separator, " > ");
    assert_eq!(settings.root_label, "(root level)");
    assert_eq!(settings.new_item.description, "Unnamed");
    assert_eq!(settings.new_item.quantity, Some(4.0));
    assert_eq!(settings.new_item.kind, NodeKind::Assembly);
    assert_eq!(settings.new_item.code_prefix, "NEW-");
}

#[test]
fn given_invalid_local_config_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "[new_item]\nkind = \"gadget\"\n",
    )
    .unwrap();

    let result = Settings::load(Some(project.path()));

    assert!(result.is_err());
}

#[rstest]
#[case::negative("-2.0")]
#[case::nan("nan")]
#[case::infinite("inf")]
fn given_unusable_quantity_in_local_config_when_load_then_config_error(#[case] value: &str) {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        format!("[new_item]\nquantity = {value}\n"),
    )
    .unwrap();

    let result = Settings::load(Some(project.path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_template_when_written_as_local_config_then_loads_as_defaults() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), Settings::template()).unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_effective_settings_when_shown_then_parseable_toml() {
    let text = Settings::default().to_toml().unwrap();

    let raw: RawSettings = toml::from_str(&text).unwrap();

    assert_eq!(raw.root_label.as_deref(), Some("(root level)"));
    assert_eq!(raw.new_item.kind, Some(NodeKind::Part));
}
