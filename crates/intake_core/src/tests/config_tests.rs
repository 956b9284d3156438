use super::config::{apply_env_overrides, apply_file};
use super::*;

use std::{
    collections::HashMap,
    env, fs,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn file_values_accept_strings_and_integers() {
    let mut settings = IntakeSettings::default();
    apply_file(
        &mut settings,
        r#"
workflow_url = "https://automation.example.com/webhook/brand-video"
simulated_delay_ms = 1500
request_timeout_secs = "45"
upload_policy = "enforce"
accept = "image/png,.pdf"
"#,
    )
    .expect("parse");

    assert_eq!(
        settings.workflow_url.as_ref().map(|url| url.as_str()),
        Some("https://automation.example.com/webhook/brand-video")
    );
    assert_eq!(settings.simulated_delay, Duration::from_millis(1500));
    assert_eq!(settings.request_timeout, Duration::from_secs(45));
    assert_eq!(settings.upload_rules.policy, UploadPolicy::Enforce);
    assert_eq!(settings.upload_rules.accept.as_str(), "image/png,.pdf");
}

#[test]
fn invalid_values_keep_previous_settings() {
    let mut settings = IntakeSettings::default();
    apply_file(
        &mut settings,
        r#"
workflow_url = "ftp://nope"
simulated_delay_ms = "soon"
request_timeout_secs = 0
upload_policy = "maybe"
unknown_key = "ignored"
"#,
    )
    .expect("parse");

    assert_eq!(settings, IntakeSettings::default());
}

#[test]
fn malformed_toml_is_an_error() {
    let mut settings = IntakeSettings::default();
    assert!(apply_file(&mut settings, "workflow_url = ").is_err());
}

#[test]
fn env_overrides_win_and_intake_prefix_beats_alias() {
    let mut settings = IntakeSettings::default();
    apply_file(&mut settings, "simulated_delay_ms = 10").expect("parse");

    apply_env_overrides(
        &mut settings,
        lookup_from(&[
            ("WORKFLOW_WEBHOOK_URL", "http://alias.example.com/hook"),
            ("INTAKE__WORKFLOW_URL", "http://primary.example.com/hook"),
            ("INTAKE__SIMULATED_DELAY_MS", "250"),
            ("INTAKE__UPLOAD_POLICY", "enforce"),
        ]),
    );

    assert_eq!(
        settings.workflow_url.as_ref().map(|url| url.host_str()),
        Some(Some("primary.example.com"))
    );
    assert_eq!(settings.simulated_delay, Duration::from_millis(250));
    assert_eq!(settings.upload_rules.policy, UploadPolicy::Enforce);
}

#[test]
fn empty_workflow_url_env_clears_file_value() {
    let mut settings = IntakeSettings::default();
    apply_file(&mut settings, r#"workflow_url = "https://example.com/hook""#).expect("parse");
    assert!(settings.workflow_url.is_some());

    apply_env_overrides(&mut settings, lookup_from(&[("INTAKE__WORKFLOW_URL", "  ")]));

    assert!(settings.workflow_url.is_none());
}

#[test]
fn explicit_config_path_must_exist() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let missing = env::temp_dir().join(format!("intake_missing_config_{suffix}.toml"));
    assert!(load_settings(Some(&missing)).is_err());
}

#[test]
fn explicit_config_path_is_loaded() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("intake_config_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("intake.toml");
    fs::write(&path, "accept = \".pdf\"\n").expect("write config");

    let settings = load_settings(Some(&path)).expect("load");
    assert_eq!(settings.upload_rules.accept.as_str(), ".pdf");

    fs::remove_dir_all(dir).expect("cleanup");
}
