use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use url::Url;

use crate::{
    accept::{AcceptFilter, UploadPolicy, UploadRules},
    workflow::DEFAULT_SIMULATED_DELAY,
};

pub const CONFIG_FILE_NAME: &str = "intake.toml";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variables, applied in order; later entries win.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("WORKFLOW_WEBHOOK_URL", "workflow_url"),
    ("INTAKE__WORKFLOW_URL", "workflow_url"),
    ("INTAKE__SIMULATED_DELAY_MS", "simulated_delay_ms"),
    ("INTAKE__REQUEST_TIMEOUT_SECS", "request_timeout_secs"),
    ("INTAKE__UPLOAD_POLICY", "upload_policy"),
    ("INTAKE__ACCEPT", "accept"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct IntakeSettings {
    /// Automation webhook; `None` selects the simulated workflow.
    pub workflow_url: Option<Url>,
    pub simulated_delay: Duration,
    pub request_timeout: Duration,
    pub upload_rules: UploadRules,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            workflow_url: None,
            simulated_delay: DEFAULT_SIMULATED_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            upload_rules: UploadRules::default(),
        }
    }
}

impl IntakeSettings {
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        match key {
            "workflow_url" => {
                self.workflow_url = if value.is_empty() {
                    None
                } else {
                    Some(parse_workflow_url(value)?)
                };
            }
            "simulated_delay_ms" => {
                let millis = value
                    .parse::<u64>()
                    .map_err(|err| format!("simulated_delay_ms must be an integer: {err}"))?;
                self.simulated_delay = Duration::from_millis(millis);
            }
            "request_timeout_secs" => {
                let secs = value
                    .parse::<u64>()
                    .map_err(|err| format!("request_timeout_secs must be an integer: {err}"))?;
                if secs == 0 {
                    return Err("request_timeout_secs must be greater than zero".to_string());
                }
                self.request_timeout = Duration::from_secs(secs);
            }
            "upload_policy" => {
                self.upload_rules.policy = value.parse::<UploadPolicy>()?;
            }
            "accept" => {
                self.upload_rules.accept = AcceptFilter::parse(value);
            }
            other => return Err(format!("unknown setting '{other}'")),
        }
        Ok(())
    }

    fn apply_or_warn(&mut self, source: &str, key: &str, value: &str) {
        if let Err(reason) = self.apply(key, value) {
            tracing::warn!(source, key, "ignoring invalid setting: {reason}");
        }
    }
}

/// Command-line overrides shared by the front ends; applied last.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub workflow_url: Option<String>,
    pub simulated_delay_ms: Option<u64>,
    pub enforce_accept: bool,
}

impl SettingsOverrides {
    /// An invalid URL is reported after the other overrides have been applied.
    pub fn apply_to(&self, settings: &mut IntakeSettings) -> Result<()> {
        if let Some(millis) = self.simulated_delay_ms {
            settings.simulated_delay = Duration::from_millis(millis);
        }
        if self.enforce_accept {
            settings.upload_rules.policy = UploadPolicy::Enforce;
        }
        if let Some(url) = &self.workflow_url {
            settings
                .apply("workflow_url", url)
                .map_err(anyhow::Error::msg)
                .context("invalid --workflow-url")?;
        }
        Ok(())
    }
}

pub fn parse_workflow_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|err| format!("invalid workflow url '{raw}': {err}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(format!(
            "workflow url must use http or https, got '{scheme}'"
        )),
    }
}

/// Defaults, then the config file, then environment overrides.
///
/// An explicit `config_path` must exist; without one, `intake.toml` in the
/// working directory is read when present.
pub fn load_settings(config_path: Option<&Path>) -> Result<IntakeSettings> {
    let mut settings = IntakeSettings::default();

    let file_path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default_path = PathBuf::from(CONFIG_FILE_NAME);
            default_path.is_file().then_some(default_path)
        }
    };

    if let Some(path) = file_path {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded intake settings file");
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

/// Defaults plus environment overrides, for when the config file is unusable.
pub fn env_settings() -> IntakeSettings {
    let mut settings = IntakeSettings::default();
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

pub(crate) fn apply_file(settings: &mut IntakeSettings, raw: &str) -> Result<()> {
    let table = toml::from_str::<toml::Table>(raw)?;
    for (key, value) in &table {
        let value = match value {
            toml::Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        settings.apply_or_warn("file", key, &value);
    }
    Ok(())
}

pub(crate) fn apply_env_overrides(
    settings: &mut IntakeSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    for &(env_name, key) in ENV_OVERRIDES {
        if let Some(value) = lookup(env_name) {
            settings.apply_or_warn(env_name, key, &value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_simulated_workflow_with_advisory_filter() {
        let settings = IntakeSettings::default();
        assert_eq!(settings.workflow_url, None);
        assert_eq!(settings.simulated_delay, Duration::from_millis(3000));
        assert_eq!(settings.upload_rules.policy, UploadPolicy::Advisory);
        assert_eq!(
            settings.upload_rules.accept.as_str(),
            "image/*,.pdf,.doc,.docx"
        );
    }

    #[test]
    fn command_line_overrides_apply_last() {
        let mut settings = IntakeSettings::default();
        let overrides = SettingsOverrides {
            workflow_url: Some("http://127.0.0.1:5678/webhook/brand".to_string()),
            simulated_delay_ms: Some(0),
            enforce_accept: true,
        };
        overrides.apply_to(&mut settings).expect("apply");
        assert_eq!(
            settings.workflow_url.as_ref().and_then(|url| url.port()),
            Some(5678)
        );
        assert_eq!(settings.simulated_delay, Duration::ZERO);
        assert_eq!(settings.upload_rules.policy, UploadPolicy::Enforce);

        let bad = SettingsOverrides {
            workflow_url: Some("file:///tmp/hook".to_string()),
            ..SettingsOverrides::default()
        };
        assert!(bad.apply_to(&mut settings).is_err());
    }

    #[test]
    fn invalid_url_override_still_applies_other_flags() {
        let mut settings = IntakeSettings::default();
        let overrides = SettingsOverrides {
            workflow_url: Some("ftp://example.com/drop".to_string()),
            simulated_delay_ms: Some(7),
            enforce_accept: true,
        };

        assert!(overrides.apply_to(&mut settings).is_err());
        assert_eq!(settings.workflow_url, None);
        assert_eq!(settings.simulated_delay, Duration::from_millis(7));
        assert_eq!(settings.upload_rules.policy, UploadPolicy::Enforce);
    }

    #[test]
    fn workflow_url_requires_http_scheme() {
        assert!(parse_workflow_url("https://automation.example.com/webhook/brand").is_ok());
        assert!(parse_workflow_url("ftp://example.com/drop").is_err());
        assert!(parse_workflow_url("not a url").is_err());
    }
}
