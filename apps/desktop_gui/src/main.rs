mod backend_bridge;
mod controller;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use intake_core::{env_settings, load_settings, IntakeSettings, SettingsOverrides};
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{commands::BackendCommand, runtime};
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::IntakeApp;

#[derive(Debug, Parser)]
#[command(name = "intake-desktop", about = "Brand video intake form")]
struct Args {
    /// Settings file; defaults to ./intake.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Automation webhook receiving the multipart submission.
    #[arg(long)]
    workflow_url: Option<String>,
    /// Delay of the simulated workflow when no webhook is configured.
    #[arg(long)]
    delay_ms: Option<u64>,
    /// Refuse files that do not match the accept filter.
    #[arg(long)]
    enforce_accept: bool,
}

impl Args {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            workflow_url: self.workflow_url.clone(),
            simulated_delay_ms: self.delay_ms,
            enforce_accept: self.enforce_accept,
        }
    }
}

/// Settings for the app plus a banner describing anything that could not be
/// applied. An unusable config file falls back to defaults with environment
/// overrides; the remaining flags still apply.
fn resolve_settings(args: &Args) -> (IntakeSettings, Option<UiError>) {
    let mut problems = Vec::new();
    let mut settings = match load_settings(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!("failed to load settings file, using defaults: {err:#}");
            problems.push(format!("{err:#}"));
            env_settings()
        }
    };
    let applied: anyhow::Result<()> = args.overrides().apply_to(&mut settings);
    if let Err(err) = applied {
        tracing::error!("ignoring invalid command-line setting: {err:#}");
        problems.push(format!("{err:#}"));
    }

    let banner = (!problems.is_empty()).then(|| {
        UiError::new(
            UiErrorContext::BackendStartup,
            format!("some settings were not applied: {}", problems.join("; ")),
        )
    });
    (settings, banner)
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let (settings, startup_error) = resolve_settings(&args);
    tracing::info!(
        upload_policy = %settings.upload_rules.policy,
        webhook = settings.workflow_url.is_some(),
        "starting intake desktop"
    );
    let rules = settings.upload_rules.clone();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("AIavatar Brand Video Intake")
            .with_inner_size([720.0, 820.0])
            .with_min_inner_size([520.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "AIavatar Brand Video Intake",
        options,
        Box::new(move |_cc| Ok(Box::new(IntakeApp::new(rules, cmd_tx, ui_rx, startup_error)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use intake_core::UploadPolicy;

    #[test]
    fn cli_flags_become_settings_overrides() {
        let args = Args::parse_from([
            "intake-desktop",
            "--workflow-url",
            "https://hooks.example.com/intake",
            "--delay-ms",
            "250",
            "--enforce-accept",
        ]);

        let overrides = args.overrides();
        assert_eq!(
            overrides.workflow_url.as_deref(),
            Some("https://hooks.example.com/intake")
        );
        assert_eq!(overrides.simulated_delay_ms, Some(250));
        assert!(overrides.enforce_accept);
    }

    #[test]
    fn missing_config_file_keeps_command_line_flags_and_shows_banner() {
        let args = Args::parse_from([
            "intake-desktop",
            "--config",
            "/no/such/intake.toml",
            "--enforce-accept",
            "--delay-ms",
            "40",
        ]);

        let (settings, banner) = resolve_settings(&args);

        assert_eq!(settings.upload_rules.policy, UploadPolicy::Enforce);
        assert_eq!(settings.simulated_delay, Duration::from_millis(40));
        let banner = banner.expect("startup banner");
        assert_eq!(banner.context(), UiErrorContext::BackendStartup);
        assert!(banner.message().contains("/no/such/intake.toml"));
    }

    #[test]
    fn invalid_workflow_url_flag_keeps_other_flags() {
        let args = Args::parse_from([
            "intake-desktop",
            "--config",
            "/no/such/intake.toml",
            "--workflow-url",
            "ftp://example.com/drop",
            "--enforce-accept",
        ]);

        let (settings, banner) = resolve_settings(&args);

        assert_eq!(settings.upload_rules.policy, UploadPolicy::Enforce);
        assert!(banner
            .expect("startup banner")
            .message()
            .contains("--workflow-url"));
    }
}
