use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use intake_core::{
    build_submitter, file_ref_from_path, files::human_readable_bytes, load_settings,
    FormIntakeController, SettingsOverrides, SubmissionOutcome,
};
use shared::domain::{StatusMessage, TargetMood, UploadField};
use tracing_subscriber::EnvFilter;

/// Submits one brand video request from the command line.
#[derive(Parser, Debug)]
#[command(name = "intake-cli")]
struct Args {
    #[arg(long)]
    brand_asset: PathBuf,
    #[arg(long)]
    avatar: Option<PathBuf>,
    #[arg(long)]
    brief: String,
    #[arg(long, default_value_t = TargetMood::Authentic)]
    mood: TargetMood,
    /// Print status messages as JSON lines.
    #[arg(long)]
    json: bool,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    workflow_url: Option<String>,
    #[arg(long)]
    delay_ms: Option<u64>,
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

fn status_line(message: &StatusMessage, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string(message)?);
    }
    Ok(format!("[{}] {}", message.kind(), message.text()))
}

fn print_status(controller: &FormIntakeController, json: bool) -> Result<()> {
    if let Some(message) = controller.status_message() {
        println!("{}", status_line(message, json)?);
    }
    Ok(())
}

fn attach(
    controller: &mut FormIntakeController,
    field: UploadField,
    path: &Path,
    json: bool,
) -> Result<()> {
    let file = file_ref_from_path(path)
        .with_context(|| format!("failed to load {field} from {}", path.display()))?;
    if !controller.select_file(field, file) {
        print_status(controller, json)?;
        bail!("{field} was refused by the accept filter");
    }
    if let Some(entry) = controller.upload_entry(field) {
        let size = controller
            .form()
            .file(field)
            .and_then(|file| file.size)
            .map(human_readable_bytes)
            .unwrap_or_default();
        tracing::info!(%field, size = %size, "{}", entry.message);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    args.overrides().apply_to(&mut settings)?;
    let submitter = build_submitter(&settings)?;

    let mut controller = FormIntakeController::new(settings.upload_rules.clone());
    attach(&mut controller, UploadField::BrandAsset, &args.brand_asset, args.json)?;
    if let Some(avatar) = &args.avatar {
        attach(&mut controller, UploadField::AvatarPicture, avatar, args.json)?;
    }
    controller.set_campaign_brief(args.brief.clone());
    controller.set_target_mood(args.mood);

    let pending = match controller.begin_submission() {
        Ok(pending) => pending,
        Err(rejected) => {
            print_status(&controller, args.json)?;
            bail!("submission rejected: {rejected}");
        }
    };
    print_status(&controller, args.json)?;

    let result = submitter.submit(&pending.request).await;
    let outcome = controller
        .complete_submission(pending.id, result)
        .context("submission state changed while awaiting workflow")?;
    print_status(&controller, args.json)?;

    match outcome {
        SubmissionOutcome::Succeeded => Ok(()),
        SubmissionOutcome::Failed(err) => Err(anyhow!(err).context("workflow submission failed")),
        SubmissionOutcome::Rejected(rejected) => bail!("submission rejected: {rejected}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_required_flags_and_mood() {
        let args = Args::parse_from([
            "intake-cli",
            "--brand-asset",
            "logo.png",
            "--brief",
            "Launch our new product",
            "--mood",
            "Energetic",
        ]);

        assert_eq!(args.brand_asset, PathBuf::from("logo.png"));
        assert_eq!(args.avatar, None);
        assert_eq!(args.mood, TargetMood::Energetic);
        assert!(!args.json);
    }

    #[test]
    fn mood_defaults_to_authentic() {
        let args = Args::parse_from(["intake-cli", "--brand-asset", "a.pdf", "--brief", "x"]);
        assert_eq!(args.mood, TargetMood::Authentic);
    }

    #[test]
    fn unknown_mood_is_a_usage_error() {
        let result = Args::try_parse_from([
            "intake-cli",
            "--brand-asset",
            "logo.png",
            "--brief",
            "x",
            "--mood",
            "gloomy",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn status_lines_render_plain_and_json() {
        let message = StatusMessage::Info("Processing".to_string());

        assert_eq!(status_line(&message, false).expect("plain"), "[info] Processing");
        assert_eq!(
            status_line(&message, true).expect("json"),
            r#"{"type":"info","message":"Processing"}"#
        );
    }

    #[test]
    fn settings_flags_override_loaded_settings() {
        let args = Args::parse_from([
            "intake-cli",
            "--brand-asset",
            "logo.png",
            "--brief",
            "x",
            "--delay-ms",
            "5",
            "--enforce-accept",
        ]);
        let overrides = args.overrides();

        assert_eq!(overrides.simulated_delay_ms, Some(5));
        assert!(overrides.enforce_accept);
        assert_eq!(overrides.workflow_url, None);
    }
}
