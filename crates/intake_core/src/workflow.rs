use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use shared::{error::SubmissionError, protocol::WorkflowRequest};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    config::IntakeSettings,
    files::{guess_mime, read_file_bytes},
};

pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(3000);

/// Outbound call that kicks off the video generation workflow.
#[async_trait]
pub trait WorkflowSubmitter: Send + Sync {
    async fn submit(&self, request: &WorkflowRequest) -> Result<(), SubmissionError>;

    /// Short label for logs.
    fn describe(&self) -> String;
}

/// Stand-in workflow that waits a fixed delay and always succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedWorkflow {
    delay: Duration,
}

impl SimulatedWorkflow {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedWorkflow {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_DELAY)
    }
}

#[async_trait]
impl WorkflowSubmitter for SimulatedWorkflow {
    async fn submit(&self, request: &WorkflowRequest) -> Result<(), SubmissionError> {
        debug!(
            submission_id = %request.submission_id,
            delay_ms = self.delay.as_millis() as u64,
            "simulating workflow call"
        );
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("simulated ({} ms)", self.delay.as_millis())
    }
}

/// Posts the form as `multipart/form-data` to an automation webhook.
pub struct WebhookWorkflow {
    http: reqwest::Client,
    url: Url,
}

impl WebhookWorkflow {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, url })
    }

    async fn build_form(&self, request: &WorkflowRequest) -> Result<Form, SubmissionError> {
        let mut form = Form::new();
        for (name, value) in request.text_fields().as_pairs() {
            form = form.text(name, value);
        }

        for (field, file) in request.files() {
            let bytes = read_file_bytes(field, file).await?;
            let mut part = Part::bytes(bytes).file_name(file.name.clone());
            if let Some(mime) = file.mime.clone().or_else(|| guess_mime(&file.name)) {
                part = part
                    .mime_str(&mime)
                    .map_err(|err| SubmissionError::InvalidPayload(format!("{field}: {err}")))?;
            }
            form = form.part(field.key(), part);
        }

        Ok(form)
    }
}

#[async_trait]
impl WorkflowSubmitter for WebhookWorkflow {
    async fn submit(&self, request: &WorkflowRequest) -> Result<(), SubmissionError> {
        let form = self.build_form(request).await?;
        debug!(submission_id = %request.submission_id, url = %self.url, "posting workflow request");

        let response = self
            .http
            .post(self.url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    SubmissionError::Timeout
                } else {
                    SubmissionError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                submission_id = %request.submission_id,
                status = status.as_u16(),
                "workflow webhook rejected submission"
            );
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
            });
        }

        info!(submission_id = %request.submission_id, status = status.as_u16(), "workflow accepted submission");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("webhook {}", self.url)
    }
}

/// Picks the webhook when a URL is configured, the simulation otherwise.
pub fn build_submitter(settings: &IntakeSettings) -> Result<Arc<dyn WorkflowSubmitter>> {
    let submitter: Arc<dyn WorkflowSubmitter> = match &settings.workflow_url {
        Some(url) => Arc::new(
            WebhookWorkflow::new(url.clone(), settings.request_timeout)
                .with_context(|| format!("failed to prepare workflow webhook {url}"))?,
        ),
        None => Arc::new(SimulatedWorkflow::new(settings.simulated_delay)),
    };
    info!(workflow = %submitter.describe(), "workflow submitter ready");
    Ok(submitter)
}
