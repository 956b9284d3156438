//! UI/backend events and error modeling for the desktop form.

use shared::{domain::SubmissionId, error::SubmissionError};

pub enum UiEvent {
    WorkflowReady(String),
    Error(UiError),
    SubmissionResolved {
        id: SubmissionId,
        result: Result<(), SubmissionError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    FileSelection,
}

impl UiErrorContext {
    pub fn label(self) -> &'static str {
        match self {
            UiErrorContext::BackendStartup => "Backend startup",
            UiErrorContext::FileSelection => "File selection",
        }
    }
}

/// Problems outside the form lifecycle, shown in the dismissable banner.
#[derive(Debug, Clone)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn banner_text(&self) -> String {
        format!("{}: {}", self.context.label(), self.message)
    }
}
