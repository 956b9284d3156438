//! Runtime bridge between UI command queue and the workflow submitter.

use std::thread;

use crossbeam_channel::{Receiver, Sender};
use intake_core::{build_submitter, IntakeSettings};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: IntakeSettings) {
    let startup_tx = ui_tx.clone();
    let spawned = thread::Builder::new()
        .name("intake-backend".to_string())
        .spawn(move || run(cmd_rx, ui_tx, settings));
    if let Err(err) = spawned {
        tracing::error!("failed to spawn backend thread: {err}");
        let _ = startup_tx.try_send(UiEvent::Error(UiError::new(
            UiErrorContext::BackendStartup,
            format!("failed to spawn backend thread: {err}"),
        )));
    }
}

fn run(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: IntakeSettings) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("failed to build backend runtime: {err}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                UiErrorContext::BackendStartup,
                format!("failed to build runtime: {err}"),
            )));
            return;
        }
    };

    let submitter = match build_submitter(&settings) {
        Ok(submitter) => submitter,
        Err(err) => {
            tracing::error!("failed to prepare workflow submitter: {err:#}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                UiErrorContext::BackendStartup,
                format!("{err:#}"),
            )));
            return;
        }
    };
    let _ = ui_tx.try_send(UiEvent::WorkflowReady(submitter.describe()));

    runtime.block_on(async move {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                BackendCommand::Submit(pending) => {
                    tracing::info!(
                        submission_id = %pending.id,
                        workflow = %submitter.describe(),
                        "backend: submit"
                    );
                    let result = submitter.submit(&pending.request).await;
                    if let Err(err) = &result {
                        tracing::warn!(submission_id = %pending.id, "workflow call failed: {err}");
                    }
                    if ui_tx
                        .try_send(UiEvent::SubmissionResolved {
                            id: pending.id,
                            result,
                        })
                        .is_err()
                    {
                        tracing::error!(submission_id = %pending.id, "ui event queue unavailable");
                    }
                }
            }
        }
        tracing::debug!("backend command queue closed");
    });
}
