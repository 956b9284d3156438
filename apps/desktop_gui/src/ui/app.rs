use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use intake_core::{file_ref_from_path, FormIntakeController, UploadRules};
use shared::domain::{FileRef, StatusMessage, TargetMood, UploadField};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::drop_target::{
    drop_target, fallback_field, field_title, file_ref_from_dropped, pick_file, DropTargetView,
    DropZones,
};

const APP_TITLE: &str = "AIavatar";
const APP_TAGLINE: &str =
    "Create professional brand videos with AI-powered avatars and advanced storytelling";

pub struct IntakeApp {
    controller: FormIntakeController,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    zones: DropZones,
    banner: Option<UiError>,
    workflow_label: Option<String>,
}

impl IntakeApp {
    pub fn new(
        rules: UploadRules,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup_error: Option<UiError>,
    ) -> Self {
        Self {
            controller: FormIntakeController::new(rules),
            cmd_tx,
            ui_rx,
            zones: DropZones::default(),
            banner: startup_error,
            workflow_label: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::WorkflowReady(description) => {
                    tracing::debug!(workflow = %description, "backend reported workflow");
                    self.workflow_label = Some(description);
                }
                UiEvent::Error(err) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    self.banner = Some(err);
                }
                UiEvent::SubmissionResolved { id, result } => {
                    self.controller.complete_submission(id, result);
                }
            }
        }
    }

    fn submit(&mut self) {
        let pending = match self.controller.begin_submission() {
            Ok(pending) => pending,
            Err(rejected) => {
                tracing::debug!("submit rejected: {rejected}");
                return;
            }
        };
        let id = pending.id;
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, BackendCommand::Submit(pending)) {
            self.controller.complete_submission(id, Err(err));
        }
    }

    fn accept_files(&mut self, field: UploadField, files: Vec<FileRef>) {
        if self.controller.receive_files(field, files) {
            self.banner = None;
        }
    }

    fn browse_for(&mut self, field: UploadField) {
        let Some(path) = pick_file(field, self.controller.rules()) else {
            return;
        };
        match file_ref_from_path(&path) {
            Ok(file) => self.accept_files(field, vec![file]),
            Err(err) => {
                self.banner = Some(UiError::new(UiErrorContext::FileSelection, err.to_string()));
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (dropped, pointer) =
            ctx.input(|i| (i.raw.dropped_files.clone(), i.pointer.latest_pos()));
        if dropped.is_empty() {
            return;
        }
        let field = match pointer {
            Some(pos) => match self.zones.target_at(pos) {
                Some(field) => field,
                None => {
                    tracing::debug!(count = dropped.len(), "drop landed outside the upload targets");
                    self.banner = Some(UiError::new(
                        UiErrorContext::FileSelection,
                        format!(
                            "drop the file onto \"{}\" or \"{}\"",
                            field_title(UploadField::BrandAsset),
                            field_title(UploadField::AvatarPicture)
                        ),
                    ));
                    return;
                }
            },
            None => {
                let field = fallback_field(self.controller.form());
                tracing::debug!(%field, "drop without pointer position");
                field
            }
        };

        // Only the first file matters; the rest are never inspected.
        match dropped.first().map(file_ref_from_dropped) {
            Some(Ok(file)) => {
                if dropped.len() > 1 {
                    tracing::debug!(%field, ignored = dropped.len() - 1, "keeping first dropped file");
                }
                self.accept_files(field, vec![file]);
            }
            Some(Err(message)) => {
                self.banner = Some(UiError::new(UiErrorContext::FileSelection, message));
            }
            None => {}
        }
    }

    fn show_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = &self.banner else {
            return;
        };
        let mut dismiss = false;
        egui::Frame::new()
            .fill(egui::Color32::from_rgb(90, 30, 34))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.colored_label(egui::Color32::WHITE, banner.banner_text());
                    if ui.small_button("Dismiss").clicked() {
                        dismiss = true;
                    }
                });
            });
        if dismiss {
            self.banner = None;
        }
        ui.add_space(8.0);
    }

    fn show_status_message(&self, ui: &mut egui::Ui) {
        let Some(message) = self.controller.status_message() else {
            return;
        };
        let (fill, text) = match message {
            StatusMessage::Info(_) => (
                egui::Color32::from_rgb(30, 58, 95),
                egui::Color32::from_rgb(191, 219, 254),
            ),
            StatusMessage::Success(_) => (
                egui::Color32::from_rgb(20, 70, 45),
                egui::Color32::from_rgb(187, 247, 208),
            ),
            StatusMessage::Error(_) => (
                egui::Color32::from_rgb(90, 30, 34),
                egui::Color32::from_rgb(254, 202, 202),
            ),
        };
        egui::Frame::new()
            .fill(fill)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(12, 10))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.colored_label(text, message.text());
            });
    }

    fn show_uploads(&mut self, ui: &mut egui::Ui) {
        let files_hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        self.zones.clear();

        let mut browse = None;
        for field in UploadField::ALL {
            let response = drop_target(
                ui,
                DropTargetView {
                    field,
                    file: self.controller.form().file(field),
                    entry: self.controller.upload_entry(field),
                    files_hovering,
                },
            );
            self.zones.record(field, response.rect);
            if response.clicked() {
                browse = Some(field);
            }
            ui.add_space(8.0);
        }

        if let Some(field) = browse {
            self.browse_for(field);
        }
    }

    fn show_inputs(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Campaign Brief *").strong());
        let mut brief = self.controller.form().campaign_brief.clone();
        let response = ui.add(
            egui::TextEdit::multiline(&mut brief)
                .id_salt("campaign_brief")
                .hint_text(
                    "Describe your brand story, campaign idea, or video concept. Include details \
                     about your target audience, key messaging, and desired outcomes...",
                )
                .desired_rows(5)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            self.controller.set_campaign_brief(brief);
        }

        ui.add_space(8.0);
        ui.label(egui::RichText::new("Target Mood").strong());
        let mut mood = self.controller.form().target_mood;
        egui::ComboBox::from_id_salt("target_mood")
            .selected_text(mood.label())
            .width(220.0)
            .show_ui(ui, |ui| {
                for option in TargetMood::ALL {
                    ui.selectable_value(&mut mood, option, option.label());
                }
            });
        if mood != self.controller.form().target_mood {
            self.controller.set_target_mood(mood);
        }
    }

    fn show_submit_row(&mut self, ui: &mut egui::Ui) {
        let submitting = self.controller.is_submitting();
        let mut clicked = false;
        ui.horizontal(|ui| {
            let label = if submitting {
                "Processing..."
            } else {
                "Create Brand Video"
            };
            let button = egui::Button::new(egui::RichText::new(label).strong().size(16.0))
                .min_size(egui::vec2(220.0, 40.0));
            clicked = ui.add_enabled(!submitting, button).clicked();
            if submitting {
                ui.spinner();
            }
        });

        if clicked && !submitting {
            self.submit();
        }

        if let Some(workflow) = &self.workflow_label {
            ui.add_space(4.0);
            ui.small(egui::RichText::new(format!("Workflow: {workflow}")).weak());
        }
    }
}

impl eframe::App for IntakeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.handle_dropped_files(ctx);

        // Consumed before the brief editor sees it, so Ctrl+Enter never inserts a newline.
        let shortcut = ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::Enter));
        if shortcut && !self.controller.is_submitting() {
            self.submit();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(egui::RichText::new(APP_TITLE).size(28.0).strong());
                    ui.weak(APP_TAGLINE);
                });
                ui.add_space(12.0);

                self.show_banner(ui);
                self.show_uploads(ui);
                ui.add_space(4.0);
                self.show_inputs(ui);
                ui.add_space(12.0);
                self.show_submit_row(ui);
                ui.add_space(10.0);
                self.show_status_message(ui);
            });
        });

        if self.controller.is_submitting() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
