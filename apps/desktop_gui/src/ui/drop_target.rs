//! File drop targets: click-to-browse via `rfd`, OS drag-and-drop routing by
//! pointer position.

use std::path::PathBuf;

use eframe::egui;
use intake_core::{
    file_ref_from_path,
    files::{guess_mime, human_readable_bytes},
    FormData, UploadPolicy, UploadRules,
};
use shared::domain::{FileRef, UploadEntry, UploadField};

pub fn field_title(field: UploadField) -> &'static str {
    match field {
        UploadField::BrandAsset => "Upload Brand Asset",
        UploadField::AvatarPicture => "Upload Avatar Picture",
    }
}

pub fn field_description(field: UploadField) -> &'static str {
    match field {
        UploadField::BrandAsset => {
            "Click to upload or drag and drop your brand logo, image, or document"
        }
        UploadField::AvatarPicture => "Click to upload or drag and drop your avatar (optional)",
    }
}

/// Screen rects of the drop targets painted in the last frame.
#[derive(Debug, Default)]
pub struct DropZones {
    zones: Vec<(UploadField, egui::Rect)>,
}

impl DropZones {
    pub fn clear(&mut self) {
        self.zones.clear();
    }

    pub fn record(&mut self, field: UploadField, rect: egui::Rect) {
        self.zones.retain(|(existing, _)| *existing != field);
        self.zones.push((field, rect));
    }

    pub fn target_at(&self, pos: egui::Pos2) -> Option<UploadField> {
        self.zones
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(field, _)| *field)
    }
}

/// Slot for a drop that arrived without a pointer position: the brand asset
/// while it is empty, the avatar otherwise.
pub fn fallback_field(form: &FormData) -> UploadField {
    if form.brand_asset.is_none() {
        UploadField::BrandAsset
    } else {
        UploadField::AvatarPicture
    }
}

/// Converts an OS drop payload into a [`FileRef`]. Native platforms hand over
/// a path; web-style payloads carry the bytes inline.
pub fn file_ref_from_dropped(dropped: &egui::DroppedFile) -> Result<FileRef, String> {
    if let Some(path) = &dropped.path {
        return file_ref_from_path(path).map_err(|err| err.to_string());
    }

    let Some(bytes) = dropped.bytes.clone() else {
        return Err(format!(
            "dropped file {:?} carried neither a path nor contents",
            dropped.name
        ));
    };
    let name = if dropped.name.trim().is_empty() {
        "upload.bin".to_string()
    } else {
        dropped.name.clone()
    };
    let mime = if dropped.mime.trim().is_empty() {
        guess_mime(&name).unwrap_or_default()
    } else {
        dropped.mime.clone()
    };
    Ok(FileRef::from_bytes(name, bytes).with_mime(mime))
}

/// Opens the native file dialog with the accept filter as its primary filter.
pub fn pick_file(field: UploadField, rules: &UploadRules) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new().set_title(field_title(field));
    if let Some(dir) = dirs::picture_dir().or_else(dirs::home_dir) {
        dialog = dialog.set_directory(dir);
    }

    let extensions = rules.accept.picker_extensions();
    if !extensions.is_empty() {
        dialog = dialog.add_filter(
            format!("Accepted files ({})", rules.accept.as_str()),
            extensions.as_slice(),
        );
    }
    if rules.policy == UploadPolicy::Advisory {
        dialog = dialog.add_filter("All files", &["*"]);
    }
    dialog.pick_file()
}

pub struct DropTargetView<'a> {
    pub field: UploadField,
    pub file: Option<&'a FileRef>,
    pub entry: Option<&'a UploadEntry>,
    pub files_hovering: bool,
}

/// Paints one drop target. The returned response is clickable over the whole
/// target.
pub fn drop_target(ui: &mut egui::Ui, view: DropTargetView<'_>) -> egui::Response {
    let id = ui.id().with(("drop_target", view.field.key()));
    let pointer = ui.ctx().input(|i| i.pointer.latest_pos());
    let visuals = ui.visuals().clone();

    let frame_response = egui::Frame::new()
        .fill(visuals.faint_bg_color)
        .corner_radius(10.0)
        .inner_margin(egui::Margin::same(14))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.set_min_height(86.0);
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(field_title(view.field))
                        .strong()
                        .size(16.0),
                );
                match view.file {
                    Some(file) => {
                        let caption = match file.size {
                            Some(size) => format!("{} ({})", file.name, human_readable_bytes(size)),
                            None => file.name.clone(),
                        };
                        ui.label(egui::RichText::new(caption).monospace());
                        ui.weak("Click to change file");
                    }
                    None => {
                        ui.weak(field_description(view.field));
                    }
                }
                if let Some(entry) = view.entry {
                    ui.colored_label(egui::Color32::from_rgb(72, 187, 120), &entry.message);
                }
            });
        });

    let rect = frame_response.response.rect;
    let hovered_by_drag =
        view.files_hovering && pointer.is_some_and(|pos| rect.contains(pos));
    let stroke_color = if hovered_by_drag {
        visuals.selection.stroke.color
    } else if view.files_hovering {
        visuals.widgets.hovered.bg_stroke.color
    } else {
        visuals.widgets.noninteractive.bg_stroke.color
    };
    let stroke_width = if view.files_hovering { 2.0 } else { 1.0 };
    ui.painter().rect_stroke(
        rect,
        10.0,
        egui::Stroke::new(stroke_width, stroke_color),
        egui::StrokeKind::Inside,
    );

    ui.interact(rect, id, egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
}
