//! UI layer for the desktop intake form: app shell and drop-target widgets.

pub mod app;
pub mod drop_target;

pub use app::IntakeApp;
