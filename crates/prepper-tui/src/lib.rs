//! Prepper TUI Library
//!
//! Terminal client for ML Interview Prepper: a landing screen, a signed-in
//! dashboard with the idle-session countdown and the expiry warning dialog.

pub mod app;
pub mod identity;
pub mod report;
pub mod ui;

pub use app::App;
