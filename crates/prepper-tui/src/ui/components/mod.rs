//! Reusable UI components

pub mod confirm;
pub mod header;
pub mod status_bar;
