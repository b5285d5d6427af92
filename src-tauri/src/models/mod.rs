//! Data models for the pdf-unlocker application.
//!
//! Shared data structures used across layers: the selected file, toast and
//! form projections, and persisted settings.

pub mod file;
pub mod form;
pub mod settings;
