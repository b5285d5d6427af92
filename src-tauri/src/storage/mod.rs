//! Local persistence layer.
//!
//! Only user settings are persisted, as a JSON document that is written to
//! disk immediately on save. Unlocked documents and passwords never are.

pub mod settings;
