//! Business logic layer.
//!
//! The upload form controller plus the seams it composes: dropped-file
//! resolution, delivery of the unlocked document, and toast notifications.
//! Called by the `commands` layer and the CLI; delegates HTTP interactions to
//! the `api` layer.

pub mod delivery;
pub mod dropped_files;
pub mod form_slot;
pub mod notifier;
pub mod unlock_form;
