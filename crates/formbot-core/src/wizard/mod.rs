//! The form-building wizard.
//!
//! `FormDraft` holds the form under construction and its `WizardStep`;
//! `DraftRegistry` keeps one draft per Slack user so several people can
//! build forms at the same time.

pub mod registry;
pub mod state;

pub use registry::DraftRegistry;
pub use state::{FieldOutcome, FormDraft, OptionOutcome, WizardStep};
