//! Per-user draft registry.
//!
//! Uses `DashMap` for concurrent access from the request handlers without
//! locking the whole registry. Drafts live in memory only and are lost on
//! restart.

use dashmap::DashMap;

use formbot_types::error::WizardError;
use formbot_types::form::{Form, FormId};

use super::state::FormDraft;

/// Thread-safe map from Slack user id to that user's draft.
pub struct DraftRegistry {
    drafts: DashMap<String, FormDraft>,
}

impl DraftRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            drafts: DashMap::new(),
        }
    }

    /// Start a fresh draft for a user, discarding any draft in progress.
    pub fn start(&self, user_id: &str) -> FormId {
        let draft = FormDraft::new(user_id);
        let id = draft.id.clone();
        if let Some(previous) = self.drafts.insert(user_id.to_string(), draft) {
            tracing::info!(
                user_id,
                discarded_form_id = %previous.id,
                "replaced unfinished form draft"
            );
        }
        id
    }

    /// Apply a transition to the user's draft.
    ///
    /// The closure runs while the map shard is locked; it must not block.
    pub fn update<T>(
        &self,
        user_id: &str,
        f: impl FnOnce(&mut FormDraft) -> Result<T, WizardError>,
    ) -> Result<T, WizardError> {
        let mut draft = self.drafts.get_mut(user_id).ok_or(WizardError::NoDraft)?;
        f(draft.value_mut())
    }

    /// Remove the user's draft and turn it into a form.
    ///
    /// Fails without touching the draft if a field is still half-built or
    /// the details were never entered.
    pub fn finish(&self, user_id: &str) -> Result<Form, WizardError> {
        if let Some((_, draft)) = self.drafts.remove_if(user_id, |_, d| d.can_finish()) {
            return Ok(draft.into_form());
        }
        match self.drafts.get(user_id) {
            Some(draft) => Err(draft.finish_error()),
            None => Err(WizardError::NoDraft),
        }
    }

    /// Snapshot of a user's draft.
    pub fn get(&self, user_id: &str) -> Option<FormDraft> {
        self.drafts.get(user_id).map(|d| d.value().clone())
    }

    /// Number of drafts in progress.
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    /// Whether no drafts are in progress.
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

impl Default for DraftRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::state::WizardStep;
    use formbot_types::form::FieldType;

    fn fill_details(registry: &DraftRegistry, user: &str, title: &str) {
        registry
            .update(user, |d| {
                d.set_details(
                    Some(title.to_string()),
                    None,
                    Some("https://example.com".to_string()),
                )
            })
            .unwrap();
    }

    #[test]
    fn test_update_without_draft_is_no_draft() {
        let registry = DraftRegistry::new();
        let err = registry
            .update("U1", |d| d.choose_field_type(FieldType::Date))
            .unwrap_err();
        assert_eq!(err, WizardError::NoDraft);
    }

    #[test]
    fn test_drafts_are_isolated_per_user() {
        let registry = DraftRegistry::new();
        registry.start("U1");
        registry.start("U2");
        fill_details(&registry, "U1", "First");
        fill_details(&registry, "U2", "Second");

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("U1").unwrap().title, "First");
        assert_eq!(registry.get("U2").unwrap().title, "Second");
    }

    #[test]
    fn test_start_replaces_existing_draft() {
        let registry = DraftRegistry::new();
        let first = registry.start("U1");
        fill_details(&registry, "U1", "Old");
        let second = registry.start("U1");

        assert_ne!(first, second);
        let draft = registry.get("U1").unwrap();
        assert_eq!(draft.step, WizardStep::Details);
        assert!(draft.title.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_finish_removes_draft() {
        let registry = DraftRegistry::new();
        let id = registry.start("U1");
        fill_details(&registry, "U1", "Done");

        let form = registry.finish("U1").unwrap();
        assert_eq!(form.id, id);
        assert_eq!(form.title, "Done");
        assert!(registry.is_empty());
        assert_eq!(registry.finish("U1").unwrap_err(), WizardError::NoDraft);
    }

    #[test]
    fn test_finish_mid_field_keeps_draft() {
        let registry = DraftRegistry::new();
        registry.start("U1");
        fill_details(&registry, "U1", "Busy");
        registry
            .update("U1", |d| d.choose_field_type(FieldType::ShortText))
            .unwrap();

        let err = registry.finish("U1").unwrap_err();
        assert!(matches!(err, WizardError::UnexpectedStep { .. }));
        assert_eq!(registry.len(), 1);
    }
}
