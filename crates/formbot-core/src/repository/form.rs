//! Form repository trait definition.

use formbot_types::error::RepositoryError;
use formbot_types::form::{Form, FormId};

/// Repository trait for saved form definitions.
///
/// Implementations live in formbot-infra (e.g., JsonFormRepository).
pub trait FormRepository: Send + Sync {
    /// Persist a form, overwriting any previous version with the same id.
    fn save(
        &self,
        form: &Form,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Load a form by id. Returns `None` if it does not exist.
    fn get(
        &self,
        id: &FormId,
    ) -> impl std::future::Future<Output = Result<Option<Form>, RepositoryError>> + Send;

    /// List every form authored by the given Slack user, oldest first.
    fn list_by_owner(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Form>, RepositoryError>> + Send;
}
