use thiserror::Error;

/// Errors related to saved forms.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("form not found")]
    NotFound,

    #[error("invalid form: {0}")]
    Invalid(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by the form-building wizard.
///
/// The `Display` text is what the user sees in chat.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("There is no form in progress. Use /create-form to start one.")]
    NoDraft,

    #[error("That button belongs to an earlier step. Expected: {expected}.")]
    UnexpectedStep { expected: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error("The form already has a field named \"{0}\". Choose another name.")]
    DuplicateField(String),
}

/// Errors from the chat platform's Web API.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Transport failure (connect, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The API answered `ok: false` with this error code.
    #[error("slack api error: {0}")]
    Api(String),

    #[error("unexpected response: {0}")]
    Deserialization(String),
}

/// Errors while forwarding a submission to its submission URL.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("submission endpoint returned HTTP {status}")]
    Status { status: u16 },
}

/// Errors from repository operations (used by trait definitions in formbot-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("entity not found")]
    NotFound,
}

impl From<RepositoryError> for FormError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => FormError::NotFound,
            RepositoryError::Serialization(msg) => FormError::Serialization(msg),
            RepositoryError::Io(msg) => FormError::Storage(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wizard_error_display_is_user_facing() {
        assert_eq!(
            WizardError::NoDraft.to_string(),
            "There is no form in progress. Use /create-form to start one."
        );
        assert!(WizardError::DuplicateField("Email".to_string())
            .to_string()
            .contains("\"Email\""));
    }

    #[test]
    fn test_repository_error_into_form_error() {
        assert!(matches!(
            FormError::from(RepositoryError::NotFound),
            FormError::NotFound
        ));
        assert!(matches!(
            FormError::from(RepositoryError::Io("disk full".to_string())),
            FormError::Storage(msg) if msg == "disk full"
        ));
    }

    #[test]
    fn test_forward_error_display() {
        let err = ForwardError::Status { status: 502 };
        assert_eq!(err.to_string(), "submission endpoint returned HTTP 502");
    }
}
