//! FormDraft: the form being built and the step the wizard is on.
//!
//! Each transition method validates that the draft is on the step the
//! inbound action belongs to, applies the user's input, and advances the
//! step. Nothing here does IO or renders messages.

use chrono::{DateTime, Utc};
use url::Url;

use formbot_types::error::WizardError;
use formbot_types::form::{FieldType, Form, FormField, FormId, field_key, option_value};

/// Slack caps a static select at this many options.
pub const MAX_OPTIONS: usize = 100;
/// Slack caps an option's plain_text at this many characters.
pub const MAX_OPTION_CHARS: usize = 75;
/// Field keys become action_ids (255 chars) behind a `field_` prefix.
pub const MAX_FIELD_KEY_CHARS: usize = 249;
/// Payload keys added to every submission; a field may not shadow them.
pub const RESERVED_FIELD_NAMES: [&str; 3] = ["userName", "userEmail", "userSlackId"];

/// Where a draft is in the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStep {
    /// Waiting for title, description and submission URL.
    Details,
    /// Waiting for the next field's type.
    ChoosingFieldType,
    /// A type was chosen; waiting for the field's name.
    NamingField { field_type: FieldType },
    /// A multiple-choice field is collecting its options.
    CollectingOptions { field: FormField },
    /// A field was just added; waiting for "add another" or "finish".
    AddMoreOrFinish,
}

impl WizardStep {
    /// What the user is expected to do next, for error messages.
    pub fn expected_action(&self) -> &'static str {
        match self {
            WizardStep::Details => "fill in the title, description and submission URL",
            WizardStep::ChoosingFieldType => "choose a field type",
            WizardStep::NamingField { .. } => "name the field",
            WizardStep::CollectingOptions { .. } => "add options or finish them",
            WizardStep::AddMoreOrFinish => "add another field or finish the form",
        }
    }
}

/// Result of confirming a field's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// The field was added to the form.
    Added(FormField),
    /// A multiple-choice field now needs its options.
    NeedsOptions { name: String },
}

/// Result of submitting an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionOutcome {
    /// The option was appended; more may follow.
    Added(String),
    /// A blank option closed the list and the field was added.
    Finished(FormField),
}

/// A form under construction, owned by one Slack user.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    pub id: FormId,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub submission_url: String,
    pub fields: Vec<FormField>,
    pub step: WizardStep,
    pub started_at: DateTime<Utc>,
}

impl FormDraft {
    /// Create a fresh draft in the `Details` step.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            id: FormId::new(),
            user_id: user_id.into(),
            title: String::new(),
            description: String::new(),
            submission_url: String::new(),
            fields: Vec::new(),
            step: WizardStep::Details,
            started_at: Utc::now(),
        }
    }

    fn unexpected(&self) -> WizardError {
        WizardError::UnexpectedStep {
            expected: self.step.expected_action().to_string(),
        }
    }

    /// Record title, description and submission URL.
    pub fn set_details(
        &mut self,
        title: Option<String>,
        description: Option<String>,
        submission_url: Option<String>,
    ) -> Result<(), WizardError> {
        if self.step != WizardStep::Details {
            return Err(self.unexpected());
        }

        let title = title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| WizardError::InvalidInput("The form needs a title.".to_string()))?;
        let submission_url = submission_url.unwrap_or_default();
        validate_submission_url(&submission_url)?;

        self.title = title.trim().to_string();
        self.description = description.unwrap_or_default().trim().to_string();
        self.submission_url = submission_url.trim().to_string();
        self.step = WizardStep::ChoosingFieldType;
        Ok(())
    }

    /// Pick the type of the next field.
    ///
    /// Re-selecting while naming a field replaces the pending type.
    pub fn choose_field_type(&mut self, field_type: FieldType) -> Result<(), WizardError> {
        match self.step {
            WizardStep::ChoosingFieldType
            | WizardStep::AddMoreOrFinish
            | WizardStep::NamingField { .. } => {
                self.step = WizardStep::NamingField { field_type };
                Ok(())
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Confirm the pending field's name.
    ///
    /// `button_type` is the type carried by the confirm button; it must agree
    /// with the type the draft is waiting on.
    pub fn name_field(
        &mut self,
        button_type: Option<FieldType>,
        name: Option<String>,
    ) -> Result<FieldOutcome, WizardError> {
        let field_type = match &self.step {
            WizardStep::NamingField { field_type } => *field_type,
            _ => return Err(self.unexpected()),
        };
        if button_type.is_some_and(|t| t != field_type) {
            return Err(self.unexpected());
        }

        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| WizardError::InvalidInput("The field needs a name.".to_string()))?;
        let key = field_key(&name);
        if key.chars().count() > MAX_FIELD_KEY_CHARS {
            return Err(WizardError::InvalidInput(format!(
                "Field names are limited to {MAX_FIELD_KEY_CHARS} characters."
            )));
        }
        if RESERVED_FIELD_NAMES.contains(&name.as_str()) {
            return Err(WizardError::InvalidInput(format!(
                "\"{name}\" is reserved for the submitter's details. Pick another name."
            )));
        }
        if self.fields.iter().any(|f| f.key() == key) {
            return Err(WizardError::DuplicateField(name));
        }

        let field = FormField {
            field_type,
            name: name.clone(),
            options: Vec::new(),
        };

        if field_type == FieldType::MultipleChoice {
            self.step = WizardStep::CollectingOptions { field };
            Ok(FieldOutcome::NeedsOptions { name })
        } else {
            self.fields.push(field.clone());
            self.step = WizardStep::AddMoreOrFinish;
            Ok(FieldOutcome::Added(field))
        }
    }

    /// Append an option to the multiple-choice field being built.
    ///
    /// A blank option finishes the list once at least one option exists.
    pub fn add_option(&mut self, option: Option<String>) -> Result<OptionOutcome, WizardError> {
        let WizardStep::CollectingOptions { field } = &mut self.step else {
            return Err(self.unexpected());
        };

        match option.map(|o| o.trim().to_string()).filter(|o| !o.is_empty()) {
            Some(option) => {
                if option.chars().count() > MAX_OPTION_CHARS {
                    return Err(WizardError::InvalidInput(format!(
                        "Options are limited to {MAX_OPTION_CHARS} characters."
                    )));
                }
                if field.options.len() >= MAX_OPTIONS {
                    return Err(WizardError::InvalidInput(format!(
                        "A multiple choice field holds at most {MAX_OPTIONS} options. Send a blank option to finish."
                    )));
                }
                let value = option_value(&option);
                if field.options.iter().any(|o| option_value(o) == value) {
                    return Err(WizardError::InvalidInput(format!(
                        "The option \"{option}\" is already in the list."
                    )));
                }
                field.options.push(option.clone());
                Ok(OptionOutcome::Added(option))
            }
            None if field.options.is_empty() => Err(WizardError::InvalidInput(
                "Enter at least one option.".to_string(),
            )),
            None => self.finish_options().map(OptionOutcome::Finished),
        }
    }

    /// Close the option list and add the multiple-choice field to the form.
    pub fn finish_options(&mut self) -> Result<FormField, WizardError> {
        let field = match &self.step {
            WizardStep::CollectingOptions { field } if !field.options.is_empty() => field.clone(),
            WizardStep::CollectingOptions { .. } => {
                return Err(WizardError::InvalidInput(
                    "Enter at least one option.".to_string(),
                ));
            }
            _ => return Err(self.unexpected()),
        };

        self.fields.push(field.clone());
        self.step = WizardStep::AddMoreOrFinish;
        Ok(field)
    }

    /// Go back to choosing a field type after a field was added.
    pub fn request_another_field(&mut self) -> Result<(), WizardError> {
        match self.step {
            WizardStep::AddMoreOrFinish | WizardStep::ChoosingFieldType => {
                self.step = WizardStep::ChoosingFieldType;
                Ok(())
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Whether the draft may be turned into a form now.
    ///
    /// Details must be filled in and no field may be half-built.
    pub fn can_finish(&self) -> bool {
        matches!(
            self.step,
            WizardStep::AddMoreOrFinish | WizardStep::ChoosingFieldType
        )
    }

    /// Error explaining why `can_finish` is false.
    pub fn finish_error(&self) -> WizardError {
        self.unexpected()
    }

    /// Convert into the persisted form. Callers check `can_finish` first.
    pub fn into_form(self) -> Form {
        Form {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            fields: self.fields,
            submission_url: self.submission_url,
            created_at: Utc::now(),
        }
    }
}

/// Check that a submission URL is an absolute http(s) URL with a host.
pub fn validate_submission_url(url: &str) -> Result<(), WizardError> {
    let invalid = || {
        WizardError::InvalidInput(
            "The submission URL must be a full http:// or https:// address.".to_string(),
        )
    };

    let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    if !parsed.host_str().is_some_and(|host| !host.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}
