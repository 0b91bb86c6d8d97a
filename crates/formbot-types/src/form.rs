use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for a saved form, wrapping a random UUID v4.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormId(pub Uuid);

impl FormId {
    /// Create a new random FormId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a FormId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for FormId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FormId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// The kinds of field a form can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    ShortText,
    LongText,
    MultipleChoice,
    Checkbox,
    Date,
}

impl FieldType {
    /// Every field type, in the order the type menu offers them.
    pub const ALL: [FieldType; 5] = [
        FieldType::ShortText,
        FieldType::LongText,
        FieldType::MultipleChoice,
        FieldType::Checkbox,
        FieldType::Date,
    ];

    /// Human-readable label shown in menus.
    pub fn label(&self) -> &'static str {
        match self {
            FieldType::ShortText => "Short text",
            FieldType::LongText => "Long text",
            FieldType::MultipleChoice => "Multiple choice",
            FieldType::Checkbox => "Checkbox",
            FieldType::Date => "Date",
        }
    }

    /// Stable machine value (matches the serialized form).
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::ShortText => "short_text",
            FieldType::LongText => "long_text",
            FieldType::MultipleChoice => "multiple_choice",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "short_text" => Ok(FieldType::ShortText),
            "long_text" => Ok(FieldType::LongText),
            "multiple_choice" => Ok(FieldType::MultipleChoice),
            "checkbox" => Ok(FieldType::Checkbox),
            "date" => Ok(FieldType::Date),
            other => Err(format!("invalid field type: '{other}'")),
        }
    }
}

/// One question on a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub name: String,
    /// Choices for `multiple_choice` fields; empty for every other type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FormField {
    /// Key used as the Block Kit `action_id` when the form is rendered.
    pub fn key(&self) -> String {
        field_key(&self.name)
    }

    /// Block id of the input block rendered for this field.
    pub fn block_id(&self) -> String {
        format!("{}_input", self.key())
    }
}

/// A finished form definition, persisted as one JSON file.
///
/// The JSON keys are camelCase (`userId`, `submissionUrl`, ...) so files
/// written by earlier versions of the bot still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: FormId,
    /// Slack user id of the author. Listings are scoped to this user.
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
    /// Where completed submissions are POSTed as JSON.
    pub submission_url: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Form {
    /// File name the form is stored under: `form_{id}.json`.
    pub fn file_name(&self) -> String {
        form_file_name(&self.id)
    }

    /// Find a field by its rendered key.
    pub fn field_by_key(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key() == key)
    }
}

/// File name for a form id: `form_{id}.json`.
pub fn form_file_name(id: &FormId) -> String {
    format!("form_{id}.json")
}

/// Derive the Block Kit key for a field name.
///
/// Lowercases the name and replaces every space with an underscore.
///
/// ```
/// use formbot_types::form::field_key;
///
/// assert_eq!(field_key("Full Name"), "full_name");
/// assert_eq!(field_key("Email"), "email");
/// ```
pub fn field_key(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Derive the option value submitted for a multiple-choice label.
pub fn option_value(option: &str) -> String {
    field_key(option)
}

/// Recover a readable field name from a block id (`full_name_input` -> `full name`).
///
/// Used for answer blocks that do not match any field of the form.
pub fn name_from_block_id(block_id: &str) -> String {
    block_id
        .strip_suffix("_input")
        .unwrap_or(block_id)
        .replace('_', " ")
}
