//! Inbound Slack payloads and Slack directory records.
//!
//! Slash commands arrive form-encoded; interactions arrive as a JSON document
//! in the `payload` form field. Only the fields the bot reads are modeled and
//! everything else is ignored on deserialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A slash command invocation (`/create-form`, `/list-forms`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlashCommand {
    pub command: String,
    #[serde(default)]
    pub text: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    pub channel_id: String,
    #[serde(default)]
    pub response_url: String,
    #[serde(default)]
    pub trigger_id: String,
    #[serde(default)]
    pub team_id: String,
}

/// Form body of an interactivity request (`payload=<json>`).
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionForm {
    pub payload: String,
}

/// An interaction payload. Only `block_actions` is acted on.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionPayload {
    BlockActions(BlockActions),
    #[serde(other)]
    Unsupported,
}

/// A `block_actions` interaction: a button press or menu selection.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockActions {
    pub user: SlackUser,
    #[serde(default)]
    pub channel: Option<ChannelRef>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub state: Option<ActionState>,
    #[serde(default)]
    pub response_url: Option<String>,
}

impl BlockActions {
    /// The first (and in practice only) action of the interaction.
    pub fn action(&self) -> Option<&Action> {
        self.actions.first()
    }

    /// Input state of the message the action came from (empty when absent).
    pub fn values(&self) -> StateValues {
        self.state
            .as_ref()
            .map(|s| s.values.clone())
            .unwrap_or_default()
    }
}

/// The user who triggered an interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackUser {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl SlackUser {
    /// Best available handle: `username`, then legacy `name`, then the id.
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Channel reference inside an interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A single action inside a `block_actions` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Action {
    pub action_id: String,
    #[serde(default)]
    pub block_id: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub selected_option: Option<SelectedOption>,
    #[serde(default)]
    pub selected_date: Option<String>,
}

impl Action {
    /// Value of the selected menu option, if any.
    pub fn selected_value(&self) -> Option<&str> {
        self.selected_option.as_ref().map(|o| o.value.as_str())
    }

    /// Label of the selected menu option, if any.
    pub fn selected_label(&self) -> Option<&str> {
        self.selected_option.as_ref().map(|o| o.text.text.as_str())
    }
}

/// A chosen option of a select or checkbox group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectedOption {
    pub text: OptionText,
    pub value: String,
}

/// Text of a selected option. The `type`/`emoji` keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OptionText {
    pub text: String,
}

/// `state` object of a `block_actions` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionState {
    #[serde(default)]
    pub values: StateValues,
}

/// Input values keyed by `block_id`, then `action_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct StateValues(pub BTreeMap<String, BTreeMap<String, StateValue>>);

impl StateValues {
    /// Look up the value of one input element.
    pub fn get(&self, block_id: &str, action_id: &str) -> Option<&StateValue> {
        self.0.get(block_id).and_then(|b| b.get(action_id))
    }

    /// Text typed into a `plain_text_input`, trimmed. `None` when blank.
    pub fn text(&self, block_id: &str, action_id: &str) -> Option<String> {
        match self.get(block_id, action_id)? {
            StateValue::PlainTextInput { value } => value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            _ => None,
        }
    }

    /// Value of the option selected in a `static_select`.
    pub fn selected_value(&self, block_id: &str, action_id: &str) -> Option<&str> {
        match self.get(block_id, action_id)? {
            StateValue::StaticSelect { selected_option } => {
                selected_option.as_ref().map(|o| o.value.as_str())
            }
            _ => None,
        }
    }

    /// Iterate `(block_id, first element value)` pairs in block id order.
    pub fn blocks(&self) -> impl Iterator<Item = (&str, &StateValue)> {
        self.0
            .iter()
            .filter_map(|(block_id, elements)| {
                elements.values().next().map(|v| (block_id.as_str(), v))
            })
    }
}

/// The value of one input element in the message state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateValue {
    PlainTextInput {
        #[serde(default)]
        value: Option<String>,
    },
    StaticSelect {
        #[serde(default)]
        selected_option: Option<SelectedOption>,
    },
    Datepicker {
        #[serde(default)]
        selected_date: Option<String>,
    },
    Checkboxes {
        #[serde(default)]
        selected_options: Vec<SelectedOption>,
    },
    #[serde(other)]
    Unsupported,
}

impl StateValue {
    /// The answer text this value represents in a submission.
    ///
    /// Selects yield the option label, date pickers the ISO date, checkboxes
    /// `Yes`/`No`, text inputs their raw value. Missing values are empty.
    pub fn answer(&self) -> String {
        match self {
            StateValue::PlainTextInput { value } => value.clone().unwrap_or_default(),
            StateValue::StaticSelect { selected_option } => selected_option
                .as_ref()
                .map(|o| o.text.text.clone())
                .unwrap_or_default(),
            StateValue::Datepicker { selected_date } => {
                selected_date.clone().unwrap_or_default()
            }
            StateValue::Checkboxes { selected_options } => {
                if selected_options.is_empty() {
                    "No".to_string()
                } else {
                    "Yes".to_string()
                }
            }
            StateValue::Unsupported => String::new(),
        }
    }
}

/// A channel the bot can see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

/// Directory information about a workspace member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}
