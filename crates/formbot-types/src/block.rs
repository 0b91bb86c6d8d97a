//! Slack Block Kit model.
//!
//! Only the subset of Block Kit the bot renders is modeled: section, input,
//! actions, context and divider blocks, plus the interactive elements used
//! by the wizard and by rendered forms. Serialization matches the Slack wire
//! shape (`{"type": "section", ...}`).

use serde::Serialize;

/// A text object (`plain_text` or `mrkdwn`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String },
    Mrkdwn { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        TextObject::PlainText { text: text.into() }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        TextObject::Mrkdwn { text: text.into() }
    }

    /// The raw text regardless of kind.
    pub fn text(&self) -> &str {
        match self {
            TextObject::PlainText { text } | TextObject::Mrkdwn { text } => text,
        }
    }
}

/// An option in a select menu or checkbox group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionObject {
    pub text: TextObject,
    pub value: String,
}

impl OptionObject {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: TextObject::plain(label),
            value: value.into(),
        }
    }
}

/// Visual style of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
    Danger,
}

/// Interactive block elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button {
        text: TextObject,
        action_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<ButtonStyle>,
    },
    StaticSelect {
        action_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<TextObject>,
        options: Vec<OptionObject>,
    },
    PlainTextInput {
        action_id: String,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        multiline: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<TextObject>,
    },
    Datepicker {
        action_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<TextObject>,
    },
    Checkboxes {
        action_id: String,
        options: Vec<OptionObject>,
    },
}

impl Element {
    /// A button with a plain-text label.
    pub fn button(
        label: impl Into<String>,
        action_id: impl Into<String>,
        style: Option<ButtonStyle>,
        value: Option<String>,
    ) -> Self {
        Element::Button {
            text: TextObject::plain(label),
            action_id: action_id.into(),
            value,
            style,
        }
    }

    /// A plain-text input, optionally multiline, with a placeholder.
    pub fn text_input(
        action_id: impl Into<String>,
        placeholder: Option<&str>,
        multiline: bool,
    ) -> Self {
        Element::PlainTextInput {
            action_id: action_id.into(),
            multiline,
            placeholder: placeholder.map(TextObject::plain),
        }
    }

    /// A static select menu.
    pub fn static_select(
        action_id: impl Into<String>,
        placeholder: &str,
        options: Vec<OptionObject>,
    ) -> Self {
        Element::StaticSelect {
            action_id: action_id.into(),
            placeholder: Some(TextObject::plain(placeholder)),
            options,
        }
    }

    /// The element's `action_id`.
    pub fn action_id(&self) -> &str {
        match self {
            Element::Button { action_id, .. }
            | Element::StaticSelect { action_id, .. }
            | Element::PlainTextInput { action_id, .. }
            | Element::Datepicker { action_id, .. }
            | Element::Checkboxes { action_id, .. } => action_id,
        }
    }
}

/// Layout blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<TextObject>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        fields: Vec<TextObject>,
    },
    Input {
        block_id: String,
        element: Element,
        label: TextObject,
    },
    Actions {
        #[serde(skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        elements: Vec<Element>,
    },
    Context {
        elements: Vec<TextObject>,
    },
    Divider,
}

impl Block {
    /// A section with a single mrkdwn text.
    pub fn markdown(text: impl Into<String>) -> Self {
        Block::Section {
            text: Some(TextObject::mrkdwn(text)),
            fields: Vec::new(),
        }
    }

    /// A section made of two-column fields (Slack allows at most 10).
    pub fn fields(fields: Vec<TextObject>) -> Self {
        Block::Section { text: None, fields }
    }

    /// An input block with a plain-text label.
    pub fn input(block_id: impl Into<String>, label: impl Into<String>, element: Element) -> Self {
        Block::Input {
            block_id: block_id.into(),
            element,
            label: TextObject::plain(label),
        }
    }

    /// An actions block without an explicit block id.
    pub fn actions(elements: Vec<Element>) -> Self {
        Block::Actions {
            block_id: None,
            elements,
        }
    }
}

/// An outbound chat message: fallback text, blocks, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlackMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

impl SlackMessage {
    /// A plain text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            blocks: Vec::new(),
        }
    }

    /// A block message without fallback text.
    pub fn blocks(blocks: Vec<Block>) -> Self {
        Self { text: None, blocks }
    }

    /// Attach fallback text used in notifications.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Every `action_id` present in the message's actions and input blocks.
    pub fn action_ids(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .flat_map(|b| match b {
                Block::Actions { elements, .. } => {
                    elements.iter().map(Element::action_id).collect::<Vec<_>>()
                }
                Block::Input { element, .. } => vec![element.action_id()],
                _ => Vec::new(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_serializes_to_slack_shape() {
        let json = serde_json::to_value(Block::markdown("*Hello*")).unwrap();
        assert_eq!(json["type"], "section");
        assert_eq!(json["text"]["type"], "mrkdwn");
        assert_eq!(json["text"]["text"], "*Hello*");
        assert!(json.get("fields").is_none());
    }

    #[test]
    fn test_divider_is_type_only() {
        let json = serde_json::to_value(Block::Divider).unwrap();
        assert_eq!(json, serde_json::json!({"type": "divider"}));
    }

    #[test]
    fn test_button_style_and_value() {
        let button = Element::button(
            "Submit",
            "submit_form",
            Some(ButtonStyle::Primary),
            Some("abc".to_string()),
        );
        let json = serde_json::to_value(&button).unwrap();
        assert_eq!(json["type"], "button");
        assert_eq!(json["style"], "primary");
        assert_eq!(json["value"], "abc");
        assert_eq!(json["text"]["type"], "plain_text");
    }

    #[test]
    fn test_text_input_omits_false_multiline() {
        let single = serde_json::to_value(Element::text_input("name", None, false)).unwrap();
        assert_eq!(single["type"], "plain_text_input");
        assert!(single.get("multiline").is_none());
        assert!(single.get("placeholder").is_none());

        let multi = serde_json::to_value(Element::text_input("bio", Some("Tell us"), true)).unwrap();
        assert_eq!(multi["multiline"], true);
        assert_eq!(multi["placeholder"]["text"], "Tell us");
    }

    #[test]
    fn test_datepicker_type_name() {
        let el = Element::Datepicker {
            action_id: "when".to_string(),
            placeholder: None,
        };
        assert_eq!(serde_json::to_value(&el).unwrap()["type"], "datepicker");
    }

    #[test]
    fn test_message_action_ids() {
        let msg = SlackMessage::blocks(vec![
            Block::input("a_input", "A", Element::text_input("a", None, false)),
            Block::actions(vec![
                Element::button("Yes", "yes", None, None),
                Element::button("No", "no", Some(ButtonStyle::Danger), None),
            ]),
            Block::Divider,
        ]);
        assert_eq!(msg.action_ids(), vec!["a", "yes", "no"]);
    }

    #[test]
    fn test_text_message_skips_blocks() {
        let json = serde_json::to_value(SlackMessage::text("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"text": "hi"}));
    }
}
