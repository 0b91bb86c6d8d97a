//! Block Kit rendering for every message the bot sends.
//!
//! Wizard prompts, rendered forms, listings, pickers and summaries are all
//! pure functions from domain values to `SlackMessage`. The action and block
//! ids they embed are the ones `FormBot` dispatches on, collected in [`ids`].

use formbot_types::block::{Block, ButtonStyle, Element, OptionObject, SlackMessage, TextObject};
use formbot_types::form::{FieldType, Form, FormField, option_value};
use formbot_types::slack::Channel;

use crate::broadcast::BroadcastStats;
use crate::submission::Answer;

/// Action and block ids shared between rendering and dispatch.
pub mod ids {
    pub const CONTINUE_FORM_CREATION: &str = "continue_form_creation";
    pub const FIELD_TYPE_SELECT: &str = "field_type_select";
    pub const CONFIRM_FIELD: &str = "confirm_field";
    pub const ADD_OPTION: &str = "add_option";
    pub const FINISH_OPTIONS: &str = "finish_options";
    pub const ADD_ANOTHER_FIELD: &str = "add_another_field";
    pub const FINISH_FORM: &str = "finish_form";
    pub const SELECT_FORM_TO_RUN: &str = "select_form_to_run";
    pub const SUBMIT_FORM: &str = "submit_form";
    pub const SELECT_FORM_FOR_CHANNEL: &str = "select_form_for_channel";
    pub const SELECT_CHANNEL_FOR_FORM: &str = "select_channel_for_form";

    pub const TITLE_BLOCK: &str = "form_title_input";
    pub const TITLE_ACTION: &str = "form_title";
    pub const DESCRIPTION_BLOCK: &str = "form_description_input";
    pub const DESCRIPTION_ACTION: &str = "form_description";
    pub const SUBMISSION_URL_BLOCK: &str = "form_submission_url_input";
    pub const SUBMISSION_URL_ACTION: &str = "form_submission_url";
    pub const FIELD_NAME_BLOCK: &str = "field_name_input";
    pub const FIELD_NAME_ACTION: &str = "field_name";
    pub const OPTION_BLOCK: &str = "option_input";
    pub const OPTION_ACTION: &str = "option_value";
    pub const FORM_SELECTION_BLOCK: &str = "form_selection";
    pub const CHANNEL_SELECTION_BLOCK: &str = "channel_selection";
}

/// Slack rejects select menus with more than 100 options.
const MAX_SELECT_OPTIONS: usize = 100;

/// Slack rejects sections with more than 10 fields.
const MAX_SECTION_FIELDS: usize = 10;

/// Failure rows shown in a delivery report; a message holds 50 blocks.
const MAX_FAILURE_DETAILS: usize = 40;

/// Slack rejects empty plain-text objects.
const EMPTY_ANSWER: &str = "(empty)";

/// Prepend a notice section to a prompt and use it as the fallback text.
pub fn with_notice(notice: impl Into<String>, mut prompt: SlackMessage) -> SlackMessage {
    let notice = notice.into();
    prompt.blocks.insert(0, Block::markdown(notice.clone()));
    prompt.with_text(notice)
}

/// Step 1: title, description and submission URL.
pub fn details_prompt() -> SlackMessage {
    SlackMessage::blocks(vec![
        Block::input(
            ids::TITLE_BLOCK,
            "What is the form's title?",
            Element::text_input(ids::TITLE_ACTION, Some("e.g. Satisfaction survey"), false),
        ),
        Block::input(
            ids::DESCRIPTION_BLOCK,
            "Give a short description of the form",
            Element::text_input(
                ids::DESCRIPTION_ACTION,
                Some("e.g. This survey helps us improve our services"),
                true,
            ),
        ),
        Block::input(
            ids::SUBMISSION_URL_BLOCK,
            "Which URL should the answers be sent to?",
            Element::text_input(
                ids::SUBMISSION_URL_ACTION,
                Some("https://example.com/webhook"),
                false,
            ),
        ),
        Block::actions(vec![Element::button(
            "Continue",
            ids::CONTINUE_FORM_CREATION,
            Some(ButtonStyle::Primary),
            None,
        )]),
    ])
    .with_text("Let's build a new form.")
}

/// Menu of field types. `first` picks the wording for the first field.
pub fn field_type_menu(first: bool) -> SlackMessage {
    let question = if first {
        "Let's add fields to the form. What type of field do you want to add?"
    } else {
        "What type of field do you want to add now?"
    };
    let options = FieldType::ALL
        .iter()
        .map(|t| OptionObject::new(t.label(), t.as_str()))
        .collect();

    SlackMessage::blocks(vec![
        Block::markdown(question),
        Block::actions(vec![Element::static_select(
            ids::FIELD_TYPE_SELECT,
            "Select a field type",
            options,
        )]),
    ])
    .with_text(question)
}

/// Ask for the name of a field of the given type.
pub fn field_name_prompt(field_type: FieldType) -> SlackMessage {
    SlackMessage::blocks(vec![
        Block::input(
            ids::FIELD_NAME_BLOCK,
            "What is the name of this field?",
            Element::text_input(ids::FIELD_NAME_ACTION, Some("e.g. Full name"), false),
        ),
        Block::actions(vec![Element::button(
            "Confirm",
            ids::CONFIRM_FIELD,
            Some(ButtonStyle::Primary),
            Some(field_type.as_str().to_string()),
        )]),
    ])
    .with_text(format!("Name the new {} field.", field_type.label().to_lowercase()))
}

/// Ask for the first option of a multiple-choice field.
pub fn first_option_prompt(field_name: &str) -> SlackMessage {
    let question = format!(
        "Let's add options for the multiple choice field \"{field_name}\". What is the first option?"
    );
    SlackMessage::blocks(vec![
        Block::markdown(question.clone()),
        Block::input(
            ids::OPTION_BLOCK,
            "Enter an option",
            Element::text_input(ids::OPTION_ACTION, Some("e.g. Option 1"), false),
        ),
        Block::actions(vec![Element::button(
            "Add option",
            ids::ADD_OPTION,
            Some(ButtonStyle::Primary),
            None,
        )]),
    ])
    .with_text(question)
}

/// Ask for another option, or let the user finish the list.
pub fn next_option_prompt() -> SlackMessage {
    SlackMessage::blocks(vec![
        Block::markdown("Do you want to add another option?"),
        Block::input(
            ids::OPTION_BLOCK,
            "Enter another option (or leave it blank to finish)",
            Element::text_input(ids::OPTION_ACTION, Some("e.g. Option 2"), false),
        ),
        Block::actions(vec![
            Element::button("Add option", ids::ADD_OPTION, Some(ButtonStyle::Primary), None),
            Element::button(
                "Finish options",
                ids::FINISH_OPTIONS,
                Some(ButtonStyle::Danger),
                None,
            ),
        ]),
    ])
    .with_text("Do you want to add another option?")
}

/// Ask whether to add another field or save the form.
pub fn add_more_prompt() -> SlackMessage {
    SlackMessage::blocks(vec![
        Block::markdown("Do you want to add another field to the form?"),
        Block::actions(vec![
            Element::button(
                "Yes, add another field",
                ids::ADD_ANOTHER_FIELD,
                Some(ButtonStyle::Primary),
                None,
            ),
            Element::button(
                "No, finish the form",
                ids::FINISH_FORM,
                Some(ButtonStyle::Danger),
                None,
            ),
        ]),
    ])
    .with_text("Do you want to add another field to the form?")
}

/// Render a saved form so a user can fill it in.
pub fn render_form(form: &Form) -> SlackMessage {
    let mut blocks = vec![
        Block::markdown(format!("*{}*\n{}", form.title, form.description)),
        Block::Context {
            elements: vec![TextObject::mrkdwn(format!("*Form ID:* {}", form.id))],
        },
    ];
    blocks.extend(form.fields.iter().map(render_field));
    blocks.push(Block::actions(vec![Element::button(
        "Submit",
        ids::SUBMIT_FORM,
        Some(ButtonStyle::Primary),
        Some(form.id.to_string()),
    )]));

    SlackMessage::blocks(blocks).with_text(format!("Form: {}", form.title))
}

fn render_field(field: &FormField) -> Block {
    let key = field.key();
    let element = match field.field_type {
        FieldType::MultipleChoice => Element::static_select(
            key,
            "Select an option",
            field
                .options
                .iter()
                .take(MAX_SELECT_OPTIONS)
                .map(|o| OptionObject::new(o.as_str(), option_value(o)))
                .collect(),
        ),
        FieldType::Date => Element::Datepicker {
            action_id: key,
            placeholder: Some(TextObject::plain("Select a date")),
        },
        FieldType::Checkbox => Element::Checkboxes {
            action_id: key,
            options: vec![OptionObject::new(field.name.as_str(), "checked")],
        },
        FieldType::ShortText => Element::text_input(key, None, false),
        FieldType::LongText => Element::text_input(key, None, true),
    };
    Block::input(field.block_id(), field.name.as_str(), element)
}

/// `/list-forms` output.
pub fn form_list(forms: &[Form]) -> SlackMessage {
    let mut blocks = vec![Block::markdown("*Your forms:*")];
    blocks.extend(forms.iter().map(|form| {
        Block::markdown(format!(
            "*{}*\nID: {}\nDescription: {}\nFields: {}",
            form.title,
            form.id,
            form.description,
            form.fields.len()
        ))
    }));
    SlackMessage::blocks(blocks).with_text(format!("You have {} forms.", forms.len()))
}

fn form_options(forms: &[Form]) -> Vec<OptionObject> {
    forms
        .iter()
        .take(MAX_SELECT_OPTIONS)
        .map(|f| OptionObject::new(f.title.as_str(), f.id.to_string()))
        .collect()
}

/// Picker used by `/test-form` to choose a form to fill in.
pub fn run_form_picker(forms: &[Form]) -> SlackMessage {
    SlackMessage::blocks(vec![
        Block::markdown("Select the form you want to run:"),
        Block::actions(vec![Element::static_select(
            ids::SELECT_FORM_TO_RUN,
            "Select a form",
            form_options(forms),
        )]),
    ])
    .with_text("Select the form you want to run.")
}

/// Form and channel pickers used by `/run-form-on-channel`.
pub fn broadcast_pickers(forms: &[Form], channels: &[Channel]) -> SlackMessage {
    let channel_options = channels
        .iter()
        .take(MAX_SELECT_OPTIONS)
        .map(|c| OptionObject::new(c.name.as_str(), c.id.as_str()))
        .collect();

    SlackMessage::blocks(vec![
        Block::markdown("Select the form you want to run:"),
        Block::Actions {
            block_id: Some(ids::FORM_SELECTION_BLOCK.to_string()),
            elements: vec![Element::static_select(
                ids::SELECT_FORM_FOR_CHANNEL,
                "Select a form",
                form_options(forms),
            )],
        },
        Block::markdown("Select the channel where the form should run:"),
        Block::Actions {
            block_id: Some(ids::CHANNEL_SELECTION_BLOCK.to_string()),
            elements: vec![Element::static_select(
                ids::SELECT_CHANNEL_FOR_FORM,
                "Select a channel",
                channel_options,
            )],
        },
    ])
    .with_text("Select a form and a channel.")
}

/// Split two-column fields into sections of at most 10 fields each.
fn field_sections(fields: Vec<TextObject>) -> Vec<Block> {
    fields
        .chunks(MAX_SECTION_FIELDS)
        .map(|chunk| Block::fields(chunk.to_vec()))
        .collect()
}

/// Summary shown to a user after they submit a form.
pub fn submission_summary(
    user_name: &str,
    user_id: &str,
    email: Option<&str>,
    answers: &[Answer],
) -> SlackMessage {
    let user_info = vec![
        TextObject::mrkdwn("*User:*"),
        TextObject::plain(non_empty(user_name)),
        TextObject::mrkdwn("*ID:*"),
        TextObject::plain(non_empty(user_id)),
        TextObject::mrkdwn("*Email:*"),
        TextObject::plain(email.unwrap_or("Not available")),
    ];
    let responses = answers
        .iter()
        .flat_map(|a| {
            [
                TextObject::mrkdwn(format!("*{}:*", a.name)),
                TextObject::plain(non_empty(&a.value)),
            ]
        })
        .collect();

    let mut blocks = vec![
        Block::markdown("*Form submitted successfully*"),
        Block::markdown("*User information:*"),
        Block::fields(user_info),
        Block::markdown("*Responses:*"),
    ];
    blocks.extend(field_sections(responses));

    SlackMessage::blocks(blocks).with_text("Form submitted successfully")
}

fn non_empty(value: &str) -> &str {
    if value.trim().is_empty() {
        EMPTY_ANSWER
    } else {
        value
    }
}

/// Delivery statistics after running a form on a channel.
pub fn broadcast_report(form_title: &str, stats: &BroadcastStats) -> SlackMessage {
    let mut blocks = vec![
        Block::markdown(format!("*Delivery statistics for form \"{form_title}\"*")),
        Block::Divider,
        Block::fields(vec![
            TextObject::mrkdwn(format!("*Succeeded:*\n{}", stats.succeeded)),
            TextObject::mrkdwn(format!("*Failed:*\n{}", stats.failed)),
        ]),
        Block::Divider,
    ];

    if !stats.failures.is_empty() {
        blocks.push(Block::markdown("*Error details:*"));
        blocks.extend(stats.failures.iter().take(MAX_FAILURE_DETAILS).map(|failure| {
            Block::fields(vec![
                TextObject::mrkdwn(format!(
                    "*Email:* {}\n*ID:* {}",
                    failure.email.as_deref().unwrap_or("Not available"),
                    failure.user_id
                )),
                TextObject::mrkdwn(format!("*Reason:* {}", failure.reason)),
            ])
        }));
        let hidden = stats.failures.len().saturating_sub(MAX_FAILURE_DETAILS);
        if hidden > 0 {
            blocks.push(Block::markdown(format!("_…and {hidden} more failures._")));
        }
    }

    SlackMessage::blocks(blocks).with_text(format!(
        "Form \"{form_title}\" delivered: {} succeeded, {} failed.",
        stats.succeeded, stats.failed
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::DeliveryFailure;
    use chrono::Utc;
    use formbot_types::form::FormId;

    fn sample_form() -> Form {
        Form {
            id: FormId::new(),
            user_id: "U1".to_string(),
            title: "Team lunch".to_string(),
            description: "Pick your meal".to_string(),
            fields: vec![
                FormField {
                    field_type: FieldType::ShortText,
                    name: "Full Name".to_string(),
                    options: Vec::new(),
                },
                FormField {
                    field_type: FieldType::LongText,
                    name: "Allergies".to_string(),
                    options: Vec::new(),
                },
                FormField {
                    field_type: FieldType::MultipleChoice,
                    name: "Main Dish".to_string(),
                    options: vec!["Veggie Curry".to_string(), "Fish".to_string()],
                },
                FormField {
                    field_type: FieldType::Checkbox,
                    name: "Dessert".to_string(),
                    options: Vec::new(),
                },
                FormField {
                    field_type: FieldType::Date,
                    name: "Day".to_string(),
                    options: Vec::new(),
                },
            ],
            submission_url: "https://example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_details_prompt_ids() {
        let msg = details_prompt();
        assert_eq!(
            msg.action_ids(),
            vec![
                ids::TITLE_ACTION,
                ids::DESCRIPTION_ACTION,
                ids::SUBMISSION_URL_ACTION,
                ids::CONTINUE_FORM_CREATION
            ]
        );
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["blocks"][0]["block_id"], ids::TITLE_BLOCK);
        assert_eq!(json["blocks"][1]["element"]["multiline"], true);
    }

    #[test]
    fn test_field_type_menu_lists_all_types() {
        let json = serde_json::to_value(field_type_menu(true)).unwrap();
        let options = json["blocks"][1]["elements"][0]["options"].as_array().unwrap();
        let values: Vec<&str> = options.iter().map(|o| o["value"].as_str().unwrap()).collect();
        assert_eq!(
            values,
            vec!["short_text", "long_text", "multiple_choice", "checkbox", "date"]
        );
        assert_ne!(
            field_type_menu(true).text,
            field_type_menu(false).text
        );
    }

    #[test]
    fn test_field_name_prompt_carries_type() {
        let json = serde_json::to_value(field_name_prompt(FieldType::MultipleChoice)).unwrap();
        let button = &json["blocks"][1]["elements"][0];
        assert_eq!(button["action_id"], ids::CONFIRM_FIELD);
        assert_eq!(button["value"], "multiple_choice");
    }

    #[test]
    fn test_next_option_prompt_offers_finish() {
        assert_eq!(
            next_option_prompt().action_ids(),
            vec![ids::OPTION_ACTION, ids::ADD_OPTION, ids::FINISH_OPTIONS]
        );
        assert_eq!(
            first_option_prompt("Color").action_ids(),
            vec![ids::OPTION_ACTION, ids::ADD_OPTION]
        );
    }

    #[test]
    fn test_with_notice_prepends_section() {
        let msg = with_notice("Field added", add_more_prompt());
        assert_eq!(msg.text.as_deref(), Some("Field added"));
        assert_eq!(msg.blocks[0], Block::markdown("Field added"));
        assert_eq!(msg.blocks.len(), 3);
    }

    #[test]
    fn test_render_form_elements_per_field_type() {
        let form = sample_form();
        let json = serde_json::to_value(render_form(&form)).unwrap();
        let blocks = json["blocks"].as_array().unwrap();

        assert_eq!(blocks[0]["text"]["text"], "*Team lunch*\nPick your meal");
        assert_eq!(blocks[1]["type"], "context");

        assert_eq!(blocks[2]["block_id"], "full_name_input");
        assert_eq!(blocks[2]["element"]["type"], "plain_text_input");
        assert_eq!(blocks[2]["element"]["action_id"], "full_name");
        assert!(blocks[2]["element"].get("multiline").is_none());

        assert_eq!(blocks[3]["element"]["multiline"], true);

        assert_eq!(blocks[4]["element"]["type"], "static_select");
        assert_eq!(blocks[4]["element"]["options"][0]["value"], "veggie_curry");
        assert_eq!(blocks[4]["element"]["options"][0]["text"]["text"], "Veggie Curry");

        assert_eq!(blocks[5]["element"]["type"], "checkboxes");
        assert_eq!(blocks[5]["element"]["options"][0]["value"], "checked");
        assert_eq!(blocks[5]["element"]["options"][0]["text"]["text"], "Dessert");

        assert_eq!(blocks[6]["element"]["type"], "datepicker");
        assert_eq!(blocks[6]["label"]["text"], "Day");

        let submit = &blocks[7]["elements"][0];
        assert_eq!(submit["action_id"], ids::SUBMIT_FORM);
        assert_eq!(submit["value"], form.id.to_string());
    }

    #[test]
    fn test_form_list_has_section_per_form() {
        let form = sample_form();
        let msg = form_list(&[form.clone(), form]);
        assert_eq!(msg.blocks.len(), 3);
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json["blocks"][1]["text"]["text"]
            .as_str()
            .unwrap()
            .contains("Fields: 5"));
    }

    #[test]
    fn test_broadcast_pickers_block_ids() {
        let channels = vec![Channel {
            id: "C1".to_string(),
            name: "general".to_string(),
        }];
        let json = serde_json::to_value(broadcast_pickers(&[sample_form()], &channels)).unwrap();
        assert_eq!(json["blocks"][1]["block_id"], ids::FORM_SELECTION_BLOCK);
        assert_eq!(json["blocks"][3]["block_id"], ids::CHANNEL_SELECTION_BLOCK);
        assert_eq!(json["blocks"][3]["elements"][0]["options"][0]["value"], "C1");
    }

    #[test]
    fn test_pickers_cap_options() {
        let channels: Vec<Channel> = (0..150)
            .map(|i| Channel {
                id: format!("C{i}"),
                name: format!("chan-{i}"),
            })
            .collect();
        let json = serde_json::to_value(broadcast_pickers(&[sample_form()], &channels)).unwrap();
        let options = json["blocks"][3]["elements"][0]["options"].as_array().unwrap();
        assert_eq!(options.len(), MAX_SELECT_OPTIONS);
    }

    #[test]
    fn test_submission_summary_chunks_answers() {
        let answers: Vec<Answer> = (0..7)
            .map(|i| Answer {
                name: format!("Q{i}"),
                value: if i == 0 { String::new() } else { format!("A{i}") },
            })
            .collect();
        let msg = submission_summary("ana", "U1", None, &answers);
        let json = serde_json::to_value(&msg).unwrap();
        let blocks = json["blocks"].as_array().unwrap();

        // header, user heading, user fields, responses heading, 2 answer sections
        assert_eq!(blocks.len(), 6);
        assert_eq!(blocks[2]["fields"][5]["text"], "Not available");
        assert_eq!(blocks[4]["fields"].as_array().unwrap().len(), 10);
        assert_eq!(blocks[5]["fields"].as_array().unwrap().len(), 4);
        assert_eq!(blocks[4]["fields"][1]["text"], EMPTY_ANSWER);
    }

    #[test]
    fn test_broadcast_report_with_failures() {
        let stats = BroadcastStats {
            succeeded: 3,
            failed: 1,
            failures: vec![DeliveryFailure {
                user_id: "U9".to_string(),
                email: None,
                reason: "slack api error: cannot_dm_bot".to_string(),
            }],
        };
        let msg = broadcast_report("Team lunch", &stats);
        let json = serde_json::to_value(&msg).unwrap();
        let blocks = json["blocks"].as_array().unwrap();

        assert_eq!(blocks[2]["fields"][0]["text"], "*Succeeded:*\n3");
        assert_eq!(blocks[2]["fields"][1]["text"], "*Failed:*\n1");
        assert_eq!(blocks[4]["text"]["text"], "*Error details:*");
        assert!(blocks[5]["fields"][0]["text"]
            .as_str()
            .unwrap()
            .contains("U9"));
    }

    #[test]
    fn test_broadcast_report_without_failures() {
        let msg = broadcast_report("Team lunch", &BroadcastStats::default());
        assert_eq!(msg.blocks.len(), 4);
    }

    #[test]
    fn test_broadcast_report_caps_failure_details() {
        let failures: Vec<DeliveryFailure> = (0..60)
            .map(|i| DeliveryFailure {
                user_id: format!("U{i}"),
                email: Some(format!("user{i}@example.com")),
                reason: "slack api error: user_not_found".to_string(),
            })
            .collect();
        let stats = BroadcastStats {
            succeeded: 0,
            failed: failures.len(),
            failures,
        };

        let msg = broadcast_report("Team lunch", &stats);
        assert!(msg.blocks.len() <= 50);

        let json = serde_json::to_value(&msg).unwrap();
        let blocks = json["blocks"].as_array().unwrap();
        assert_eq!(blocks[2]["fields"][1]["text"], "*Failed:*\n60");
        let last = blocks.last().unwrap()["text"]["text"].as_str().unwrap();
        assert_eq!(last, "_…and 20 more failures._");
    }
}
