//! FormBot: dispatches slash commands and block actions.
//!
//! Every inbound Slack event ends up in `handle_command` or
//! `handle_interaction`. Both run after the HTTP layer has acknowledged the
//! request, so they never return errors: failures are logged and, where the
//! user should know, answered in chat.

use formbot_types::block::SlackMessage;
use formbot_types::config::LlmSettings;
use formbot_types::error::WizardError;
use formbot_types::form::{FieldType, Form, FormField, FormId};
use formbot_types::slack::{Action, BlockActions, InteractionPayload, SlashCommand};

use crate::broadcast;
use crate::invitation;
use crate::llm::provider::LlmProvider;
use crate::platform::ChatPlatform;
use crate::prompts::{self, ids};
use crate::repository::form::FormRepository;
use crate::submission::{self, SubmissionSink};
use crate::wizard::{DraftRegistry, FieldOutcome, OptionOutcome};

const NO_FORMS: &str = "You have no forms yet. Use /create-form to create one.";
const LIST_FAILED: &str = "An error occurred while retrieving the list of forms.";
const BROADCAST_FAILED: &str = "An error occurred while sending the form to the channel members.";

/// Where a reply to an event goes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplyTarget {
    Channel(String),
    ResponseUrl(String),
    Nowhere,
}

impl ReplyTarget {
    fn for_interaction(actions: &BlockActions) -> Self {
        if let Some(channel) = &actions.channel {
            ReplyTarget::Channel(channel.id.clone())
        } else if let Some(url) = &actions.response_url {
            ReplyTarget::ResponseUrl(url.clone())
        } else {
            ReplyTarget::Nowhere
        }
    }
}

/// The bot: wizard drafts plus the ports it talks through.
pub struct FormBot<R: FormRepository, P: ChatPlatform, S: SubmissionSink, L: LlmProvider> {
    forms: R,
    platform: P,
    sink: S,
    llm: Option<L>,
    llm_settings: LlmSettings,
    drafts: DraftRegistry,
}

impl<R: FormRepository, P: ChatPlatform, S: SubmissionSink, L: LlmProvider> FormBot<R, P, S, L> {
    /// Create a bot with no drafts in progress.
    ///
    /// Without an `llm`, channel broadcasts use the template invitation.
    pub fn new(forms: R, platform: P, sink: S, llm: Option<L>, llm_settings: LlmSettings) -> Self {
        Self {
            forms,
            platform,
            sink,
            llm,
            llm_settings,
            drafts: DraftRegistry::new(),
        }
    }

    pub fn drafts(&self) -> &DraftRegistry {
        &self.drafts
    }

    pub fn forms(&self) -> &R {
        &self.forms
    }

    // -----------------------------------------------------------------------
    // Slash commands
    // -----------------------------------------------------------------------

    /// Handle a slash command. Replies go to the command's channel.
    #[tracing::instrument(
        name = "handle_command",
        skip_all,
        fields(command = %command.command, user_id = %command.user_id)
    )]
    pub async fn handle_command(&self, command: SlashCommand) {
        let target = ReplyTarget::Channel(command.channel_id.clone());
        let user_id = command.user_id.as_str();

        let reply = match command.command.trim() {
            "/create-form" => {
                let form_id = self.drafts.start(user_id);
                tracing::info!(form_id = %form_id, "started form draft");
                prompts::details_prompt()
            }
            "/list-forms" => match self.forms.list_by_owner(user_id).await {
                Ok(forms) if forms.is_empty() => SlackMessage::text(NO_FORMS),
                Ok(forms) => prompts::form_list(&forms),
                Err(e) => {
                    tracing::error!(error = %e, "failed to list forms");
                    SlackMessage::text(LIST_FAILED)
                }
            },
            "/test-form" | "/run-form" => match self.forms.list_by_owner(user_id).await {
                Ok(forms) if forms.is_empty() => SlackMessage::text(NO_FORMS),
                Ok(forms) => prompts::run_form_picker(&forms),
                Err(e) => {
                    tracing::error!(error = %e, "failed to list forms");
                    SlackMessage::text(LIST_FAILED)
                }
            },
            "/run-form-on-channel" => self.broadcast_pickers(user_id).await,
            other => {
                tracing::debug!("unknown command");
                SlackMessage::text(format!("Unknown command: {other}"))
            }
        };

        self.reply(&target, &reply).await;
    }

    async fn broadcast_pickers(&self, user_id: &str) -> SlackMessage {
        let forms = match self.forms.list_by_owner(user_id).await {
            Ok(forms) if forms.is_empty() => return SlackMessage::text(NO_FORMS),
            Ok(forms) => forms,
            Err(e) => {
                tracing::error!(error = %e, "failed to list forms");
                return SlackMessage::text(LIST_FAILED);
            }
        };
        match self.platform.list_channels().await {
            Ok(channels) => prompts::broadcast_pickers(&forms, &channels),
            Err(e) => {
                tracing::error!(error = %e, "failed to list channels");
                SlackMessage::text("An error occurred while retrieving the list of forms or channels.")
            }
        }
    }

    // -----------------------------------------------------------------------
    // Interactions
    // -----------------------------------------------------------------------

    /// Handle an interaction payload by dispatching on its action id.
    pub async fn handle_interaction(&self, payload: InteractionPayload) {
        let InteractionPayload::BlockActions(actions) = payload else {
            tracing::debug!("ignoring unsupported interaction type");
            return;
        };
        let Some(action) = actions.action() else {
            tracing::debug!(user_id = %actions.user.id, "block_actions payload without actions");
            return;
        };

        tracing::info!(action_id = %action.action_id, user_id = %actions.user.id, "handling action");
        match action.action_id.as_str() {
            ids::CONTINUE_FORM_CREATION
            | ids::FIELD_TYPE_SELECT
            | ids::CONFIRM_FIELD
            | ids::ADD_OPTION
            | ids::FINISH_OPTIONS
            | ids::ADD_ANOTHER_FIELD => {
                let target = ReplyTarget::for_interaction(&actions);
                let reply = match self.wizard_step(&actions, action) {
                    Ok(prompt) => prompt,
                    Err(e) => {
                        tracing::debug!(error = %e, "wizard input rejected");
                        SlackMessage::text(e.to_string())
                    }
                };
                self.reply(&target, &reply).await;
            }
            ids::FINISH_FORM => self.finish_form(&actions).await,
            ids::SELECT_FORM_TO_RUN => self.run_form(&actions, action).await,
            ids::SUBMIT_FORM => self.submit_form(&actions, action).await,
            ids::SELECT_FORM_FOR_CHANNEL => self.form_selected_for_channel(&actions, action).await,
            ids::SELECT_CHANNEL_FOR_FORM => self.run_on_channel(&actions, action).await,
            other => tracing::debug!(action_id = other, "ignoring unknown action"),
        }
    }

    /// Apply one wizard transition and render the next prompt.
    fn wizard_step(&self, actions: &BlockActions, action: &Action) -> Result<SlackMessage, WizardError> {
        let user_id = actions.user.id.as_str();
        let values = actions.values();

        match action.action_id.as_str() {
            ids::CONTINUE_FORM_CREATION => {
                self.drafts.update(user_id, |draft| {
                    draft.set_details(
                        values.text(ids::TITLE_BLOCK, ids::TITLE_ACTION),
                        values.text(ids::DESCRIPTION_BLOCK, ids::DESCRIPTION_ACTION),
                        values.text(ids::SUBMISSION_URL_BLOCK, ids::SUBMISSION_URL_ACTION),
                    )
                })?;
                Ok(prompts::field_type_menu(true))
            }
            ids::FIELD_TYPE_SELECT => {
                let field_type = action
                    .selected_value()
                    .and_then(|v| v.parse::<FieldType>().ok())
                    .ok_or_else(|| WizardError::InvalidInput("Choose a field type.".to_string()))?;
                self.drafts
                    .update(user_id, |draft| draft.choose_field_type(field_type))?;
                Ok(prompts::with_notice(
                    format!("Field type: *{}*", field_type.label()),
                    prompts::field_name_prompt(field_type),
                ))
            }
            ids::CONFIRM_FIELD => {
                let button_type = action
                    .value
                    .as_deref()
                    .and_then(|v| v.parse::<FieldType>().ok());
                let name = values.text(ids::FIELD_NAME_BLOCK, ids::FIELD_NAME_ACTION);
                match self
                    .drafts
                    .update(user_id, |draft| draft.name_field(button_type, name))?
                {
                    FieldOutcome::Added(field) => Ok(field_added(&field)),
                    FieldOutcome::NeedsOptions { name } => Ok(prompts::first_option_prompt(&name)),
                }
            }
            ids::ADD_OPTION => {
                let option = values.text(ids::OPTION_BLOCK, ids::OPTION_ACTION);
                match self.drafts.update(user_id, |draft| draft.add_option(option))? {
                    OptionOutcome::Added(option) => Ok(prompts::with_notice(
                        format!("Option \"{option}\" added."),
                        prompts::next_option_prompt(),
                    )),
                    OptionOutcome::Finished(field) => Ok(field_added(&field)),
                }
            }
            ids::FINISH_OPTIONS => {
                let field = self.drafts.update(user_id, |draft| draft.finish_options())?;
                Ok(field_added(&field))
            }
            _ => {
                self.drafts
                    .update(user_id, |draft| draft.request_another_field())?;
                Ok(prompts::field_type_menu(false))
            }
        }
    }

    async fn finish_form(&self, actions: &BlockActions) {
        let target = ReplyTarget::for_interaction(actions);
        let form = match self.drafts.finish(&actions.user.id) {
            Ok(form) => form,
            Err(e) => {
                self.reply(&target, &SlackMessage::text(e.to_string())).await;
                return;
            }
        };

        let text = match self.forms.save(&form).await {
            Ok(()) => {
                tracing::info!(form_id = %form.id, fields = form.fields.len(), "saved form");
                format!(
                    "Form \"{}\" created! It has {} fields. Saved as {}. Use /run-form to run it.",
                    form.title,
                    form.fields.len(),
                    form.file_name()
                )
            }
            Err(e) => {
                tracing::error!(form_id = %form.id, error = %e, "failed to save form");
                format!(
                    "Form \"{}\" created with {} fields, but there was an error saving it to a file.",
                    form.title,
                    form.fields.len()
                )
            }
        };
        self.reply(&target, &SlackMessage::text(text)).await;
    }

    async fn run_form(&self, actions: &BlockActions, action: &Action) {
        let target = ReplyTarget::for_interaction(actions);
        let reply = match self.load_form(action.selected_value()).await {
            Some(form) => prompts::render_form(&form),
            None => SlackMessage::text("An error occurred while loading the selected form."),
        };
        self.reply(&target, &reply).await;
    }

    async fn submit_form(&self, actions: &BlockActions, action: &Action) {
        let target = ReplyTarget::for_interaction(actions);
        let Some(form) = self.load_form(action.value.as_deref()).await else {
            self.reply(
                &target,
                &SlackMessage::text("An error occurred while processing the form."),
            )
            .await;
            return;
        };

        let user = &actions.user;
        let email = match self.platform.user_profile(&user.id).await {
            Ok(profile) => profile.email,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "could not look up user email");
                None
            }
        };

        let answers = submission::collect_answers(&form, &actions.values());
        let summary = prompts::submission_summary(
            user.display_name(),
            &user.id,
            email.as_deref(),
            &answers,
        );
        self.reply(&target, &summary).await;

        let payload =
            submission::build_payload(&answers, user.display_name(), &user.id, email.as_deref());
        let text = match self.sink.forward(&form.submission_url, &payload).await {
            Ok(()) => {
                tracing::info!(form_id = %form.id, "forwarded submission");
                "Form data forwarded to the submission URL."
            }
            Err(e) => {
                tracing::error!(form_id = %form.id, error = %e, "failed to forward submission");
                "An error occurred while sending the data to the submission URL."
            }
        };
        self.reply(&target, &SlackMessage::text(text)).await;
    }

    async fn form_selected_for_channel(&self, actions: &BlockActions, action: &Action) {
        let label = action.selected_label().unwrap_or_default();
        self.respond_ephemeral(
            actions,
            SlackMessage::text(format!("Selected form: {label}. Now pick a channel.")),
        )
        .await;
    }

    async fn run_on_channel(&self, actions: &BlockActions, action: &Action) {
        let values = actions.values();
        let Some(form_id) =
            values.selected_value(ids::FORM_SELECTION_BLOCK, ids::SELECT_FORM_FOR_CHANNEL)
        else {
            self.respond_ephemeral(actions, SlackMessage::text("Please select a form first."))
                .await;
            return;
        };
        let Some(channel) = action.selected_value() else {
            tracing::debug!("channel selection without a value");
            return;
        };

        let Some(form) = self.load_form(Some(form_id)).await else {
            self.respond_ephemeral(actions, SlackMessage::text(BROADCAST_FAILED))
                .await;
            return;
        };
        let members = match self.platform.channel_members(channel).await {
            Ok(members) => members,
            Err(e) => {
                tracing::error!(channel, error = %e, "failed to list channel members");
                self.respond_ephemeral(actions, SlackMessage::text(BROADCAST_FAILED))
                    .await;
                return;
            }
        };

        let invitation =
            invitation::invitation_or_fallback(self.llm.as_ref(), &self.llm_settings, &form).await;
        let stats = broadcast::deliver_form(&self.platform, &form, &members, &invitation).await;
        self.respond_ephemeral(actions, prompts::broadcast_report(&form.title, &stats))
            .await;
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Load a form by the id carried in an action. Logs and returns `None`
    /// for a missing, malformed, or unreadable form.
    async fn load_form(&self, raw_id: Option<&str>) -> Option<Form> {
        let Some(id) = raw_id.and_then(|v| v.parse::<FormId>().ok()) else {
            tracing::warn!(raw_id, "action carried no valid form id");
            return None;
        };
        match self.forms.get(&id).await {
            Ok(Some(form)) => Some(form),
            Ok(None) => {
                tracing::warn!(form_id = %id, "form not found");
                None
            }
            Err(e) => {
                tracing::error!(form_id = %id, error = %e, "failed to load form");
                None
            }
        }
    }

    async fn reply(&self, target: &ReplyTarget, message: &SlackMessage) {
        let result = match target {
            ReplyTarget::Channel(channel) => self.platform.post_message(channel, message).await,
            ReplyTarget::ResponseUrl(url) => self.platform.respond(url, message, false).await,
            ReplyTarget::Nowhere => {
                tracing::warn!("no channel or response_url to reply to");
                return;
            }
        };
        if let Err(e) = result {
            tracing::error!(error = %e, "failed to send reply");
        }
    }

    /// Reply only to the acting user, through the `response_url`.
    async fn respond_ephemeral(&self, actions: &BlockActions, message: SlackMessage) {
        let Some(url) = &actions.response_url else {
            self.reply(&ReplyTarget::for_interaction(actions), &message)
                .await;
            return;
        };
        if let Err(e) = self.platform.respond(url, &message, true).await {
            tracing::error!(error = %e, "failed to send ephemeral response");
        }
    }
}

fn field_added(field: &FormField) -> SlackMessage {
    let notice = if field.options.is_empty() {
        format!(
            "Field \"{}\" ({}) added to the form.",
            field.name,
            field.field_type.label().to_lowercase()
        )
    } else {
        format!(
            "Multiple choice field \"{}\" added with {} options.",
            field.name,
            field.options.len()
        )
    };
    prompts::with_notice(notice, prompts::add_more_prompt())
}
