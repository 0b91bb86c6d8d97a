//! In-memory fakes of the port traits for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use serde_json::Value;

use formbot_types::block::SlackMessage;
use formbot_types::error::{ForwardError, PlatformError, RepositoryError};
use formbot_types::form::{Form, FormId};
use formbot_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};
use formbot_types::slack::{Channel, UserProfile};

use crate::llm::provider::LlmProvider;
use crate::platform::ChatPlatform;
use crate::repository::form::FormRepository;
use crate::submission::SubmissionSink;

/// Records every outbound message and serves canned lookups.
#[derive(Default)]
pub struct RecordingPlatform {
    pub posts: Mutex<Vec<(String, SlackMessage)>>,
    pub responses: Mutex<Vec<(String, SlackMessage, bool)>>,
    pub profiles: HashMap<String, UserProfile>,
    pub channels: Vec<Channel>,
    pub members: HashMap<String, Vec<String>>,
    /// Users whose DM channel cannot be opened.
    pub unreachable: HashSet<String>,
}

impl RecordingPlatform {
    pub fn with_profile(mut self, id: &str, name: &str, email: Option<&str>) -> Self {
        self.profiles.insert(
            id.to_string(),
            UserProfile {
                id: id.to_string(),
                name: name.to_string(),
                email: email.map(str::to_string),
            },
        );
        self
    }

    pub fn with_channel(mut self, id: &str, name: &str, members: &[&str]) -> Self {
        self.channels.push(Channel {
            id: id.to_string(),
            name: name.to_string(),
        });
        self.members.insert(
            id.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    pub fn with_unreachable(mut self, user_id: &str) -> Self {
        self.unreachable.insert(user_id.to_string());
        self
    }

    pub fn posts(&self) -> Vec<(String, SlackMessage)> {
        self.posts.lock().unwrap().clone()
    }

    pub fn responses(&self) -> Vec<(String, SlackMessage, bool)> {
        self.responses.lock().unwrap().clone()
    }

    /// Fallback text of every posted message, in order.
    pub fn posted_texts(&self) -> Vec<String> {
        self.posts()
            .into_iter()
            .map(|(_, m)| m.text.unwrap_or_default())
            .collect()
    }

    /// The last message posted to any channel.
    pub fn last_post(&self) -> SlackMessage {
        self.posts().last().map(|(_, m)| m.clone()).unwrap()
    }
}

impl ChatPlatform for RecordingPlatform {
    async fn post_message(&self, channel: &str, message: &SlackMessage) -> Result<(), PlatformError> {
        self.posts
            .lock()
            .unwrap()
            .push((channel.to_string(), message.clone()));
        Ok(())
    }

    async fn respond(
        &self,
        response_url: &str,
        message: &SlackMessage,
        ephemeral: bool,
    ) -> Result<(), PlatformError> {
        self.responses
            .lock()
            .unwrap()
            .push((response_url.to_string(), message.clone(), ephemeral));
        Ok(())
    }

    async fn user_profile(&self, user_id: &str) -> Result<UserProfile, PlatformError> {
        self.profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| PlatformError::Api("user_not_found".to_string()))
    }

    async fn list_channels(&self) -> Result<Vec<Channel>, PlatformError> {
        Ok(self.channels.clone())
    }

    async fn channel_members(&self, channel: &str) -> Result<Vec<String>, PlatformError> {
        self.members
            .get(channel)
            .cloned()
            .ok_or_else(|| PlatformError::Api("channel_not_found".to_string()))
    }

    async fn open_dm(&self, user_id: &str) -> Result<String, PlatformError> {
        if self.unreachable.contains(user_id) {
            return Err(PlatformError::Api("cannot_dm_bot".to_string()));
        }
        Ok(format!("D-{user_id}"))
    }
}

/// Forms kept in a vector.
#[derive(Default)]
pub struct MemoryRepository {
    pub forms: Mutex<Vec<Form>>,
    pub fail_saves: bool,
}

impl MemoryRepository {
    pub fn with_form(self, form: Form) -> Self {
        self.forms.lock().unwrap().push(form);
        self
    }

    pub fn saved(&self) -> Vec<Form> {
        self.forms.lock().unwrap().clone()
    }
}

impl FormRepository for MemoryRepository {
    async fn save(&self, form: &Form) -> Result<(), RepositoryError> {
        if self.fail_saves {
            return Err(RepositoryError::Io("disk full".to_string()));
        }
        let mut forms = self.forms.lock().unwrap();
        forms.retain(|f| f.id != form.id);
        forms.push(form.clone());
        Ok(())
    }

    async fn get(&self, id: &FormId) -> Result<Option<Form>, RepositoryError> {
        Ok(self.forms.lock().unwrap().iter().find(|f| &f.id == id).cloned())
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Form>, RepositoryError> {
        Ok(self
            .forms
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// Records forwarded payloads; optionally answers with an HTTP error.
#[derive(Default)]
pub struct RecordingSink {
    pub forwarded: Mutex<Vec<(String, Value)>>,
    pub fail_with: Option<u16>,
}

impl RecordingSink {
    pub fn forwarded(&self) -> Vec<(String, Value)> {
        self.forwarded.lock().unwrap().clone()
    }
}

impl SubmissionSink for RecordingSink {
    async fn forward(&self, url: &str, payload: &Value) -> Result<(), ForwardError> {
        self.forwarded
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        match self.fail_with {
            Some(status) => Err(ForwardError::Status { status }),
            None => Ok(()),
        }
    }
}

/// Answers every completion with a fixed reply, or fails.
pub struct ScriptedLlm {
    reply: Option<String>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Some(text) => Ok(CompletionResponse {
                id: "msg_test".to_string(),
                content: text.clone(),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            }),
            None => Err(LlmError::Overloaded("busy".to_string())),
        }
    }
}
