//! Turning a completed form message into answers and a forwarding payload.
//!
//! `collect_answers` reads the Block Kit state of a rendered form;
//! `build_payload` shapes the JSON object POSTed to the form's submission
//! URL; `SubmissionSink` is the port that performs the POST.

use serde_json::{Map, Value};

use formbot_types::error::ForwardError;
use formbot_types::form::{Form, name_from_block_id};
use formbot_types::slack::StateValues;

use crate::wizard::state::RESERVED_FIELD_NAMES;

/// One answered field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Field name as the author typed it.
    pub name: String,
    pub value: String,
}

/// Port for delivering submission payloads to their endpoint.
pub trait SubmissionSink: Send + Sync {
    /// POST `payload` as JSON to `url`.
    fn forward(
        &self,
        url: &str,
        payload: &Value,
    ) -> impl std::future::Future<Output = Result<(), ForwardError>> + Send;
}

/// Read the answers of a rendered form out of the message state.
///
/// Fields come first, in form order, named as the author wrote them. Any
/// other block in the state is appended afterwards with a name recovered
/// from its block id.
pub fn collect_answers(form: &Form, values: &StateValues) -> Vec<Answer> {
    let mut answers: Vec<Answer> = form
        .fields
        .iter()
        .map(|field| Answer {
            name: field.name.clone(),
            value: values
                .get(&field.block_id(), &field.key())
                .map(|v| v.answer())
                .unwrap_or_default(),
        })
        .collect();

    let known: Vec<String> = form.fields.iter().map(|f| f.block_id()).collect();
    answers.extend(
        values
            .blocks()
            .filter(|(block_id, _)| !known.iter().any(|k| k.as_str() == *block_id))
            .map(|(block_id, value)| Answer {
                name: name_from_block_id(block_id),
                value: value.answer(),
            }),
    );

    answers
}

/// Build the JSON object forwarded to the submission URL.
///
/// One `name: value` entry per answer plus `userName`, `userEmail` (null
/// when unknown) and `userSlackId`.
pub fn build_payload(
    answers: &[Answer],
    user_name: &str,
    user_id: &str,
    email: Option<&str>,
) -> Value {
    let mut payload = Map::new();
    for answer in answers {
        if RESERVED_FIELD_NAMES.contains(&answer.name.as_str()) {
            tracing::warn!(field = %answer.name, "answer shadowed by submitter details");
        }
        payload.insert(answer.name.clone(), Value::String(answer.value.clone()));
    }
    payload.insert("userName".to_string(), Value::String(user_name.to_string()));
    payload.insert(
        "userEmail".to_string(),
        email.map_or(Value::Null, |e| Value::String(e.to_string())),
    );
    payload.insert("userSlackId".to_string(), Value::String(user_id.to_string()));
    Value::Object(payload)
}
