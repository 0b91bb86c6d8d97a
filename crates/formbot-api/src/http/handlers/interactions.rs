//! POST /slack/interactions - interactivity endpoint (buttons, menus).

use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;

use formbot_types::slack::{InteractionForm, InteractionPayload};

use crate::http::error::AppError;
use crate::state::AppState;

/// Parse the `payload` field, acknowledge, and dispatch in the background.
pub async fn interaction(
    State(state): State<AppState>,
    Form(form): Form<InteractionForm>,
) -> Result<StatusCode, AppError> {
    let payload: InteractionPayload = serde_json::from_str(&form.payload)
        .map_err(|e| AppError::Validation(format!("invalid interaction payload: {e}")))?;

    let bot = Arc::clone(&state.bot);
    tokio::spawn(async move {
        bot.handle_interaction(payload).await;
    });

    Ok(StatusCode::OK)
}
