//! POST /slack/commands - slash command endpoint.

use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;

use formbot_types::slack::SlashCommand;

use crate::state::AppState;

/// Acknowledge the command and handle it in the background.
///
/// Replies are posted through the Web API, so the ack body stays empty.
pub async fn slash_command(
    State(state): State<AppState>,
    Form(command): Form<SlashCommand>,
) -> StatusCode {
    tracing::debug!(command = %command.command, user_id = %command.user_id, "slash command received");

    let bot = Arc::clone(&state.bot);
    tokio::spawn(async move {
        bot.handle_command(command).await;
    });

    StatusCode::OK
}
