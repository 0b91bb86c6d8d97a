//! Slack endpoint handlers.

pub mod commands;
pub mod interactions;
