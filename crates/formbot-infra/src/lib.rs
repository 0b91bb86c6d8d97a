//! Infrastructure layer for formbot.
//!
//! Implements the ports defined in `formbot-core`: JSON file storage for
//! forms, the Slack Web API client, the Anthropic invitation writer and the
//! HTTP submission forwarder. Also loads configuration and credentials.

pub mod config;
pub mod filesystem;
pub mod forward;
pub mod llm;
pub mod secret;
pub mod slack;
