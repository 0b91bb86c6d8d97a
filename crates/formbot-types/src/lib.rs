//! Shared domain types for formbot.
//!
//! This crate contains the types used across the workspace: forms and their
//! fields, the Slack Block Kit model, inbound Slack payloads, LLM request
//! shapes, configuration, and the error enums.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod block;
pub mod config;
pub mod error;
pub mod form;
pub mod llm;
pub mod slack;
