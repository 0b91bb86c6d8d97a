//! Business logic and port trait definitions for formbot.
//!
//! This crate holds the form-building wizard, the Block Kit rendering of
//! every prompt and form, submission handling, channel broadcasts, and the
//! `FormBot` dispatcher tying them together. It defines the "ports"
//! (repository, chat platform, submission sink, LLM provider) that
//! `formbot-infra` implements and never depends on any IO crate itself.

pub mod broadcast;
pub mod invitation;
pub mod llm;
pub mod platform;
pub mod prompts;
pub mod repository;
pub mod service;
pub mod submission;
pub mod wizard;

#[cfg(test)]
mod test_support;
