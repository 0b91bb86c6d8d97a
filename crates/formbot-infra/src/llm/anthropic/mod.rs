//! Anthropic Claude provider.
//!
//! [`AnthropicProvider`] implements the
//! [`LlmProvider`](formbot_core::llm::provider::LlmProvider) trait over the
//! non-streaming Messages API.

pub mod client;
pub mod types;

pub use client::AnthropicProvider;
