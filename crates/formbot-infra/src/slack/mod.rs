//! Slack integration: the Web API client and request signature checks.

pub mod client;
pub mod signature;
pub mod types;

pub use client::SlackWebClient;
