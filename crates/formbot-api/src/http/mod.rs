//! HTTP layer: the Slack slash-command and interactivity endpoints.
//!
//! Every Slack route passes through signature verification, acknowledges
//! with 200 and handles the event in a spawned task.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
