//! Business logic services (use cases).
//!
//! Services orchestrate the wizard, the repository and the chat platform.
//! They depend on traits (ports), never on concrete infrastructure.

pub mod form_bot;
