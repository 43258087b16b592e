//! Completion-service integration.
//!
//! [`traits`] defines the contract a completion service fulfils, [`openai`]
//! maps it onto the chat-completions wire format, and [`dispatch`] executes
//! the tool calls a service requests against a function registry.

#![warn(missing_docs, clippy::pedantic)]

pub mod dispatch;
pub mod openai;
pub mod traits;
