//! Chat-completion clients for hosted LLM backends.
//!
//! The crate covers exactly what the review service needs from an LLM:
//! pick a backend from the environment once at startup, then issue single
//! non-streaming chat completions against it.
//!
//! - [`config`] — model/provider configuration and env-driven selection
//! - [`services`] — thin `reqwest` clients per provider
//! - [`chat_model`] — the provider-agnostic [`chat_model::ChatModel`] seam
//! - [`error_handler`] — unified error types for the whole crate

pub mod chat_model;
pub mod config;
pub mod error_handler;
pub mod services;
