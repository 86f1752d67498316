//! # tide-model
//!
//! Resilient client for the external language-model service.
//!
//! Wraps an OpenAI-compatible chat endpoint with bounded retries,
//! exponential backoff on rate limiting, and a one-shot reconnect-and-retry
//! on transport failure. The public contract is deliberately narrow:
//! [`ModelClient::call`] always yields a `String`; model output on
//! success, otherwise one of the fixed user-facing failure replies. Model
//! unavailability never re-raises past this crate.

mod client;
mod retry;

pub use client::ModelClient;
pub use retry::{FATAL_PREFIX, RATE_LIMITED_REPLY, RetryConfig, UNAVAILABLE_REPLY, is_failure_reply};
