//! actionloop - action-loop runtime for OpenAI-backed serverless actions
//!
//! Hosts a small set of independent, stateless actions (chat completion,
//! model listing, template rendering, greeting) behind the OpenWhisk
//! action-loop protocol.

pub mod actions;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod openai;
pub mod params;
pub mod response;
pub mod telemetry;
