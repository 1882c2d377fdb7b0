// Requirement processing: domain detection, prompt templates, role pipelines.
// All completion calls go through llm_client::CompletionService, never a concrete client.

pub mod comparison;
pub mod demo;
pub mod domain;
pub mod handlers;
pub mod pipeline;
pub mod processor;
pub mod role;
pub mod templates;
