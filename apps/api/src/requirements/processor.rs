//! Requirement processors: the pluggable backend behind `POST /process`.
//!
//! `AppState` holds an `Arc<dyn RequirementProcessor>`, chosen at startup by `APP_MODE`:
//! `LiveProcessor` runs the completion pipelines, `DemoProcessor` returns canned text.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::llm_client::CompletionService;
use crate::requirements::comparison::{ab_test_comparison, BASELINE_SCORE, ENHANCED_SCORE};
use crate::requirements::domain::detect_domain;
use crate::requirements::pipeline::{
    generate_specification, generate_user_stories, validate, PipelineKind,
};
use crate::requirements::templates::TemplateStore;

/// The four text blocks returned for one requirement.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutput {
    pub technical_specification: String,
    pub user_stories: String,
    pub validation: String,
    /// Absent in demo mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ab_testing: Option<String>,
}

#[async_trait]
pub trait RequirementProcessor: Send + Sync {
    /// Never fails: pipeline errors are embedded in the documents they replace.
    async fn process(&self, requirement: &str) -> ProcessOutput;

    /// Short label reported by the health endpoint.
    fn mode(&self) -> &'static str;
}

/// Runs specification, stories and validation against a live completion service.
pub struct LiveProcessor {
    completions: Arc<dyn CompletionService>,
    templates: Arc<TemplateStore>,
}

impl LiveProcessor {
    pub fn new(completions: Arc<dyn CompletionService>, templates: Arc<TemplateStore>) -> Self {
        Self {
            completions,
            templates,
        }
    }
}

#[async_trait]
impl RequirementProcessor for LiveProcessor {
    async fn process(&self, requirement: &str) -> ProcessOutput {
        let completions = self.completions.as_ref();
        let templates = self.templates.as_ref();

        let domain = detect_domain(requirement);
        info!(
            "Processing requirement ({} chars), detected domain: {domain}",
            requirement.chars().count()
        );

        let technical_specification = PipelineKind::Specification.document(
            generate_specification(completions, templates, domain, requirement).await,
        );

        let user_stories = PipelineKind::Stories
            .document(generate_user_stories(completions, templates, requirement).await);

        // Validators see whatever the first two pipelines produced, error text included.
        let validation = PipelineKind::Validation.document(
            validate(completions, templates, &technical_specification, &user_stories).await,
        );

        ProcessOutput {
            technical_specification,
            user_stories,
            validation,
            ab_testing: Some(ab_test_comparison(BASELINE_SCORE, ENHANCED_SCORE)),
        }
    }

    fn mode(&self) -> &'static str {
        "live"
    }
}
