//! In-memory `CompletionService` for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionParams, CompletionService, LlmError};

/// Records every prompt and answers `reply 1`, `reply 2`, ... in call order.
/// With `failing_on`, any prompt containing the marker gets a quota error instead.
#[derive(Default)]
pub struct FakeCompletions {
    calls: Mutex<Vec<(String, CompletionParams)>>,
    fail_marker: Option<&'static str>,
}

impl FakeCompletions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(marker: &'static str) -> Self {
        Self {
            fail_marker: Some(marker),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, CompletionParams)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for FakeCompletions {
    async fn complete(&self, prompt: &str, params: CompletionParams) -> Result<String, LlmError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((prompt.to_string(), params));
            calls.len()
        };

        match self.fail_marker {
            Some(marker) if prompt.contains(marker) => Err(LlmError::Api {
                status: 429,
                message: "You exceeded your current quota".to_string(),
            }),
            _ => Ok(format!("reply {n}")),
        }
    }
}
