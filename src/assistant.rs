//! Code analysis helpers built on chat completions.
//!
//! Each [`AnalysisTask`] pairs a system prompt with a sampling temperature. The
//! assistant sends the source code as the user message and returns the model's reply
//! text.

use serde_json::Value;
use tracing::debug;

use crate::core::{ChatCompletionRequest, Message, XaiError};
use crate::provider::{XaiClient, constants::xai::DEFAULT_MODEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisTask {
    Documentation,
    Review,
    Tests,
    Refactoring,
    Bugs,
}

impl AnalysisTask {
    pub fn system_prompt(&self) -> &'static str {
        match self {
            AnalysisTask::Documentation => {
                "You are a technical documentation expert. Generate comprehensive documentation for the provided code."
            }
            AnalysisTask::Review => {
                "You are an expert code reviewer. Analyze the code for potential issues, best practices, and suggest improvements."
            }
            AnalysisTask::Tests => {
                "You are a testing expert. Generate comprehensive test cases including edge cases."
            }
            AnalysisTask::Refactoring => {
                "You are a refactoring expert. Suggest improvements to make the code more maintainable, efficient, and follow best practices."
            }
            AnalysisTask::Bugs => {
                "You are a debugging expert. Analyze the code for potential bugs, security issues, and runtime problems."
            }
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            AnalysisTask::Documentation => "Please document this code",
            AnalysisTask::Review => "Review this code",
            AnalysisTask::Tests => "Generate test cases for this code",
            AnalysisTask::Refactoring => "Suggest refactoring for this code",
            AnalysisTask::Bugs => "Find potential bugs in this code",
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            AnalysisTask::Documentation => 0.3,
            AnalysisTask::Review => 0.7,
            AnalysisTask::Tests => 0.5,
            AnalysisTask::Refactoring => 0.6,
            AnalysisTask::Bugs => 0.4,
        }
    }

    pub fn user_prompt(&self, code: &str) -> String {
        format!("{}:\n\n{code}", self.instruction())
    }
}

impl std::fmt::Display for AnalysisTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisTask::Documentation => write!(f, "documentation generation"),
            AnalysisTask::Review => write!(f, "code review"),
            AnalysisTask::Tests => write!(f, "test generation"),
            AnalysisTask::Refactoring => write!(f, "refactoring suggestion"),
            AnalysisTask::Bugs => write!(f, "bug finding"),
        }
    }
}

/// Result of [`DevAssistant::improve`].
#[derive(Debug, Clone, PartialEq)]
pub struct CodeReport {
    pub documentation: String,
    pub issues: String,
    pub improvements: String,
}

pub struct DevAssistant {
    client: XaiClient,
    model: String,
}

impl DevAssistant {
    pub fn new(client: XaiClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn client(&self) -> &XaiClient {
        &self.client
    }

    pub fn request_for(&self, task: AnalysisTask, code: &str) -> ChatCompletionRequest {
        ChatCompletionRequest::new(
            self.model.clone(),
            vec![
                Message::system(task.system_prompt()),
                Message::user(task.user_prompt(code)),
            ],
        )
        .temperature(task.temperature())
    }

    #[tracing::instrument(name = "analyze", skip(self, code), fields(model = %self.model))]
    pub async fn analyze(&self, task: AnalysisTask, code: &str) -> Result<String, XaiError> {
        let request = self.request_for(task, code);

        let result = self
            .client
            .create_chat_completion(&request)
            .await
            .and_then(|response| reply_text(&response));

        // Reporting is left to the caller, which gets the error back.
        if let Err(ref e) = result {
            debug!(%task, error = %e, "analysis failed");
        }
        result
    }

    pub async fn generate_documentation(&self, code: &str) -> Result<String, XaiError> {
        self.analyze(AnalysisTask::Documentation, code).await
    }

    pub async fn review_code(&self, code: &str) -> Result<String, XaiError> {
        self.analyze(AnalysisTask::Review, code).await
    }

    pub async fn generate_tests(&self, code: &str) -> Result<String, XaiError> {
        self.analyze(AnalysisTask::Tests, code).await
    }

    pub async fn suggest_refactoring(&self, code: &str) -> Result<String, XaiError> {
        self.analyze(AnalysisTask::Refactoring, code).await
    }

    pub async fn find_bugs(&self, code: &str) -> Result<String, XaiError> {
        self.analyze(AnalysisTask::Bugs, code).await
    }

    /// Documentation, bug finding and refactoring, one after the other.
    pub async fn improve(&self, code: &str) -> Result<CodeReport, XaiError> {
        let documentation = self.generate_documentation(code).await?;
        let issues = self.find_bugs(code).await?;
        let improvements = self.suggest_refactoring(code).await?;

        Ok(CodeReport {
            documentation,
            issues,
            improvements,
        })
    }
}

/// Text of `choices[0].message.content` in a chat completion.
pub fn reply_text(response: &Value) -> Result<String, XaiError> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            XaiError::UnexpectedResponse(
                "chat completion has no choices[0].message.content".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::XaiConfig;
    use serde_json::json;

    fn assistant() -> DevAssistant {
        DevAssistant::new(XaiClient::new(XaiConfig::new("test-key")).unwrap())
    }

    #[test]
    fn request_pairs_system_prompt_with_code() {
        let request = assistant().request_for(AnalysisTask::Bugs, "fn main() {}");

        assert_eq!(request.model, "grok-2-mini");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0], Message::system(AnalysisTask::Bugs.system_prompt()));
        assert_eq!(
            request.messages[1].content,
            "Find potential bugs in this code:\n\nfn main() {}"
        );
        assert_eq!(request.temperature, Some(0.4));
    }

    #[test]
    fn with_model_overrides_default() {
        let assistant = assistant().with_model("grok-beta");
        let request = assistant.request_for(AnalysisTask::Review, "x");

        assert_eq!(request.model, "grok-beta");
        assert_eq!(request.temperature, Some(0.7));
    }

    #[test]
    fn reply_text_reads_first_choice() {
        let response = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Looks good." } },
                { "message": { "role": "assistant", "content": "Ignored." } }
            ]
        });
        assert_eq!(reply_text(&response).unwrap(), "Looks good.");
    }

    #[test]
    fn reply_text_without_choices_is_unexpected() {
        let err = reply_text(&json!({ "choices": [] })).unwrap_err();
        assert!(matches!(err, XaiError::UnexpectedResponse(_)));
    }
}
