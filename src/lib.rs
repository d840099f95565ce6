//! # xai-client
//!
//! Async client for the xAI HTTP API: chat and text completions, embeddings, image
//! generation and editing, model listing, and the function-call and code-edit
//! endpoints. Responses are returned as raw [`serde_json::Value`]s.
//!
//! Every call is a single request with its own timeout. Nothing is retried.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xai_client::{ChatCompletionRequest, Message, XaiClient, XaiConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = XaiClient::new(XaiConfig::new("xai-..."))?;
//!
//!     let response = client
//!         .create_chat_completion(
//!             &ChatCompletionRequest::new(
//!                 "grok-2-mini",
//!                 vec![Message::user("Share a fun fact about Rust.")],
//!             )
//!             .temperature(0.7),
//!         )
//!         .await?;
//!
//!     println!("{}", response["choices"][0]["message"]["content"]);
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! All failures are [`XaiError`]s. Match on the variant to tell validation problems,
//! timeouts, error statuses and transport failures apart.
//! [`XaiClient::check_connection`] is the exception: it reports `false` instead.

pub mod assistant;
pub mod core;
pub mod provider;

pub use assistant::{AnalysisTask, CodeReport, DevAssistant, reply_text};
pub use crate::core::{
    ChatCompletionRequest, ChatRole, CodeEditRequest, CompletionRequest, EmbeddingInput,
    EmbeddingRequest, FunctionDefinition, HttpClientConfig, ImageEditRequest, ImageRequest,
    Message, SseDecoder, Tool, ToolType, XaiError,
};
pub use provider::{XaiClient, XaiConfig};
