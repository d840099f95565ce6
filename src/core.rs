pub mod error;
pub mod http;
pub mod sse;
pub mod types;

pub use error::XaiError;
pub use http::{HttpClient, HttpClientConfig};
pub use sse::SseDecoder;
pub use types::{
    ChatCompletionRequest, ChatRole, CodeEditRequest, CompletionRequest, EmbeddingInput,
    EmbeddingRequest, FunctionDefinition, ImageEditRequest, ImageRequest, Message, Tool, ToolType,
};
