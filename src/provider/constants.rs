pub mod xai {
    pub const API_BASE: &str = "https://api.x.ai/v1";
    pub const API_KEY_ENV_VAR: &str = "XAI_API_KEY";
    pub const BASE_URL_ENV_VAR: &str = "XAI_BASE_URL";
    pub const TIMEOUT_ENV_VAR: &str = "XAI_TIMEOUT_MS";
    pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
    pub const DEFAULT_MODEL: &str = "grok-2-mini";

    pub const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";
    pub const COMPLETIONS_ENDPOINT: &str = "/completions";
    pub const EMBEDDINGS_ENDPOINT: &str = "/embeddings";
    pub const IMAGE_GENERATIONS_ENDPOINT: &str = "/images/generations";
    pub const IMAGE_EDITS_ENDPOINT: &str = "/images/edits";
    pub const MODELS_ENDPOINT: &str = "/models";
    pub const API_KEY_ENDPOINT: &str = "/api-key";
    pub const FUNCTIONS_ENDPOINT: &str = "/functions";
    pub const CODE_EDIT_ENDPOINT: &str = "/code/edit";
    pub const CODE_APPLY_ENDPOINT: &str = "/code/apply";
    pub const HEALTH_ENDPOINT: &str = "/health";
}
