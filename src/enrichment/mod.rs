pub mod gemini;

pub use gemini::GeminiClient;

/// Default hosted model, matching what the lookup service was built against.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Settings for the hosted enrichment model.
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_seconds: u64,
}

impl EnrichmentConfig {
    /// Read the API key from `GEMINI_API_KEY`. The key may still be empty;
    /// client construction rejects that.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: Some(1024),
            temperature: Some(0.2),
            timeout_seconds: 30,
        }
    }
}
