pub const DEFAULT_API_URL: &str = "http://localhost:12434/engines/v1";
pub const DEFAULT_MODEL_NAME: &str = "ai/qwen3-coder";

#[derive(Debug, Clone)]
pub struct LLMConfig {
    pub api_url: String,
    pub model_name: String,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
        }
    }
}

impl LLMConfig {
    pub fn new(api_url: String, model_name: String) -> Self {
        Self { api_url, model_name }
    }

    /// Chat-completions endpoint under the configured base URL.
    /// Trailing slashes on the base are dropped so `http://x/` and `http://x` agree.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_strips_trailing_slash() {
        let with_slash = LLMConfig::new("http://x/".to_string(), "m".to_string());
        let without_slash = LLMConfig::new("http://x".to_string(), "m".to_string());

        assert_eq!(with_slash.completions_url(), "http://x/chat/completions");
        assert_eq!(without_slash.completions_url(), "http://x/chat/completions");
    }

    #[test]
    fn test_completions_url_strips_repeated_slashes() {
        let config = LLMConfig::new("http://x/engines/v1//".to_string(), "m".to_string());
        assert_eq!(config.completions_url(), "http://x/engines/v1/chat/completions");
    }

    #[test]
    fn test_default_config() {
        let config = LLMConfig::default();
        assert_eq!(config.api_url, "http://localhost:12434/engines/v1");
        assert_eq!(config.model_name, "ai/qwen3-coder");
        assert_eq!(
            config.completions_url(),
            "http://localhost:12434/engines/v1/chat/completions"
        );
    }
}
