//! Runtime configuration shared through context.

const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Bounded retry used when a refresh does not yet reflect a confirmed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub toast_duration_ms: u64,
    pub search_debounce_ms: u64,
    pub max_audio_bytes: u64,
    pub allowed_audio_types: Vec<String>,
    pub refresh_retry: RetryPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api_base_url = option_env!("TRACKSHELF_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        Self {
            api_base_url,
            toast_duration_ms: 3000,
            search_debounce_ms: 500,
            max_audio_bytes: 10 * 1024 * 1024,
            allowed_audio_types: ["audio/mp3", "audio/wav", "audio/mpeg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            refresh_retry: RetryPolicy::default(),
        }
    }
}

impl AppConfig {
    /// URL of the static asset served for an attached audio file.
    pub fn audio_file_url(&self, audio_file: &str) -> String {
        format!(
            "{}/files/{}",
            self.api_base_url,
            urlencoding::encode(audio_file)
        )
    }
}
