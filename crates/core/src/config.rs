//! Application configuration.
//!
//! Configuration is layered from `config/default.toml`, an environment file,
//! `config/local.toml`, and `APP__`-prefixed environment variables, then
//! passed into constructors explicitly. Nothing in the pipeline reads ambient
//! global state, which keeps the core testable with a mock client.

use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct VisionConfig {
    /// API key for the vision provider. May also come from `OPENAI_API_KEY`.
    pub api_key: Option<Secret<String>>,
    /// Model identifier.
    pub model: String,
    /// Base URL of the chat-completions API.
    pub base_url: String,
    /// Completion token cap per request.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum re-encoded image size in megabytes.
    pub max_file_size_mb: u64,
    /// Accepted file extensions, lowercase, without the dot.
    pub allowed_extensions: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("CROPSIGHT_ENV").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map APP__SERVER__PORT=8000 to app.server.port
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com/v1".into(),
            max_tokens: 500,
            temperature: 0.3,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
            allowed_extensions: vec![
                "jpg".into(),
                "jpeg".into(),
                "png".into(),
                "webp".into(),
            ],
        }
    }
}
