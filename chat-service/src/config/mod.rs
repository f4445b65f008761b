use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_GENAI_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_NEW_TOKENS: u32 = 200;
const DEFAULT_TRANSLATION_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub generative: GenerativeConfig,
    pub translation: TranslationConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerativeConfig {
    /// Which remote backend answers unmatched messages.
    pub backend: GenerativeBackend,
    pub huggingface: HuggingFaceConfig,
    pub gemini: GeminiConfig,
    pub timeout_secs: u64,
    pub max_new_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerativeBackend {
    HuggingFace,
    Gemini,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HuggingFaceConfig {
    /// `None` disables the backend without failing startup.
    pub api_token: Option<String>,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl ChatConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(ChatConfig {
            common: common_config,
            generative: GenerativeConfig {
                backend: get_env("GENAI_BACKEND", Some("huggingface"), is_prod)?.parse()?,
                huggingface: HuggingFaceConfig {
                    api_token: secret_env(&["HF_API_TOKEN"]),
                    model: get_env("HF_MODEL", Some("google/flan-t5-base"), is_prod)?,
                    api_base: get_env(
                        "HF_API_BASE",
                        Some("https://api-inference.huggingface.co"),
                        is_prod,
                    )?,
                },
                gemini: GeminiConfig {
                    api_key: secret_env(&["GEMINI_API_KEY", "GOOGLE_API_KEY"]),
                    model: get_env("GEMINI_MODEL", Some("gemini-2.0-flash"), is_prod)?,
                    api_base: get_env(
                        "GEMINI_API_BASE",
                        Some("https://generativelanguage.googleapis.com/v1beta"),
                        is_prod,
                    )?,
                },
                timeout_secs: parse_timeout(
                    &get_env(
                        "GENAI_TIMEOUT_SECS",
                        Some(&DEFAULT_GENAI_TIMEOUT_SECS.to_string()),
                        is_prod,
                    )?,
                    DEFAULT_GENAI_TIMEOUT_SECS,
                ),
                max_new_tokens: get_env(
                    "GENAI_MAX_NEW_TOKENS",
                    Some(&DEFAULT_MAX_NEW_TOKENS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_MAX_NEW_TOKENS),
            },
            translation: TranslationConfig {
                enabled: env::var("TRANSLATION_ENABLED")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .unwrap_or(true),
                endpoint: get_env(
                    "TRANSLATION_ENDPOINT",
                    Some("https://translate.googleapis.com/translate_a/single"),
                    is_prod,
                )?,
                timeout_secs: parse_timeout(
                    &get_env(
                        "TRANSLATION_TIMEOUT_SECS",
                        Some(&DEFAULT_TRANSLATION_TIMEOUT_SECS.to_string()),
                        is_prod,
                    )?,
                    DEFAULT_TRANSLATION_TIMEOUT_SECS,
                ),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(
                    &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
                ),
            },
        })
    }
}

impl GenerativeConfig {
    /// Never zero; a zero `reqwest` timeout fails every call.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl TranslationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl FromStr for GenerativeBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Ok(GenerativeBackend::HuggingFace),
            "gemini" | "google" => Ok(GenerativeBackend::Gemini),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "GENAI_BACKEND must be 'huggingface' or 'gemini', got '{}'",
                other
            ))),
        }
    }
}

/// First non-blank value among `keys`. Credentials are optional even in
/// production: a missing one only disables its backend.
fn secret_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Whole seconds; zero or unparseable values fall back to `default`.
fn parse_timeout(raw: &str, default: u64) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => secs,
        _ => {
            tracing::warn!(value = raw, default, "Invalid timeout, using default");
            default
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .map(str::to_string)
        .collect()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if let Some(def) = default {
                if is_prod {
                    tracing::debug!("{} not set in production, using default", key);
                }
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!(
            "huggingface".parse::<GenerativeBackend>().unwrap(),
            GenerativeBackend::HuggingFace
        );
        assert_eq!(
            " HF ".parse::<GenerativeBackend>().unwrap(),
            GenerativeBackend::HuggingFace
        );
        assert_eq!(
            "Gemini".parse::<GenerativeBackend>().unwrap(),
            GenerativeBackend::Gemini
        );
        assert!("openai".parse::<GenerativeBackend>().is_err());
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        assert_eq!(parse_timeout("0", DEFAULT_GENAI_TIMEOUT_SECS), 30);
        assert_eq!(parse_timeout("soon", DEFAULT_TRANSLATION_TIMEOUT_SECS), 10);
        assert_eq!(parse_timeout(" 5 ", DEFAULT_GENAI_TIMEOUT_SECS), 5);
    }

    #[test]
    fn test_timeout_is_never_zero() {
        let translation = TranslationConfig {
            enabled: true,
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout_secs: 0,
        };
        assert_eq!(translation.timeout(), Duration::from_secs(1));

        let generative = GenerativeConfig {
            backend: GenerativeBackend::HuggingFace,
            huggingface: HuggingFaceConfig {
                api_token: None,
                model: "google/flan-t5-base".to_string(),
                api_base: "http://127.0.0.1:9".to_string(),
            },
            gemini: GeminiConfig {
                api_key: None,
                model: "gemini-2.0-flash".to_string(),
                api_base: "http://127.0.0.1:9".to_string(),
            },
            timeout_secs: 0,
            max_new_tokens: 200,
        };
        assert_eq!(generative.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_parse_origins() {
        assert!(parse_origins("").is_empty());
        assert!(parse_origins("*").is_empty());
        assert_eq!(
            parse_origins("https://a.example, https://b.example ,"),
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_secret_env_skips_blank_values() {
        std::env::set_var("CHAT_TEST_BLANK_SECRET", "   ");
        std::env::set_var("CHAT_TEST_REAL_SECRET", " token ");

        assert_eq!(secret_env(&["CHAT_TEST_BLANK_SECRET"]), None);
        assert_eq!(
            secret_env(&["CHAT_TEST_BLANK_SECRET", "CHAT_TEST_REAL_SECRET"]),
            Some("token".to_string())
        );
        assert_eq!(secret_env(&["CHAT_TEST_UNSET_SECRET"]), None);
    }

    #[test]
    fn test_get_env_default_and_missing() {
        assert_eq!(
            get_env("CHAT_TEST_UNSET_KEY", Some("fallback"), false).unwrap(),
            "fallback"
        );
        assert!(get_env("CHAT_TEST_UNSET_KEY", None, false).is_err());
    }
}
