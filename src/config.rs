//! Process configuration, read once at startup from the environment.
//!
//! Every knob has a documented default and absence degrades rather than
//! crashes: a missing API key logs a warning and substitutes a placeholder
//! that will fail remote calls, not startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default public API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://public-api.linearb.io";

/// Placeholder used when no API key is configured. Remote calls made with
/// it will be rejected by the provider with an auth error.
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct Config {
    /// API credential sent as the `x-api-key` header.
    pub api_key: String,
    /// Base URL of the remote provider.
    pub base_url: String,
    /// Single fixed timeout applied to every outbound request.
    pub timeout: Duration,
    /// Log verbosity when `RUST_LOG` is not set.
    pub log_level: String,
    /// Location of the OpenAPI specification document.
    pub spec_path: PathBuf,
    /// Directory scanned for documentation files.
    pub docs_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables with defaults:
    ///
    /// - `LINEARB_API_KEY`: API credential (warns and uses a placeholder
    ///   when unset)
    /// - `LINEARB_BASE_URL`: provider base URL (default: public API)
    /// - `API_TIMEOUT`: request timeout in seconds (default: 30)
    /// - `LOG_LEVEL`: log verbosity (default: info)
    /// - `LINEARB_OPENAPI_PATH`: specification document (default:
    ///   `openAPI.json`)
    /// - `LINEARB_DOCS_DIR`: documentation directory (default: `docs`)
    pub fn from_env() -> Self {
        let api_key = match env::var("LINEARB_API_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                tracing::warn!(
                    "LINEARB_API_KEY environment variable not set; remote API calls will fail"
                );
                PLACEHOLDER_API_KEY.to_string()
            }
        };

        let timeout_secs = env::var("API_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| *v > 0.0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_key,
            base_url: env::var("LINEARB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs_f64(timeout_secs),
            log_level: env::var("LOG_LEVEL")
                .map(|v| v.to_lowercase())
                .unwrap_or_else(|_| "info".to_string()),
            spec_path: env::var("LINEARB_OPENAPI_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("openAPI.json")),
            docs_dir: env::var("LINEARB_DOCS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("docs")),
        }
    }
}
