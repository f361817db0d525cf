use std::env;
use std::path::PathBuf;

/// Runtime configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub media_root: PathBuf,
    /// Absolute URL prefix used when rewriting in-content media references.
    /// When unset, the per-request connection info is used instead.
    pub public_base_url: Option<String>,
    pub default_lang: String,
}

impl Config {
    pub fn from_env() -> Config {
        Config {
            host: env::var("HELPER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("HELPER_PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(8080),
            database_path: env::var("HELPER_DATABASE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("helper.sqlite")),
            media_root: env::var("HELPER_MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("media")),
            public_base_url: env::var("HELPER_BASE_URL").ok(),
            default_lang: env::var("HELPER_DEFAULT_LANG").unwrap_or_else(|_| "en".to_string()),
        }
    }
}
