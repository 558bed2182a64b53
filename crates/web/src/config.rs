use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    /// Base URL of the try-on generation API. When unset, try-on
    /// submissions are rejected with UNEXPECTED_STATE.
    pub tryon_api_url: Option<String>,
    pub tryon_api_key: Option<String>,
    pub file_storage_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            tryon_api_url: std::env::var("TRYON_API_URL").ok(),
            tryon_api_key: std::env::var("TRYON_API_KEY").ok(),
            file_storage_url: std::env::var("FILE_STORAGE_URL").ok(),
        })
    }
}
