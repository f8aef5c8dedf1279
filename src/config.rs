// src/config.rs

use std::env;
use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. `None` runs the service on the in-process store.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub log_dir: String,
    /// Front-end origins allowed by CORS.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let log_dir = env::var("LOG_DIR")
            .unwrap_or_else(|_| "logs".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_else(|_| default_origins());

        Self {
            database_url,
            port,
            rust_log,
            log_dir,
            cors_origins,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            port: 5000,
            rust_log: "info".to_string(),
            log_dir: "logs".to_string(),
            cors_origins: default_origins(),
        }
    }
}

fn default_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
