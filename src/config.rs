// src/config.rs

use std::env;
use dotenvy::dotenv;

/// A score at or above this advances an existing curriculum by one level.
pub const CURRICULUM_ADVANCE_SCORE: u32 = 80;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .map(|v| v.parse::<u16>())
            .transpose()
            .map_err(|e| format!("PORT must be a valid port: {}", e))?
            .unwrap_or(3000);

        Ok(Self {
            database_url,
            jwt_secret,
            rust_log,
            port,
        })
    }
}
