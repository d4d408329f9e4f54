use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub sqlite_path: String,
    pub db_pool_size: u32,
    pub cors_origin: String,
    /// Identity attached to every request until real authentication exists.
    pub default_user_id: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            sqlite_path: env::var("SQLITE_PATH")
                .unwrap_or_else(|_| "./data/moneybuddy.db".to_string()),
            db_pool_size: env::var("DB_POOL_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DB_POOL_SIZE must be a positive integer")?,
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            default_user_id: env::var("DEFAULT_USER_ID")
                .unwrap_or_else(|_| "dummy-user".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            sqlite_path: "./data/moneybuddy.db".to_string(),
            db_pool_size: 10,
            cors_origin: "http://localhost:3000".to_string(),
            default_user_id: "dummy-user".to_string(),
        }
    }
}
