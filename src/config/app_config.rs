// config/app_config.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Application settings read from Rocket's figment (`Rocket.toml`, then
/// `ROCKET_*` environment variables). The MongoDB URI lives under
/// `databases.market` and is consumed by `rocket_db_pools`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_name")]
    pub database_name: String,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    #[serde(default = "default_retain_uploads")]
    pub retain_uploads: bool,
    pub jwt_secret: String,
    #[serde(default = "default_session_hours")]
    pub session_hours: i64,
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
}

fn default_database_name() -> String {
    "produce_market".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_retain_uploads() -> bool {
    true
}

fn default_session_hours() -> i64 {
    12
}
