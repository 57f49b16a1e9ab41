use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    pub http: Http,
    pub log: Log,
    pub store: Store,
    #[serde(default)]
    pub admin: Option<Admin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Auth {
    pub backend: String, // "fake" or "real"
}

#[derive(Debug, Clone, Deserialize)]
pub struct Http {
    pub address: String,
    // TLS is enabled only when both paths are set
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Store {
    pub backend: String, // "memory" or "mysql"
    pub mysql_dsn: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Account created at startup when no user with this username exists yet.
#[derive(Clone, Deserialize)]
pub struct Admin {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Admin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Admin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn default_max_connections() -> u32 {
    10
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
