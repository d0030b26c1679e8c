use std::collections::HashSet;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub contacts: ContactsConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Contact store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactsConfig {
    /// Artificial latency of `DELETE /contacts/:id`, applied before the store is touched.
    #[serde(default = "default_delete_delay_ms")]
    pub delete_delay_ms: u64,
    /// Contacts inserted at startup, in order.
    #[serde(default = "default_seed")]
    pub seed: Vec<SeedContact>,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self { delete_delay_ms: default_delete_delay_ms(), seed: default_seed() }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SeedContact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    #[serde(default = "default_images_dir")]
    pub images_dir: String,
    #[serde(default = "default_css_dir")]
    pub css_dir: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self { images_dir: default_images_dir(), css_dir: default_css_dir() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3000 }
fn default_delete_delay_ms() -> u64 { 3000 }
fn default_images_dir() -> String { "images".into() }
fn default_css_dir() -> String { "css".into() }

fn default_seed() -> Vec<SeedContact> {
    vec![
        SeedContact { name: "John".into(), email: "jd@gmail.com".into() },
        SeedContact { name: "Clara".into(), email: "cd@gmail.com".into() },
    ]
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load from `CONFIG_PATH` (default `config.toml`), or fall back to
    /// defaults overridden by env vars when that file does not exist.
    pub fn load_or_env() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_or_env_from(&path)
    }

    /// Like `load_or_env` with an explicit path. Only a missing file falls
    /// back to env; unreadable or malformed files are errors.
    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => Self::from_env(),
            Err(e) => return Err(e.context(format!("failed to load {path}"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `SERVER_HOST`, `SERVER_PORT`, `TOKIO_WORKER_THREADS`
    /// and `DELETE_DELAY_MS` when set and parseable.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = env_parse::<u16>("SERVER_PORT") {
            cfg.server.port = port;
        }
        if let Some(w) = env_parse::<usize>("TOKIO_WORKER_THREADS") {
            cfg.server.worker_threads = Some(w);
        }
        if let Some(ms) = env_parse::<u64>("DELETE_DELAY_MS") {
            cfg.contacts.delete_delay_ms = ms;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.contacts.validate()?;
        self.assets.normalize();
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl ContactsConfig {
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for c in &self.seed {
            if !seen.insert(c.email.as_str()) {
                return Err(anyhow!("contacts.seed contains duplicate email {}", c.email));
            }
        }
        Ok(())
    }
}

impl AssetsConfig {
    fn normalize(&mut self) {
        if self.images_dir.trim().is_empty() {
            self.images_dir = default_images_dir();
        }
        if self.css_dir.trim().is_empty() {
            self.css_dir = default_css_dir();
        }
    }
}
