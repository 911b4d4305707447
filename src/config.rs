use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration, loaded from `folio.toml`.
///
/// Every section has sensible defaults, so an empty file (or one with only
/// the sections you care about) is valid. The `[remote]` section is only
/// required once the GitHub backend is actually used.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Where the document and uploaded images live on disk.
#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    #[serde(default = "default_data_file")]
    pub file: PathBuf,
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            file: default_data_file(),
            uploads_dir: default_uploads_dir(),
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./content/portfolio.json")
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("./public/uploads")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl ServerConfig {
    /// HTTP origin of the admin service, as clients address it.
    pub fn origin(&self) -> String {
        format!("http://{}", self.bind)
    }
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

/// Login secret and operator-state location.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default = "default_session_minutes")]
    pub session_minutes: i64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: default_password(),
            state_file: default_state_file(),
            session_minutes: default_session_minutes(),
        }
    }
}

fn default_password() -> String {
    "admin123".to_string()
}

fn default_state_file() -> PathBuf {
    PathBuf::from("./.folio/state.json")
}

fn default_session_minutes() -> i64 {
    10
}

/// Coordinates of the published document on GitHub.
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_remote_path")]
    pub path: String,
    /// Where the published document is fetched from. Defaults to the raw
    /// content URL derived from owner/repo/branch/path.
    #[serde(default)]
    pub asset_url: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            branch: default_branch(),
            path: default_remote_path(),
            asset_url: None,
        }
    }
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_remote_path() -> String {
    "src/constants/portfolio-data.json".to_string()
}

impl RemoteConfig {
    /// GitHub contents API URL for the document.
    pub fn contents_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/contents/{}",
            self.owner, self.repo, self.path
        )
    }

    /// URL the published document is readable from without credentials.
    pub fn asset_url(&self) -> String {
        match &self.asset_url {
            Some(url) => url.clone(),
            None => format!(
                "https://raw.githubusercontent.com/{}/{}/{}/{}",
                self.owner, self.repo, self.branch, self.path
            ),
        }
    }

    /// Error unless the section names a repository.
    pub fn ensure_configured(&self) -> Result<()> {
        if self.owner.is_empty() || self.repo.is_empty() {
            anyhow::bail!(
                "the github backend needs [remote] owner and repo set in the config file"
            );
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.server.bind.is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    if config.admin.session_minutes < 1 {
        anyhow::bail!("admin.session_minutes must be >= 1");
    }

    if config.admin.password.is_empty() {
        anyhow::bail!("admin.password must not be empty");
    }

    if config.data.file.as_os_str().is_empty() {
        anyhow::bail!("data.file must not be empty");
    }

    if config.remote.branch.is_empty() {
        anyhow::bail!("remote.branch must not be empty");
    }

    Ok(config)
}
