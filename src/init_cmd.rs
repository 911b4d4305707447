//! Workspace scaffolding.
//!
//! Creates a fresh folio working directory: the `folio.toml` configuration,
//! a starter portfolio document, and the uploads directory. Existing files
//! are left untouched, so running `folio init` twice is safe.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config;
use crate::document::PortfolioDocument;

/// Configuration template written by `folio init` when none exists yet.
const CONFIG_TEMPLATE: &str = r#"# folio configuration
#
# Every key has a default; an empty file is a valid configuration.
# The [remote] section only matters when publishing with `--backend github`.

[data]
# The portfolio document and the directory for uploaded images.
file = "./content/portfolio.json"
uploads_dir = "./public/uploads"

[server]
# Bind address for the local admin service (`folio serve`).
bind = "127.0.0.1:5000"

[admin]
# Password checked by `folio login`, and how long a session lasts.
password = "admin123"
session_minutes = 10
# Where the session and publish token are stored.
state_file = "./.folio/state.json"

[remote]
# GitHub repository holding the published document.
# owner = "your-github-user"
# repo = "portfolio"
# branch = "main"
# path = "src/constants/portfolio-data.json"
# Direct URL for reads; defaults to raw.githubusercontent.com.
# asset_url = ""
"#;

/// Run the init command: scaffold config, starter document, and uploads dir.
pub fn run_init(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("Config already present: {}", config_path.display());
    } else {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(config_path, CONFIG_TEMPLATE)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!("Created {}", config_path.display());
    }

    let cfg = config::load_config(config_path)?;

    if cfg.data.file.exists() {
        println!("Data file already present: {}", cfg.data.file.display());
    } else {
        if let Some(parent) = cfg.data.file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let starter = serde_json::to_string_pretty(&PortfolioDocument::starter())
            .context("failed to encode the starter document")?;
        std::fs::write(&cfg.data.file, starter)
            .with_context(|| format!("failed to write {}", cfg.data.file.display()))?;
        println!(
            "Created {} with a starter portfolio",
            cfg.data.file.display()
        );
    }

    std::fs::create_dir_all(&cfg.data.uploads_dir)
        .with_context(|| format!("failed to create {}", cfg.data.uploads_dir.display()))?;
    println!("Uploads directory: {}", cfg.data.uploads_dir.display());

    println!();
    println!("Next steps:");
    println!("  folio serve                # start the local admin service");
    println!("  folio login <password>     # open an editing session");
    println!("  folio show                 # inspect the document");

    Ok(())
}
