//! # folio CLI
//!
//! The `folio` binary manages a personal portfolio site's content: a single
//! JSON document of profile details, services, technologies, work
//! experience, projects, testimonials, and social links. It provides
//! commands for scaffolding a workspace, running the local admin service,
//! editing the document, and publishing it to the GitHub repository the
//! production site is built from.
//!
//! ## Usage
//!
//! ```bash
//! folio --config ./folio.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `folio init` | Scaffold config, a starter document, and the uploads dir |
//! | `folio serve` | Start the local admin HTTP service |
//! | `folio show [section]` | Render the document with icons resolved |
//! | `folio login <password>` | Start an admin editing session |
//! | `folio logout` | End the session |
//! | `folio status` | Report session and publish-token state |
//! | `folio token set <token>` | Store the GitHub credential |
//! | `folio append <target>` | Add a default entry to a collection |
//! | `folio remove <target> <index>` | Delete an entry from a collection |
//! | `folio set <path> <value>` | Edit one field by path |
//! | `folio upload <file>` | Upload an image, printing its URL |
//! | `folio icon <reference>` | Show how an icon reference resolves |
//!
//! ## Examples
//!
//! ```bash
//! # Scaffold a workspace and start the admin service
//! folio init
//! folio serve
//!
//! # Edit against the local service
//! folio login admin123
//! folio append projects
//! folio set "projects[0].name" "Weather Dashboard"
//! folio set "projects[0].tags[0].name" "react"
//! folio remove technologies 2
//!
//! # Publish to the production repository
//! folio token set ghp_xxxxxxxxxxxx
//! folio set "personal.heroTitle" "I build web apps" --backend github
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::document::Section;
use folio::store::Backend;
use folio::{auth, config, edit, init_cmd, server, show};

/// folio — a content manager for a personal portfolio site.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/folio.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "folio",
    about = "folio — edit and publish a personal portfolio site's content",
    version,
    long_about = "folio manages a portfolio site's content document: it runs the local \
    admin HTTP service the site's admin panel talks to, edits the document from the \
    command line, and publishes it by committing to the GitHub repository the \
    production site is built from."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./folio.toml`. Data paths, the admin password, and the
    /// GitHub repository coordinates are read from this file.
    #[arg(long, global = true, default_value = "./folio.toml")]
    config: PathBuf,

    /// Which store to read and write: `local` (the admin service) or
    /// `github` (the production repository).
    #[arg(long, global = true, default_value = "local")]
    backend: String,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Scaffold a folio workspace.
    ///
    /// Writes `folio.toml` (unless present), seeds the data file with a
    /// starter portfolio, and creates the uploads directory. Running it
    /// multiple times is safe.
    Init,

    /// Start the local admin HTTP service.
    ///
    /// Serves `GET/POST /api/data`, `POST /api/upload`, and `/uploads/*`
    /// on the address configured in `[server].bind`.
    Serve,

    /// Render the document, or one section of it.
    ///
    /// Icon references are resolved the way the site renders them: direct
    /// URLs pass through, bundled asset names map to their paths, and
    /// anything else is matched against the icon catalog.
    Show {
        /// Section to render: `nav`, `services`, `technologies`,
        /// `experiences`, `projects`, `testimonials`, or `socials`.
        /// Omit to render everything.
        section: Option<String>,
    },

    /// Start an admin editing session.
    ///
    /// Checks the password against `[admin].password` and stores a session
    /// that expires after `[admin].session_minutes`.
    Login {
        /// The admin password.
        password: String,
    },

    /// End the admin session.
    ///
    /// The stored publish token is kept.
    Logout,

    /// Report session, backend, and publish-token state.
    Status,

    /// Manage the GitHub publish token.
    ///
    /// Saves with `--backend github` need a token with write access to the
    /// production repository. The `FOLIO_GITHUB_TOKEN` environment variable
    /// is used as a fallback when none is stored.
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Append a default entry to a collection.
    ///
    /// Targets: a section name (`projects`, `technologies`, ...) or a
    /// nested list (`experiences[0].points`, `projects[1].tags`).
    Append {
        /// Collection to extend.
        target: String,
    },

    /// Remove the entry at an index from a collection.
    ///
    /// Later entries shift up. Targets take the same forms as `append`.
    Remove {
        /// Collection to shrink.
        target: String,

        /// Zero-based index of the entry to remove.
        index: usize,
    },

    /// Set one field of the document by path.
    ///
    /// Paths: `personal.<field>`, `<section>[<i>].<field>`,
    /// `experiences[<i>].points[<j>]`, or `projects[<i>].tags[<j>].<field>`.
    Set {
        /// Field path, e.g. `projects[0].name`.
        path: String,

        /// New value.
        value: String,
    },

    /// Upload an image and print the URL to reference it by.
    ///
    /// Only the local backend accepts uploads; the GitHub backend rejects
    /// them with a pointer back here.
    Upload {
        /// Path to the image file.
        file: PathBuf,
    },

    /// Show how an icon or image reference resolves.
    ///
    /// Useful for checking a value before putting it in an `icon` or
    /// `image` field.
    Icon {
        /// The reference string, e.g. `html`, `circle-help`, or a URL.
        reference: String,
    },
}

/// Publish-token subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Store the GitHub credential in the admin state file.
    Set {
        /// A token with write access to the production repository.
        token: String,
    },
    /// Remove the stored credential.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Init runs before a config file exists.
    if let Commands::Init = cli.command {
        init_cmd::run_init(&cli.config)?;
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;
    let backend: Backend = cli
        .backend
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    // Only the commands that open a store care whether [remote] is filled
    // in; `folio status --backend github` should still work on a fresh
    // config.
    let uses_store = matches!(
        cli.command,
        Commands::Show { .. }
            | Commands::Append { .. }
            | Commands::Remove { .. }
            | Commands::Set { .. }
            | Commands::Upload { .. }
    );
    if backend == Backend::Github && uses_store {
        cfg.remote.ensure_configured()?;
    }

    match cli.command {
        Commands::Init => unreachable!(),
        Commands::Serve => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive("folio=info".parse()?)
                        .add_directive("tower_http=info".parse()?),
                )
                .with(tracing_subscriber::fmt::layer())
                .init();
            server::run_server(&cfg).await?;
        }
        Commands::Show { section } => {
            let section = match section {
                Some(s) => Some(s.parse::<Section>().map_err(|e| anyhow::anyhow!(e))?),
                None => None,
            };
            show::run_show(&cfg, backend, section).await?;
        }
        Commands::Login { password } => {
            auth::run_login(&cfg, &password)?;
        }
        Commands::Logout => {
            auth::run_logout(&cfg)?;
        }
        Commands::Status => {
            auth::run_status(&cfg)?;
        }
        Commands::Token { action } => match action {
            TokenAction::Set { token } => {
                auth::run_token_set(&cfg, &token)?;
            }
            TokenAction::Clear => {
                auth::run_token_clear(&cfg)?;
            }
        },
        Commands::Append { target } => {
            edit::run_append(&cfg, backend, &target).await?;
        }
        Commands::Remove { target, index } => {
            edit::run_remove(&cfg, backend, &target, index).await?;
        }
        Commands::Set { path, value } => {
            edit::run_set(&cfg, backend, &path, &value).await?;
        }
        Commands::Upload { file } => {
            edit::run_upload(&cfg, backend, &file).await?;
        }
        Commands::Icon { reference } => {
            show::run_icon(&cfg, &reference);
        }
    }

    Ok(())
}
