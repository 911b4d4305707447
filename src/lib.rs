//! # folio
//!
//! A content manager for a personal portfolio site.
//!
//! folio keeps the whole site's content in one JSON document — profile
//! details, services, technologies, work experience, projects,
//! testimonials, and social links — and edits it atomically: every save
//! rewrites the full document, either through the local admin HTTP service
//! or as a commit to the GitHub repository the production site is built
//! from.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌───────────────┐
//! │   CLI    │──▶│ EditorSession │──▶│  Store trait  │
//! │ (folio)  │   │ single-flight │   │ local/github  │
//! └──────────┘   └───────────────┘   └──────┬────────┘
//!                                           │
//!                       ┌───────────────────┤
//!                       ▼                   ▼
//!                ┌────────────┐      ┌────────────┐
//!                │ admin HTTP │      │  contents  │
//!                │  service   │      │    API     │
//!                └────────────┘      └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! folio init                    # scaffold config and a starter document
//! folio serve                   # start the local admin service
//! folio login admin123          # open an editing session
//! folio append projects         # add a default project entry
//! folio set "projects[0].name" "Weather Dashboard"
//! folio show projects           # render with icons resolved
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`document`] | The portfolio document and its sections |
//! | [`catalog`] | Icon catalog and bundled asset table |
//! | [`icon`] | Icon reference resolution |
//! | [`editor`] | Collection editing and the single-flight save guard |
//! | [`session`] | Admin sessions and the publish token |
//! | [`store`] | The persistence interface |
//! | [`store_local`] | Store backed by the local admin service |
//! | [`store_github`] | Store backed by the GitHub contents API |
//! | [`server`] | The local admin HTTP service |

pub mod auth;
pub mod catalog;
pub mod config;
pub mod document;
pub mod edit;
pub mod editor;
pub mod icon;
pub mod init_cmd;
pub mod server;
pub mod session;
pub mod show;
pub mod store;
pub mod store_github;
pub mod store_local;
