//! Authenticated editing commands.
//!
//! `folio append`, `folio remove`, `folio set`, and `folio upload` all go
//! through the same motions: require a live admin session, load the full
//! document from the selected store, apply one mutation, and save the whole
//! document back in a single write. A failed save leaves the stored
//! document exactly as it was.

use anyhow::Result;
use chrono::Utc;
use std::path::Path;

use crate::config::Config;
use crate::editor::{self, EditTarget, EditorSession};
use crate::session::AuthState;
use crate::store::{open_store, Backend, SaveReceipt, Store};

/// Load auth state and refuse to continue without a live session.
fn require_auth(config: &Config) -> Result<AuthState> {
    let now = Utc::now();
    let auth = AuthState::load(&config.admin.state_file, now)?;
    auth.require_session(now)?;
    Ok(auth)
}

/// Run one whole-document save under the session's single-flight guard.
/// The guard is released after the attempt whether it succeeded or not;
/// a failure is reported once, never retried.
async fn save_session(store: &dyn Store, session: &mut EditorSession) -> Result<SaveReceipt> {
    let snapshot = session.begin_save()?;
    let outcome = store.save(&snapshot).await;
    session.finish_save();
    Ok(outcome?)
}

fn print_receipt(receipt: &SaveReceipt) {
    println!("{}", receipt.message);
    if let Some(ref commit) = receipt.commit {
        println!("Commit: {}", commit);
    }
}

/// Run the append command: add the target's default entry and save.
pub async fn run_append(config: &Config, backend: Backend, target: &str) -> Result<()> {
    let auth = require_auth(config)?;
    let store = open_store(backend, config, &auth);
    let parsed = EditTarget::parse(target)?;

    let mut session = EditorSession::new(store.load().await?);
    editor::append(session.document_mut(), &parsed)?;

    let receipt = save_session(store.as_ref(), &mut session).await?;
    println!("Appended a default entry to {}.", target);
    print_receipt(&receipt);
    Ok(())
}

/// Run the remove command: delete the entry at `index` and save.
pub async fn run_remove(
    config: &Config,
    backend: Backend,
    target: &str,
    index: usize,
) -> Result<()> {
    let auth = require_auth(config)?;
    let store = open_store(backend, config, &auth);
    let parsed = EditTarget::parse(target)?;

    let mut session = EditorSession::new(store.load().await?);
    editor::remove(session.document_mut(), &parsed, index)?;

    let receipt = save_session(store.as_ref(), &mut session).await?;
    println!("Removed {}[{}].", target, index);
    print_receipt(&receipt);
    Ok(())
}

/// Run the set command: write one field addressed by path and save.
pub async fn run_set(config: &Config, backend: Backend, path: &str, value: &str) -> Result<()> {
    let auth = require_auth(config)?;
    let store = open_store(backend, config, &auth);

    let mut session = EditorSession::new(store.load().await?);
    editor::set_path(session.document_mut(), path, value)?;

    let receipt = save_session(store.as_ref(), &mut session).await?;
    println!("Set {} = {:?}.", path, value);
    print_receipt(&receipt);
    Ok(())
}

/// Run the upload command: store an image and print its URL.
pub async fn run_upload(config: &Config, backend: Backend, file: &Path) -> Result<()> {
    let auth = require_auth(config)?;
    let store = open_store(backend, config, &auth);

    let url = store.upload_image(file).await?;
    println!("Uploaded: {}", url);
    println!("Use this URL in any image or icon field.");
    Ok(())
}
