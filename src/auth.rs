//! Session and credential commands.
//!
//! `folio login` mints a fixed-length editing session after a password
//! check, `folio status` reports what is left of it, and `folio token`
//! manages the GitHub credential used by the publish path. Everything is
//! kept in the admin state file so sessions survive across invocations.

use anyhow::Result;
use chrono::Utc;

use crate::config::Config;
use crate::session::{AuthState, TOKEN_ENV};
use crate::store::{open_store, Backend, Store};

/// Run the login command: check the password and start a session.
pub fn run_login(config: &Config, password: &str) -> Result<()> {
    let now = Utc::now();
    let mut auth = AuthState::load(&config.admin.state_file, now)?;
    let session = auth.login(
        password,
        &config.admin.password,
        now,
        config.admin.session_minutes,
    )?;
    auth.save(&config.admin.state_file)?;

    println!(
        "Logged in. Session expires at {} ({} minutes from now).",
        session.expires_at.format("%H:%M:%S UTC"),
        config.admin.session_minutes
    );
    Ok(())
}

/// Run the logout command: drop the session, keep the publish token.
pub fn run_logout(config: &Config) -> Result<()> {
    let now = Utc::now();
    let mut auth = AuthState::load(&config.admin.state_file, now)?;
    auth.logout();
    auth.save(&config.admin.state_file)?;

    println!("Logged out.");
    Ok(())
}

/// Run the status command: report the session, the configured backends,
/// and the publish token.
pub fn run_status(config: &Config) -> Result<()> {
    let now = Utc::now();
    // Loading already clears a session that lapsed, so anything still
    // present is live.
    let auth = AuthState::load(&config.admin.state_file, now)?;

    match &auth.session {
        Some(s) => {
            println!(
                "Session: active, {} left (expires {}).",
                format_remaining(s.expires_at - now),
                s.expires_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        None => println!("Session: none. Run `folio login <password>` to start one."),
    }

    // Stores are built here only to describe themselves; nothing goes on
    // the wire.
    let local = open_store(Backend::Local, config, &auth);
    println!("Backend {}: {}.", local.name(), local.description());
    if config.remote.ensure_configured().is_ok() {
        let github = open_store(Backend::Github, config, &auth);
        println!("Backend {}: {}.", github.name(), github.description());
    } else {
        println!("Backend github: not configured. Set [remote] owner and repo to publish.");
    }

    if auth.github_token.is_some() {
        println!("Publish token: stored in the state file.");
    } else if auth.resolve_token().is_some() {
        println!("Publish token: taken from ${}.", TOKEN_ENV);
    } else {
        println!(
            "Publish token: none. `folio token set <token>` enables `--backend github` saves."
        );
    }
    Ok(())
}

/// Run `token set`: store the GitHub credential in the state file.
/// Touching the credential requires a live session, like any other edit.
pub fn run_token_set(config: &Config, token: &str) -> Result<()> {
    let now = Utc::now();
    let mut auth = AuthState::load(&config.admin.state_file, now)?;
    auth.require_session(now)?;
    auth.github_token = Some(token.to_string());
    auth.save(&config.admin.state_file)?;

    println!(
        "Publish token stored in {}.",
        config.admin.state_file.display()
    );
    Ok(())
}

/// Run `token clear`: forget the stored credential.
pub fn run_token_clear(config: &Config) -> Result<()> {
    let now = Utc::now();
    let mut auth = AuthState::load(&config.admin.state_file, now)?;
    auth.require_session(now)?;
    auth.github_token = None;
    auth.save(&config.admin.state_file)?;

    println!("Publish token cleared.");
    Ok(())
}

fn format_remaining(d: chrono::Duration) -> String {
    let mins = d.num_minutes();
    let secs = (d.num_seconds() - mins * 60).max(0);
    format!("{}m {:02}s", mins, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(chrono::Duration::seconds(599)), "9m 59s");
        assert_eq!(format_remaining(chrono::Duration::seconds(61)), "1m 01s");
        assert_eq!(format_remaining(chrono::Duration::seconds(0)), "0m 00s");
    }
}
