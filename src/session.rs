//! Admin session and publish-credential state.
//!
//! Editing commands are gated by a short-lived session minted from a shared
//! secret. The check is a plain string comparison against the configured
//! password — this gates a single-operator content tool, not a multi-user
//! service. Sessions and the GitHub publish token live together in one
//! JSON state file, the operator-local durable storage for this crate.
//!
//! Expiry is a pure function of a caller-supplied clock:
//! [`Session::is_valid_at`] never reads ambient time, so commands decide
//! once what "now" is and every check agrees with it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable consulted when the state file carries no token.
pub const TOKEN_ENV: &str = "FOLIO_GITHUB_TOKEN";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("wrong password")]
    WrongPassword,

    #[error("not logged in — run `folio login` first")]
    NotLoggedIn,

    #[error("session expired — run `folio login` again")]
    SessionExpired,

    #[error("failed to read state file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write state file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("state file {path} is not valid JSON")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode state")]
    Encode(#[source] serde_json::Error),
}

/// A minted admin session. Valid strictly before `expires_at`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Mint a session lasting `minutes` from `now`.
    pub fn begin(now: DateTime<Utc>, minutes: i64) -> Self {
        Session {
            expires_at: now + Duration::minutes(minutes),
        }
    }

    /// Whether the session is still valid at the given instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Durable operator state: the current session (if any) and the GitHub
/// publish token (if configured). The token survives logout; it is publish
/// configuration, not part of the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
}

impl AuthState {
    /// Load the state file, treating a missing file as empty state.
    ///
    /// An expired session is cleared on sight and the cleared state is
    /// written back, so a stale session never survives in durable storage.
    pub fn load(path: &Path, now: DateTime<Utc>) -> Result<Self, AuthError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(AuthState::default());
            }
            Err(e) => {
                return Err(AuthError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let mut state: AuthState =
            serde_json::from_str(&content).map_err(|e| AuthError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        if let Some(session) = &state.session {
            if !session.is_valid_at(now) {
                state.session = None;
                state.save(path)?;
            }
        }

        Ok(state)
    }

    /// Write the state file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), AuthError> {
        let write_err = |e| AuthError::Write {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(AuthError::Encode)?;
        std::fs::write(path, json).map_err(write_err)
    }

    /// Check the password and mint a session.
    pub fn login(
        &mut self,
        password: &str,
        expected: &str,
        now: DateTime<Utc>,
        minutes: i64,
    ) -> Result<Session, AuthError> {
        if password != expected {
            return Err(AuthError::WrongPassword);
        }
        let session = Session::begin(now, minutes);
        self.session = Some(session);
        Ok(session)
    }

    /// Drop the session. The publish token is untouched.
    pub fn logout(&mut self) {
        self.session = None;
    }

    /// Error unless a session exists and is valid at `now`.
    pub fn require_session(&self, now: DateTime<Utc>) -> Result<(), AuthError> {
        match &self.session {
            None => Err(AuthError::NotLoggedIn),
            Some(s) if !s.is_valid_at(now) => Err(AuthError::SessionExpired),
            Some(_) => Ok(()),
        }
    }

    /// The publish token: the state file's entry, falling back to the
    /// [`TOKEN_ENV`] environment variable.
    pub fn resolve_token(&self) -> Option<String> {
        self.github_token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV).ok())
    }
}
