//! The persistence interface and its error taxonomy.
//!
//! Exactly one [`Store`] implementation is active at a time, chosen
//! explicitly at the composition root via [`open_store`] — there is no
//! environment sniffing. Both implementations move the document wholesale:
//!
//! - [`LocalStore`](crate::store_local::LocalStore) talks JSON-over-HTTP to
//!   the local admin service (`folio serve`), which owns the data file and
//!   the uploads folder.
//! - [`GitHubStore`](crate::store_github::GitHubStore) reads the published
//!   document as a static asset and writes it back through the GitHub
//!   contents API, one commit per save.
//!
//! Failures are classified, reported once, and never retried; the operator
//! decides whether to try again.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::config::Config;
use crate::document::PortfolioDocument;
use crate::session::AuthState;
use crate::store_github::GitHubStore;
use crate::store_local::LocalStore;

/// Failure classes for load, save, and upload operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The local admin service did not answer at all.
    #[error("admin service unreachable at {url} — start it with `folio serve`")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Transport-level failure other than connection refused.
    #[error("network error talking to {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The peer answered with a non-success status.
    #[error("{url} returned HTTP {status}{detail}")]
    Http {
        url: String,
        status: u16,
        /// Either empty or `": <server-provided message>"`.
        detail: String,
    },

    /// The peer answered 2xx but the body was not what the protocol says.
    #[error("unexpected response from {url}: {detail}")]
    BadResponse { url: String, detail: String },

    /// Publishing requires a token and none is configured. Raised before
    /// any network traffic.
    #[error("no GitHub token configured — run `folio token set <token>` or export FOLIO_GITHUB_TOKEN")]
    CredentialMissing,

    /// The pre-commit version-marker fetch failed; the commit was never
    /// attempted. Usually a bad or expired token.
    #[error("could not fetch the current file version from GitHub (HTTP {status}) — check the token")]
    MarkerFetch { status: u16 },

    /// GitHub rejected the content update. Usually missing repository
    /// permissions on the token.
    #[error("GitHub rejected the commit (HTTP {status}) — check the token's repository permissions")]
    CommitRejected { status: u16 },

    /// The active backend cannot host uploaded files.
    #[error("image upload is not supported when publishing through GitHub — use an image URL, or upload via the local admin service")]
    UploadUnsupported,

    /// The upload was attempted and turned away.
    #[error("upload rejected: {reason}")]
    UploadRejected { reason: String },

    #[error("failed to encode the document")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    /// User-facing confirmation, including any propagation caveat.
    pub message: String,
    /// Commit id, when the save produced one.
    pub commit: Option<String>,
}

/// Whole-document persistence for portfolio content.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend identifier (`"local"`, `"github"`).
    fn name(&self) -> &'static str;

    /// One-line description of where this store reads and writes.
    fn description(&self) -> String;

    /// Fetch the complete document.
    async fn load(&self) -> Result<PortfolioDocument, StoreError>;

    /// Persist the complete document, replacing whatever is stored.
    async fn save(&self, doc: &PortfolioDocument) -> Result<SaveReceipt, StoreError>;

    /// Upload an image file, returning the URL to reference it by.
    async fn upload_image(&self, file: &Path) -> Result<String, StoreError>;
}

/// Which [`Store`] implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Local,
    Github,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Backend::Local),
            "github" | "remote" => Ok(Backend::Github),
            other => Err(format!(
                "unknown backend '{}'. Must be local or github.",
                other
            )),
        }
    }
}

/// Construct the selected store from configuration and operator state.
///
/// The publish token is resolved here, once, and handed to the store at
/// construction; stores never consult ambient state themselves.
pub fn open_store(backend: Backend, config: &Config, auth: &AuthState) -> Box<dyn Store> {
    match backend {
        Backend::Local => Box::new(LocalStore::new(config.server.origin())),
        Backend::Github => Box::new(GitHubStore::new(&config.remote, auth.resolve_token())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_backend_parsing() {
        assert_eq!(Backend::from_str("local").unwrap(), Backend::Local);
        assert_eq!(Backend::from_str("github").unwrap(), Backend::Github);
        assert_eq!(Backend::from_str("remote").unwrap(), Backend::Github);
        assert!(Backend::from_str("vercel").is_err());
    }

    #[test]
    fn test_error_messages_carry_guidance() {
        // Operators act on these strings; pin the guidance they rely on.
        assert!(StoreError::CredentialMissing
            .to_string()
            .contains("folio token set"));
        assert!(StoreError::MarkerFetch { status: 401 }
            .to_string()
            .contains("check the token"));
        assert!(StoreError::CommitRejected { status: 403 }
            .to_string()
            .contains("permissions"));
        assert!(StoreError::UploadUnsupported.to_string().contains("URL"));
    }
}
