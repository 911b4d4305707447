//! Store backed by the GitHub contents API.
//!
//! Loads read the published document as a plain static asset, no
//! credentials involved. Saves are a two-step publish:
//!
//! 1. `GET` the file's current blob `sha` (the version marker). Any
//!    failure here aborts the save; the commit is never attempted.
//! 2. `PUT` the new content, base64-encoded, together with that `sha`, the
//!    branch, and a fixed commit message.
//!
//! One attempt per step, no retries. A rejected commit leaves the remote
//! untouched and the local edits unsaved; the hosting side picks the commit
//! up on its own schedule, so success messages warn that the live site
//! lags by a couple of minutes.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

use crate::config::RemoteConfig;
use crate::document::PortfolioDocument;
use crate::store::{SaveReceipt, Store, StoreError};

/// Fixed commit message for every publish.
const COMMIT_MESSAGE: &str = "content: update portfolio data via folio";

/// GitHub rejects anonymous-looking API traffic without a user agent.
const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

pub struct GitHubStore {
    contents_url: String,
    asset_url: String,
    branch: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl GitHubStore {
    pub fn new(remote: &RemoteConfig, token: Option<String>) -> Self {
        Self {
            contents_url: remote.contents_url(),
            asset_url: remote.asset_url(),
            branch: remote.branch.clone(),
            token,
            client: reqwest::Client::new(),
        }
    }

    #[cfg(test)]
    fn with_endpoints(
        contents_url: String,
        asset_url: String,
        branch: String,
        token: Option<String>,
    ) -> Self {
        Self {
            contents_url,
            asset_url,
            branch,
            token,
            client: reqwest::Client::new(),
        }
    }

    fn authed(&self, req: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        req.header("Authorization", format!("token {}", token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
    }
}

/// Pretty-printed JSON, base64-encoded the way the contents API wants it.
fn encode_document(doc: &PortfolioDocument) -> Result<String, StoreError> {
    let text = serde_json::to_string_pretty(doc).map_err(StoreError::Encode)?;
    Ok(STANDARD.encode(text))
}

#[async_trait]
impl Store for GitHubStore {
    fn name(&self) -> &'static str {
        "github"
    }

    fn description(&self) -> String {
        format!("GitHub contents API at {}", self.contents_url)
    }

    async fn load(&self) -> Result<PortfolioDocument, StoreError> {
        let url = self.asset_url.clone();
        let resp = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| StoreError::Network {
                url: url.clone(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Http {
                url,
                status: status.as_u16(),
                detail: String::new(),
            });
        }

        resp.json::<PortfolioDocument>()
            .await
            .map_err(|e| StoreError::BadResponse {
                url,
                detail: format!("not a portfolio document ({})", e),
            })
    }

    async fn save(&self, doc: &PortfolioDocument) -> Result<SaveReceipt, StoreError> {
        // The credential gate comes before any network traffic.
        let token = self
            .token
            .as_deref()
            .ok_or(StoreError::CredentialMissing)?;

        let marker_url = format!("{}?ref={}", self.contents_url, self.branch);
        let resp = self
            .authed(self.client.get(&marker_url), token)
            .send()
            .await
            .map_err(|e| StoreError::Network {
                url: marker_url.clone(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::MarkerFetch {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value =
            resp.json().await.map_err(|e| StoreError::BadResponse {
                url: marker_url.clone(),
                detail: format!("invalid contents response ({})", e),
            })?;
        let sha = body
            .get("sha")
            .and_then(|s| s.as_str())
            .ok_or_else(|| StoreError::BadResponse {
                url: marker_url,
                detail: "contents response carried no sha".to_string(),
            })?
            .to_string();

        let payload = serde_json::json!({
            "message": COMMIT_MESSAGE,
            "content": encode_document(doc)?,
            "sha": sha,
            "branch": self.branch,
        });

        let resp = self
            .authed(self.client.put(&self.contents_url), token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| StoreError::Network {
                url: self.contents_url.clone(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::CommitRejected {
                status: status.as_u16(),
            });
        }

        let commit = resp
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| {
                v.get("commit")?
                    .get("sha")?
                    .as_str()
                    .map(str::to_string)
            });

        Ok(SaveReceipt {
            message: "Committed to GitHub. The live site will redeploy and show the change in 2-3 minutes."
                .to_string(),
            commit,
        })
    }

    async fn upload_image(&self, _file: &Path) -> Result<String, StoreError> {
        Err(StoreError::UploadUnsupported)
    }
}
