//! Store backed by the local admin service.
//!
//! Talks plain JSON over HTTP to the service started by `folio serve`:
//! `GET /api/data` for loads, `POST /api/data` for whole-document saves,
//! and multipart `POST /api/upload` for images. Last write wins; the
//! service does not diff or merge.
//!
//! A connection-refused failure is reported as its own condition
//! ([`StoreError::Unreachable`]) because the overwhelmingly common cause is
//! simply that the service is not running.

use async_trait::async_trait;
use std::path::Path;

use crate::document::PortfolioDocument;
use crate::store::{SaveReceipt, Store, StoreError};

pub struct LocalStore {
    origin: String,
    client: reqwest::Client,
}

impl LocalStore {
    /// `origin` is the service base, e.g. `http://127.0.0.1:5000`.
    pub fn new(origin: String) -> Self {
        Self {
            origin,
            // No request timeout: saves are single-flight and the operator
            // waits for the outcome rather than racing a clock.
            client: reqwest::Client::new(),
        }
    }

    fn classify_send(url: String, e: reqwest::Error) -> StoreError {
        if e.is_connect() {
            StoreError::Unreachable { url, source: e }
        } else {
            StoreError::Network { url, source: e }
        }
    }
}

#[async_trait]
impl Store for LocalStore {
    fn name(&self) -> &'static str {
        "local"
    }

    fn description(&self) -> String {
        format!("local admin service at {}", self.origin)
    }

    async fn load(&self) -> Result<PortfolioDocument, StoreError> {
        let url = format!("{}/api/data", self.origin);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::classify_send(url.clone(), e))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = error_detail(resp).await;
            return Err(StoreError::Http {
                url,
                status: status.as_u16(),
                detail,
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
        let url = format!("{}/api/data", self.origin);
        let resp = self
            .client
            .post(&url)
            .json(doc)
            .send()
            .await
            .map_err(|e| Self::classify_send(url.clone(), e))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = error_detail(resp).await;
            return Err(StoreError::Http {
                url,
                status: status.as_u16(),
                detail,
            });
        }

        let message = resp
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "Saved.".to_string());

        Ok(SaveReceipt {
            message,
            commit: None,
        })
    }

    async fn upload_image(&self, file: &Path) -> Result<String, StoreError> {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| StoreError::UploadRejected {
                reason: format!("{} is not a file", file.display()),
            })?;
        let bytes = tokio::fs::read(file).await?;

        let part = reqwest::multipart::Part::bytes(bytes).file_name(name);
        let form = reqwest::multipart::Form::new().part("image", part);

        let url = format!("{}/api/upload", self.origin);
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Self::classify_send(url.clone(), e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::BAD_REQUEST {
            let detail = error_detail(resp).await;
            return Err(StoreError::UploadRejected {
                reason: if detail.is_empty() {
                    "the service did not accept the file".to_string()
                } else {
                    detail.trim_start_matches(": ").to_string()
                },
            });
        }
        if !status.is_success() {
            let detail = error_detail(resp).await;
            return Err(StoreError::Http {
                url,
                status: status.as_u16(),
                detail,
            });
        }

        let body: serde_json::Value =
            resp.json()
                .await
                .map_err(|e| StoreError::BadResponse {
                    url: url.clone(),
                    detail: format!("invalid upload response ({})", e),
                })?;
        body.get("url")
            .and_then(|u| u.as_str())
            .map(str::to_string)
            .ok_or(StoreError::BadResponse {
                url,
                detail: "upload response carried no url".to_string(),
            })
    }
}

/// Pull the `{"error": ...}` message out of a failure response, formatted
/// for appending to an error line. Empty when the body is something else.
async fn error_detail(resp: reqwest::Response) -> String {
    match resp.json::<serde_json::Value>().await {
        Ok(body) => body
            .get("error")
            .and_then(|e| e.as_str())
            .map(|msg| format!(": {}", msg))
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}
