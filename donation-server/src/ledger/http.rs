//! HTTP ledger gateway client
//!
//! ```text
//! POST {base}/v1/pubs
//! { "did": "...", "entries": [ { "payload": "<canonical json>", "hash": "<sha256 hex>" } ] }
//!
//! 200 { "code": 0, "message": "ok", "data": [ { "id": "<correlation id>", "index": 0 } ] }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::LedgerPayload;
use std::time::Duration;

use super::{LedgerError, LedgerPublisher, PublishResult, SubmitterIdentity};

#[derive(Serialize)]
struct SubmitRequest<'a> {
    did: &'a str,
    entries: Vec<SubmitEntry<'a>>,
}

#[derive(Serialize)]
struct SubmitEntry<'a> {
    payload: &'a str,
    hash: String,
}

#[derive(Deserialize)]
struct SubmitResponse {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<Vec<AcceptedEntry>>,
}

#[derive(Deserialize)]
struct AcceptedEntry {
    id: String,
    index: usize,
}

#[derive(Clone)]
pub struct HttpLedgerPublisher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLedgerPublisher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LedgerPublisher for HttpLedgerPublisher {
    async fn publish(
        &self,
        identity: &SubmitterIdentity,
        payloads: &[LedgerPayload],
    ) -> Result<Vec<PublishResult>, LedgerError> {
        let body = SubmitRequest {
            did: &identity.did,
            entries: payloads
                .iter()
                .map(|p| SubmitEntry {
                    payload: p.as_str(),
                    hash: p.digest(),
                })
                .collect(),
        };

        let resp = self
            .client
            .post(format!("{}/v1/pubs", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(LedgerError::Status { status, body });
        }

        let text = resp.text().await?;
        let parsed: SubmitResponse =
            serde_json::from_str(&text).map_err(|e| LedgerError::Malformed(e.to_string()))?;
        if parsed.code != 0 {
            return Err(LedgerError::Rejected {
                code: parsed.code,
                message: parsed.message,
            });
        }

        let accepted = parsed
            .data
            .ok_or_else(|| LedgerError::Malformed("missing data".into()))?;
        tracing::debug!(submitted = payloads.len(), accepted = accepted.len(), "Ledger gateway accepted");

        Ok(accepted
            .into_iter()
            .map(|e| PublishResult {
                correlation_id: e.id,
                payload_index: e.index,
            })
            .collect())
    }
}
