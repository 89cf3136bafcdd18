//! Record backend for a hosted record service reached over HTTP.
//!
//! Every call is authenticated with a project id and public key header.
//! Responses share a `{ success, message, ... }` envelope; a `success:
//! false` envelope becomes [`BackendError::Rejected`] carrying its message.

use async_trait::async_trait;
use crm_core::types::{DbId, Record};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, FetchParams, RecordBackend, RemoveOutcome, WriteResult};

const PROJECT_ID_HEADER: &str = "x-project-id";
const PUBLIC_KEY_HEADER: &str = "x-public-key";

/// Connection settings for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Service root, e.g. `https://records.example.com/api`.
    pub base_url: String,
    pub project_id: String,
    pub public_key: String,
}

/// Response envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Deserialize)]
struct FetchBody {
    #[serde(default)]
    data: Option<Vec<Record>>,
}

#[derive(Debug, Deserialize)]
struct FetchOneBody {
    #[serde(default)]
    data: Option<Record>,
}

#[derive(Debug, Deserialize)]
struct WriteBody {
    #[serde(default)]
    results: Vec<WriteResult>,
}

#[derive(Debug, Deserialize)]
struct EmptyBody {}

#[derive(Debug, Serialize)]
struct RecordsRequest<'a> {
    records: &'a [Record],
}

#[derive(Debug, Serialize)]
struct RemoveRequest<'a> {
    #[serde(rename = "RecordIds")]
    record_ids: &'a [DbId],
}

/// Reqwest-based client for the hosted record service.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: HttpBackendConfig,
}

impl HttpBackend {
    pub fn new(config: HttpBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn records_url(&self, table: &str) -> String {
        format!(
            "{}/tables/{table}/records",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header(PROJECT_ID_HEADER, &self.config.project_id)
            .header(PUBLIC_KEY_HEADER, &self.config.public_key)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Envelope<T>, BackendError> {
        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        decode_envelope(status.as_u16(), &bytes)
    }
}

/// Decode a response body, turning a `success: false` envelope or a
/// non-JSON error status into a [`BackendError`].
fn decode_envelope<T: DeserializeOwned>(status: u16, bytes: &[u8]) -> Result<Envelope<T>, BackendError> {
    let envelope: Envelope<T> = match serde_json::from_slice(bytes) {
        Ok(envelope) => envelope,
        Err(_) if !(200..300).contains(&status) => {
            return Err(BackendError::Transport(format!("HTTP status {status}")))
        }
        Err(e) => return Err(BackendError::Decode(e.to_string())),
    };
    if envelope.success {
        Ok(envelope)
    } else {
        Err(BackendError::Rejected(
            envelope
                .message
                .clone()
                .unwrap_or_else(|| format!("Request failed with status {status}")),
        ))
    }
}

#[async_trait]
impl RecordBackend for HttpBackend {
    async fn fetch(&self, table: &str, params: &FetchParams) -> Result<Vec<Record>, BackendError> {
        let url = format!("{}/query", self.records_url(table));
        let envelope: Envelope<FetchBody> = self
            .send(self.request(reqwest::Method::POST, url).json(params))
            .await?;
        Ok(envelope.body.data.unwrap_or_default())
    }

    async fn fetch_one(
        &self,
        table: &str,
        id: DbId,
        fields: &[String],
    ) -> Result<Option<Record>, BackendError> {
        let url = format!("{}/{id}", self.records_url(table));
        let builder = self
            .request(reqwest::Method::GET, url)
            .query(&[("fields", fields.join(","))]);
        let envelope: Envelope<FetchOneBody> = self.send(builder).await?;
        Ok(envelope.body.data)
    }

    async fn insert(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<Vec<WriteResult>, BackendError> {
        let body = RecordsRequest { records: &records };
        let envelope: Envelope<WriteBody> = self
            .send(self.request(reqwest::Method::POST, self.records_url(table)).json(&body))
            .await?;
        Ok(envelope.body.results)
    }

    async fn replace(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<Vec<WriteResult>, BackendError> {
        let body = RecordsRequest { records: &records };
        let envelope: Envelope<WriteBody> = self
            .send(self.request(reqwest::Method::PUT, self.records_url(table)).json(&body))
            .await?;
        Ok(envelope.body.results)
    }

    async fn remove(&self, table: &str, ids: Vec<DbId>) -> Result<RemoveOutcome, BackendError> {
        let body = RemoveRequest { record_ids: &ids };
        let envelope: Envelope<EmptyBody> = self
            .send(self.request(reqwest::Method::DELETE, self.records_url(table)).json(&body))
            .await?;
        Ok(RemoveOutcome {
            success: true,
            message: envelope.message.unwrap_or_else(|| "Records deleted".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn backend() -> HttpBackend {
        HttpBackend::new(HttpBackendConfig {
            base_url: "https://records.example.com/api/".into(),
            project_id: "p1".into(),
            public_key: "k1".into(),
        })
    }

    #[test]
    fn records_url_joins_without_double_slash() {
        assert_eq!(
            backend().records_url("deal_c"),
            "https://records.example.com/api/tables/deal_c/records"
        );
    }

    #[test]
    fn successful_fetch_envelope_decodes() {
        let body = br#"{"success": true, "data": [{"Id": 1, "title_c": "Pilot"}]}"#;
        let envelope: Envelope<FetchBody> = decode_envelope(200, body).unwrap();
        let rows = envelope.body.data.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["title_c"], "Pilot");
    }

    #[test]
    fn rejected_envelope_carries_message() {
        let body = br#"{"success": false, "message": "Table not found"}"#;
        let err = decode_envelope::<FetchBody>(200, body).unwrap_err();
        assert_matches!(err, BackendError::Rejected(msg) if msg == "Table not found");
    }

    #[test]
    fn non_json_error_status_is_transport_failure() {
        let err = decode_envelope::<FetchBody>(502, b"<html>bad gateway</html>").unwrap_err();
        assert_matches!(err, BackendError::Transport(msg) if msg.contains("502"));
    }

    #[test]
    fn write_results_decode_per_record() {
        let body = br#"{"success": true, "results": [
            {"success": true, "data": {"Id": 3}},
            {"success": false, "message": "Invalid field"}
        ]}"#;
        let envelope: Envelope<WriteBody> = decode_envelope(200, body).unwrap();
        assert!(envelope.body.results[0].success);
        assert_eq!(envelope.body.results[1].message.as_deref(), Some("Invalid field"));
    }

    #[test]
    fn remove_request_uses_record_ids_key() {
        let ids = [4, 5];
        let value = serde_json::to_value(RemoveRequest { record_ids: &ids }).unwrap();
        assert_eq!(value, serde_json::json!({"RecordIds": [4, 5]}));
    }
}
