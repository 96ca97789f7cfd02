//! Pinata IPFS pinning
//!
//! After a document is signed, its manifest and the document itself can be
//! pinned to IPFS. Pinning happens after the artifact is persisted and is
//! never rolled back.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::PinataConfig;
use crate::error::UpstreamError;

const PIN_JSON_PATH: &str = "/pinning/pinJSONToIPFS";
const PIN_FILE_PATH: &str = "/pinning/pinFileToIPFS";

/// Content pinning backend
#[async_trait]
pub trait Pinner: Send + Sync {
    /// Pin a JSON document, returning its CID
    async fn pin_json(&self, manifest: &serde_json::Value) -> Result<String, UpstreamError>;

    /// Pin raw file content, returning its CID
    async fn pin_file(&self, file_name: &str, content: Vec<u8>) -> Result<String, UpstreamError>;
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: Option<String>,
}

/// Pinata HTTP client
pub struct PinataClient {
    http: reqwest::Client,
    config: PinataConfig,
}

impl PinataClient {
    pub fn new(config: PinataConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("pinata_api_key", &self.config.api_key)
            .header("pinata_secret_api_key", &self.config.secret_key)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, UpstreamError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let parsed: PinResponse = response.json().await?;
        parsed.ipfs_hash.ok_or(UpstreamError::MissingField("IpfsHash"))
    }
}

#[async_trait]
impl Pinner for PinataClient {
    async fn pin_json(&self, manifest: &serde_json::Value) -> Result<String, UpstreamError> {
        let request = self.http.post(self.url(PIN_JSON_PATH)).json(manifest);
        let cid = self.send(request).await?;
        tracing::info!(cid = %cid, "manifest pinned");
        Ok(cid)
    }

    async fn pin_file(&self, file_name: &str, content: Vec<u8>) -> Result<String, UpstreamError> {
        let part = Part::bytes(content).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let request = self.http.post(self.url(PIN_FILE_PATH)).multipart(form);
        let cid = self.send(request).await?;
        tracing::info!(cid = %cid, file_name, "file pinned");
        Ok(cid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> PinataClient {
        PinataClient::new(PinataConfig {
            api_key: "key".to_string(),
            secret_key: "secret".to_string(),
            base_url: server.uri(),
        })
    }

    #[tokio::test]
    async fn test_pin_json_sends_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PIN_JSON_PATH))
            .and(header("pinata_api_key", "key"))
            .and(header("pinata_secret_api_key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"IpfsHash": "QmJson"})))
            .expect(1)
            .mount(&server)
            .await;

        let cid = client(&server)
            .pin_json(&json!({"fileName": "a.pdf"}))
            .await
            .unwrap();
        assert_eq!(cid, "QmJson");
    }

    #[tokio::test]
    async fn test_pin_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PIN_FILE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"IpfsHash": "QmFile"})))
            .mount(&server)
            .await;

        let cid = client(&server)
            .pin_file("a.pdf", b"%PDF-1.7".to_vec())
            .await
            .unwrap();
        assert_eq!(cid, "QmFile");
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
            .mount(&server)
            .await;

        let err = client(&server).pin_json(&json!({})).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 401, ref body } if body == "bad credentials"));
    }

    #[tokio::test]
    async fn test_missing_hash() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"PinSize": 10})))
            .mount(&server)
            .await;

        let err = client(&server).pin_json(&json!({})).await.unwrap_err();
        assert!(matches!(err, UpstreamError::MissingField("IpfsHash")));
    }
}
