use crate::error::TransferError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::time::Duration;

/// Multipart field the backend reads the CSV from.
pub const FILE_FIELD: &str = "file";

/// Sends one file and returns the response body. Implementations must make
/// exactly one request per call and never retry.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn upload(&self, file_name: &str, content: Vec<u8>) -> Result<Vec<u8>, TransferError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl ReqwestTransport {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, TransferError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn upload(&self, file_name: &str, content: Vec<u8>) -> Result<Vec<u8>, TransferError> {
        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part(FILE_FIELD, part);

        tracing::debug!(endpoint = %self.endpoint, file_name, "sending upload request");
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
