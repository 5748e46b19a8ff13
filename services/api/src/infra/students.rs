use anyhow::Context as _;
use serde::Deserialize;

use crate::domain::repository::StudentSource;
use crate::error::ApiError;

/// JSON envelope the dataset endpoint answers with. `DATA` carries the raw
/// pipe-delimited table; the other members are status codes we ignore.
#[derive(Debug, Deserialize)]
struct DataEnvelope {
    #[serde(rename = "DATA")]
    data: String,
}

/// [`StudentSource`] over HTTP. One shared client, one GET per fetch.
#[derive(Clone)]
pub struct HttpStudentSource {
    pub http: reqwest::Client,
    pub url: String,
}

impl HttpStudentSource {
    async fn fetch_envelope(&self) -> anyhow::Result<DataEnvelope> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("request student dataset")?;
        let envelope = response
            .error_for_status()
            .context("student dataset answered with an error status")?
            .json()
            .await
            .context("decode student dataset envelope")?;
        Ok(envelope)
    }
}

impl StudentSource for HttpStudentSource {
    async fn fetch_raw(&self) -> Result<String, ApiError> {
        let envelope = self.fetch_envelope().await.map_err(ApiError::DataSource)?;
        Ok(envelope.data)
    }
}
