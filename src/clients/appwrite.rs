use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::AppwriteTarget;

#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("Appwrite request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Appwrite returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Appwrite response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid Appwrite endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// A search counter as stored in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCountDocument {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: i64,
    pub movie_id: i64,
    #[serde(default)]
    pub poster_url: String,
}

#[derive(Debug, Serialize)]
pub struct SearchCountFields<'a> {
    #[serde(rename = "searchTerm", skip_serializing_if = "Option::is_none")]
    pub search_term: Option<&'a str>,
    pub count: i64,
    pub movie_id: i64,
    pub poster_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    documents: Vec<SearchCountDocument>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Appwrite query strings, in the JSON form the REST API accepts.
pub mod query {
    use serde_json::json;

    #[must_use]
    pub fn equal(attribute: &str, value: &str) -> String {
        json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
    }

    #[must_use]
    pub fn limit(n: u64) -> String {
        json!({ "method": "limit", "values": [n] }).to_string()
    }

    #[must_use]
    pub fn order_desc(attribute: &str) -> String {
        json!({ "method": "orderDesc", "attribute": attribute }).to_string()
    }
}

#[derive(Clone)]
pub struct AppwriteClient {
    client: Client,
    target: AppwriteTarget,
}

impl AppwriteClient {
    pub fn new(target: AppwriteTarget, timeout_seconds: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent("Reelscout/1.0")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build Appwrite HTTP client: {e}"))?;

        Ok(Self { client, target })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.target.endpoint, self.target.database_id, self.target.collection_id
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("X-Appwrite-Project", &self.target.project_id);
        match &self.target.api_key {
            Some(key) => request.header("X-Appwrite-Key", key),
            None => request,
        }
    }

    async fn read<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AppwriteError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(AppwriteError::Status { status, message });
        }

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn list_documents(
        &self,
        queries: &[String],
    ) -> Result<Vec<SearchCountDocument>, AppwriteError> {
        let mut url = Url::parse(&self.documents_url())?;
        {
            let mut pairs = url.query_pairs_mut();
            for q in queries {
                pairs.append_pair("queries[]", q);
            }
        }

        debug!(queries = queries.len(), "Listing Appwrite documents");

        let response = self.authorize(self.client.get(url)).send().await?;
        let list: DocumentList = Self::read(response).await?;

        Ok(list.documents)
    }

    pub async fn create_document(
        &self,
        fields: &SearchCountFields<'_>,
    ) -> Result<SearchCountDocument, AppwriteError> {
        let document_id = uuid::Uuid::new_v4().simple().to_string();
        let body = json!({ "documentId": document_id, "data": fields });

        let response = self
            .authorize(self.client.post(self.documents_url()))
            .json(&body)
            .send()
            .await?;

        Self::read(response).await
    }

    pub async fn update_document(
        &self,
        document_id: &str,
        fields: &SearchCountFields<'_>,
    ) -> Result<SearchCountDocument, AppwriteError> {
        let url = format!("{}/{}", self.documents_url(), document_id);
        let body = json!({ "data": fields });

        let response = self
            .authorize(self.client.patch(url))
            .json(&body)
            .send()
            .await?;

        Self::read(response).await
    }
}
