use super::auth::{Authenticator, ServiceAccountAuth};
use super::backend::ScoreStore;
use super::credentials::ServiceAccountKey;
use super::protocol::*;
use super::types::{StoreError, StoreRef, StoreResult, StoredScore};
use crate::leaderboard::types::ScoreEntry;

use async_trait::async_trait;
use reqwest::StatusCode;

/// Score collection stored in Cloud Firestore, accessed over the REST API.
///
/// Every trait call is a single HTTP request (plus a token exchange when the cached
/// access token has expired). Nothing is retried.
pub struct FirestoreScoreStore {
    http_client: reqwest::Client,
    base_url: String,
    project_id: String,
    collection: String,
    auth: Authenticator,
}

impl FirestoreScoreStore {
    /// Store for production Firestore. `project_override` wins over the key's project.
    pub fn new(
        key: ServiceAccountKey,
        project_override: Option<String>,
        collection: &str,
    ) -> StoreResult<Self> {
        let auth = ServiceAccountAuth::new(&key)?;
        let project_id = project_override.unwrap_or(key.project_id);

        Ok(Self {
            http_client: reqwest::Client::new(),
            base_url: format!("{}/{}", FIRESTORE_HOST, API_VERSION),
            project_id,
            collection: collection.to_string(),
            auth: Authenticator::ServiceAccount(auth),
        })
    }

    /// Store for a Firestore emulator listening on `host` (`host:port`, plain HTTP).
    pub fn emulator(host: &str, project_id: &str, collection: &str) -> Self {
        let host = host
            .trim_start_matches("http://")
            .trim_end_matches('/');

        Self {
            http_client: reqwest::Client::new(),
            base_url: format!("http://{}/{}", host, API_VERSION),
            project_id: project_id.to_string(),
            collection: collection.to_string(),
            auth: Authenticator::Emulator,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn documents_url(&self) -> String {
        format!("{}/{}", self.base_url, documents_path(&self.project_id))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> StoreResult<reqwest::Response> {
        let bearer = self.auth.bearer(&self.http_client).await?;

        request
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

/// 401/403/503 mean we cannot use the database at all; anything else is an
/// operation-level failure.
async fn check_status(response: reqwest::Response) -> StoreResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = format!("{}: {}", status, body.trim());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::SERVICE_UNAVAILABLE => {
            Err(StoreError::Unavailable(message))
        }
        _ => Err(StoreError::Operation(message)),
    }
}

fn decode_error(e: reqwest::Error) -> StoreError {
    StoreError::Operation(format!("malformed response: {}", e))
}

#[async_trait]
impl ScoreStore for FirestoreScoreStore {
    async fn insert(&self, entry: &ScoreEntry) -> StoreResult<StoreRef> {
        let url = format!("{}/{}", self.documents_url(), self.collection);
        let request = self
            .http_client
            .post(url)
            .json(&Document::from_entry(entry));

        let response = check_status(self.send(request).await?).await?;
        let created: Document = response.json().await.map_err(decode_error)?;

        created
            .name
            .map(StoreRef)
            .ok_or_else(|| StoreError::Operation("created document has no name".to_string()))
    }

    async fn top(&self, limit: usize) -> StoreResult<Vec<StoredScore>> {
        let url = format!("{}{}", self.documents_url(), RUN_QUERY_SUFFIX);
        let request = self
            .http_client
            .post(url)
            .json(&RunQueryRequest::top_scores(&self.collection, limit));

        let response = check_status(self.send(request).await?).await?;
        let items: Vec<RunQueryResponseItem> = response.json().await.map_err(decode_error)?;

        let mut scores = Vec::with_capacity(items.len());
        for document in items.into_iter().filter_map(|item| item.document) {
            let entry = document.to_entry();
            match document.name {
                Some(name) => scores.push(StoredScore {
                    reference: StoreRef(name),
                    entry,
                }),
                None => tracing::warn!("Skipping query result without a document name"),
            }
        }

        Ok(scores)
    }

    async fn delete(&self, reference: &StoreRef) -> StoreResult<()> {
        let url = format!("{}/{}", self.base_url, reference.0);

        let response = self.send(self.http_client.delete(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Document {} was already deleted", reference.0);
            return Ok(());
        }

        check_status(response).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "firestore"
    }
}
