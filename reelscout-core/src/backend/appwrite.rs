//! Appwrite REST client for sessions and search-record documents.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::{
    BackendError, DataAuthBackend, DocumentList, DocumentQuery, NewSearchRecord, SearchRecord,
    SearchRecordPatch, Session, User,
};
use crate::config::BackendConfig;

/// Appwrite backend scoped to one database collection.
///
/// Sessions are kept in the client's cookie store, so a session lives exactly
/// as long as this client: a restarted process has no persisted credentials.
#[derive(Debug, Clone)]
pub struct AppwriteBackend {
    client: reqwest::Client,
    endpoint: Url,
    database_id: String,
    collection_id: String,
}

/// Error body returned by Appwrite on failed requests.
#[derive(Debug, Deserialize)]
struct AppwriteErrorBody {
    message: String,
}

fn missing(name: &str) -> BackendError {
    BackendError::NotConfigured {
        reason: format!("{name} is not set"),
    }
}

fn network_error(context: &str, error: reqwest::Error) -> BackendError {
    BackendError::Network {
        reason: format!("{context}: {error}"),
    }
}

impl AppwriteBackend {
    /// Creates a client from backend configuration.
    ///
    /// # Errors
    ///
    /// - `BackendError::NotConfigured` - Missing identifiers, invalid endpoint,
    ///   or the HTTP client could not be built
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let project_id = config
            .project_id
            .as_deref()
            .ok_or_else(|| missing("APPWRITE_PROJECT_ID"))?;
        let database_id = config
            .database_id
            .clone()
            .ok_or_else(|| missing("APPWRITE_DATABASE_ID"))?;
        let collection_id = config
            .collection_id
            .clone()
            .ok_or_else(|| missing("APPWRITE_COLLECTION_ID"))?;

        let endpoint = Url::parse(&config.endpoint).map_err(|e| BackendError::NotConfigured {
            reason: format!("invalid endpoint {}: {e}", config.endpoint),
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(BackendError::NotConfigured {
                reason: format!("endpoint {} cannot be a base URL", config.endpoint),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-appwrite-project",
            HeaderValue::from_str(project_id).map_err(|e| BackendError::NotConfigured {
                reason: format!("invalid project id: {e}"),
            })?,
        );

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(|e| BackendError::NotConfigured {
                reason: format!("HTTP client creation failed: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint,
            database_id,
            collection_id,
        })
    }

    /// Joins path segments onto the endpoint, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn documents_url(&self) -> Url {
        self.url(&[
            "databases",
            self.database_id.as_str(),
            "collections",
            self.collection_id.as_str(),
            "documents",
        ])
    }

    fn document_url(&self, document_id: &str) -> Url {
        self.url(&[
            "databases",
            self.database_id.as_str(),
            "collections",
            self.collection_id.as_str(),
            "documents",
            document_id,
        ])
    }

    /// Maps non-success statuses onto classified errors.
    async fn check_status(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(BackendError::Unauthorized),
            StatusCode::CONFLICT => Err(BackendError::Conflict),
            _ => {
                let message = response
                    .text()
                    .await
                    .ok()
                    .and_then(|body| serde_json::from_str::<AppwriteErrorBody>(&body).ok())
                    .map(|body| body.message)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

                Err(BackendError::Http {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Validates the status and parses the body into `T`.
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let response = Self::check_status(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| network_error("reading response body failed", e))?;

        serde_json::from_str(&body).map_err(|e| BackendError::Parse {
            reason: format!("unexpected response shape: {e}"),
        })
    }
}

#[async_trait]
impl DataAuthBackend for AppwriteBackend {
    async fn current_user(&self) -> Result<User, BackendError> {
        let response = self
            .client
            .get(self.url(&["account"]))
            .send()
            .await
            .map_err(|e| network_error("account lookup failed", e))?;

        Self::read_json(response).await
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let response = self
            .client
            .post(self.url(&["account", "sessions", "email"]))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| network_error("session creation failed", e))?;

        Self::read_json(response).await
    }

    async fn delete_current_session(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(self.url(&["account", "sessions", "current"]))
            .send()
            .await
            .map_err(|e| network_error("session deletion failed", e))?;

        Self::check_status(response).await.map(|_| ())
    }

    async fn list_documents(&self, queries: &[DocumentQuery]) -> Result<DocumentList, BackendError> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|query| ("queries[]", query.to_query_param()))
            .collect();

        let response = self
            .client
            .get(self.documents_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| network_error("document list failed", e))?;

        let list: DocumentList = Self::read_json(response).await?;
        let documents = list
            .documents
            .into_iter()
            .filter_map(|record| match record.validate() {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping invalid search record: {e}");
                    None
                }
            })
            .collect();

        Ok(DocumentList {
            total: list.total,
            documents,
        })
    }

    async fn create_document(
        &self,
        document_id: &str,
        record: &NewSearchRecord,
    ) -> Result<SearchRecord, BackendError> {
        let response = self
            .client
            .post(self.documents_url())
            .json(&serde_json::json!({ "documentId": document_id, "data": record }))
            .send()
            .await
            .map_err(|e| network_error("document creation failed", e))?;

        Self::read_json::<SearchRecord>(response).await?.validate()
    }

    async fn update_document(
        &self,
        document_id: &str,
        patch: &SearchRecordPatch,
    ) -> Result<SearchRecord, BackendError> {
        let response = self
            .client
            .patch(self.document_url(document_id))
            .json(&serde_json::json!({ "data": patch }))
            .send()
            .await
            .map_err(|e| network_error("document update failed", e))?;

        Self::read_json::<SearchRecord>(response).await?.validate()
    }
}
