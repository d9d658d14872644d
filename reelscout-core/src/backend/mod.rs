//! Data/auth backend abstractions and implementations.
//!
//! A hosted document database with session-based authentication stores one
//! search record per distinct search term. The `DataAuthBackend` trait is the
//! seam the controller and the search tracker depend on; `AppwriteBackend`
//! talks to the real service over REST.

pub mod appwrite;
pub mod errors;
#[cfg(any(test, feature = "test-utils"))]
pub mod in_memory;
pub mod types;

use async_trait::async_trait;

pub use appwrite::AppwriteBackend;
pub use errors::{AuthError, BackendError};
#[cfg(any(test, feature = "test-utils"))]
pub use in_memory::{BackendCallCounts, InMemoryBackend};
pub use types::{
    DocumentList, DocumentQuery, NewSearchRecord, SearchRecord, SearchRecordPatch, Session, User,
};

use crate::config::Credentials;

/// Trait for the document database and session service.
///
/// Document operations act on the single search-record collection the
/// implementation was configured with.
#[async_trait]
pub trait DataAuthBackend: Send + Sync + std::fmt::Debug {
    /// Returns the account behind the current session.
    ///
    /// # Errors
    /// - `BackendError::Unauthorized` - No active session
    /// - `BackendError::Network` - Backend unreachable
    async fn current_user(&self) -> Result<User, BackendError>;

    /// Creates a session from an email/password credential pair.
    ///
    /// # Errors
    /// - `BackendError::Unauthorized` - Credentials rejected
    /// - `BackendError::Network` - Backend unreachable
    async fn create_email_session(&self, email: &str, password: &str)
    -> Result<Session, BackendError>;

    /// Deletes the current session. Deleting an absent session is not an error
    /// for callers, who only log failures.
    ///
    /// # Errors
    /// - `BackendError::Network` - Backend unreachable
    async fn delete_current_session(&self) -> Result<(), BackendError>;

    /// Lists search records matching all query clauses.
    ///
    /// # Errors
    /// - `BackendError::Parse` - Response did not match the record schema
    /// - `BackendError::Http` - Backend rejected the query
    async fn list_documents(&self, queries: &[DocumentQuery]) -> Result<DocumentList, BackendError>;

    /// Creates a search record under the given document identifier.
    ///
    /// # Errors
    /// - `BackendError::Conflict` - Identifier already taken
    /// - `BackendError::Http` - Backend rejected the document
    async fn create_document(
        &self,
        document_id: &str,
        record: &NewSearchRecord,
    ) -> Result<SearchRecord, BackendError>;

    /// Applies a partial update to an existing search record.
    ///
    /// # Errors
    /// - `BackendError::Http` - Unknown document or rejected update
    async fn update_document(
        &self,
        document_id: &str,
        patch: &SearchRecordPatch,
    ) -> Result<SearchRecord, BackendError>;
}

/// Backend used when project identifiers are missing.
///
/// Every call fails with `NotConfigured`, which leaves the application in
/// unauthenticated mode with catalog search still working.
#[derive(Debug, Clone)]
pub struct DisabledBackend {
    reason: String,
}

impl DisabledBackend {
    /// Creates a disabled backend explaining why it is disabled.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> BackendError {
        BackendError::NotConfigured {
            reason: self.reason.clone(),
        }
    }
}

#[async_trait]
impl DataAuthBackend for DisabledBackend {
    async fn current_user(&self) -> Result<User, BackendError> {
        Err(self.error())
    }

    async fn create_email_session(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<Session, BackendError> {
        Err(self.error())
    }

    async fn delete_current_session(&self) -> Result<(), BackendError> {
        Err(self.error())
    }

    async fn list_documents(
        &self,
        _queries: &[DocumentQuery],
    ) -> Result<DocumentList, BackendError> {
        Err(self.error())
    }

    async fn create_document(
        &self,
        _document_id: &str,
        _record: &NewSearchRecord,
    ) -> Result<SearchRecord, BackendError> {
        Err(self.error())
    }

    async fn update_document(
        &self,
        _document_id: &str,
        _patch: &SearchRecordPatch,
    ) -> Result<SearchRecord, BackendError> {
        Err(self.error())
    }
}

/// Recovers the current session, or logs in once with static credentials.
///
/// There is no interactive prompt and no account-creation fallback.
///
/// # Errors
/// - `AuthError::MissingCredentials` - No session and no credentials configured
/// - `AuthError::LoginFailed` - Login or the follow-up account lookup failed
pub async fn restore_or_login(
    backend: &dyn DataAuthBackend,
    credentials: Option<&Credentials>,
) -> Result<User, AuthError> {
    match backend.current_user().await {
        Ok(user) => {
            tracing::info!("Restored existing session for user {}", user.id);
            return Ok(user);
        }
        Err(e) => tracing::debug!("No existing session: {e}"),
    }

    let credentials = credentials.ok_or(AuthError::MissingCredentials)?;

    backend
        .create_email_session(&credentials.email, &credentials.password)
        .await
        .map_err(|e| AuthError::LoginFailed {
            reason: e.to_string(),
        })?;

    let user = backend
        .current_user()
        .await
        .map_err(|e| AuthError::LoginFailed {
            reason: e.to_string(),
        })?;

    tracing::info!("Logged in as user {}", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            email: "tester@example.com".to_string(),
            password: "correct-horse".to_string(),
        }
    }

    #[tokio::test]
    async fn test_existing_session_skips_login() {
        let backend = InMemoryBackend::new().with_active_session();

        let user = restore_or_login(&backend, Some(&credentials())).await.unwrap();

        assert_eq!(user.email, "tester@example.com");
        let calls = backend.call_counts();
        assert_eq!(calls.current_user, 1);
        assert_eq!(calls.create_session, 0);
    }

    #[tokio::test]
    async fn test_login_with_static_credentials() {
        let backend = InMemoryBackend::new().with_credentials("tester@example.com", "correct-horse");

        let user = restore_or_login(&backend, Some(&credentials())).await.unwrap();

        assert_eq!(user.email, "tester@example.com");
        assert!(backend.has_session());
        assert_eq!(backend.call_counts().create_session, 1);
    }

    #[tokio::test]
    async fn test_rejected_credentials_fail_once() {
        let backend = InMemoryBackend::new().with_credentials("tester@example.com", "other");

        let error = restore_or_login(&backend, Some(&credentials()))
            .await
            .unwrap_err();

        assert!(matches!(error, AuthError::LoginFailed { .. }));
        assert_eq!(backend.call_counts().create_session, 1);
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let backend = InMemoryBackend::new();

        let error = restore_or_login(&backend, None).await.unwrap_err();

        assert_eq!(error, AuthError::MissingCredentials);
        assert_eq!(backend.call_counts().create_session, 0);
    }

    #[tokio::test]
    async fn test_disabled_backend_rejects_everything() {
        let backend = DisabledBackend::new("APPWRITE_PROJECT_ID is not set");

        let error = restore_or_login(&backend, Some(&credentials()))
            .await
            .unwrap_err();
        assert!(error.to_string().contains("APPWRITE_PROJECT_ID"));

        assert!(matches!(
            backend.list_documents(&[]).await,
            Err(BackendError::NotConfigured { .. })
        ));
    }
}
