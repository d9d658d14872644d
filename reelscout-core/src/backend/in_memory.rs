//! In-memory backend for testing session bootstrap and search tracking.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{
    BackendError, DataAuthBackend, DocumentList, DocumentQuery, NewSearchRecord, SearchRecord,
    SearchRecordPatch, Session, User,
};

/// Number of calls made to each backend operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendCallCounts {
    pub current_user: usize,
    pub create_session: usize,
    pub delete_session: usize,
    pub list_documents: usize,
    pub create_document: usize,
    pub update_document: usize,
}

#[derive(Debug)]
struct InMemoryState {
    user: User,
    password: Option<String>,
    has_session: bool,
    documents: Vec<SearchRecord>,
    fail_documents: bool,
    fail_logout: bool,
    conflicting_record: Option<SearchRecord>,
    calls: BackendCallCounts,
}

/// Mock backend keeping sessions and documents in memory.
///
/// Clones share state, so a test can keep one clone for assertions while the
/// controller owns another.
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryBackend {
    /// Creates a backend with no session that rejects every login.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryState {
                user: User {
                    id: "user-1".to_string(),
                    name: "Tester".to_string(),
                    email: "tester@example.com".to_string(),
                },
                password: None,
                has_session: false,
                documents: Vec::new(),
                fail_documents: false,
                fail_logout: false,
                conflicting_record: None,
                calls: BackendCallCounts::default(),
            })),
        }
    }

    /// Accepts logins with exactly this email and password.
    pub fn with_credentials(self, email: &str, password: &str) -> Self {
        {
            let mut state = self.state.lock();
            state.user.email = email.to_string();
            state.password = Some(password.to_string());
        }
        self
    }

    /// Starts with a session already established.
    pub fn with_active_session(self) -> Self {
        self.state.lock().has_session = true;
        self
    }

    /// Seeds the collection with existing records.
    pub fn with_records(self, records: Vec<SearchRecord>) -> Self {
        self.state.lock().documents = records;
        self
    }

    /// Makes every document operation fail with a server error.
    pub fn set_fail_documents(&self, fail: bool) {
        self.state.lock().fail_documents = fail;
    }

    /// Makes session deletion fail with a network error.
    pub fn set_fail_logout(&self, fail: bool) {
        self.state.lock().fail_logout = fail;
    }

    /// Simulates a concurrent writer: the next create inserts `record` first
    /// and then reports a conflict.
    pub fn inject_conflict_on_next_create(&self, record: SearchRecord) {
        self.state.lock().conflicting_record = Some(record);
    }

    /// Snapshot of all stored records.
    pub fn records(&self) -> Vec<SearchRecord> {
        self.state.lock().documents.clone()
    }

    /// Whether a session is currently active.
    pub fn has_session(&self) -> bool {
        self.state.lock().has_session
    }

    /// Snapshot of per-operation call counts.
    pub fn call_counts(&self) -> BackendCallCounts {
        self.state.lock().calls
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn server_error() -> BackendError {
    BackendError::Http {
        status: 500,
        message: "simulated failure".to_string(),
    }
}

#[async_trait]
impl DataAuthBackend for InMemoryBackend {
    async fn current_user(&self) -> Result<User, BackendError> {
        let mut state = self.state.lock();
        state.calls.current_user += 1;

        if state.has_session {
            Ok(state.user.clone())
        } else {
            Err(BackendError::Unauthorized)
        }
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let mut state = self.state.lock();
        state.calls.create_session += 1;

        if state.user.email == email && state.password.as_deref() == Some(password) {
            state.has_session = true;
            Ok(Session {
                id: format!("session-{}", state.calls.create_session),
                user_id: state.user.id.clone(),
                expire: None,
            })
        } else {
            Err(BackendError::Unauthorized)
        }
    }

    async fn delete_current_session(&self) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        state.calls.delete_session += 1;

        if state.fail_logout {
            return Err(BackendError::Network {
                reason: "simulated disconnect".to_string(),
            });
        }
        state.has_session = false;
        Ok(())
    }

    async fn list_documents(&self, queries: &[DocumentQuery]) -> Result<DocumentList, BackendError> {
        let mut state = self.state.lock();
        state.calls.list_documents += 1;

        if state.fail_documents {
            return Err(server_error());
        }

        let mut documents = state.documents.clone();
        let mut limit = None;

        for query in queries {
            match query {
                DocumentQuery::Equal { attribute, value } if attribute == "searchTerm" => {
                    documents.retain(|record| &record.search_term == value);
                }
                DocumentQuery::OrderDesc { attribute } if attribute == "count" => {
                    documents.sort_by(|a, b| b.count.cmp(&a.count));
                }
                DocumentQuery::Limit(n) => limit = Some(*n as usize),
                other => {
                    return Err(BackendError::Http {
                        status: 400,
                        message: format!("unsupported query {other:?}"),
                    });
                }
            }
        }

        let total = documents.len() as u64;
        if let Some(limit) = limit {
            documents.truncate(limit);
        }

        Ok(DocumentList { total, documents })
    }

    async fn create_document(
        &self,
        document_id: &str,
        record: &NewSearchRecord,
    ) -> Result<SearchRecord, BackendError> {
        let mut state = self.state.lock();
        state.calls.create_document += 1;

        if state.fail_documents {
            return Err(server_error());
        }

        if let Some(competing) = state.conflicting_record.take() {
            state.documents.push(competing);
            return Err(BackendError::Conflict);
        }

        if state.documents.iter().any(|doc| doc.id == document_id) {
            return Err(BackendError::Conflict);
        }

        let created = SearchRecord {
            id: document_id.to_string(),
            search_term: record.search_term.clone(),
            count: record.count,
            movie_id: record.movie_id,
            poster_url: record.poster_url.clone(),
            created_at: Some(chrono::Utc::now()),
            updated_at: Some(chrono::Utc::now()),
        };
        state.documents.push(created.clone());
        Ok(created)
    }

    async fn update_document(
        &self,
        document_id: &str,
        patch: &SearchRecordPatch,
    ) -> Result<SearchRecord, BackendError> {
        let mut state = self.state.lock();
        state.calls.update_document += 1;

        if state.fail_documents {
            return Err(server_error());
        }

        let document = state
            .documents
            .iter_mut()
            .find(|doc| doc.id == document_id)
            .ok_or_else(|| BackendError::Http {
                status: 404,
                message: format!("document {document_id} not found"),
            })?;

        document.count = patch.count;
        document.updated_at = Some(chrono::Utc::now());
        Ok(document.clone())
    }
}
