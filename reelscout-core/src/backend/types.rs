//! Typed documents exchanged with the data/auth backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BackendError;

/// Account behind the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Session created by an email/password login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub expire: Option<DateTime<Utc>>,
}

/// Persisted tally of how often a search term was queried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: u32,
    pub movie_id: u64,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(rename = "$createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "$updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SearchRecord {
    /// Rejects records violating the `count >= 1` invariant.
    ///
    /// # Errors
    ///
    /// - `BackendError::Parse` - Record has an empty term or a zero count
    pub fn validate(self) -> Result<Self, BackendError> {
        if self.count == 0 {
            return Err(BackendError::Parse {
                reason: format!("search record {} has count 0", self.id),
            });
        }
        if self.search_term.is_empty() {
            return Err(BackendError::Parse {
                reason: format!("search record {} has an empty term", self.id),
            });
        }
        Ok(self)
    }
}

/// Fields written when a search term is seen for the first time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSearchRecord {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: u32,
    pub movie_id: u64,
    pub poster_url: Option<String>,
}

/// Partial update applied to an existing search record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchRecordPatch {
    pub count: u32,
}

/// One page of documents from a list query.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList {
    pub total: u64,
    pub documents: Vec<SearchRecord>,
}

/// Filter, ordering and limit clauses for a document list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentQuery {
    /// Attribute equals the given string value.
    Equal { attribute: String, value: String },
    /// Sort by attribute, highest first.
    OrderDesc { attribute: String },
    /// Return at most this many documents.
    Limit(u32),
}

impl DocumentQuery {
    /// Equality filter on the search term attribute.
    pub fn search_term(term: &str) -> Self {
        DocumentQuery::Equal {
            attribute: "searchTerm".to_string(),
            value: term.to_string(),
        }
    }

    /// Descending order on the count attribute.
    pub fn most_searched() -> Self {
        DocumentQuery::OrderDesc {
            attribute: "count".to_string(),
        }
    }

    /// Serializes the clause as the JSON query string the backend expects.
    pub fn to_query_param(&self) -> String {
        let value = match self {
            DocumentQuery::Equal { attribute, value } => serde_json::json!({
                "method": "equal",
                "attribute": attribute,
                "values": [value],
            }),
            DocumentQuery::OrderDesc { attribute } => serde_json::json!({
                "method": "orderDesc",
                "attribute": attribute,
            }),
            DocumentQuery::Limit(limit) => serde_json::json!({
                "method": "limit",
                "values": [limit],
            }),
        };
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_record_parses_backend_document() {
        let body = r#"{
            "$id": "abc",
            "$createdAt": "2025-03-01T12:00:00.000+00:00",
            "$updatedAt": "2025-03-02T12:00:00.000+00:00",
            "$permissions": [],
            "searchTerm": "batman",
            "count": 3,
            "movie_id": 268,
            "poster_url": null
        }"#;

        let record: SearchRecord = serde_json::from_str(body).unwrap();

        assert_eq!(record.id, "abc");
        assert_eq!(record.search_term, "batman");
        assert_eq!(record.count, 3);
        assert_eq!(record.movie_id, 268);
        assert!(record.poster_url.is_none());
        assert!(record.created_at.is_some());
    }

    #[test]
    fn test_search_record_missing_count_is_rejected() {
        let body = r#"{"$id": "abc", "searchTerm": "batman", "movie_id": 1}"#;
        assert!(serde_json::from_str::<SearchRecord>(body).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_count() {
        let record = SearchRecord {
            id: "abc".to_string(),
            search_term: "batman".to_string(),
            count: 0,
            movie_id: 1,
            poster_url: None,
            created_at: None,
            updated_at: None,
        };

        assert!(matches!(
            record.validate(),
            Err(BackendError::Parse { .. })
        ));
    }

    #[test]
    fn test_new_record_serializes_null_poster() {
        let record = NewSearchRecord {
            search_term: "heat".to_string(),
            count: 1,
            movie_id: 949,
            poster_url: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["searchTerm"], "heat");
        assert!(value["poster_url"].is_null());
    }

    #[test]
    fn test_query_params() {
        let equal: serde_json::Value =
            serde_json::from_str(&DocumentQuery::search_term("batman").to_query_param()).unwrap();
        assert_eq!(equal["method"], "equal");
        assert_eq!(equal["attribute"], "searchTerm");
        assert_eq!(equal["values"][0], "batman");

        let limit: serde_json::Value =
            serde_json::from_str(&DocumentQuery::Limit(5).to_query_param()).unwrap();
        assert_eq!(limit["method"], "limit");
        assert_eq!(limit["values"][0], 5);

        let order: serde_json::Value =
            serde_json::from_str(&DocumentQuery::most_searched().to_query_param()).unwrap();
        assert_eq!(order["method"], "orderDesc");
        assert_eq!(order["attribute"], "count");
    }
}
