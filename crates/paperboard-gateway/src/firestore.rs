//! Document store client for the `paper` collection.
//!
//! Speaks the Firestore REST wire format: documents carry a `fields` map
//! whose values are tagged (`stringValue`, `integerValue`), and integers
//! travel as JSON strings. Listing goes through `runQuery` ordered by the
//! `time` field descending.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use paperboard_models::{Importance, NewsId, NewsItem, Session};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};

/// Name of the remote news collection.
pub const NEWS_COLLECTION: &str = "paper";

/// Client for the remote document store.
#[derive(Clone)]
pub struct DocumentClient {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl DocumentClient {
    /// Creates a client for the configured backend.
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Base URL of the documents resource.
    fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            self.config.firestore_url, self.config.project_id
        )
    }

    /// Lists all news items, newest first.
    ///
    /// The server is asked to order by `time` descending; the result is
    /// re-sorted locally so the ordering invariant holds for any
    /// permutation the backend returns.
    pub async fn list_items(&self, session: &Session) -> Result<Vec<NewsItem>> {
        let url = format!("{}:runQuery", self.documents_url());
        let request = RunQueryRequest::news_by_time_desc();

        trace!(url = %url, "listing news items");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&session.id_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::RemoteUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::RemoteUnavailable(format!(
                "query failed with {}: {}",
                status, text
            )));
        }

        let rows: Vec<RunQueryRow> = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let mut items: Vec<NewsItem> = rows
            .into_iter()
            .filter_map(|row| row.document)
            .map(|doc| doc.into_news_item())
            .collect();

        items.sort_by(|a, b| b.created_at_millis.cmp(&a.created_at_millis));

        debug!(count = items.len(), "news listing received");
        Ok(items)
    }

    /// Creates one news item with the current time as its timestamp.
    ///
    /// The id is assigned by the store and returned.
    pub async fn add_item(
        &self,
        session: &Session,
        text: &str,
        importance: Importance,
    ) -> Result<NewsId> {
        let url = format!("{}/{}", self.documents_url(), NEWS_COLLECTION);
        let body = CreateDocumentRequest {
            fields: DocumentFields::new(text, importance, Utc::now().timestamp_millis()),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&session.id_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::RemoteUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::RemoteUnavailable(format!(
                "create failed with {}: {}",
                status, text
            )));
        }

        let document: Document = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let id = document.id()?;
        debug!(id = %id, "news item created");
        Ok(id)
    }

    /// Deletes a news item by id.
    ///
    /// The caller is expected to issue a fresh listing afterwards; the
    /// local cache is never patched in place.
    pub async fn delete_item(&self, session: &Session, id: &NewsId) -> Result<()> {
        let url = format!("{}/{}/{}", self.documents_url(), NEWS_COLLECTION, id);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&session.id_token)
            .send()
            .await
            .map_err(|e| GatewayError::RemoteUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::RemoteUnavailable(format!(
                "delete failed with {}: {}",
                status, text
            )));
        }

        debug!(id = %id, "news item deleted");
        Ok(())
    }
}

/// runQuery request body.
#[derive(Debug, Serialize)]
pub struct RunQueryRequest {
    #[serde(rename = "structuredQuery")]
    structured_query: StructuredQuery,
}

impl RunQueryRequest {
    /// The one query this client issues: all of `paper`, newest first.
    pub fn news_by_time_desc() -> Self {
        Self {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: NEWS_COLLECTION.to_string(),
                }],
                order_by: vec![Order {
                    field: FieldReference {
                        field_path: "time".to_string(),
                    },
                    direction: "DESCENDING".to_string(),
                }],
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct StructuredQuery {
    from: Vec<CollectionSelector>,
    #[serde(rename = "orderBy")]
    order_by: Vec<Order>,
}

#[derive(Debug, Serialize)]
struct CollectionSelector {
    #[serde(rename = "collectionId")]
    collection_id: String,
}

#[derive(Debug, Serialize)]
struct Order {
    field: FieldReference,
    direction: String,
}

#[derive(Debug, Serialize)]
struct FieldReference {
    #[serde(rename = "fieldPath")]
    field_path: String,
}

/// One row of a runQuery response.
///
/// Rows without a `document` (e.g. a trailing read time on an empty
/// result) are skipped.
#[derive(Debug, Deserialize)]
pub struct RunQueryRow {
    /// The matched document, if any.
    pub document: Option<Document>,
}

/// A stored document.
#[derive(Debug, Deserialize)]
pub struct Document {
    /// Full resource name; the document id is the last path segment.
    pub name: String,
    /// Field map; absent on deleted documents.
    #[serde(default)]
    pub fields: Option<DocumentFields>,
}

impl Document {
    /// Extracts the document id from the resource name.
    fn id(&self) -> Result<NewsId> {
        self.name
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .map(NewsId::from)
            .ok_or_else(|| {
                GatewayError::InvalidResponse(format!("document name has no id: {}", self.name))
            })
    }

    /// Converts a wire document into a news item.
    ///
    /// Missing or malformed fields fall back to defaults rather than
    /// failing the whole listing; the original data contains documents
    /// written before the schema settled.
    fn into_news_item(self) -> NewsItem {
        let id = match self.id() {
            Ok(id) => id,
            Err(_) => {
                warn!(name = %self.name, "document with unusable name");
                NewsId::from_string(self.name.clone())
            }
        };

        let fields = self.fields.unwrap_or_default();
        let text = fields
            .news
            .and_then(|v| v.string_value)
            .unwrap_or_default();
        let importance = Importance::from_wire(
            fields
                .importance
                .and_then(|v| v.as_integer())
                .unwrap_or(-1),
        );
        let created_at_millis = fields.time.and_then(|v| v.as_integer()).unwrap_or(0);

        NewsItem::new(id, text, importance, created_at_millis)
    }
}

/// The `fields` map of a news document.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DocumentFields {
    /// The news text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news: Option<FieldValue>,
    /// Raw importance integer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<FieldValue>,
    /// Creation time in milliseconds since the epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<FieldValue>,
}

impl DocumentFields {
    /// Builds the field map for a new document.
    pub fn new(text: &str, importance: Importance, time_millis: i64) -> Self {
        Self {
            news: Some(FieldValue::string(text)),
            importance: Some(FieldValue::integer(importance.to_wire())),
            time: Some(FieldValue::integer(time_millis)),
        }
    }
}

/// A tagged Firestore value. Integers travel as JSON strings.
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldValue {
    #[serde(rename = "stringValue", skip_serializing_if = "Option::is_none")]
    string_value: Option<String>,
    #[serde(rename = "integerValue", skip_serializing_if = "Option::is_none")]
    integer_value: Option<String>,
}

impl FieldValue {
    fn string(value: &str) -> Self {
        Self {
            string_value: Some(value.to_string()),
            integer_value: None,
        }
    }

    fn integer(value: i64) -> Self {
        Self {
            string_value: None,
            integer_value: Some(value.to_string()),
        }
    }

    fn as_integer(&self) -> Option<i64> {
        self.integer_value.as_deref().and_then(|s| s.parse().ok())
    }
}

#[derive(Debug, Serialize)]
struct CreateDocumentRequest {
    fields: DocumentFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_query_request_shape() {
        let request = RunQueryRequest::news_by_time_desc();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json["structuredQuery"]["from"][0]["collectionId"],
            NEWS_COLLECTION
        );
        assert_eq!(
            json["structuredQuery"]["orderBy"][0]["field"]["fieldPath"],
            "time"
        );
        assert_eq!(
            json["structuredQuery"]["orderBy"][0]["direction"],
            "DESCENDING"
        );
    }

    #[test]
    fn test_row_deserialization() {
        let json = r#"{
            "document": {
                "name": "projects/demo/databases/(default)/documents/paper/abc123",
                "fields": {
                    "news": {"stringValue": "Test"},
                    "importance": {"integerValue": "1"},
                    "time": {"integerValue": "1600000000000"}
                }
            },
            "readTime": "2026-08-30T00:00:00Z"
        }"#;

        let row: RunQueryRow = serde_json::from_str(json).unwrap();
        let item = row.document.unwrap().into_news_item();

        assert_eq!(item.id.as_str(), "abc123");
        assert_eq!(item.text, "Test");
        assert_eq!(item.importance, Importance::Mild);
        assert_eq!(item.created_at_millis, 1_600_000_000_000);
    }

    #[test]
    fn test_row_without_document_is_skippable() {
        let json = r#"{"readTime": "2026-08-30T00:00:00Z"}"#;
        let row: RunQueryRow = serde_json::from_str(json).unwrap();
        assert!(row.document.is_none());
    }

    #[test]
    fn test_out_of_range_importance_maps_to_unspecified() {
        let json = r#"{
            "document": {
                "name": "projects/demo/databases/(default)/documents/paper/x1",
                "fields": {
                    "news": {"stringValue": "odd"},
                    "importance": {"integerValue": "7"},
                    "time": {"integerValue": "5"}
                }
            }
        }"#;

        let row: RunQueryRow = serde_json::from_str(json).unwrap();
        let item = row.document.unwrap().into_news_item();
        assert_eq!(item.importance, Importance::Unspecified);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let json = r#"{
            "document": {
                "name": "projects/demo/databases/(default)/documents/paper/bare"
            }
        }"#;

        let row: RunQueryRow = serde_json::from_str(json).unwrap();
        let item = row.document.unwrap().into_news_item();

        assert_eq!(item.text, "");
        assert_eq!(item.importance, Importance::Unspecified);
        assert_eq!(item.created_at_millis, 0);
    }

    #[test]
    fn test_create_request_encodes_integers_as_strings() {
        let body = CreateDocumentRequest {
            fields: DocumentFields::new("Breaking", Importance::Critical, 42),
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["fields"]["news"]["stringValue"], "Breaking");
        assert_eq!(json["fields"]["importance"]["integerValue"], "0");
        assert_eq!(json["fields"]["time"]["integerValue"], "42");
    }

    #[test]
    fn test_document_id_extraction() {
        let doc = Document {
            name: "projects/p/databases/(default)/documents/paper/the-id".to_string(),
            fields: None,
        };
        assert_eq!(doc.id().unwrap().as_str(), "the-id");
    }
}
