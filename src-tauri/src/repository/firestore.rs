//! Firestore Document Store
//!
//! Remote backend speaking the Firestore v1 REST API with an API key.
//! Conditional writes go through `documents:commit` with a `currentDocument`
//! precondition on `updateTime`.

use async_trait::async_trait;
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::domain::{DomainError, DomainResult};
use super::traits::{DocumentStore, Revision, StoredDocument};

const FIRESTORE_ROOT: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: u32 = 300;

/// Connection settings for one Firestore collection
#[derive(Debug, Clone)]
pub struct FirestoreSettings {
    pub project_id: String,
    pub database: String,
    pub api_key: String,
    pub collection: String,
    pub timeout: Duration,
}

/// Document as returned by the REST API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FirestoreDocument {
    pub name: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, Value>,
    #[serde(default)]
    pub update_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[derive(Serialize)]
struct KeyQuery<'a> {
    key: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery<'a> {
    key: &'a str,
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

/// Firestore REST implementation of the document store
pub struct FirestoreStore {
    client: Client,
    settings: FirestoreSettings,
}

impl FirestoreStore {
    pub fn new(settings: FirestoreSettings) -> DomainResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, settings })
    }

    /// `projects/{p}/databases/{d}/documents`
    fn documents_path(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.settings.project_id, self.settings.database
        )
    }

    /// Full resource name of a document (unescaped), as used in commit bodies
    fn resource_name(&self, id: &str) -> String {
        format!("{}/{}/{}", self.documents_path(), self.settings.collection, id)
    }

    fn collection_url(&self) -> String {
        format!("{}/{}/{}", FIRESTORE_ROOT, self.documents_path(), self.settings.collection)
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), utf8_percent_encode(id, NON_ALPHANUMERIC))
    }

    fn commit_url(&self) -> String {
        format!("{}/{}:commit", FIRESTORE_ROOT, self.documents_path())
    }

    fn key(&self) -> KeyQuery<'_> {
        KeyQuery { key: &self.settings.api_key }
    }

    /// Read one page of the collection to prove the project, database and
    /// key are usable. An empty collection is fine; a missing database is not.
    pub async fn verify(&self) -> DomainResult<()> {
        let query = ListQuery { key: &self.settings.api_key, page_size: 1, page_token: None };
        let resp = self.client.get(self.collection_url()).query(&query).send().await?;
        match check(resp).await {
            Ok(_) => Ok(()),
            Err(DomainError::NotFound(msg)) => Err(DomainError::NotFound(format!(
                "Firestore database '{}' in project '{}': {}",
                self.settings.database, self.settings.project_id, msg
            ))),
            Err(e) => Err(e),
        }
    }
}

/// Map a non-success response onto the domain taxonomy
async fn check(resp: Response) -> DomainResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

fn status_error(status: StatusCode, body: &str) -> DomainError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| format!("{} ({})", e.error.message, e.error.status))
        .unwrap_or_else(|_| format!("HTTP {}", status));
    match status.as_u16() {
        401 | 403 => DomainError::PermissionDenied(message),
        404 => DomainError::NotFound(message),
        408 | 429 | 500..=599 => DomainError::Network(message),
        _ => DomainError::Internal(message),
    }
}

/// A failed commit precondition surfaces as one of these.
///
/// A 404 only counts when the write was guarded on an existing revision (the
/// document was deleted underneath us). Otherwise it means the project or
/// database is missing, which is an error, not a lost race.
fn is_precondition_failure(status: StatusCode, body: &str, guarded_on_revision: bool) -> bool {
    match status.as_u16() {
        404 => guarded_on_revision && !is_missing_database(body),
        409 | 412 => true,
        400 => serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.status == "FAILED_PRECONDITION")
            .unwrap_or(false),
        _ => false,
    }
}

/// A 404 for a document read: absent, unless the database itself is missing
async fn absent(resp: Response) -> DomainResult<()> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if is_missing_database(&body) {
        return Err(status_error(status, &body));
    }
    Ok(())
}

/// Firestore's 404 for an unknown project or database
fn is_missing_database(body: &str) -> bool {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message.contains("does not exist for project"))
        .unwrap_or(false)
}

/// `{ "count": { "integerValue": "3" } }`
pub(crate) fn encode_fields(count: i64) -> Value {
    json!({ "count": { "integerValue": count.to_string() } })
}

/// Last path segment of a resource name, unescaped
pub(crate) fn document_id(name: &str) -> String {
    let last = name.rsplit('/').next().unwrap_or(name);
    percent_decode_str(last).decode_utf8_lossy().into_owned()
}

pub(crate) fn decode_document(doc: &FirestoreDocument) -> DomainResult<StoredDocument> {
    let id = document_id(&doc.name);
    let field = doc
        .fields
        .get("count")
        .ok_or_else(|| DomainError::Internal(format!("document '{}' has no count field", id)))?;

    let count = (if let Some(raw) = field.get("integerValue") {
        // integerValue is a JSON string per the REST encoding, tolerate numbers too
        match raw {
            Value::String(s) => s.parse::<i64>().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    } else if let Some(raw) = field.get("doubleValue") {
        raw.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0).map(|f| f as i64)
    } else {
        None
    })
    .ok_or_else(|| DomainError::Internal(format!("document '{}' has a non-integer count: {}", id, field)))?;

    let revision = doc
        .update_time
        .clone()
        .ok_or_else(|| DomainError::Internal(format!("document '{}' has no updateTime", id)))?;

    Ok(StoredDocument { id, count, revision: Revision(revision) })
}

/// Body for `documents:commit` carrying a single guarded write
pub(crate) fn commit_body(resource_name: &str, expected: Option<&Revision>, next: Option<i64>) -> Value {
    let precondition = match expected {
        Some(rev) => json!({ "updateTime": rev.0 }),
        None => json!({ "exists": false }),
    };
    let write = match next {
        Some(count) => json!({
            "update": { "name": resource_name, "fields": encode_fields(count) },
            "currentDocument": precondition,
        }),
        None => json!({
            "delete": resource_name,
            "currentDocument": precondition,
        }),
    };
    json!({ "writes": [write] })
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, id: &str) -> DomainResult<Option<StoredDocument>> {
        let resp = self.client.get(self.document_url(id)).query(&self.key()).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return absent(resp).await.map(|()| None);
        }
        let doc: FirestoreDocument = check(resp).await?.json().await?;
        decode_document(&doc).map(Some)
    }

    async fn list(&self) -> DomainResult<Vec<StoredDocument>> {
        let mut docs = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let query = ListQuery {
                key: &self.settings.api_key,
                page_size: PAGE_SIZE,
                page_token: page_token.as_deref(),
            };
            let resp = self.client.get(self.collection_url()).query(&query).send().await?;
            let page: ListResponse = check(resp).await?.json().await?;

            for doc in &page.documents {
                match decode_document(doc) {
                    Ok(stored) => docs.push(stored),
                    Err(e) => log::warn!("Skipping undecodable document {}: {}", doc.name, e),
                }
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(docs)
    }

    async fn put(&self, id: &str, count: i64) -> DomainResult<()> {
        let resp = self
            .client
            .patch(self.document_url(id))
            .query(&self.key())
            .json(&json!({ "fields": encode_fields(count) }))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let resp = self.client.delete(self.document_url(id)).query(&self.key()).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return absent(resp).await;
        }
        check(resp).await?;
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        id: &str,
        expected: Option<&Revision>,
        next: Option<i64>,
    ) -> DomainResult<bool> {
        if expected.is_none() && next.is_none() {
            return Ok(self.get(id).await?.is_none());
        }

        let body = commit_body(&self.resource_name(id), expected, next);
        let resp = self
            .client
            .post(self.commit_url())
            .query(&self.key())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(true);
        }
        let text = resp.text().await.unwrap_or_default();
        if is_precondition_failure(status, &text, expected.is_some()) {
            log::debug!("Precondition failed for {}: {}", id, text);
            return Ok(false);
        }
        Err(status_error(status, &text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(value: Value) -> FirestoreDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_integer_value() {
        let d = doc(json!({
            "name": "projects/p/databases/(default)/documents/pantry/eggs",
            "fields": { "count": { "integerValue": "12" } },
            "createTime": "2024-08-01T10:00:00.000000Z",
            "updateTime": "2024-08-01T10:05:00.000000Z"
        }));
        let stored = decode_document(&d).unwrap();
        assert_eq!(stored.id, "eggs");
        assert_eq!(stored.count, 12);
        assert_eq!(stored.revision, Revision("2024-08-01T10:05:00.000000Z".into()));
    }

    #[test]
    fn test_decode_rejects_nan() {
        let d = doc(json!({
            "name": "projects/p/databases/(default)/documents/pantry/milk",
            "fields": { "count": { "doubleValue": "NaN" } },
            "updateTime": "2024-08-01T10:05:00Z"
        }));
        assert!(decode_document(&d).is_err());
    }

    #[test]
    fn test_decode_whole_double() {
        let d = doc(json!({
            "name": "projects/p/databases/(default)/documents/pantry/rice",
            "fields": { "count": { "doubleValue": 3.0 } },
            "updateTime": "t"
        }));
        assert_eq!(decode_document(&d).unwrap().count, 3);
    }

    #[test]
    fn test_document_id_unescapes() {
        assert_eq!(document_id("projects/p/databases/d/documents/pantry/green%20tea"), "green tea");
        assert_eq!(document_id("plain"), "plain");
    }

    #[test]
    fn test_commit_body_create_guard() {
        let body = commit_body("projects/p/databases/d/documents/pantry/eggs", None, Some(1));
        let write = &body["writes"][0];
        assert_eq!(write["currentDocument"], json!({ "exists": false }));
        assert_eq!(write["update"]["fields"]["count"]["integerValue"], "1");
    }

    #[test]
    fn test_commit_body_guarded_delete() {
        let rev = Revision("2024-08-01T10:05:00Z".into());
        let body = commit_body("projects/p/databases/d/documents/pantry/eggs", Some(&rev), None);
        let write = &body["writes"][0];
        assert_eq!(write["delete"], "projects/p/databases/d/documents/pantry/eggs");
        assert_eq!(write["currentDocument"]["updateTime"], "2024-08-01T10:05:00Z");
    }

    #[test]
    fn test_status_mapping() {
        let body = r#"{"error":{"code":403,"message":"Missing or insufficient permissions.","status":"PERMISSION_DENIED"}}"#;
        assert!(matches!(status_error(StatusCode::FORBIDDEN, body), DomainError::PermissionDenied(_)));
        assert!(matches!(status_error(StatusCode::SERVICE_UNAVAILABLE, ""), DomainError::Network(_)));
        assert!(matches!(status_error(StatusCode::BAD_REQUEST, ""), DomainError::Internal(_)));
    }

    #[test]
    fn test_precondition_detection() {
        let failed = r#"{"error":{"code":400,"message":"the stored version does not match","status":"FAILED_PRECONDITION"}}"#;
        assert!(is_precondition_failure(StatusCode::BAD_REQUEST, failed, true));
        assert!(is_precondition_failure(StatusCode::CONFLICT, "", false));
        assert!(!is_precondition_failure(StatusCode::BAD_REQUEST, r#"{"error":{"status":"INVALID_ARGUMENT"}}"#, true));
    }

    #[test]
    fn test_missing_database_is_not_a_lost_race() {
        let missing_db = r#"{"error":{"code":404,"message":"The database (default) does not exist for project nope","status":"NOT_FOUND"}}"#;
        assert!(!is_precondition_failure(StatusCode::NOT_FOUND, missing_db, true));
        assert!(!is_precondition_failure(StatusCode::NOT_FOUND, missing_db, false));
        assert!(matches!(status_error(StatusCode::NOT_FOUND, missing_db), DomainError::NotFound(_)));
    }

    #[test]
    fn test_not_found_on_guarded_write_is_a_lost_race() {
        let gone = r#"{"error":{"code":404,"message":"No document to update: projects/p/databases/(default)/documents/pantry/eggs","status":"NOT_FOUND"}}"#;
        assert!(is_precondition_failure(StatusCode::NOT_FOUND, gone, true));
        // A create guard never loses with a 404
        assert!(!is_precondition_failure(StatusCode::NOT_FOUND, gone, false));
    }
}
