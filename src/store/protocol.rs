//! Firestore REST Protocol
//!
//! Defines the endpoints and Data Transfer Objects used to talk to Cloud Firestore
//! (or its emulator) over the v1 REST API.
//!
//! Only the subset needed by the leaderboard is modelled: creating a document,
//! running a structured query ordered by score, and deleting a document by name.

use crate::leaderboard::types::ScoreEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --- API Endpoints ---

/// Production Firestore REST host.
pub const FIRESTORE_HOST: &str = "https://firestore.googleapis.com";
/// API version prefix appended to the host.
pub const API_VERSION: &str = "v1";
/// Suffix on the documents path for structured queries.
pub const RUN_QUERY_SUFFIX: &str = ":runQuery";
/// OAuth scope granting read/write access to Firestore.
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

// --- Document fields ---

pub const FIELD_PLAYER_NAME: &str = "playerName";
pub const FIELD_SCORE: &str = "score";

/// Name reported for documents stored without a `playerName` field.
pub const UNKNOWN_PLAYER: &str = "Unknown";

/// Documents path of the default database for a project.
pub fn documents_path(project_id: &str) -> String {
    format!("projects/{}/databases/(default)/documents", project_id)
}

// --- Data Transfer Objects ---

/// A typed Firestore value.
///
/// Firestore encodes 64-bit integers as decimal strings. Value kinds the leaderboard
/// does not use (timestamps, maps, ...) are ignored when decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integer_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_value: Option<f64>,
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string_value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn integer(value: i64) -> Self {
        Self {
            integer_value: Some(value.to_string()),
            ..Self::default()
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.string_value.as_deref()
    }

    /// Integer value; doubles are truncated toward zero, saturating at the `i64`
    /// bounds, and NaN reads as 0.
    pub fn as_i64(&self) -> Option<i64> {
        if let Some(raw) = &self.integer_value {
            return raw.parse().ok();
        }
        self.double_value.map(|d| {
            if !d.is_finite() || d < i64::MIN as f64 || d >= i64::MAX as f64 {
                tracing::debug!("Clamping out-of-range double score {}", d);
            }
            d as i64
        })
    }
}

/// A Firestore document.
///
/// `name` is the full resource name (`projects/.../documents/scores/<id>`), assigned
/// by the server on creation and omitted from create requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

impl Document {
    pub fn from_entry(entry: &ScoreEntry) -> Self {
        let mut fields = HashMap::new();
        fields.insert(
            FIELD_PLAYER_NAME.to_string(),
            Value::string(entry.player_name.clone()),
        );
        fields.insert(FIELD_SCORE.to_string(), Value::integer(entry.score));

        Self { name: None, fields }
    }

    /// Decodes the entry, defaulting missing fields to `"Unknown"` and `0`.
    pub fn to_entry(&self) -> ScoreEntry {
        let player_name = self
            .fields
            .get(FIELD_PLAYER_NAME)
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_PLAYER)
            .to_string();
        let score = self
            .fields
            .get(FIELD_SCORE)
            .and_then(Value::as_i64)
            .unwrap_or(0);

        ScoreEntry { player_name, score }
    }
}

/// Body of a `documents:runQuery` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    pub order_by: Vec<Order>,
    pub limit: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub field: FieldReference,
    pub direction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub field_path: String,
}

impl RunQueryRequest {
    /// Top `limit` documents of `collection` by descending score.
    pub fn top_scores(collection: &str, limit: usize) -> Self {
        Self {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: collection.to_string(),
                }],
                order_by: vec![Order {
                    field: FieldReference {
                        field_path: FIELD_SCORE.to_string(),
                    },
                    direction: "DESCENDING".to_string(),
                }],
                limit: i32::try_from(limit).unwrap_or(i32::MAX),
            },
        }
    }
}

/// One element of the streamed `runQuery` response array.
///
/// Elements without a `document` only carry progress metadata (`readTime`,
/// `skippedResults`) and are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryResponseItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
}

/// Successful OAuth token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}
