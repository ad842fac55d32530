//! Wire types for the record service's REST API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record envelope: `{id, createdTime, fields}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Deserialize into a domain type, injecting the record id into the
    /// fields object under `id` (domain structs carry the id inline).
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error when the fields do not match `T`.
    pub fn into_typed<T: serde::de::DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::String(self.id));
        serde_json::from_value(Value::Object(fields))
    }
}

/// Response page for a list request; `offset` is present while more pages
/// remain.
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub offset: Option<String>,
}

/// Create/update request body.
#[derive(Debug, Serialize)]
pub struct WriteRequest {
    pub fields: Value,
    /// Let the service coerce select options and linked records from strings.
    pub typecast: bool,
}

/// Error payload returned by the service (`{"error": {"type", "message"}}`).
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiErrorDetail {
    Full {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(String),
}

impl ApiErrorDetail {
    /// Human-readable message for logs.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Full { kind, message } => message
                .clone()
                .unwrap_or_else(|| kind.clone()),
            Self::Bare(kind) => kind.clone(),
        }
    }
}
