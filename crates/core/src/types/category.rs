//! Category types.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;
use super::product::Attachment;

/// A catalog category as stored in the `Categories` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Record id, injected alongside the fields by the client.
    pub id: CategoryId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Slug")]
    pub slug: String,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Image", default, skip_serializing_if = "Vec::is_empty")]
    pub image: Vec<Attachment>,
    #[serde(rename = "Display Order", default)]
    pub display_order: i64,
    #[serde(rename = "Active", default)]
    pub active: bool,
}
