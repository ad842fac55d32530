//! Business services over the record service client.

pub mod admin;
pub mod catalog;
pub mod orders;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::airtable::Record;

/// Convert records into domain values, skipping any that do not match the
/// expected shape.
///
/// The base is hand-edited; a half-filled row should not take down a whole
/// listing, so malformed records are logged and dropped.
fn typed_records<T: DeserializeOwned>(records: Vec<Record>, what: &str) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id.clone();
            match record.into_typed::<T>() {
                Ok(value) => Some(value),
                Err(error) => {
                    warn!(%id, %error, "skipping malformed {what} record");
                    None
                }
            }
        })
        .collect()
}
