//! Integration test harness for Velora Beauty.
//!
//! Spins up the real storefront router against an in-process mock of the
//! record service, so the tests exercise the full HTTP stack - routing,
//! extraction, services, the REST client, and error mapping - without
//! credentials or network access.
//!
//! The mock implements the slice of the records API the storefront uses:
//! list with `filterByFormula`/`sort`/`maxRecords`, find, create (with
//! auto-numbering on the `Orders` table), and partial update. The formula
//! evaluator covers exactly the shapes the storefront's formula builder
//! emits; anything else evaluates to no match.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p velora-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Map, Value, json};
use url::Url;

use velora_storefront::config::{AirtableConfig, StorefrontConfig};
use velora_storefront::state::AppState;

// =============================================================================
// Mock record base
// =============================================================================

#[derive(Default)]
struct MockState {
    /// Records per table, in insertion order: `{id, createdTime, fields}`.
    tables: HashMap<String, Vec<Value>>,
    next_record: u64,
    next_order_number: i64,
}

impl MockState {
    fn insert(&mut self, table: &str, mut fields: Map<String, Value>) -> Value {
        self.next_record += 1;
        if table == "Orders" {
            self.next_order_number += 1;
            fields.insert("Order Number".to_string(), json!(self.next_order_number));
        }
        let record = json!({
            "id": format!("rec{:014}", self.next_record),
            "createdTime": "2026-01-01T00:00:00.000Z",
            "fields": fields,
        });
        self.tables
            .entry(table.to_string())
            .or_default()
            .push(record.clone());
        record
    }
}

/// Handle to the in-process mock base; cloneable, shared with its router.
#[derive(Clone, Default)]
pub struct MockBase {
    state: Arc<Mutex<MockState>>,
}

impl MockBase {
    /// Insert a record directly, returning its assigned id.
    ///
    /// # Panics
    ///
    /// Panics if `fields` is not a JSON object.
    pub fn insert(&self, table: &str, fields: Value) -> String {
        let Value::Object(fields) = fields else {
            panic!("seed fields must be a JSON object");
        };
        let record = self
            .state
            .lock()
            .expect("mock state lock")
            .insert(table, fields);
        record["id"].as_str().expect("record id").to_string()
    }

    /// Read a record's fields back, if it exists.
    #[must_use]
    pub fn fields(&self, table: &str, id: &str) -> Option<Value> {
        let state = self.state.lock().expect("mock state lock");
        state
            .tables
            .get(table)?
            .iter()
            .find(|record| record["id"] == id)
            .map(|record| record["fields"].clone())
    }

    /// The router serving the records API for this base.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route(
                "/v0/{base}/{table}",
                get(list_records).post(create_record),
            )
            .route(
                "/v0/{base}/{table}/{id}",
                get(find_record).patch(update_record),
            )
            .with_state(self.clone())
    }
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": {"type": "NOT_FOUND", "message": message}})),
    )
        .into_response()
}

async fn list_records(
    State(mock): State<MockBase>,
    Path((_base, table)): Path<(String, String)>,
    RawQuery(query): RawQuery,
) -> Response {
    let params: Vec<(String, String)> = query
        .as_deref()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default();

    let filter = params
        .iter()
        .find(|(k, _)| k == "filterByFormula")
        .map(|(_, v)| v.clone());
    let max_records = params
        .iter()
        .find(|(k, _)| k == "maxRecords")
        .and_then(|(_, v)| v.parse::<usize>().ok());
    let sort_keys = parse_sort_params(&params);

    let state = mock.state.lock().expect("mock state lock");
    let Some(records) = state.tables.get(&table) else {
        return not_found("table does not exist");
    };

    let mut matched: Vec<Value> = records
        .iter()
        .filter(|record| {
            let Some(fields) = record["fields"].as_object() else {
                return false;
            };
            filter
                .as_deref()
                .is_none_or(|formula| formula::eval(formula, fields))
        })
        .cloned()
        .collect();

    // Stable sorts applied last key first give multi-key ordering.
    for (field, descending) in sort_keys.iter().rev() {
        matched.sort_by(|a, b| {
            let ordering = compare_values(&a["fields"][field], &b["fields"][field]);
            if *descending { ordering.reverse() } else { ordering }
        });
    }

    if let Some(max) = max_records {
        matched.truncate(max);
    }

    Json(json!({"records": matched})).into_response()
}

async fn find_record(
    State(mock): State<MockBase>,
    Path((_base, table, id)): Path<(String, String, String)>,
) -> Response {
    let state = mock.state.lock().expect("mock state lock");
    state
        .tables
        .get(&table)
        .and_then(|records| records.iter().find(|record| record["id"] == *id))
        .map_or_else(
            || not_found("record not found"),
            |record| Json(record.clone()).into_response(),
        )
}

async fn create_record(
    State(mock): State<MockBase>,
    Path((_base, table)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let Some(fields) = body["fields"].as_object() else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": {"type": "INVALID_REQUEST_BODY", "message": "fields required"}})),
        )
            .into_response();
    };
    let record = mock
        .state
        .lock()
        .expect("mock state lock")
        .insert(&table, fields.clone());
    Json(record).into_response()
}

async fn update_record(
    State(mock): State<MockBase>,
    Path((_base, table, id)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let Some(patch) = body["fields"].as_object() else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": {"type": "INVALID_REQUEST_BODY", "message": "fields required"}})),
        )
            .into_response();
    };

    let mut state = mock.state.lock().expect("mock state lock");
    let Some(record) = state
        .tables
        .get_mut(&table)
        .and_then(|records| records.iter_mut().find(|record| record["id"] == *id))
    else {
        return not_found("record not found");
    };

    if let Some(fields) = record["fields"].as_object_mut() {
        for (key, value) in patch {
            fields.insert(key.clone(), value.clone());
        }
    }
    Json(record.clone()).into_response()
}

fn parse_sort_params(params: &[(String, String)]) -> Vec<(String, bool)> {
    // sort[0][field]=Name & sort[0][direction]=asc
    let mut fields: Vec<(usize, String)> = Vec::new();
    let mut directions: HashMap<usize, bool> = HashMap::new();

    for (key, value) in params {
        if let Some(index) = key
            .strip_prefix("sort[")
            .and_then(|rest| rest.strip_suffix("][field]"))
            .and_then(|idx| idx.parse::<usize>().ok())
        {
            fields.push((index, value.clone()));
        } else if let Some(index) = key
            .strip_prefix("sort[")
            .and_then(|rest| rest.strip_suffix("][direction]"))
            .and_then(|idx| idx.parse::<usize>().ok())
        {
            directions.insert(index, value == "desc");
        }
    }

    fields.sort_by_key(|(index, _)| *index);
    fields
        .into_iter()
        .map(|(index, field)| (field, directions.get(&index).copied().unwrap_or(false)))
        .collect()
}

fn compare_values(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        _ => {
            let x = a.as_str().unwrap_or_default().to_lowercase();
            let y = b.as_str().unwrap_or_default().to_lowercase();
            x.cmp(&y)
        }
    }
}

// =============================================================================
// Formula evaluation
// =============================================================================

/// Evaluator for the formula shapes the storefront emits.
pub mod formula {
    use serde_json::{Map, Value};

    /// Evaluate a filter formula against one record's fields.
    ///
    /// Unrecognized shapes evaluate to `false` so a test that emits a formula
    /// this evaluator cannot handle fails loudly (zero matches) instead of
    /// silently matching everything.
    #[must_use]
    pub fn eval(formula: &str, fields: &Map<String, Value>) -> bool {
        let formula = formula.trim();
        if formula.is_empty() {
            return true;
        }

        if let Some(args) = call_args(formula, "AND") {
            return args.iter().all(|clause| eval(clause, fields));
        }
        if let Some(args) = call_args(formula, "OR") {
            return args.iter().any(|clause| eval(clause, fields));
        }

        // LOWER({Field})=LOWER('value')
        if let Some((name, value)) = split_pattern(formula, "LOWER({", "})=LOWER('", "')") {
            return field_text(fields, &name).to_lowercase() == unescape(&value).to_lowercase();
        }

        // FIND(LOWER('query'), LOWER(ARRAYJOIN({Field})))
        if let Some((value, name)) =
            split_pattern(formula, "FIND(LOWER('", "'), LOWER(ARRAYJOIN({", "})))")
        {
            return field_text(fields, &name)
                .to_lowercase()
                .contains(&unescape(&value).to_lowercase());
        }

        // FIND(LOWER('query'), LOWER({Field}))
        if let Some((value, name)) = split_pattern(formula, "FIND(LOWER('", "'), LOWER({", "}))") {
            return field_text(fields, &name)
                .to_lowercase()
                .contains(&unescape(&value).to_lowercase());
        }

        // {Field}=TRUE()
        if let Some((name, rest)) = split_pattern(formula, "{", "}=", "") {
            if rest == "TRUE()" {
                return fields.get(&name) == Some(&Value::Bool(true));
            }
            // {Field}='value', numbers compared numerically like the live API
            if let Some(value) = rest
                .strip_prefix('\'')
                .and_then(|rest| rest.strip_suffix('\''))
            {
                let value = unescape(value);
                return match fields.get(&name) {
                    Some(Value::Number(n)) => {
                        value.parse::<f64>().is_ok_and(|parsed| {
                            n.as_f64().is_some_and(|actual| {
                                (actual - parsed).abs() < f64::EPSILON
                            })
                        })
                    }
                    Some(Value::String(s)) => *s == value,
                    _ => false,
                };
            }
        }

        false
    }

    /// The arguments of `NAME(a, b, ...)`, split at top-level commas.
    fn call_args(formula: &str, name: &str) -> Option<Vec<String>> {
        let inner = formula
            .strip_prefix(name)?
            .strip_prefix('(')?
            .strip_suffix(')')?;

        let mut args = Vec::new();
        let mut current = String::new();
        let mut depth = 0u32;
        let mut in_quote = false;
        let mut escaped = false;

        for c in inner.chars() {
            if escaped {
                current.push(c);
                escaped = false;
                continue;
            }
            match c {
                '\\' if in_quote => {
                    current.push(c);
                    escaped = true;
                }
                '\'' => {
                    current.push(c);
                    in_quote = !in_quote;
                }
                '(' if !in_quote => {
                    current.push(c);
                    depth += 1;
                }
                ')' if !in_quote => {
                    current.push(c);
                    depth = depth.saturating_sub(1);
                }
                ',' if !in_quote && depth == 0 => {
                    args.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(c),
            }
        }
        if !current.trim().is_empty() {
            args.push(current.trim().to_string());
        }
        Some(args)
    }

    /// Split `prefix A infix B suffix` into `(A, B)`.
    fn split_pattern(
        formula: &str,
        prefix: &str,
        infix: &str,
        suffix: &str,
    ) -> Option<(String, String)> {
        let rest = formula.strip_prefix(prefix)?;
        let rest = rest.strip_suffix(suffix)?;
        let (a, b) = rest.split_once(infix)?;
        Some((a.to_string(), b.to_string()))
    }

    fn unescape(value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut escaped = false;
        for c in value.chars() {
            if escaped {
                out.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else {
                out.push(c);
            }
        }
        out
    }

    /// A field's text for comparisons; arrays join with commas like ARRAYJOIN.
    fn field_text(fields: &Map<String, Value>, name: &str) -> String {
        match fields.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().unwrap_or_default().to_string())
                .collect::<Vec<_>>()
                .join(","),
            _ => String::new(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;

        fn fields(value: Value) -> Map<String, Value> {
            value.as_object().expect("object").clone()
        }

        #[test]
        fn test_active_and_slug() {
            let record = fields(json!({"Active": true, "Slug": "blush"}));
            assert!(eval("AND({Active}=TRUE(), {Slug}='blush')", &record));
            assert!(!eval("AND({Active}=TRUE(), {Slug}='mascara')", &record));
        }

        #[test]
        fn test_case_insensitive_email() {
            let record = fields(json!({"Customer Email": "Jane@X.com"}));
            assert!(eval(
                "LOWER({Customer Email})=LOWER('jane@x.com')",
                &record
            ));
        }

        #[test]
        fn test_numeric_equality_coerces() {
            let record = fields(json!({"Order Number": 7}));
            assert!(eval("{Order Number}='7'", &record));
            assert!(!eval("{Order Number}='8'", &record));
        }

        #[test]
        fn test_find_over_arrayjoin() {
            let record = fields(json!({"Category": ["Lipsticks"]}));
            assert!(eval(
                "FIND(LOWER('lipstick'), LOWER(ARRAYJOIN({Category})))",
                &record
            ));
        }

        #[test]
        fn test_escaped_quote_in_value() {
            let record = fields(json!({"Name": "l'oreal"}));
            assert!(eval("{Name}='l\\'oreal'", &record));
        }

        #[test]
        fn test_unknown_shape_matches_nothing() {
            let record = fields(json!({"Active": true}));
            assert!(!eval("NOT({Active})", &record));
        }
    }
}

// =============================================================================
// Test context
// =============================================================================

/// A running storefront wired to a fresh mock base.
pub struct TestContext {
    /// Plain HTTP client for driving the storefront.
    pub http: reqwest::Client,
    /// Root URL of the storefront under test.
    pub base_url: String,
    /// The mock base, for seeding and direct record inspection.
    pub mock: MockBase,
}

impl TestContext {
    /// Start a mock base and a storefront pointed at it, each on an
    /// ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if either server fails to bind; test-only code.
    pub async fn new() -> Self {
        let mock = MockBase::default();

        let mock_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let mock_addr = mock_listener.local_addr().expect("mock addr");
        let mock_router = mock.router();
        tokio::spawn(async move {
            axum::serve(mock_listener, mock_router)
                .await
                .expect("mock server");
        });

        let config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            airtable: AirtableConfig {
                api_url: Url::parse(&format!("http://{mock_addr}")).expect("mock url"),
                base_id: "appIntegrationTest".to_string(),
                token: SecretString::from("pat-integration-test"),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let app = velora_storefront::app(AppState::new(config));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind storefront listener");
        let addr = listener.local_addr().expect("storefront addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("storefront server");
        });

        Self {
            http: reqwest::Client::new(),
            base_url: format!("http://{addr}"),
            mock,
        }
    }

    /// Full URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
