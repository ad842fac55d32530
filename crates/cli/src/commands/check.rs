//! Validate the base schema against what the storefront expects.
//!
//! The records API has no schema endpoint for personal-token bases, so this
//! reads one record per table and compares its field names against the
//! expected list. Fields that are empty on the sampled record are omitted
//! from the API response, so a MISSING result on an optional field can be a
//! false alarm.

use tracing::{info, warn};

use velora_storefront::airtable::{AirtableClient, AirtableError, ListQuery, Table};
use velora_storefront::config::AirtableConfig;

/// One expected field: name and whether the storefront requires it.
struct ExpectedField {
    name: &'static str,
    required: bool,
}

const fn req(name: &'static str) -> ExpectedField {
    ExpectedField {
        name,
        required: true,
    }
}

const fn opt(name: &'static str) -> ExpectedField {
    ExpectedField {
        name,
        required: false,
    }
}

fn expected_schema() -> Vec<(Table, Vec<ExpectedField>)> {
    vec![
        (
            Table::Categories,
            vec![
                req("Name"),
                req("Slug"),
                opt("Description"),
                opt("Image"),
                req("Display Order"),
                req("Active"),
            ],
        ),
        (
            Table::Products,
            vec![
                req("Name"),
                req("Slug"),
                opt("Description"),
                opt("Short Description"),
                opt("Category"),
                req("Price"),
                opt("Compare At Price"),
                req("SKU"),
                opt("Images"),
                req("Stock Quantity"),
                opt("Low Stock Threshold"),
                opt("Stock Status"),
                opt("Brand"),
                opt("Shade/Color"),
                opt("Weight"),
                opt("Ingredients"),
                opt("Featured"),
                req("Active"),
            ],
        ),
        (
            Table::Orders,
            vec![
                req("Order Number"),
                req("Customer Name"),
                req("Customer Email"),
                opt("Customer Phone"),
                req("Shipping Address"),
                req("Shipping City"),
                req("Shipping State"),
                req("Shipping Postal Code"),
                req("Order Items"),
                req("Total Items"),
                req("Subtotal"),
                opt("Tax"),
                opt("Shipping Cost"),
                req("Total Amount"),
                req("Order Status"),
                req("Payment Status"),
                opt("Notes"),
                opt("Internal Notes"),
            ],
        ),
        (
            Table::PaymentMethods,
            vec![
                req("Name"),
                opt("Icon"),
                opt("Description"),
                opt("Display Order"),
                req("Active"),
            ],
        ),
        (
            Table::ShippingMethods,
            vec![
                req("Name"),
                opt("Icon"),
                opt("Description"),
                req("Cost"),
                opt("Free Shipping Threshold"),
                opt("Estimated Days"),
                opt("Display Order"),
                req("Active"),
            ],
        ),
    ]
}

/// Check every table the storefront reads or writes.
///
/// # Errors
///
/// Returns an error if configuration is missing or any required field is
/// absent; individual table failures are reported and checking continues.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AirtableConfig::from_env()?;
    let client = AirtableClient::new(&config);

    let mut all_good = true;

    for (table, fields) in expected_schema() {
        info!(table = table.name(), "Checking table");

        let probe = ListQuery::new().max_records(1);
        let records = match client.list(table, &probe).await {
            Ok(records) => records,
            Err(AirtableError::NotFound) => {
                warn!(table = table.name(), "Table not found; create it first");
                all_good = false;
                continue;
            }
            Err(e) => {
                warn!(table = table.name(), error = %e, "Could not read table");
                all_good = false;
                continue;
            }
        };

        let Some(sample) = records.first() else {
            warn!(
                table = table.name(),
                "Table is empty; field check needs at least one record"
            );
            continue;
        };

        for field in fields {
            let exists = sample.fields.contains_key(field.name);
            if exists {
                info!(table = table.name(), field = field.name, "present");
            } else if field.required {
                warn!(table = table.name(), field = field.name, "MISSING (required)");
                all_good = false;
            } else {
                info!(
                    table = table.name(),
                    field = field.name,
                    "absent (optional, may just be empty on the sample)"
                );
            }
        }
    }

    if all_good {
        info!("All required fields are present");
        Ok(())
    } else {
        Err("schema check found problems; see output above".into())
    }
}
