//! Catalog reads: products, categories, and payment/shipping methods.
//!
//! All storefront-facing queries filter on `{Active}=TRUE()`; the admin sees
//! inactive rows only through its own listing endpoints.

use velora_core::{Category, PaymentMethod, Product, ShippingMethod};

use crate::airtable::{AirtableClient, AirtableError, ListQuery, SortDirection, Table, formula};

use super::typed_records;

/// Cap on free-text search results.
const SEARCH_LIMIT: u32 = 50;

/// Storefront product listing filters.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Restrict to a category (by category slug).
    pub category_slug: Option<String>,
    /// Free-text search over name, description, brand, and category names.
    pub search: Option<String>,
    /// Only featured products.
    pub featured: bool,
}

/// List active products, name-ascending, applying any filters.
///
/// # Errors
///
/// Returns an [`AirtableError`] when the record service call fails.
pub async fn get_products(
    client: &AirtableClient,
    filter: &ProductFilter,
) -> Result<Vec<Product>, AirtableError> {
    let mut clauses = vec![formula::active()];
    let mut limit = None;

    if filter.featured {
        clauses.push(format!("{}=TRUE()", formula::field("Featured")));
    }

    if let Some(slug) = &filter.category_slug {
        // Linked-record fields expose primary-field values (names) to
        // formulas, so resolve the slug to its category name first.
        match get_category_by_slug(client, slug).await? {
            Some(category) => {
                clauses.push(formula::contains_ci_joined("Category", &category.name));
            }
            None => return Ok(Vec::new()),
        }
    }

    if let Some(query) = &filter.search {
        clauses.push(formula::or(&[
            formula::contains_ci("Name", query),
            formula::contains_ci("Description", query),
            formula::contains_ci("Brand", query),
            formula::contains_ci_joined("Category", query),
        ]));
        limit = Some(SEARCH_LIMIT);
    }

    let mut query = ListQuery::new()
        .filter(formula::and(&clauses))
        .sort("Name", SortDirection::Asc);
    if let Some(max) = limit {
        query = query.max_records(max);
    }

    let records = client.list(Table::Products, &query).await?;
    Ok(typed_records(records, "product"))
}

/// Fetch an active product by slug.
///
/// # Errors
///
/// Returns an [`AirtableError`] when the record service call fails.
pub async fn get_product_by_slug(
    client: &AirtableClient,
    slug: &str,
) -> Result<Option<Product>, AirtableError> {
    let query = ListQuery::new()
        .filter(formula::and(&[
            formula::eq("Slug", slug),
            formula::active(),
        ]))
        .max_records(1);

    let records = client.list(Table::Products, &query).await?;
    Ok(typed_records(records, "product").into_iter().next())
}

/// Fetch a product by record id, active or not (admin path).
///
/// # Errors
///
/// Returns an [`AirtableError`] when the record service call fails; a missing
/// id yields `Ok(None)`.
pub async fn get_product_by_id(
    client: &AirtableClient,
    id: &str,
) -> Result<Option<Product>, AirtableError> {
    match client.find(Table::Products, id).await {
        Ok(record) => Ok(record.into_typed().ok()),
        Err(AirtableError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

/// List active categories in display order.
///
/// # Errors
///
/// Returns an [`AirtableError`] when the record service call fails.
pub async fn get_categories(client: &AirtableClient) -> Result<Vec<Category>, AirtableError> {
    let query = ListQuery::new()
        .filter(formula::active())
        .sort("Display Order", SortDirection::Asc);

    let records = client.list(Table::Categories, &query).await?;
    Ok(typed_records(records, "category"))
}

/// Fetch an active category by slug.
///
/// # Errors
///
/// Returns an [`AirtableError`] when the record service call fails.
pub async fn get_category_by_slug(
    client: &AirtableClient,
    slug: &str,
) -> Result<Option<Category>, AirtableError> {
    let query = ListQuery::new()
        .filter(formula::and(&[
            formula::eq("Slug", slug),
            formula::active(),
        ]))
        .max_records(1);

    let records = client.list(Table::Categories, &query).await?;
    Ok(typed_records(records, "category").into_iter().next())
}

/// List active payment methods in display order.
///
/// # Errors
///
/// Returns an [`AirtableError`] when the record service call fails.
pub async fn get_payment_methods(
    client: &AirtableClient,
) -> Result<Vec<PaymentMethod>, AirtableError> {
    let query = ListQuery::new()
        .filter(formula::active())
        .sort("Display Order", SortDirection::Asc);

    let records = client.list(Table::PaymentMethods, &query).await?;
    Ok(typed_records(records, "payment method"))
}

/// List active shipping methods in display order.
///
/// # Errors
///
/// Returns an [`AirtableError`] when the record service call fails.
pub async fn get_shipping_methods(
    client: &AirtableClient,
) -> Result<Vec<ShippingMethod>, AirtableError> {
    let query = ListQuery::new()
        .filter(formula::active())
        .sort("Display Order", SortDirection::Asc);

    let records = client.list(Table::ShippingMethods, &query).await?;
    Ok(typed_records(records, "shipping method"))
}
