//! Populate the base with the demo makeup catalog.
//!
//! Tables must already exist in the base; this command only inserts records.
//! Categories go in first so products can link to them by record id.

use std::collections::HashMap;

use serde_json::{Value, json};
use tracing::info;

use velora_storefront::airtable::{AirtableClient, Table};
use velora_storefront::config::AirtableConfig;

/// Demo categories in display order.
fn categories() -> Vec<Value> {
    vec![
        json!({"Name": "Lipsticks", "Slug": "lipsticks", "Description": "Bold and beautiful lip colors for every occasion", "Display Order": 1, "Active": true}),
        json!({"Name": "Eyeshadow", "Slug": "eyeshadow", "Description": "Stunning eye palettes and singles", "Display Order": 2, "Active": true}),
        json!({"Name": "Foundation", "Slug": "foundation", "Description": "Flawless base for your perfect complexion", "Display Order": 3, "Active": true}),
        json!({"Name": "Blush", "Slug": "blush", "Description": "Add a natural flush to your cheeks", "Display Order": 4, "Active": true}),
        json!({"Name": "Mascara", "Slug": "mascara", "Description": "Volumizing and lengthening formulas", "Display Order": 5, "Active": true}),
    ]
}

/// Demo products. Stock levels deliberately include a low-stock item per
/// threshold (5 of 10, 8 of 15) so the stock badges have something to show.
fn products() -> Vec<Value> {
    vec![
        json!({
            "Name": "Velvet Matte Lipstick - Ruby Red",
            "Slug": "velvet-matte-lipstick-ruby-red",
            "Description": "A luxurious velvet matte lipstick with intense color payoff and all-day comfort. The creamy formula glides on smoothly and sets to a beautiful matte finish without drying out your lips.",
            "Short Description": "Luxurious velvet matte finish in a stunning ruby red shade",
            "Price": 24.99, "Compare At Price": 34.99,
            "SKU": "LIP-VEL-RUB-001",
            "Stock Quantity": 45, "Low Stock Threshold": 10,
            "Brand": "GlamPro", "Shade/Color": "Ruby Red", "Weight": "3.5g",
            "Featured": true, "Active": true,
            "Ingredients": "Dimethicone, Synthetic Wax, Silica, Vitamin E, Natural Oils",
        }),
        json!({
            "Name": "Satin Finish Lipstick - Nude Rose",
            "Slug": "satin-finish-lipstick-nude-rose",
            "Description": "The perfect everyday nude with a satin finish. This lipstick provides buildable coverage with a comfortable, non-drying formula enriched with moisturizing ingredients.",
            "Short Description": "Everyday nude with moisturizing satin finish",
            "Price": 22.99,
            "SKU": "LIP-SAT-NUD-002",
            "Stock Quantity": 38, "Low Stock Threshold": 10,
            "Brand": "GlamPro", "Shade/Color": "Nude Rose", "Weight": "3.5g",
            "Featured": false, "Active": true,
            "Ingredients": "Castor Oil, Beeswax, Vitamin E, Shea Butter, Natural Pigments",
        }),
        json!({
            "Name": "Glossy Lip Lacquer - Berry Burst",
            "Slug": "glossy-lip-lacquer-berry-burst",
            "Description": "High-shine lip lacquer with a non-sticky formula. Delivers intense color and brilliant shine that lasts for hours.",
            "Short Description": "High-shine, non-sticky berry gloss",
            "Price": 18.99,
            "SKU": "LIP-GLS-BER-003",
            "Stock Quantity": 52, "Low Stock Threshold": 10,
            "Brand": "LuxeGloss", "Shade/Color": "Berry Burst", "Weight": "4ml",
            "Featured": true, "Active": true,
            "Ingredients": "Polybutene, Vitamin E, Natural Oils, Mica, Fragrance",
        }),
        json!({
            "Name": "Glamour Nights Eyeshadow Palette",
            "Slug": "glamour-nights-eyeshadow-palette",
            "Description": "A versatile 12-shade palette featuring a mix of matte, shimmer, and metallic finishes. From soft neutrals to dramatic smoky shades, create endless eye looks for day or night.",
            "Short Description": "12 stunning shades for day to night looks",
            "Price": 42.99, "Compare At Price": 58.99,
            "SKU": "EYE-PAL-GLM-001",
            "Stock Quantity": 28, "Low Stock Threshold": 5,
            "Brand": "ColorCraft", "Shade/Color": "Neutral & Smoky", "Weight": "15g",
            "Featured": true, "Active": true,
            "Ingredients": "Talc, Mica, Synthetic Fluorphlogopite, Vitamin E, Mineral Pigments",
        }),
        json!({
            "Name": "Rose Gold Shimmer Shadow",
            "Slug": "rose-gold-shimmer-shadow",
            "Description": "A stunning rose gold shimmer eyeshadow with incredible color payoff. The buttery formula blends seamlessly and stays put all day without creasing.",
            "Short Description": "Buttery rose gold shimmer with all-day wear",
            "Price": 16.99,
            "SKU": "EYE-SGL-RSG-002",
            "Stock Quantity": 42, "Low Stock Threshold": 10,
            "Brand": "ColorCraft", "Shade/Color": "Rose Gold", "Weight": "2.5g",
            "Featured": false, "Active": true,
            "Ingredients": "Mica, Talc, Titanium Dioxide, Iron Oxides, Vitamin E",
        }),
        json!({
            "Name": "Matte Brown Eyeshadow Duo",
            "Slug": "matte-brown-eyeshadow-duo",
            "Description": "Perfect for sculpting and defining, this duo features two essential matte brown shades. Highly pigmented and easy to blend.",
            "Short Description": "Essential matte browns for sculpting",
            "Price": 19.99,
            "SKU": "EYE-DUO-BRN-003",
            "Stock Quantity": 5, "Low Stock Threshold": 10,
            "Brand": "ColorCraft", "Shade/Color": "Light & Medium Brown", "Weight": "4g",
            "Featured": false, "Active": true,
            "Ingredients": "Talc, Mica, Kaolin Clay, Vitamin E, Natural Pigments",
        }),
        json!({
            "Name": "Flawless Coverage Foundation - Porcelain",
            "Slug": "flawless-coverage-foundation-porcelain",
            "Description": "Medium to full coverage foundation with a natural matte finish. This long-wearing formula provides up to 24-hour coverage while feeling lightweight on the skin. Enriched with skincare ingredients.",
            "Short Description": "24-hour coverage with a natural matte finish",
            "Price": 38.99, "Compare At Price": 48.99,
            "SKU": "FND-FLW-POR-001",
            "Stock Quantity": 35, "Low Stock Threshold": 8,
            "Brand": "PerfectBase", "Shade/Color": "Porcelain", "Weight": "30ml",
            "Featured": true, "Active": true,
            "Ingredients": "Water, Dimethicone, Glycerin, Titanium Dioxide, Hyaluronic Acid, SPF 15",
        }),
        json!({
            "Name": "Flawless Coverage Foundation - Honey",
            "Slug": "flawless-coverage-foundation-honey",
            "Description": "Medium to full coverage foundation perfect for medium skin tones. Natural matte finish with 24-hour wear and skincare benefits.",
            "Short Description": "Perfect for medium skin with warm undertones",
            "Price": 38.99,
            "SKU": "FND-FLW-HON-002",
            "Stock Quantity": 32, "Low Stock Threshold": 8,
            "Brand": "PerfectBase", "Shade/Color": "Honey", "Weight": "30ml",
            "Featured": false, "Active": true,
            "Ingredients": "Water, Dimethicone, Glycerin, Iron Oxides, Hyaluronic Acid, SPF 15",
        }),
        json!({
            "Name": "Dewy Glow Foundation - Beige",
            "Slug": "dewy-glow-foundation-beige",
            "Description": "Lightweight foundation with a luminous finish. Provides buildable coverage while giving your skin a healthy, radiant glow. Perfect for dry or normal skin types.",
            "Short Description": "Luminous, lightweight foundation for glowing skin",
            "Price": 36.99,
            "SKU": "FND-DEW-BEI-003",
            "Stock Quantity": 28, "Low Stock Threshold": 8,
            "Brand": "RadiantGlow", "Shade/Color": "Beige", "Weight": "30ml",
            "Featured": false, "Active": true,
            "Ingredients": "Water, Glycerin, Hyaluronic Acid, Vitamin C, Pearl Extract, SPF 20",
        }),
        json!({
            "Name": "Powder Blush - Pink Petal",
            "Slug": "powder-blush-pink-petal",
            "Description": "Silky powder blush that delivers a natural flush of color. The buildable formula blends seamlessly and lasts all day without fading.",
            "Short Description": "Natural flush with buildable color",
            "Price": 21.99,
            "SKU": "BLH-PWD-PNK-001",
            "Stock Quantity": 40, "Low Stock Threshold": 10,
            "Brand": "ColorBloom", "Shade/Color": "Pink Petal", "Weight": "5g",
            "Featured": false, "Active": true,
            "Ingredients": "Talc, Mica, Vitamin E, Natural Pigments, Jojoba Oil",
        }),
        json!({
            "Name": "Cream Blush - Coral Kiss",
            "Slug": "cream-blush-coral-kiss",
            "Description": "Creamy blush stick for a dewy, natural-looking flush. Easy to apply and blend, perfect for on-the-go touch-ups.",
            "Short Description": "Creamy stick blush for dewy cheeks",
            "Price": 24.99,
            "SKU": "BLH-CRM-COR-002",
            "Stock Quantity": 33, "Low Stock Threshold": 10,
            "Brand": "ColorBloom", "Shade/Color": "Coral Kiss", "Weight": "4g",
            "Featured": true, "Active": true,
            "Ingredients": "Dimethicone, Vitamin E, Shea Butter, Natural Pigments",
        }),
        json!({
            "Name": "Volume Max Mascara - Black",
            "Slug": "volume-max-mascara-black",
            "Description": "Dramatic volume mascara with a specially designed brush that coats every lash. Buildable formula for customizable volume without clumping or flaking.",
            "Short Description": "Dramatic volume without clumps",
            "Price": 19.99, "Compare At Price": 26.99,
            "SKU": "MSC-VOL-BLK-001",
            "Stock Quantity": 55, "Low Stock Threshold": 15,
            "Brand": "LashPerfect", "Shade/Color": "Black", "Weight": "8ml",
            "Featured": true, "Active": true,
            "Ingredients": "Water, Beeswax, Carnauba Wax, Panthenol, Vitamin E, Iron Oxides",
        }),
        json!({
            "Name": "Lengthening Mascara - Brown",
            "Slug": "lengthening-mascara-brown",
            "Description": "Lengthening mascara that extends and defines each lash. Perfect for a natural, everyday look with a brown tint.",
            "Short Description": "Natural lengthening in soft brown",
            "Price": 18.99,
            "SKU": "MSC-LEN-BRN-002",
            "Stock Quantity": 8, "Low Stock Threshold": 15,
            "Brand": "LashPerfect", "Shade/Color": "Brown", "Weight": "8ml",
            "Featured": false, "Active": true,
            "Ingredients": "Water, Beeswax, Carnauba Wax, Panthenol, Vitamin E, Natural Pigments",
        }),
    ]
}

/// Manual payment options the storefront offers at checkout.
fn payment_methods() -> Vec<Value> {
    vec![
        json!({"Name": "Bank Transfer", "Description": "Transfer to our account; include your order number in the reference", "Display Order": 1, "Active": true}),
        json!({"Name": "Cash on Delivery", "Description": "Pay the courier in cash when your order arrives", "Display Order": 2, "Active": true}),
    ]
}

/// Shipping options with the standard free-shipping threshold.
fn shipping_methods() -> Vec<Value> {
    vec![
        json!({"Name": "Standard Shipping", "Description": "Tracked delivery", "Cost": 5.99, "Free Shipping Threshold": 50.0, "Estimated Days": "3-5", "Display Order": 1, "Active": true}),
        json!({"Name": "Express Shipping", "Description": "Next-day courier", "Cost": 14.99, "Estimated Days": "1-2", "Display Order": 2, "Active": true}),
    ]
}

/// Pick the category for a product by its name, mirroring how the demo
/// catalog is organized.
fn category_for(product_name: &str) -> Option<&'static str> {
    if product_name.contains("Lipstick") || product_name.contains("Lip") {
        Some("Lipsticks")
    } else if product_name.contains("Eyeshadow") || product_name.contains("Shadow") {
        Some("Eyeshadow")
    } else if product_name.contains("Foundation") {
        Some("Foundation")
    } else if product_name.contains("Blush") {
        Some("Blush")
    } else if product_name.contains("Mascara") {
        Some("Mascara")
    } else {
        None
    }
}

/// Seed the base with the demo catalog.
///
/// # Errors
///
/// Returns an error if configuration is missing or any create fails. Creates
/// are not transactional; a partial seed leaves whatever was inserted.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AirtableConfig::from_env()?;
    let client = AirtableClient::new(&config);

    info!("Creating categories");
    let mut category_ids: HashMap<String, String> = HashMap::new();
    for fields in categories() {
        let name = fields
            .get("Name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let record = client.create(Table::Categories, fields).await?;
        category_ids.insert(name, record.id);
    }
    info!(count = category_ids.len(), "Categories created");

    info!("Creating products");
    let mut created = 0usize;
    for mut fields in products() {
        let name = fields
            .get("Name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let link = category_for(&name).and_then(|category| category_ids.get(category));
        if let (Some(id), Some(map)) = (link, fields.as_object_mut()) {
            map.insert("Category".to_string(), json!([id]));
        }
        client.create(Table::Products, fields).await?;
        created += 1;
    }
    info!(count = created, "Products created");

    info!("Creating checkout methods");
    for fields in payment_methods() {
        client.create(Table::PaymentMethods, fields).await?;
    }
    for fields in shipping_methods() {
        client.create(Table::ShippingMethods, fields).await?;
    }

    info!("Seed complete; Orders table is ready for customer orders");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_product_maps_to_a_category() {
        for product in products() {
            let name = product
                .get("Name")
                .and_then(Value::as_str)
                .expect("product name");
            assert!(
                category_for(name).is_some(),
                "no category for product {name}"
            );
        }
    }

    #[test]
    fn test_category_matching_rules() {
        assert_eq!(
            category_for("Glossy Lip Lacquer - Berry Burst"),
            Some("Lipsticks")
        );
        assert_eq!(category_for("Rose Gold Shimmer Shadow"), Some("Eyeshadow"));
        assert_eq!(category_for("Mystery Item"), None);
    }

    #[test]
    fn test_slugs_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for product in products() {
            let slug = product
                .get("Slug")
                .and_then(Value::as_str)
                .expect("product slug");
            assert!(seen.insert(slug.to_string()), "duplicate slug {slug}");
        }
    }
}
