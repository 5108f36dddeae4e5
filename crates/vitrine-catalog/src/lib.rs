//! Catalog wire types shared across the Vitrine client core.
//!
//! The storefront backend speaks camelCase JSON; every type here maps 1:1 to
//! a wire shape. Parsing is tolerant: missing optional fields default rather
//! than failing the whole payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend product id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Brand label.
    #[serde(default)]
    pub brand: String,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Image reference (URL or asset key).
    #[serde(default)]
    pub image: String,
    /// Current price.
    #[serde(default)]
    pub price: f64,
    /// Price before a discount was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    /// Discount percentage applied to `original_price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<u32>,
    /// Whether the product is currently discounted.
    #[serde(default)]
    pub is_on_discount: bool,
}

/// A product the user marked as favorite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteProduct {
    /// The favorited product, flattened into the same JSON object.
    #[serde(flatten)]
    pub product: Product,
    /// When the favorite was created.
    pub date_added: DateTime<Utc>,
}

impl FavoriteProduct {
    /// Wrap a product as a favorite added now.
    pub fn new(product: Product) -> Self {
        Self {
            product,
            date_added: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: "p-100".to_string(),
            name: "Canvas Tote".to_string(),
            brand: "Northwind".to_string(),
            category: "bags".to_string(),
            image: "https://cdn.vitrine.shop/p-100.jpg".to_string(),
            price: 49.9,
            original_price: None,
            discount_percentage: None,
            is_on_discount: false,
        }
    }

    #[test]
    fn product_deserializes_sparse_payload() {
        let json = r#"{"id":"p-1","name":"Mug","price":12.5}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, "p-1");
        assert_eq!(product.name, "Mug");
        assert_eq!(product.price, 12.5);
        assert_eq!(product.brand, "");
        assert!(!product.is_on_discount);
        assert!(product.original_price.is_none());
    }

    #[test]
    fn product_serializes_camel_case() {
        let mut product = sample_product();
        product.original_price = Some(49.9);
        product.discount_percentage = Some(10);
        product.is_on_discount = true;

        let json = serde_json::to_string(&product).unwrap();
        assert!(json.contains("\"originalPrice\":49.9"));
        assert!(json.contains("\"discountPercentage\":10"));
        assert!(json.contains("\"isOnDiscount\":true"));
    }

    #[test]
    fn product_skips_absent_discount_fields() {
        let json = serde_json::to_string(&sample_product()).unwrap();
        assert!(!json.contains("originalPrice"));
        assert!(!json.contains("discountPercentage"));
    }

    #[test]
    fn favorite_flattens_product_fields() {
        let favorite = FavoriteProduct::new(sample_product());
        let json = serde_json::to_string(&favorite).unwrap();

        // Product fields and dateAdded live in the same JSON object.
        assert!(json.contains("\"id\":\"p-100\""));
        assert!(json.contains("\"dateAdded\""));
        assert!(!json.contains("\"product\""));
    }

    #[test]
    fn favorite_roundtrip() {
        let favorite = FavoriteProduct::new(sample_product());
        let json = serde_json::to_string(&favorite).unwrap();
        let parsed: FavoriteProduct = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, favorite);
    }
}
