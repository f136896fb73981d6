//! Product domain entity and its data-transfer shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Product domain entity
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Product {
    /// Unique product identifier
    #[schema(example = 1)]
    pub id: i64,
    /// Product name
    #[schema(example = "Feather Wand")]
    pub name: String,
    /// Manufacturer
    #[schema(example = "Cat Toys Inc.")]
    pub maker: String,
    /// Price in the smallest currency unit
    #[schema(example = 5000)]
    pub price: i32,
    /// Optional product image URL
    #[schema(example = "https://example.com/toy.jpg")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Overwrite the descriptive fields from a data-transfer payload.
    pub fn apply_data(&mut self, data: &ProductData) {
        self.name = data.name.clone();
        self.maker = data.maker.clone();
        self.price = data.price;
        self.image_url = data.image_url.clone();
        self.updated_at = Utc::now();
    }
}

/// Product data-transfer object for create and update requests
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductData {
    /// Product name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Feather Wand")]
    pub name: String,
    /// Manufacturer
    #[validate(length(min = 1, message = "Maker is required"))]
    #[schema(example = "Cat Toys Inc.")]
    pub maker: String,
    /// Price in the smallest currency unit
    #[validate(range(min = 0, message = "Price must not be negative"))]
    #[schema(example = 5000)]
    pub price: i32,
    /// Optional product image URL
    #[schema(example = "https://example.com/toy.jpg")]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_data_overwrites_descriptive_fields() {
        let mut product = Product {
            id: 7,
            name: "Old".to_string(),
            maker: "Old Maker".to_string(),
            price: 100,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        product.apply_data(&ProductData {
            name: "New".to_string(),
            maker: "New Maker".to_string(),
            price: 250,
            image_url: Some("https://example.com/new.jpg".to_string()),
        });

        assert_eq!(product.id, 7);
        assert_eq!(product.name, "New");
        assert_eq!(product.maker, "New Maker");
        assert_eq!(product.price, 250);
        assert_eq!(
            product.image_url.as_deref(),
            Some("https://example.com/new.jpg")
        );
    }

    #[test]
    fn negative_price_fails_validation() {
        use validator::Validate;

        let data = ProductData {
            name: "Toy".to_string(),
            maker: "Maker".to_string(),
            price: -1,
            image_url: None,
        };
        assert!(data.validate().is_err());
    }
}
