use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::database::models::{Category, Product};

/// Wire shape for categories. camelCase on the wire; the owned products list
/// only appears on the categories-with-products read.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    #[serde(default)]
    pub category_id: i32,

    #[validate(length(min = 1, max = 80, message = "Name must be 1 to 80 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 300, message = "Image URL must be 1 to 300 characters"))]
    pub image_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductDto>>,
}

/// Wire shape for products. Stock and registration timestamp are entity-only
/// fields; inbound mapping resets them to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(default)]
    pub product_id: i32,

    #[validate(length(min = 1, max = 80, message = "Name must be 1 to 80 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 255, message = "Description must be 1 to 255 characters"))]
    pub description: String,

    #[validate(custom(function = validate_non_negative_price))]
    pub price: Decimal,

    #[validate(length(min = 1, max = 255, message = "Image URL must be 1 to 255 characters"))]
    pub image_url: String,

    pub category_id: i32,

    // Back-reference, never populated outbound; kept out of the JSON entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Box<CategoryDto>>,
}

fn validate_non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut error = ValidationError::new("price");
        error.message = Some("Price must not be negative".into());
        return Err(error);
    }
    Ok(())
}

/// Authentication request body. Accepts the PascalCase names of the existing
/// contract as well as camelCase.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct AuthRequest {
    #[serde(alias = "userName")]
    pub user_name: String,

    #[serde(alias = "password")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

// Entity <-> DTO mappings, both directions for each pair.

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            category_id: category.id,
            name: category.name,
            image_url: category.image_url,
            products: None,
        }
    }
}

impl From<CategoryDto> for Category {
    fn from(dto: CategoryDto) -> Self {
        Self {
            id: dto.category_id,
            name: dto.name,
            image_url: dto.image_url,
        }
    }
}

impl From<(Category, Vec<Product>)> for CategoryDto {
    fn from((category, products): (Category, Vec<Product>)) -> Self {
        let mut dto = CategoryDto::from(category);
        dto.products = Some(products.into_iter().map(ProductDto::from).collect());
        dto
    }
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            image_url: product.image_url,
            category_id: product.category_id,
            category: None,
        }
    }
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        Self {
            id: dto.product_id,
            name: dto.name,
            description: dto.description,
            price: dto.price,
            image_url: dto.image_url,
            stock: 0.0,
            register_date: Utc::now(),
            category_id: dto.category_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: 7,
            name: "Espresso".to_string(),
            description: "Double shot".to_string(),
            price: Decimal::new(350, 2),
            image_url: "espresso.jpg".to_string(),
            stock: 12.0,
            register_date: Utc::now(),
            category_id: 1,
        }
    }

    #[test]
    fn category_maps_both_ways() {
        let category = Category {
            id: 3,
            name: "Drinks".to_string(),
            image_url: "drinks.jpg".to_string(),
        };

        let dto = CategoryDto::from(category.clone());
        assert_eq!(dto.category_id, 3);
        assert!(dto.products.is_none());

        let back = Category::from(dto);
        assert_eq!(back.id, category.id);
        assert_eq!(back.name, category.name);
        assert_eq!(back.image_url, category.image_url);
    }

    #[test]
    fn product_dto_drops_stock_and_register_date_outbound() {
        let json = serde_json::to_value(ProductDto::from(sample_product())).expect("serialize");

        assert_eq!(json["productId"], 7);
        assert_eq!(json["categoryId"], 1);
        assert!(json.get("stock").is_none());
        assert!(json.get("registerDate").is_none());
        assert!(json.get("category").is_none());
    }

    #[test]
    fn inbound_product_mapping_resets_entity_only_fields() {
        let dto = ProductDto::from(sample_product());
        let entity = Product::from(dto);

        assert_eq!(entity.id, 7);
        assert_eq!(entity.stock, 0.0);
    }

    #[test]
    fn auth_request_accepts_pascal_case_names() {
        let request: AuthRequest =
            serde_json::from_str(r#"{"UserName": "alice", "Password": "secret"}"#)
                .expect("deserialize");
        assert_eq!(request.user_name, "alice");
        assert_eq!(request.password, "secret");
    }

    #[test]
    fn validation_rejects_oversized_name() {
        let mut dto = CategoryDto {
            category_id: 0,
            name: "x".repeat(81),
            image_url: "ok.jpg".to_string(),
            products: None,
        };
        assert!(dto.validate().is_err());

        dto.name = "x".repeat(80);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn validation_rejects_negative_price() {
        let mut dto = ProductDto::from(sample_product());
        assert!(dto.validate().is_ok());

        dto.price = Decimal::new(-1, 2);
        assert!(dto.validate().is_err());
    }
}
