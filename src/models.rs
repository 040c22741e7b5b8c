use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Menu category enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Beverages,
    Snacks,
    Desserts,
}

impl Category {
    /// Convert category to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Beverages => "beverages",
            Category::Snacks => "snacks",
            Category::Desserts => "desserts",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a menu item in the database
///
/// The order core treats this as read-only: `price`, `reward_points` and
/// `available` are snapshotted at order time; later edits never touch
/// existing orders.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MenuItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Espresso")]
    pub name: String,
    pub category: Category,
    #[schema(example = "3.50")]
    pub price: Decimal,
    #[schema(example = 10, minimum = 0)]
    pub reward_points: i32,
    #[schema(example = true)]
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents the data needed to create a new menu item
///
/// Used for POST /api/menu requests. Id and timestamps are auto-generated.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMenuItem {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    #[schema(example = "Espresso")]
    pub name: String,
    pub category: Category,
    #[validate(custom = "crate::validation::validate_price")]
    #[schema(example = "3.50")]
    pub price: Decimal,
    #[validate(range(min = 0, message = "Reward points must be non-negative"))]
    #[schema(example = 10, minimum = 0)]
    pub reward_points: i32,
    #[serde(default = "default_available")]
    #[schema(example = true)]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Represents the data for updating an existing menu item
///
/// All fields are optional to support partial updates.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateMenuItem {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    #[schema(example = "Flat White")]
    pub name: Option<String>,
    pub category: Option<Category>,
    #[validate(custom = "crate::validation::validate_optional_price")]
    #[schema(example = "4.00")]
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Reward points must be non-negative"))]
    #[schema(example = 12, minimum = 0)]
    pub reward_points: Option<i32>,
    #[schema(example = false)]
    pub available: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_menu_item_serialization() {
        let item = MenuItem {
            id: 1,
            name: "Espresso".to_string(),
            category: Category::Beverages,
            price: dec!(3.50),
            reward_points: 10,
            available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&item).expect("Failed to serialize MenuItem");

        assert!(json.contains("\"id\":1"));
        assert!(json.contains("\"name\":\"Espresso\""));
        assert!(json.contains("\"category\":\"beverages\""));
        assert!(json.contains("\"price\":\"3.50\""));
        assert!(json.contains("\"reward_points\":10"));
        assert!(json.contains("\"available\":true"));
    }

    #[test]
    fn test_create_menu_item_deserialization() {
        let json = r#"{
            "name": "Brownie",
            "category": "desserts",
            "price": "2.75",
            "reward_points": 5
        }"#;

        let create: CreateMenuItem =
            serde_json::from_str(json).expect("Failed to deserialize CreateMenuItem");

        assert_eq!(create.name, "Brownie");
        assert_eq!(create.category, Category::Desserts);
        assert_eq!(create.price, dec!(2.75));
        assert_eq!(create.reward_points, 5);
        // availability defaults to true when omitted
        assert!(create.available);
    }

    #[test]
    fn test_create_menu_item_negative_price_rejected() {
        let create = CreateMenuItem {
            name: "Bad".to_string(),
            category: Category::Snacks,
            price: dec!(-1.00),
            reward_points: 0,
            available: true,
        };

        assert!(create.validate().is_err());
    }

    #[test]
    fn test_update_menu_item_partial_fields() {
        let json = r#"{"available": false}"#;

        let update: UpdateMenuItem =
            serde_json::from_str(json).expect("Failed to deserialize UpdateMenuItem");

        assert_eq!(update.available, Some(false));
        assert_eq!(update.name, None);
        assert_eq!(update.category, None);
        assert_eq!(update.price, None);
        assert_eq!(update.reward_points, None);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let json = r#"{
            "name": "Mystery",
            "category": "sides",
            "price": "1.00",
            "reward_points": 0
        }"#;

        let result: Result<CreateMenuItem, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
