//! Row models for the marketplace tables.
//!
//! Read models derive `Serialize` with camelCase field names so the HTTP
//! layer can return them as-is. Password digests never appear on read
//! models; they are only reachable through [`Credentials`].

use chrono::{DateTime, Utc};
use homechef_shared::{CategoryTags, OrderStatus, Role};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub password_digest: String,
    pub email: String,
    pub phone: String,
}

/// Partial customer profile update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chef {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub cuisine_type: Option<String>,
    pub image_path: Option<String>,
    pub working_hours_from: Option<String>,
    pub working_hours_to: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewChef {
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub cuisine_type: Option<String>,
    pub image_path: Option<String>,
    pub working_hours_from: Option<String>,
    pub working_hours_to: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ChefUpdate {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub cuisine_type: Option<String>,
    pub working_hours_from: Option<String>,
    pub working_hours_to: Option<String>,
}

/// Stored login material for one identity row.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub id: i64,
    pub role: Role,
    pub password_digest: String,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: CategoryTags,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub image_path: Option<String>,
    pub chef_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDish {
    pub name: String,
    pub price: f64,
    pub category: CategoryTags,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub image_path: Option<String>,
    pub chef_id: i64,
}

/// A dish joined with its owning chef.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DishWithChef {
    #[serde(flatten)]
    pub dish: Dish,
    pub chef_name: String,
    pub chef_image_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: i64,
    pub dish_id: i64,
    pub customer_id: Option<i64>,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub dish_id: i64,
    pub customer_id: Option<i64>,
    pub rating: i64,
    pub comment: String,
}

/// One of a seller's own dishes with every piece of feedback it received.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SellerDish {
    #[serde(flatten)]
    pub dish: Dish,
    /// Empty when the dish has no feedback, never null.
    pub feedback: Vec<Feedback>,
    pub average_rating: Option<f64>,
}

// ---------------------------------------------------------------------------
// Bookmarks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    pub dish_id: i64,
    pub name: String,
    pub price: f64,
    pub category: CategoryTags,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub chef_name: String,
    pub saved_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub total_amount: f64,
    pub delivery_address: String,
    pub delivery_time: String,
    pub payment_method: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub dish_id: i64,
    pub quantity: i64,
    /// Unit price at the moment the order is placed.
    pub price: f64,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i64,
    pub total_amount: f64,
    pub delivery_address: String,
    pub delivery_time: String,
    pub payment_method: String,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub dish_id: i64,
    pub dish_name: String,
    pub dish_image_path: Option<String>,
    pub quantity: i64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

// ---------------------------------------------------------------------------
// Admin reporting
// ---------------------------------------------------------------------------

/// One row per (order, chef) pair.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderRow {
    pub order_id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub chef_id: i64,
    pub chef_name: String,
    pub dish_names: Vec<String>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}
