//! Order placement, lookup and status lifecycle.
//!
//! Request payloads are deserialized with every field optional so a missing
//! field is reported as a 400 naming it, before anything touches the
//! database.

use axum::{extract::State, http::StatusCode, Json};
use homechef_shared::OrderStatus;
use homechef_store::{NewOrder, NewOrderItem, OrderDetail, StoreError};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::extract::{required, ApiJson, ApiPath, ApiQuery};
use super::AppState;
use crate::error::{not_found, ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    customer_id: Option<i64>,
    total_amount: Option<f64>,
    delivery_address: Option<String>,
    delivery_time: Option<String>,
    payment_method: Option<String>,
    #[serde(default, alias = "lineItems")]
    items: Vec<LineItemRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    dish_id: Option<i64>,
    quantity: Option<i64>,
    price: Option<f64>,
}

fn missing(field: &str) -> ApiError {
    ApiError::Validation(format!("{field} is required"))
}

fn non_negative(value: f64, field: &str) -> Result<f64, ApiError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ApiError::Validation(format!(
            "{field} must be a non-negative number"
        )))
    }
}

impl PlaceOrderRequest {
    fn into_new_order(self) -> Result<NewOrder, ApiError> {
        let customer_id = self.customer_id.ok_or_else(|| missing("customerId"))?;
        let total_amount = non_negative(
            self.total_amount.ok_or_else(|| missing("totalAmount"))?,
            "totalAmount",
        )?;
        let delivery_address = required(self.delivery_address, "deliveryAddress")?;
        let delivery_time = required(self.delivery_time, "deliveryTime")?;
        let payment_method = required(self.payment_method, "paymentMethod")?;

        if self.items.is_empty() {
            return Err(ApiError::Validation(
                "An order needs at least one item".to_string(),
            ));
        }

        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                let dish_id = item
                    .dish_id
                    .ok_or_else(|| missing(&format!("items[{idx}].dishId")))?;
                let quantity = item
                    .quantity
                    .ok_or_else(|| missing(&format!("items[{idx}].quantity")))?;
                if quantity <= 0 {
                    return Err(ApiError::Validation(format!(
                        "items[{idx}].quantity must be positive"
                    )));
                }
                let price = non_negative(
                    item.price
                        .ok_or_else(|| missing(&format!("items[{idx}].price")))?,
                    &format!("items[{idx}].price"),
                )?;
                Ok(NewOrderItem {
                    dish_id,
                    quantity,
                    price,
                })
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        Ok(NewOrder {
            customer_id,
            total_amount,
            delivery_address,
            delivery_time,
            payment_method,
            items,
        })
    }
}

pub async fn place_order(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let order = req.into_new_order()?;

    let order_id = state
        .store
        .call(move |db| {
            db.place_order(&order).map_err(|e| match e {
                StoreError::ForeignKey => {
                    ApiError::Validation("Unknown customer or dish".to_string())
                }
                other => other.into(),
            })
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Order placed successfully", "orderId": order_id })),
    ))
}

pub async fn get_order(
    State(state): State<AppState>,
    ApiPath(order_id): ApiPath<i64>,
) -> Result<Json<OrderDetail>, ApiError> {
    let detail = state
        .store
        .call(move |db| db.get_order_detail(order_id).map_err(not_found("Order")))
        .await?;
    Ok(Json(detail))
}

#[derive(Debug, Deserialize)]
pub struct SellerQuery {
    #[serde(rename = "sellerId")]
    seller_id: i64,
}

pub async fn seller_orders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SellerQuery>,
) -> Result<Json<Vec<OrderDetail>>, ApiError> {
    let orders = state
        .store
        .call(move |db| Ok(db.list_seller_orders(query.seller_id)?))
        .await?;

    if orders.is_empty() {
        return Err(ApiError::NotFound(
            "No orders found for this seller".to_string(),
        ));
    }
    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    order_id: Option<i64>,
    status: Option<String>,
}

pub async fn update_order_status(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> Result<Json<Value>, ApiError> {
    let order_id = req.order_id.ok_or_else(|| missing("orderId"))?;
    let raw = required(req.status, "status")?;
    let status: OrderStatus = raw.parse().map_err(|_| {
        let allowed: Vec<&str> = OrderStatus::ALL.iter().map(OrderStatus::as_str).collect();
        ApiError::Validation(format!(
            "Invalid status '{raw}', expected one of: {}",
            allowed.join(", ")
        ))
    })?;

    state
        .store
        .call(move |db| {
            db.update_order_status(order_id, status)
                .map_err(not_found("Order"))
        })
        .await?;

    info!(order_id, %status, "Order status updated");
    Ok(Json(json!({
        "message": "Order status updated successfully",
        "orderId": order_id,
        "status": status,
    })))
}
