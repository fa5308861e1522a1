use axum::{extract::State, Json};
use homechef_store::{AdminOrderRow, Chef, Customer};

use super::AppState;
use crate::error::ApiError;

pub async fn all_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = state.store.call(|db| Ok(db.list_customers()?)).await?;
    Ok(Json(customers))
}

pub async fn all_sellers(State(state): State<AppState>) -> Result<Json<Vec<Chef>>, ApiError> {
    let chefs = state.store.call(|db| Ok(db.list_chefs()?)).await?;
    Ok(Json(chefs))
}

pub async fn all_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminOrderRow>>, ApiError> {
    let rows = state.store.call(|db| Ok(db.admin_order_rows()?)).await?;
    Ok(Json(rows))
}
