use axum::{extract::State, http::StatusCode, Json};
use homechef_store::{SavedRecipe, StoreError};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::extract::{ApiJson, ApiQuery};
use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecipeRequest {
    customer_id: i64,
    dish_id: i64,
}

pub async fn save_recipe(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SaveRecipeRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let SaveRecipeRequest {
        customer_id,
        dish_id,
    } = req;

    let id = state
        .store
        .call(move |db| {
            db.save_recipe(customer_id, dish_id).map_err(|e| match e {
                StoreError::Conflict(_) => ApiError::Conflict("Recipe already saved".to_string()),
                StoreError::ForeignKey => {
                    ApiError::Validation("Unknown customer or dish".to_string())
                }
                other => other.into(),
            })
        })
        .await?;

    info!(customer_id, dish_id, "Recipe saved");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Recipe saved successfully", "savedRecipeId": id })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CustomerQuery {
    customerid: i64,
}

pub async fn saved_recipes(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CustomerQuery>,
) -> Result<Json<Vec<SavedRecipe>>, ApiError> {
    let recipes = state
        .store
        .call(move |db| Ok(db.list_saved_recipes(query.customerid)?))
        .await?;
    Ok(Json(recipes))
}
