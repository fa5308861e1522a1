//! Dish catalog: browsing, uploads, deletion and feedback.

use axum::{extract::State, http::StatusCode, Json};
use homechef_shared::constants::{MAX_RATING, MIN_RATING};
use homechef_shared::CategoryTags;
use homechef_store::{DishWithChef, NewDish, NewFeedback, SellerDish, StoreError};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::form::FormData;
use super::AppState;
use crate::error::{conflict, not_found, ApiError};

pub async fn list_dishes(
    State(state): State<AppState>,
) -> Result<Json<Vec<DishWithChef>>, ApiError> {
    let dishes = state.store.call(|db| Ok(db.list_dishes()?)).await?;
    Ok(Json(dishes))
}

pub async fn get_dish(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DishWithChef>, ApiError> {
    let dish = state
        .store
        .call(move |db| db.get_dish(id).map_err(not_found("Dish")))
        .await?;
    Ok(Json(dish))
}

/// Parse a submitted price: a finite, non-negative number.
fn parse_price(raw: &str) -> Result<f64, ApiError> {
    match raw.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(ApiError::Validation(
            "price must be a non-negative number".to_string(),
        )),
    }
}

pub async fn upload_dish(
    State(state): State<AppState>,
    mut form: FormData,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = form.require("name")?;
    let price = parse_price(&form.require("price")?)?;
    let chef_id: i64 = form
        .require("chefId")?
        .parse()
        .map_err(|_| ApiError::Validation("chefId must be an integer".to_string()))?;

    let image_path = match form.take_image() {
        Some(image) => Some(
            state
                .images
                .store_image(image.file_name.as_deref(), &image.data)
                .await?,
        ),
        None => None,
    };

    let dish = NewDish {
        name,
        price,
        category: CategoryTags::from_inputs(form.all("category")),
        description: form.text("description"),
        ingredients: form.text("ingredients"),
        instructions: form.text("instructions"),
        image_path: image_path.clone(),
        chef_id,
    };

    let inserted = state
        .store
        .call(move |db| {
            db.insert_dish(&dish).map_err(|e| match e {
                StoreError::ForeignKey => ApiError::Validation("Unknown chef".to_string()),
                other => other.into(),
            })
        })
        .await;

    let dish_id = match inserted {
        Ok(id) => id,
        Err(e) => {
            if let Some(path) = image_path {
                if let Err(cleanup) = state.images.delete_image(&path).await {
                    warn!(error = %cleanup, path = %path, "Failed to remove orphaned dish image");
                }
            }
            return Err(e);
        }
    };

    info!(dish_id, chef_id, "Dish uploaded");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Dish uploaded successfully", "dishId": dish_id })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct SellerQuery {
    #[serde(rename = "sellerId")]
    seller_id: i64,
}

pub async fn seller_dishes(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SellerQuery>,
) -> Result<Json<Vec<SellerDish>>, ApiError> {
    let dishes = state
        .store
        .call(move |db| Ok(db.list_seller_dishes(query.seller_id)?))
        .await?;
    Ok(Json(dishes))
}

pub async fn delete_dish(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    let image_path = state
        .store
        .call(move |db| {
            let image_path = db.get_dish(id).map_err(not_found("Dish"))?.dish.image_path;
            let deleted = db
                .delete_dish(id)
                .map_err(conflict("Dish is referenced by existing orders"))?;
            if !deleted {
                return Err(ApiError::NotFound("Dish not found".to_string()));
            }
            Ok(image_path)
        })
        .await?;

    if let Some(path) = image_path {
        if let Err(e) = state.images.delete_image(&path).await {
            warn!(error = %e, path = %path, "Failed to remove image of deleted dish");
        }
    }

    info!(dish_id = id, "Dish deleted");
    Ok(Json(json!({ "message": "Dish deleted successfully" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    dish_id: i64,
    customer_id: Option<i64>,
    rating: i64,
    #[serde(default)]
    comment: String,
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FeedbackRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if !(MIN_RATING..=MAX_RATING).contains(&req.rating) {
        return Err(ApiError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }

    let feedback = NewFeedback {
        dish_id: req.dish_id,
        customer_id: req.customer_id,
        rating: req.rating,
        comment: req.comment.trim().to_string(),
    };
    let id = state
        .store
        .call(move |db| {
            db.insert_feedback(&feedback).map_err(|e| match e {
                StoreError::ForeignKey => ApiError::Validation("Unknown customer".to_string()),
                other => not_found("Dish")(other),
            })
        })
        .await?;

    info!(feedback_id = id, dish_id = req.dish_id, "Feedback recorded");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Feedback submitted successfully", "feedbackId": id })),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::parse_price;
    use crate::api::testing::TestApp;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(" 12.50 ").unwrap(), 12.5);
        assert_eq!(parse_price("0").unwrap(), 0.0);
        assert!(parse_price("-1").is_err());
        assert!(parse_price("NaN").is_err());
        assert!(parse_price("inf").is_err());
        assert!(parse_price("twelve").is_err());
    }

    #[tokio::test]
    async fn test_upload_merges_categories() {
        let app = TestApp::new().await;
        let chef = app.register_seller("amara").await.to_string();

        let (status, body) = app
            .multipart(
                "/upload",
                &[
                    ("name", "Jollof"),
                    ("price", "12"),
                    ("chefId", &chef),
                    ("category", "Rice, Spicy"),
                    ("category", "spicy"),
                    ("category", " Party "),
                ],
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, dish) = app
            .get(&format!("/dish/{}", body["dishId"].as_i64().unwrap()))
            .await;
        assert_eq!(dish["category"], json!(["Rice", "Spicy", "Party"]));
        assert_eq!(dish["chefName"], "amara");
    }

    #[tokio::test]
    async fn test_upload_validation() {
        let app = TestApp::new().await;

        let (status, body) = app
            .multipart("/upload", &[("name", "Jollof"), ("chefId", "1")], None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "price is required");

        let (status, body) = app
            .multipart(
                "/upload",
                &[("name", "Jollof"), ("price", "5"), ("chefId", "77")],
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Unknown chef");
    }

    #[tokio::test]
    async fn test_get_missing_dish() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/dish/404").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Dish not found");

        let (status, _) = app.get("/dish/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_dishes_newest_first() {
        let app = TestApp::new().await;
        let chef = app.register_seller("amara").await;
        app.upload_dish(chef, "Jollof", "12").await;
        app.upload_dish(chef, "Suya", "8").await;

        let (status, body) = app.get("/all-dishes").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Suya", "Jollof"]);
    }

    #[tokio::test]
    async fn test_seller_dishes_with_feedback() {
        let app = TestApp::new().await;
        let customer = app.signup("alice", "secret-pass").await;
        let chef = app.register_seller("amara").await;
        let jollof = app.upload_dish(chef, "Jollof", "12").await;
        let suya = app.upload_dish(chef, "Suya", "8").await;

        for rating in [4, 5] {
            let (status, _) = app
                .json(
                    "POST",
                    "/feedback",
                    json!({
                        "dishId": jollof,
                        "customerId": customer,
                        "rating": rating,
                        "comment": "lovely",
                    }),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = app.get(&format!("/dishes?sellerId={chef}")).await;
        assert_eq!(status, StatusCode::OK);
        let dishes = body.as_array().unwrap();
        assert_eq!(dishes.len(), 2);

        let jollof_row = dishes.iter().find(|d| d["id"] == jollof).unwrap();
        assert_eq!(jollof_row["feedback"].as_array().unwrap().len(), 2);
        assert_eq!(jollof_row["averageRating"], 4.5);

        let suya_row = dishes.iter().find(|d| d["id"] == suya).unwrap();
        assert_eq!(suya_row["feedback"], json!([]));
        assert!(suya_row["averageRating"].is_null());
    }

    #[tokio::test]
    async fn test_feedback_validation() {
        let app = TestApp::new().await;
        let chef = app.register_seller("amara").await;
        let dish = app.upload_dish(chef, "Jollof", "12").await;

        let (status, _) = app
            .json("POST", "/feedback", json!({ "dishId": dish, "rating": 6 }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .json("POST", "/feedback", json!({ "dishId": 999, "rating": 3 }))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Dish not found");
    }

    #[tokio::test]
    async fn test_delete_dish() {
        let app = TestApp::new().await;
        let chef = app.register_seller("amara").await;
        let dish = app.upload_dish(chef, "Jollof", "12").await;

        let (status, _) = app
            .json("DELETE", &format!("/recipes/{dish}"), json!(null))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .json("DELETE", &format!("/recipes/{dish}"), json!(null))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_ordered_dish_conflicts() {
        let app = TestApp::new().await;
        let customer = app.signup("alice", "secret-pass").await;
        let chef = app.register_seller("amara").await;
        let dish = app.upload_dish(chef, "Jollof", "12").await;
        app.place_order(customer, &[dish]).await;

        let (status, body) = app
            .json("DELETE", &format!("/recipes/{dish}"), json!(null))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Dish is referenced by existing orders");

        let (status, _) = app.get(&format!("/dish/{dish}")).await;
        assert_eq!(status, StatusCode::OK);
    }
}
