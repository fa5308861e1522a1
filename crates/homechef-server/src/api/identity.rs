//! Customer signup, seller registration, login and profile handlers.

use axum::{extract::State, http::StatusCode, Json};
use homechef_shared::password::{hash_password, verify_password};
use homechef_shared::token::{issue_token, AuthClaims};
use homechef_shared::Role;
use homechef_store::{
    Chef, ChefUpdate, Credentials, Customer, CustomerUpdate, NewChef, NewCustomer, StoreError,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use validator::Validate;

use super::extract::{optional, required, required_secret, ApiJson, ApiQuery};
use super::form::FormData;
use super::AppState;
use crate::error::{conflict, not_found, ApiError};

const EMAIL_TAKEN: &str = "Email is already registered";

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    id: i64,
}

// ---------------------------------------------------------------------------
// Signup & login
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    customer_name: Option<String>,
    customer_password: Option<String>,
    customer_email: Option<String>,
    customer_phone_num: Option<String>,
}

pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let all_required = || ApiError::Validation("All fields are required".to_string());
    let name = required(req.customer_name, "customerName").map_err(|_| all_required())?;
    let password =
        required_secret(req.customer_password, "customerPassword").map_err(|_| all_required())?;
    let email = required(req.customer_email, "customerEmail").map_err(|_| all_required())?;
    let phone = required(req.customer_phone_num, "customerPhoneNum").map_err(|_| all_required())?;

    let password_digest = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let customer = NewCustomer {
        name,
        password_digest,
        email,
        phone,
    };
    let id = state
        .store
        .call(move |db| db.insert_customer(&customer).map_err(conflict(EMAIL_TAKEN)))
        .await?;

    info!(customer_id = id, "Customer registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully", "userId": id })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    message: &'static str,
    token: String,
    role: Role,
    id: i64,
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = required(req.username, "username")?;
    let password = required_secret(req.password, "password")?;

    // customers first; chefs only when no customer matched
    let found: Option<Credentials> = state
        .store
        .call(move |db| match db.find_customer_credentials(&username)? {
            Some(credentials) => Ok(Some(credentials)),
            None => Ok(db.find_chef_credentials(&username)?),
        })
        .await?;

    let Some(Credentials {
        id,
        role,
        password_digest,
    }) = found
    else {
        return Err(ApiError::Unauthorized);
    };

    let matches =
        tokio::task::spawn_blocking(move || verify_password(&password, &password_digest)).await??;
    if !matches {
        return Err(ApiError::Unauthorized);
    }

    let claims = AuthClaims::new(id, role, chrono::Utc::now(), state.config.token_ttl_secs)?;
    let token = issue_token(&claims, &state.signing_key)?;

    info!(id, %role, "Login succeeded");
    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
        role,
        id,
    }))
}

// ---------------------------------------------------------------------------
// Seller registration
// ---------------------------------------------------------------------------

#[derive(Debug, Validate)]
struct SellerRegistration {
    #[validate(length(min = 1, message = "name is required"))]
    name: String,
    #[validate(email(message = "A valid email is required"))]
    email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    password: String,
}

pub async fn register_seller(
    State(state): State<AppState>,
    mut form: FormData,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let registration = SellerRegistration {
        name: form.text("name").unwrap_or_default(),
        email: form.text("email").unwrap_or_default(),
        password: form.raw("password").unwrap_or_default().to_string(),
    };
    registration.validate()?;

    let SellerRegistration {
        name,
        email,
        password,
    } = registration;
    let password_digest = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    // past this point only the insert can fail, and it removes the image
    let image_path = match form.take_image() {
        Some(image) => Some(
            state
                .images
                .store_image(image.file_name.as_deref(), &image.data)
                .await?,
        ),
        None => None,
    };

    let chef = NewChef {
        name,
        email,
        password_digest,
        phone: form.text("phone"),
        address: form.text("address"),
        bio: form.text("bio"),
        cuisine_type: form.text("cuisineType"),
        image_path: image_path.clone(),
        working_hours_from: form.text("workingHoursFrom"),
        working_hours_to: form.text("workingHoursTo"),
    };

    let inserted = state
        .store
        .call(move |db| db.insert_chef(&chef).map_err(conflict(EMAIL_TAKEN)))
        .await;

    let id = match inserted {
        Ok(id) => id,
        Err(e) => {
            if let Some(path) = image_path {
                if let Err(cleanup) = state.images.delete_image(&path).await {
                    warn!(error = %cleanup, path = %path, "Failed to remove orphaned seller image");
                }
            }
            return Err(e);
        }
    };

    info!(chef_id = id, "Seller registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Seller registered successfully", "sellerId": id })),
    ))
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

pub async fn get_user(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> Result<Json<Customer>, ApiError> {
    let customer = state
        .store
        .call(move |db| db.get_customer(query.id).map_err(not_found("User")))
        .await?;
    Ok(Json(customer))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

pub async fn update_user(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdQuery>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<Customer>, ApiError> {
    let update = CustomerUpdate {
        name: optional(req.name),
        email: optional(req.email),
        phone: optional(req.phone),
    };
    if update.name.is_none() && update.email.is_none() && update.phone.is_none() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let customer = state
        .store
        .call(move |db| {
            db.update_customer(query.id, &update).map_err(|e| match e {
                StoreError::Conflict(_) => ApiError::Conflict(EMAIL_TAKEN.to_string()),
                other => not_found("User")(other),
            })
        })
        .await?;

    info!(customer_id = customer.id, "Customer profile updated");
    Ok(Json(customer))
}

pub async fn get_seller(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> Result<Json<Chef>, ApiError> {
    let chef = state
        .store
        .call(move |db| db.get_chef(query.id).map_err(not_found("Seller")))
        .await?;
    Ok(Json(chef))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSellerRequest {
    phone: Option<String>,
    address: Option<String>,
    bio: Option<String>,
    cuisine_type: Option<String>,
    working_hours_from: Option<String>,
    working_hours_to: Option<String>,
}

pub async fn update_seller(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdQuery>,
    ApiJson(req): ApiJson<UpdateSellerRequest>,
) -> Result<Json<Chef>, ApiError> {
    let update = ChefUpdate {
        phone: optional(req.phone),
        address: optional(req.address),
        bio: optional(req.bio),
        cuisine_type: optional(req.cuisine_type),
        working_hours_from: optional(req.working_hours_from),
        working_hours_to: optional(req.working_hours_to),
    };
    let empty = [
        &update.phone,
        &update.address,
        &update.bio,
        &update.cuisine_type,
        &update.working_hours_from,
        &update.working_hours_to,
    ]
    .iter()
    .all(|field| field.is_none());
    if empty {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let chef = state
        .store
        .call(move |db| db.update_chef(query.id, &update).map_err(not_found("Seller")))
        .await?;

    info!(chef_id = chef.id, "Seller profile updated");
    Ok(Json(chef))
}
