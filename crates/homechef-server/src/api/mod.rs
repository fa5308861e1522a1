//! HTTP API (axum) for the marketplace.

mod admin;
mod bookmarks;
mod catalog;
mod extract;
mod form;
mod identity;
mod orders;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{delete, get, post, put},
    Json, Router,
};
use ed25519_dalek::SigningKey;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::image_store::ImageStore;
use crate::store::Store;

/// Room for the text fields that travel next to an image in one form.
const FORM_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub images: Arc<ImageStore>,
    pub signing_key: Arc<SigningKey>,
    pub config: Arc<ServerConfig>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let uploads = ServeDir::new(state.images.base_path());
    let body_limit = state.config.max_upload_size + FORM_OVERHEAD;

    Router::new()
        .route("/health", get(health_check))
        // identity
        .route("/signup", post(identity::signup))
        .route("/login", post(identity::login))
        .route("/register-seller", post(identity::register_seller))
        .route("/user", get(identity::get_user).put(identity::update_user))
        .route(
            "/seller",
            get(identity::get_seller).put(identity::update_seller),
        )
        // catalog
        .route("/all-dishes", get(catalog::list_dishes))
        .route("/dish/:id", get(catalog::get_dish))
        .route("/upload", post(catalog::upload_dish))
        .route("/dishes", get(catalog::seller_dishes))
        .route("/recipes/:id", delete(catalog::delete_dish))
        .route("/feedback", post(catalog::submit_feedback))
        // bookmarks
        .route("/save-recipe", post(bookmarks::save_recipe))
        .route("/saved-recipes", get(bookmarks::saved_recipes))
        // orders
        .route("/place-order", post(orders::place_order))
        .route("/orders/:order_id", get(orders::get_order))
        .route("/seller-orders", get(orders::seller_orders))
        .route("/update-order-status", put(orders::update_order_status))
        // admin
        .route("/admin/customers", get(admin::all_customers))
        .route("/admin/sellers", get(admin::all_sellers))
        .route("/admin/orders", get(admin::all_orders))
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use ed25519_dalek::SigningKey;
    use homechef_store::Database;
    use rand::rngs::OsRng;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::{build_router, AppState};
    use crate::config::ServerConfig;
    use crate::image_store::ImageStore;
    use crate::store::Store;

    const BOUNDARY: &str = "homechef-test-boundary";

    pub struct TestApp {
        pub router: Router,
        pub state: AppState,
        pub upload_dir: TempDir,
    }

    impl TestApp {
        pub async fn new() -> Self {
            let upload_dir = TempDir::new().unwrap();
            let config = ServerConfig {
                upload_dir: upload_dir.path().to_path_buf(),
                ..ServerConfig::default()
            };
            let images = ImageStore::new(config.upload_dir.clone(), config.max_upload_size)
                .await
                .unwrap();

            let state = AppState {
                store: Store::new(Database::open_in_memory().unwrap()),
                images: Arc::new(images),
                signing_key: Arc::new(SigningKey::generate(&mut OsRng)),
                config: Arc::new(config),
            };

            Self {
                router: build_router(state.clone()),
                state,
                upload_dir,
            }
        }

        pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, body)
        }

        pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
            self.send(Request::get(uri).body(Body::empty()).unwrap())
                .await
        }

        pub async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();
            self.send(request).await
        }

        pub async fn multipart(
            &self,
            uri: &str,
            fields: &[(&str, &str)],
            image: Option<(&str, &[u8])>,
        ) -> (StatusCode, Value) {
            let mut body = Vec::new();
            for (name, value) in fields {
                body.extend_from_slice(
                    format!(
                        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                    )
                    .as_bytes(),
                );
            }
            if let Some((file_name, data)) = image {
                body.extend_from_slice(
                    format!(
                        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
            body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

            let request = Request::post(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap();
            self.send(request).await
        }

        /// Number of files currently in the upload directory.
        pub fn stored_images(&self) -> usize {
            std::fs::read_dir(self.upload_dir.path()).unwrap().count()
        }

        // -- seeding through the public routes ---------------------------

        pub async fn signup(&self, name: &str, password: &str) -> i64 {
            let (status, body) = self
                .json(
                    "POST",
                    "/signup",
                    serde_json::json!({
                        "customerName": name,
                        "customerPassword": password,
                        "customerEmail": format!("{name}@example.com"),
                        "customerPhoneNum": "555-0100",
                    }),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            body["userId"].as_i64().unwrap()
        }

        pub async fn register_seller(&self, name: &str) -> i64 {
            let email = format!("{name}@kitchen.example");
            let (status, body) = self
                .multipart(
                    "/register-seller",
                    &[
                        ("name", name),
                        ("email", &email),
                        ("password", "secret-pass"),
                        ("cuisineType", "West African"),
                    ],
                    None,
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            body["sellerId"].as_i64().unwrap()
        }

        pub async fn upload_dish(&self, chef_id: i64, name: &str, price: &str) -> i64 {
            let chef = chef_id.to_string();
            let (status, body) = self
                .multipart(
                    "/upload",
                    &[("name", name), ("price", price), ("chefId", &chef)],
                    None,
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            body["dishId"].as_i64().unwrap()
        }

        pub async fn place_order(&self, customer_id: i64, dish_ids: &[i64]) -> i64 {
            let items: Vec<Value> = dish_ids
                .iter()
                .map(|id| serde_json::json!({ "dishId": id, "quantity": 1, "price": 10.0 }))
                .collect();
            let (status, body) = self
                .json(
                    "POST",
                    "/place-order",
                    serde_json::json!({
                        "customerId": customer_id,
                        "totalAmount": 10.0 * dish_ids.len() as f64,
                        "deliveryAddress": "12 Harbour Rd",
                        "deliveryTime": "19:00",
                        "paymentMethod": "cash",
                        "items": items,
                    }),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            body["orderId"].as_i64().unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::testing::TestApp;

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_uploaded_image_is_served() {
        let app = TestApp::new().await;
        let chef = app.register_seller("amara").await;
        let chef_id = chef.to_string();

        let (status, body) = app
            .multipart(
                "/upload",
                &[("name", "Jollof"), ("price", "12.5"), ("chefId", &chef_id)],
                Some(("jollof.png", b"png-bytes".as_slice())),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, dish) = app
            .get(&format!("/dish/{}", body["dishId"].as_i64().unwrap()))
            .await;
        let image_path = dish["imagePath"].as_str().unwrap().to_string();
        assert!(image_path.starts_with("uploads/"));

        let response = app
            .router
            .clone()
            .oneshot(
                Request::get(format!("/{image_path}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"png-bytes");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = TestApp::new().await;
        let (status, _) = app.get("/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
