//! HTTP Handlers
//!
//! REST endpoints for account and review operations.

use crate::error::ApiError;
use crate::models::*;
use crate::AppState;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ============================================
// Route Builder
// ============================================

/// Create API routes
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/reviews", post(create_review))
        .route("/reviews/:product_id", get(list_reviews))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Unwrap a JSON body, turning syntax and type errors into a 400
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

// ============================================
// Handlers
// ============================================

/// GET /health
async fn health() -> &'static str {
    "ok"
}

/// POST /signup
async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = json_body(payload)?;
    let user = state.auth.signup(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = json_body(payload)?;
    let result = state.auth.login(req).await?;
    Ok(Json(result))
}

/// POST /reviews
async fn create_review(
    State(state): State<AppState>,
    payload: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = json_body(payload)?;
    let review = state.reviews.create(req).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /reviews/:product_id
async fn list_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state.reviews.list(&product_id).await?;
    Ok(Json(reviews))
}
