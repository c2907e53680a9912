//! API router

use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::modules::delivery::{dto, handlers as delivery, DeliveryAppState};
use super::modules::health::{handlers as health, HealthState};
use crate::application::DeliveryChargeService;
use crate::domain::{Address, DeliveryTier};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        delivery::quote,
        delivery::cart_quote,
        delivery::get_settings,
        delivery::update_settings,
        delivery::example_calculations,
    ),
    components(
        schemas(
            ApiResponse<String>,
            Address,
            DeliveryTier,
            health::HealthResponse,
            dto::QuoteRequest,
            dto::ParcelRequest,
            dto::CartQuoteRequest,
            dto::DeliveryQuoteResponse,
            dto::SellerQuoteResponse,
            dto::CartQuoteResponse,
            dto::DeliverySettingsResponse,
            dto::ExampleCalculationResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Delivery", description = "Delivery charge quotes for checkout"),
        (name = "Delivery Settings", description = "Delivery tariff administration"),
    ),
    info(
        title = "Marketplace Delivery API",
        version = "1.0.0",
        description = "Location-based delivery charges for a multi-seller marketplace"
    )
)]
pub struct ApiDoc;

/// Build the REST API.
///
/// ```text
/// GET  /health
/// GET  /docs
/// POST /api/v1/delivery/quote
/// POST /api/v1/delivery/cart-quote
/// GET  /api/v1/delivery/settings
/// PUT  /api/v1/delivery/settings
/// GET  /api/v1/delivery/settings/examples
/// ```
pub fn create_api_router(service: Arc<DeliveryChargeService>) -> Router {
    let health_state = HealthState {
        started_at: Arc::new(Instant::now()),
    };

    let delivery_routes = Router::new()
        .route("/quote", post(delivery::quote))
        .route("/cart-quote", post(delivery::cart_quote))
        .route(
            "/settings",
            get(delivery::get_settings).put(delivery::update_settings),
        )
        .route("/settings/examples", get(delivery::example_calculations))
        .with_state(DeliveryAppState { service });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .with_state(health_state)
        .nest("/api/v1/delivery", delivery_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

// ── Tests ──────────────────────────────────────────────────────
