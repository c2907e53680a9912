//! Delivery REST API handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::Value;

use super::dto::{
    CartQuoteRequest, CartQuoteResponse, DeliveryQuoteResponse, DeliverySettingsResponse,
    ExampleCalculationResponse, QuoteRequest,
};
use crate::application::{DeliveryChargeService, ParcelLine};
use crate::domain::PackageWeight;
use crate::interfaces::http::common::{domain_error_response, ApiError, ApiResponse, ValidatedJson};

#[derive(Clone)]
pub struct DeliveryAppState {
    pub service: Arc<DeliveryChargeService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/delivery/quote",
    tag = "Delivery",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Delivery charge for one seller", body = ApiResponse<DeliveryQuoteResponse>),
        (status = 400, description = "Malformed request body")
    )
)]
pub async fn quote(
    State(state): State<DeliveryAppState>,
    ValidatedJson(req): ValidatedJson<QuoteRequest>,
) -> Result<Json<ApiResponse<DeliveryQuoteResponse>>, ApiError> {
    let weight = PackageWeight::from_value(req.weight_kg.as_ref());

    let breakdown = state
        .service
        .quote(&req.buyer_address, req.seller_address.as_ref(), weight)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(DeliveryQuoteResponse::new(
        breakdown,
        state.service.currency(),
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/delivery/cart-quote",
    tag = "Delivery",
    request_body = CartQuoteRequest,
    responses(
        (status = 200, description = "One charge per seller plus the cart total", body = ApiResponse<CartQuoteResponse>),
        (status = 400, description = "Malformed request body"),
        (status = 422, description = "Cart is empty or has more than 100 parcels")
    )
)]
pub async fn cart_quote(
    State(state): State<DeliveryAppState>,
    ValidatedJson(req): ValidatedJson<CartQuoteRequest>,
) -> Result<Json<ApiResponse<CartQuoteResponse>>, ApiError> {
    let lines: Vec<ParcelLine> = req.parcels.into_iter().map(Into::into).collect();

    let quote = state
        .service
        .quote_cart(&req.buyer_address, lines)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(CartQuoteResponse::new(
        quote,
        state.service.currency(),
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/delivery/settings",
    tag = "Delivery Settings",
    responses(
        (status = 200, description = "Current delivery tariff", body = ApiResponse<DeliverySettingsResponse>)
    )
)]
pub async fn get_settings(
    State(state): State<DeliveryAppState>,
) -> Result<Json<ApiResponse<DeliverySettingsResponse>>, ApiError> {
    let stored = state
        .service
        .settings()
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(stored.into())))
}

/// Partial edit of the delivery tariff.
///
/// Keys may use snake_case, camelCase or the legacy "thana" spelling.
/// Omitted fields keep their current value; a field sent as zero, negative
/// or non-numeric resets to its default. Anything but a JSON object is
/// rejected and leaves the tariff untouched.
#[utoipa::path(
    put,
    path = "/api/v1/delivery/settings",
    tag = "Delivery Settings",
    request_body(content = serde_json::Value, description = "Settings fields to change"),
    responses(
        (status = 200, description = "Updated delivery tariff", body = ApiResponse<DeliverySettingsResponse>),
        (status = 422, description = "Body is not a JSON object")
    )
)]
pub async fn update_settings(
    State(state): State<DeliveryAppState>,
    Json(raw): Json<Value>,
) -> Result<Json<ApiResponse<DeliverySettingsResponse>>, ApiError> {
    let stored = state
        .service
        .update_settings(&raw)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(stored.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/delivery/settings/examples",
    tag = "Delivery Settings",
    responses(
        (status = 200, description = "Sample charges for every tier", body = ApiResponse<Vec<ExampleCalculationResponse>>)
    )
)]
pub async fn example_calculations(
    State(state): State<DeliveryAppState>,
) -> Result<Json<ApiResponse<Vec<ExampleCalculationResponse>>>, ApiError> {
    let rows = state
        .service
        .example_calculations()
        .await
        .map_err(domain_error_response)?;

    let currency = state.service.currency();
    let rows = rows
        .into_iter()
        .map(|row| ExampleCalculationResponse::new(row, currency))
        .collect();

    Ok(Json(ApiResponse::success(rows)))
}
