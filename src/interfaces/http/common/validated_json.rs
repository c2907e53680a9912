//! JSON body extractor that also runs `validator` rules
//!
//! A body that is not valid JSON for the target type is a 400. A body that
//! parses but breaks a `#[validate]` rule is a 422 whose error lists every
//! failing field as `field: message`, sorted by field.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Malformed(JsonRejection),
    Invalid(ValidationErrors),
}

impl ValidatedJsonRejection {
    fn status(&self) -> StatusCode {
        match self {
            Self::Malformed(_) => StatusCode::BAD_REQUEST,
            Self::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Malformed(rejection) => format!("Invalid JSON: {}", rejection.body_text()),
            Self::Invalid(errors) => describe_field_errors(errors),
        }
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.message());
        (self.status(), Json(body)).into_response()
    }
}

/// `"parcels: between 1 and 100 parcels required; ..."`
fn describe_field_errors(errors: &ValidationErrors) -> String {
    let mut lines: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();

    if lines.is_empty() {
        return "Validation failed".to_string();
    }
    lines.sort();
    lines.join("; ")
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Malformed)?;
        body.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(Self(body))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::post;
    use axum::Router;
    use serde_json::{json, Value};

    use crate::interfaces::http::modules::delivery::dto::CartQuoteRequest;

    async fn count_parcels(ValidatedJson(req): ValidatedJson<CartQuoteRequest>) -> String {
        req.parcels.len().to_string()
    }

    async fn post_cart(body: Body) -> (StatusCode, Vec<u8>) {
        use tower::Service;

        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/cart")
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let mut svc = Router::new()
            .route("/cart", post(count_parcels))
            .into_service();
        let resp = svc.call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    fn cart(parcels: usize) -> Body {
        let parcels: Vec<Value> = (0..parcels)
            .map(|i| json!({ "seller_id": format!("s{i}"), "weight_kg": 1 }))
            .collect();
        let body = json!({ "buyer_address": { "district": "Dhaka" }, "parcels": parcels });
        Body::from(serde_json::to_vec(&body).unwrap())
    }

    #[tokio::test]
    async fn hundred_parcels_pass() {
        let (status, body) = post_cart(cart(100)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"100");
    }

    #[tokio::test]
    async fn oversized_cart_is_unprocessable() {
        let (status, body) = post_cart(cart(101)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "parcels: between 1 and 100 parcels required");
    }

    #[tokio::test]
    async fn empty_cart_is_unprocessable() {
        let (status, body) = post_cart(cart(0)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "parcels: between 1 and 100 parcels required");
    }

    #[tokio::test]
    async fn truncated_json_is_bad_request() {
        let (status, body) = post_cart(Body::from(r#"{ "buyer_address": "#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn parcel_without_seller_id_is_bad_request() {
        let body = json!({ "buyer_address": {}, "parcels": [{ "weight_kg": 2 }] });
        let (status, _) = post_cart(Body::from(serde_json::to_vec(&body).unwrap())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
