//! Delivery DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{CartDeliveryQuote, ParcelLine};
use crate::domain::{
    Address, DeliveryChargeBreakdown, DeliveryTier, ExampleCalculation, PackageWeight,
    StoredDeliverySettings,
};

/// Single-seller quote
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    pub buyer_address: Address,
    /// `null` or absent when the seller has no address on file
    #[serde(default)]
    pub seller_address: Option<Address>,
    /// Kilograms; numbers or numeric strings. Absent means 1 kg.
    #[serde(default)]
    pub weight_kg: Option<Value>,
}

/// One cart line
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParcelRequest {
    pub seller_id: String,
    #[serde(default)]
    pub seller_address: Option<Address>,
    #[serde(default)]
    pub weight_kg: Option<Value>,
}

impl From<ParcelRequest> for ParcelLine {
    fn from(p: ParcelRequest) -> Self {
        Self {
            seller_id: p.seller_id,
            seller_address: p.seller_address,
            weight: PackageWeight::from_value(p.weight_kg.as_ref()),
        }
    }
}

/// Multi-seller cart quote
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CartQuoteRequest {
    pub buyer_address: Address,
    #[validate(length(min = 1, max = 100, message = "between 1 and 100 parcels required"))]
    pub parcels: Vec<ParcelRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeliveryQuoteResponse {
    pub tier: DeliveryTier,
    pub base_charge: Decimal,
    pub extra_kg_charge: Decimal,
    pub billable_weight_kg: Decimal,
    pub extra_units: Decimal,
    pub surcharge: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub formatted_total: String,
}

impl DeliveryQuoteResponse {
    pub fn new(b: DeliveryChargeBreakdown, currency: &str) -> Self {
        Self {
            formatted_total: b.format_total(currency),
            tier: b.tier,
            base_charge: b.base_charge,
            extra_kg_charge: b.extra_kg_charge,
            billable_weight_kg: b.billable_weight_kg,
            extra_units: b.extra_units,
            surcharge: b.surcharge,
            total: b.total,
            currency: currency.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SellerQuoteResponse {
    pub seller_id: String,
    pub quote: DeliveryQuoteResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartQuoteResponse {
    pub sellers: Vec<SellerQuoteResponse>,
    pub total: Decimal,
    pub currency: String,
    pub formatted_total: String,
}

impl CartQuoteResponse {
    pub fn new(q: CartDeliveryQuote, currency: &str) -> Self {
        Self {
            sellers: q
                .sellers
                .into_iter()
                .map(|s| SellerQuoteResponse {
                    seller_id: s.seller_id,
                    quote: DeliveryQuoteResponse::new(s.breakdown, currency),
                })
                .collect(),
            formatted_total: format!("{:.2} {}", q.total, currency),
            total: q.total,
            currency: currency.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeliverySettingsResponse {
    pub intra_upazilla_charge: Decimal,
    pub intra_upazilla_extra_kg_charge: Decimal,
    pub intra_district_charge: Decimal,
    pub intra_district_extra_kg_charge: Decimal,
    pub inter_district_charge: Decimal,
    pub inter_district_extra_kg_charge: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredDeliverySettings> for DeliverySettingsResponse {
    fn from(stored: StoredDeliverySettings) -> Self {
        let s = stored.settings;
        Self {
            intra_upazilla_charge: s.intra_upazilla_charge,
            intra_upazilla_extra_kg_charge: s.intra_upazilla_extra_kg_charge,
            intra_district_charge: s.intra_district_charge,
            intra_district_extra_kg_charge: s.intra_district_extra_kg_charge,
            inter_district_charge: s.inter_district_charge,
            inter_district_extra_kg_charge: s.inter_district_extra_kg_charge,
            updated_at: stored.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExampleCalculationResponse {
    pub tier: DeliveryTier,
    pub weight_kg: Decimal,
    pub quote: DeliveryQuoteResponse,
}

impl ExampleCalculationResponse {
    pub fn new(e: ExampleCalculation, currency: &str) -> Self {
        Self {
            tier: e.tier,
            weight_kg: e.weight_kg,
            quote: DeliveryQuoteResponse::new(e.breakdown, currency),
        }
    }
}
