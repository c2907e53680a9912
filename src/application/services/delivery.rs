//! Delivery charge service for checkout and the tariff admin screen

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::delivery::{example_calculations, model::round_to_cents};
use crate::domain::{
    calculate_delivery_breakdown, Address, DefaultRates, DeliveryChargeBreakdown,
    DeliverySettingsRepository, DomainError, DomainResult, ExampleCalculation,
    PackageWeight, StoredDeliverySettings,
};

/// One cart line handed over by checkout.
#[derive(Debug, Clone)]
pub struct ParcelLine {
    pub seller_id: String,
    pub seller_address: Option<Address>,
    pub weight: PackageWeight,
}

/// Charge for everything a single seller ships.
#[derive(Debug, Clone, Serialize)]
pub struct SellerDeliveryQuote {
    pub seller_id: String,
    pub breakdown: DeliveryChargeBreakdown,
}

/// Delivery charges for a whole cart, one entry per seller.
#[derive(Debug, Clone, Serialize)]
pub struct CartDeliveryQuote {
    pub sellers: Vec<SellerDeliveryQuote>,
    pub total: Decimal,
}

/// Service for delivery pricing operations
pub struct DeliveryChargeService {
    settings: Arc<dyn DeliverySettingsRepository>,
    defaults: DefaultRates,
    currency: String,
}

impl DeliveryChargeService {
    pub fn new(
        settings: Arc<dyn DeliverySettingsRepository>,
        defaults: DefaultRates,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            settings,
            defaults,
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub async fn quote(
        &self,
        buyer: &Address,
        seller: Option<&Address>,
        weight: PackageWeight,
    ) -> DomainResult<DeliveryChargeBreakdown> {
        let stored = self.settings.get().await?;
        let breakdown = calculate_delivery_breakdown(buyer, seller, &stored.settings, weight);

        debug!(
            tier = %breakdown.tier,
            weight_kg = %breakdown.billable_weight_kg,
            total = %breakdown.total,
            seller_known = seller.is_some(),
            "Delivery charge quoted"
        );

        Ok(breakdown)
    }

    /// Quote a multi-seller cart.
    ///
    /// Lines are grouped by `seller_id` in order of first appearance; each
    /// group ships as one parcel whose weight is the sum of its lines.
    pub async fn quote_cart(
        &self,
        buyer: &Address,
        lines: Vec<ParcelLine>,
    ) -> DomainResult<CartDeliveryQuote> {
        if lines.is_empty() {
            return Err(DomainError::Validation(
                "Cart must contain at least one parcel".to_string(),
            ));
        }

        let stored = self.settings.get().await?;
        let groups = group_by_seller(lines);

        let sellers: Vec<SellerDeliveryQuote> = groups
            .into_iter()
            .map(|group| SellerDeliveryQuote {
                breakdown: calculate_delivery_breakdown(
                    buyer,
                    group.seller_address.as_ref(),
                    &stored.settings,
                    group.weight,
                ),
                seller_id: group.seller_id,
            })
            .collect();

        let total = round_to_cents(
            sellers
                .iter()
                .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.breakdown.total)),
        );

        info!(
            sellers = sellers.len(),
            total = %total,
            currency = self.currency.as_str(),
            "Cart delivery charge calculated"
        );

        Ok(CartDeliveryQuote { sellers, total })
    }

    pub async fn settings(&self) -> DomainResult<StoredDeliverySettings> {
        self.settings.get().await
    }

    /// Normalize an admin-submitted settings object and store it.
    /// Apply a partial settings edit.
    ///
    /// Keys may use any of the historical spellings. Fields the edit does
    /// not mention keep their stored value; a field set to zero or garbage
    /// goes back to its configured default.
    pub async fn update_settings(&self, raw: &Value) -> DomainResult<StoredDeliverySettings> {
        let Some(patch) = raw.as_object() else {
            return Err(DomainError::Validation(
                "Delivery settings must be a JSON object".to_string(),
            ));
        };

        let current = self.settings.get().await?;
        let settings = current.settings.merged_with(patch, &self.defaults);
        let stored = self.settings.save(settings).await?;

        info!(
            intra_upazilla = %stored.settings.intra_upazilla_charge,
            intra_district = %stored.settings.intra_district_charge,
            inter_district = %stored.settings.inter_district_charge,
            "Delivery settings updated"
        );

        Ok(stored)
    }

    pub async fn example_calculations(&self) -> DomainResult<Vec<ExampleCalculation>> {
        let stored = self.settings.get().await?;
        Ok(example_calculations(&stored.settings))
    }
}

struct SellerGroup {
    seller_id: String,
    seller_address: Option<Address>,
    weight: PackageWeight,
}

fn group_by_seller(lines: Vec<ParcelLine>) -> Vec<SellerGroup> {
    let mut groups: Vec<SellerGroup> = Vec::new();

    for line in lines {
        match groups.iter_mut().find(|g| g.seller_id == line.seller_id) {
            Some(group) => {
                group.weight = group.weight + line.weight;
                if group.seller_address.is_none() {
                    group.seller_address = line.seller_address;
                }
            }
            None => groups.push(SellerGroup {
                seller_id: line.seller_id,
                seller_address: line.seller_address,
                weight: line.weight,
            }),
        }
    }

    groups
}

// ── Tests ──────────────────────────────────────────────────────
