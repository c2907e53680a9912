//! Delivery tariff settings and their normalization
//!
//! The settings record is edited in the admin panel and read at checkout,
//! and the two sides have drifted apart over time: snake_case vs camelCase
//! keys, the legacy "thana" naming, numbers stored as strings. All of that
//! is resolved here, once, so pricing only ever sees [`DeliverySettings`].

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::model::DeliveryTier;

pub const DEFAULT_INTRA_UPAZILLA_CHARGE: i64 = 60;
pub const DEFAULT_INTRA_UPAZILLA_EXTRA_KG_CHARGE: i64 = 20;
pub const DEFAULT_INTRA_DISTRICT_CHARGE: i64 = 110;
pub const DEFAULT_INTRA_DISTRICT_EXTRA_KG_CHARGE: i64 = 30;
pub const DEFAULT_INTER_DISTRICT_CHARGE: i64 = 130;
pub const DEFAULT_INTER_DISTRICT_EXTRA_KG_CHARGE: i64 = 40;

const INTRA_UPAZILLA_CHARGE_KEYS: &[&str] = &[
    "intra_upazilla_charge",
    "intraUpazillaCharge",
    "intra_thana_charge",
    "intraThanaCharge",
    "intraUpazilla",
    "intraThana",
];
const INTRA_UPAZILLA_EXTRA_KG_KEYS: &[&str] = &[
    "intra_upazilla_extra_kg_charge",
    "intraUpazillaExtraKgCharge",
    "intra_thana_extra_kg_charge",
    "intraThanaExtraKgCharge",
    "intraUpazillaExtraKg",
    "intraThanaExtraKg",
];
const INTRA_DISTRICT_CHARGE_KEYS: &[&str] = &[
    "intra_district_charge",
    "intraDistrictCharge",
    "intraDistrict",
];
const INTRA_DISTRICT_EXTRA_KG_KEYS: &[&str] = &[
    "intra_district_extra_kg_charge",
    "intraDistrictExtraKgCharge",
    "intraDistrictExtraKg",
];
const INTER_DISTRICT_CHARGE_KEYS: &[&str] = &[
    "inter_district_charge",
    "interDistrictCharge",
    "interDistrict",
];
const INTER_DISTRICT_EXTRA_KG_KEYS: &[&str] = &[
    "inter_district_extra_kg_charge",
    "interDistrictExtraKgCharge",
    "interDistrictExtraKg",
];

/// Base and per-extra-kilogram rate of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierRate {
    pub base: Decimal,
    pub extra_kg: Decimal,
}

/// Fallback rates used for any settings field that is unset or unusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultRates {
    pub intra_upazilla_charge: Decimal,
    pub intra_upazilla_extra_kg_charge: Decimal,
    pub intra_district_charge: Decimal,
    pub intra_district_extra_kg_charge: Decimal,
    pub inter_district_charge: Decimal,
    pub inter_district_extra_kg_charge: Decimal,
}

impl Default for DefaultRates {
    fn default() -> Self {
        Self {
            intra_upazilla_charge: Decimal::from(DEFAULT_INTRA_UPAZILLA_CHARGE),
            intra_upazilla_extra_kg_charge: Decimal::from(DEFAULT_INTRA_UPAZILLA_EXTRA_KG_CHARGE),
            intra_district_charge: Decimal::from(DEFAULT_INTRA_DISTRICT_CHARGE),
            intra_district_extra_kg_charge: Decimal::from(DEFAULT_INTRA_DISTRICT_EXTRA_KG_CHARGE),
            inter_district_charge: Decimal::from(DEFAULT_INTER_DISTRICT_CHARGE),
            inter_district_extra_kg_charge: Decimal::from(DEFAULT_INTER_DISTRICT_EXTRA_KG_CHARGE),
        }
    }
}

/// Canonical delivery tariff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySettings {
    pub intra_upazilla_charge: Decimal,
    pub intra_upazilla_extra_kg_charge: Decimal,
    pub intra_district_charge: Decimal,
    pub intra_district_extra_kg_charge: Decimal,
    pub inter_district_charge: Decimal,
    pub inter_district_extra_kg_charge: Decimal,
}

impl DeliverySettings {
    pub fn from_defaults(defaults: &DefaultRates) -> Self {
        Self {
            intra_upazilla_charge: defaults.intra_upazilla_charge,
            intra_upazilla_extra_kg_charge: defaults.intra_upazilla_extra_kg_charge,
            intra_district_charge: defaults.intra_district_charge,
            intra_district_extra_kg_charge: defaults.intra_district_extra_kg_charge,
            inter_district_charge: defaults.inter_district_charge,
            inter_district_extra_kg_charge: defaults.inter_district_extra_kg_charge,
        }
    }

    /// Build settings from whatever object the caller has.
    ///
    /// Each field is looked up under its accepted key variants in order;
    /// the first positive numeric value wins, otherwise the default applies.
    /// Anything that is not a JSON object yields the defaults.
    pub fn from_raw(raw: &Value, defaults: &DefaultRates) -> Self {
        let Some(obj) = raw.as_object() else {
            return Self::from_defaults(defaults);
        };

        Self {
            intra_upazilla_charge: pick_rate(
                obj,
                INTRA_UPAZILLA_CHARGE_KEYS,
                defaults.intra_upazilla_charge,
            ),
            intra_upazilla_extra_kg_charge: pick_rate(
                obj,
                INTRA_UPAZILLA_EXTRA_KG_KEYS,
                defaults.intra_upazilla_extra_kg_charge,
            ),
            intra_district_charge: pick_rate(
                obj,
                INTRA_DISTRICT_CHARGE_KEYS,
                defaults.intra_district_charge,
            ),
            intra_district_extra_kg_charge: pick_rate(
                obj,
                INTRA_DISTRICT_EXTRA_KG_KEYS,
                defaults.intra_district_extra_kg_charge,
            ),
            inter_district_charge: pick_rate(
                obj,
                INTER_DISTRICT_CHARGE_KEYS,
                defaults.inter_district_charge,
            ),
            inter_district_extra_kg_charge: pick_rate(
                obj,
                INTER_DISTRICT_EXTRA_KG_KEYS,
                defaults.inter_district_extra_kg_charge,
            ),
        }
    }

    /// Apply a partial edit on top of these settings.
    ///
    /// Fields whose keys are all missing from `patch` keep their current
    /// value. A field that is named but unusable (zero, negative, garbage)
    /// resets to its default, same as in [`DeliverySettings::from_raw`].
    pub fn merged_with(&self, patch: &Map<String, Value>, defaults: &DefaultRates) -> Self {
        let field = |keys: &[&str], current: Decimal, fallback: Decimal| {
            if keys.iter().any(|key| patch.contains_key(*key)) {
                pick_rate(patch, keys, fallback)
            } else {
                current
            }
        };

        Self {
            intra_upazilla_charge: field(
                INTRA_UPAZILLA_CHARGE_KEYS,
                self.intra_upazilla_charge,
                defaults.intra_upazilla_charge,
            ),
            intra_upazilla_extra_kg_charge: field(
                INTRA_UPAZILLA_EXTRA_KG_KEYS,
                self.intra_upazilla_extra_kg_charge,
                defaults.intra_upazilla_extra_kg_charge,
            ),
            intra_district_charge: field(
                INTRA_DISTRICT_CHARGE_KEYS,
                self.intra_district_charge,
                defaults.intra_district_charge,
            ),
            intra_district_extra_kg_charge: field(
                INTRA_DISTRICT_EXTRA_KG_KEYS,
                self.intra_district_extra_kg_charge,
                defaults.intra_district_extra_kg_charge,
            ),
            inter_district_charge: field(
                INTER_DISTRICT_CHARGE_KEYS,
                self.inter_district_charge,
                defaults.inter_district_charge,
            ),
            inter_district_extra_kg_charge: field(
                INTER_DISTRICT_EXTRA_KG_KEYS,
                self.inter_district_extra_kg_charge,
                defaults.inter_district_extra_kg_charge,
            ),
        }
    }

    pub fn rate_for(&self, tier: DeliveryTier) -> TierRate {
        match tier {
            DeliveryTier::IntraUpazilla => TierRate {
                base: self.intra_upazilla_charge,
                extra_kg: self.intra_upazilla_extra_kg_charge,
            },
            DeliveryTier::IntraDistrict => TierRate {
                base: self.intra_district_charge,
                extra_kg: self.intra_district_extra_kg_charge,
            },
            DeliveryTier::InterDistrict => TierRate {
                base: self.inter_district_charge,
                extra_kg: self.inter_district_extra_kg_charge,
            },
        }
    }
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self::from_defaults(&DefaultRates::default())
    }
}

fn pick_rate(obj: &Map<String, Value>, keys: &[&str], fallback: Decimal) -> Decimal {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .filter_map(parse_decimal)
        .find(|rate| *rate > Decimal::ZERO)
        .unwrap_or(fallback)
}

/// Numbers and numeric strings; everything else is `None`.
///
/// Finite values outside the `Decimal` range saturate at `Decimal::MAX`
/// (or `MIN`) instead of being dropped.
pub(crate) fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => decimal_from_text(&n.to_string())
            .or_else(|| n.as_f64().and_then(saturating_from_f64)),
        Value::String(s) => decimal_from_text(s.trim()),
        _ => None,
    }
}

fn decimal_from_text(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .or_else(|| text.parse::<f64>().ok().and_then(saturating_from_f64))
}

fn saturating_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).or(Some(if value.abs() < 1.0 {
        Decimal::ZERO
    } else if value > 0.0 {
        Decimal::MAX
    } else {
        Decimal::MIN
    }))
}

// ── Tests ──────────────────────────────────────────────────────
