//! Location-based delivery charge calculation

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::settings::{parse_decimal, DeliverySettings};
use crate::domain::location::Address;

/// Delivery charge bracket, from cheapest to most expensive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryTier {
    /// Buyer and seller share upazilla and district
    IntraUpazilla,
    /// Same district, different or unknown upazilla
    IntraDistrict,
    /// Different districts, or seller location unknown
    InterDistrict,
}

impl DeliveryTier {
    pub const ALL: [DeliveryTier; 3] = [
        DeliveryTier::IntraUpazilla,
        DeliveryTier::IntraDistrict,
        DeliveryTier::InterDistrict,
    ];

    /// Pick the tier for a buyer/seller pair.
    ///
    /// A missing seller address is priced as inter-district.
    pub fn select(buyer: &Address, seller: Option<&Address>) -> Self {
        let Some(seller) = seller else {
            return Self::InterDistrict;
        };

        let buyer = buyer.locality();
        let seller = seller.locality();

        if buyer.shares_upazilla(&seller) {
            Self::IntraUpazilla
        } else if buyer.shares_district(&seller) {
            Self::IntraDistrict
        } else {
            Self::InterDistrict
        }
    }
}

impl std::fmt::Display for DeliveryTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IntraUpazilla => write!(f, "intra_upazilla"),
            Self::IntraDistrict => write!(f, "intra_district"),
            Self::InterDistrict => write!(f, "inter_district"),
        }
    }
}

/// Parcel weight in kilograms, never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PackageWeight(Decimal);

impl PackageWeight {
    /// Weight covered by the base charge.
    pub const INCLUDED_KG: Decimal = Decimal::ONE;

    /// `None` means "not given" and defaults to the included kilogram;
    /// negative weights clamp to zero.
    pub fn new(kg: Option<Decimal>) -> Self {
        match kg {
            Some(kg) => Self(kg.max(Decimal::ZERO)),
            None => Self(Self::INCLUDED_KG),
        }
    }

    /// Read a weight from loosely typed input.
    ///
    /// Missing or `null` is the default kilogram. Numbers and numeric
    /// strings are used as-is (clamped at zero, saturating at
    /// `Decimal::MAX`); anything else is zero.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::new(None),
            Some(v) => Self::new(Some(parse_decimal(v).unwrap_or(Decimal::ZERO))),
        }
    }

    pub fn kg(&self) -> Decimal {
        self.0
    }

    /// Whole kilograms charged beyond the included one.
    ///
    /// Any fraction above the first kilogram rounds up to the next whole
    /// kilogram: 1.1 kg is one extra unit, 2.0 kg is one, 2.4 kg is two.
    pub fn extra_units(&self) -> Decimal {
        if self.0 <= Self::INCLUDED_KG {
            Decimal::ZERO
        } else {
            self.0.ceil() - Self::INCLUDED_KG
        }
    }
}

impl Default for PackageWeight {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::ops::Add for PackageWeight {
    type Output = PackageWeight;

    fn add(self, rhs: Self) -> Self::Output {
        PackageWeight(self.0.saturating_add(rhs.0))
    }
}

/// Itemized delivery charge for one seller's parcel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryChargeBreakdown {
    pub tier: DeliveryTier,
    pub base_charge: Decimal,
    pub extra_kg_charge: Decimal,
    pub billable_weight_kg: Decimal,
    pub extra_units: Decimal,
    pub surcharge: Decimal,
    pub total: Decimal,
}

impl DeliveryChargeBreakdown {
    /// Format the total as `"170.00 BDT"`.
    pub fn format_total(&self, currency: &str) -> String {
        format!("{:.2} {}", self.total, currency)
    }
}

/// Compute the delivery charge with its components.
pub fn calculate_delivery_breakdown(
    buyer: &Address,
    seller: Option<&Address>,
    settings: &DeliverySettings,
    weight: PackageWeight,
) -> DeliveryChargeBreakdown {
    let tier = DeliveryTier::select(buyer, seller);
    let rate = settings.rate_for(tier);

    // Saturates instead of overflowing, so absurd weights price at the ceiling.
    let extra_units = weight.extra_units();
    let surcharge = extra_units.saturating_mul(rate.extra_kg);
    let total = round_to_cents(rate.base.saturating_add(surcharge));

    DeliveryChargeBreakdown {
        tier,
        base_charge: rate.base,
        extra_kg_charge: rate.extra_kg,
        billable_weight_kg: weight.kg(),
        extra_units,
        surcharge,
        total,
    }
}

/// Delivery charge for a single seller's parcel.
///
/// Never fails: missing address fields compare as empty, a missing seller
/// is priced inter-district, a missing weight is 1 kg and a negative
/// weight is 0 kg.
pub fn calculate_delivery_charge(
    buyer: &Address,
    seller: Option<&Address>,
    settings: &DeliverySettings,
    weight_kg: Option<Decimal>,
) -> Decimal {
    calculate_delivery_breakdown(buyer, seller, settings, PackageWeight::new(weight_kg)).total
}

/// Half-up at the cent; charges are never negative.
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// One row of the sample price table shown next to the tariff editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleCalculation {
    pub tier: DeliveryTier,
    pub weight_kg: Decimal,
    pub breakdown: DeliveryChargeBreakdown,
}

/// Sample weights used for [`example_calculations`].
pub fn example_weights() -> [Decimal; 5] {
    [
        Decimal::new(5, 1),
        Decimal::ONE,
        Decimal::new(15, 1),
        Decimal::new(24, 1),
        Decimal::from(5),
    ]
}

/// Price every tier at a handful of sample weights.
pub fn example_calculations(settings: &DeliverySettings) -> Vec<ExampleCalculation> {
    let seller = Address::new("district", "upazilla");
    let buyers = [
        Address::new("district", "upazilla"),
        Address::new("district", "other upazilla"),
        Address::new("other district", "upazilla"),
    ];

    let mut rows = Vec::with_capacity(buyers.len() * example_weights().len());
    for buyer in &buyers {
        for kg in example_weights() {
            let breakdown = calculate_delivery_breakdown(
                buyer,
                Some(&seller),
                settings,
                PackageWeight::new(Some(kg)),
            );
            rows.push(ExampleCalculation {
                tier: breakdown.tier,
                weight_kg: kg,
                breakdown,
            });
        }
    }
    rows
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn kg(mantissa: i64, scale: u32) -> Option<Decimal> {
        Some(Decimal::new(mantissa, scale))
    }

    fn buyer() -> Address {
        Address::new("Dhaka", "Mirpur")
    }

    #[test]
    fn same_upazilla_half_kilo() {
        let seller = Address::new("dhaka", " mirpur ");
        let charge =
            calculate_delivery_charge(&buyer(), Some(&seller), &DeliverySettings::default(), kg(5, 1));
        assert_eq!(charge, dec(60));
    }

    #[test]
    fn same_upazilla_just_over_one_kilo() {
        let seller = Address::new("Dhaka", "Mirpur");
        let charge =
            calculate_delivery_charge(&buyer(), Some(&seller), &DeliverySettings::default(), kg(11, 1));
        assert_eq!(charge, dec(80));
    }

    #[test]
    fn same_district_different_upazilla() {
        let seller = Address::new("Dhaka", "Dhanmondi");
        let charge =
            calculate_delivery_charge(&buyer(), Some(&seller), &DeliverySettings::default(), kg(24, 1));
        assert_eq!(charge, dec(170));
    }

    #[test]
    fn different_districts_five_kilos() {
        let seller = Address::new("Chattogram", "Mirpur");
        let charge =
            calculate_delivery_charge(&buyer(), Some(&seller), &DeliverySettings::default(), Some(dec(5)));
        assert_eq!(charge, dec(290));
    }

    #[test]
    fn missing_seller_is_inter_district() {
        let settings = DeliverySettings::default();
        let charge = calculate_delivery_charge(&buyer(), None, &settings, Some(dec(1)));
        assert_eq!(charge, settings.inter_district_charge);
        assert_eq!(charge, dec(130));
    }

    #[test]
    fn exactly_two_kilos_is_one_extra_unit() {
        let seller = Address::new("Dhaka", "Mirpur");
        let charge =
            calculate_delivery_charge(&buyer(), Some(&seller), &DeliverySettings::default(), Some(dec(2)));
        assert_eq!(charge, dec(80));
    }

    #[test]
    fn missing_weight_defaults_to_one_kilo() {
        let seller = Address::new("Dhaka", "Mirpur");
        let charge =
            calculate_delivery_charge(&buyer(), Some(&seller), &DeliverySettings::default(), None);
        assert_eq!(charge, dec(60));
    }

    #[test]
    fn negative_weight_clamps_to_zero() {
        let seller = Address::new("Dhaka", "Dhanmondi");
        let b = calculate_delivery_breakdown(
            &buyer(),
            Some(&seller),
            &DeliverySettings::default(),
            PackageWeight::new(Some(dec(-3))),
        );
        assert_eq!(b.billable_weight_kg, Decimal::ZERO);
        assert_eq!(b.surcharge, Decimal::ZERO);
        assert_eq!(b.total, dec(110));
    }

    #[test]
    fn empty_upazillas_fall_back_to_district_tier() {
        let b = Address::new("Dhaka", "");
        let s = Address::new("Dhaka", "");
        assert_eq!(DeliveryTier::select(&b, Some(&s)), DeliveryTier::IntraDistrict);
    }

    #[test]
    fn blank_addresses_are_inter_district() {
        let tier = DeliveryTier::select(&Address::default(), Some(&Address::default()));
        assert_eq!(tier, DeliveryTier::InterDistrict);
    }

    #[test]
    fn same_upazilla_name_in_other_district_is_inter_district() {
        let b = Address::new("Dhaka", "Sadar");
        let s = Address::new("Cumilla", "Sadar");
        assert_eq!(DeliveryTier::select(&b, Some(&s)), DeliveryTier::InterDistrict);
    }

    #[test]
    fn matching_upazilla_with_both_districts_blank() {
        let b = Address {
            upazilla: Some("Savar".into()),
            ..Default::default()
        };
        let s = b.clone();
        assert_eq!(DeliveryTier::select(&b, Some(&s)), DeliveryTier::IntraUpazilla);
    }

    #[test]
    fn total_rounds_half_up_to_cents() {
        let settings = DeliverySettings {
            intra_upazilla_charge: Decimal::new(60_005, 3),
            ..DeliverySettings::default()
        };
        let seller = Address::new("Dhaka", "Mirpur");
        let charge = calculate_delivery_charge(&buyer(), Some(&seller), &settings, None);
        assert_eq!(charge, Decimal::new(6001, 2));
    }

    #[test]
    fn fractional_rates_survive() {
        let settings = DeliverySettings {
            intra_district_extra_kg_charge: Decimal::new(1225, 2),
            ..DeliverySettings::default()
        };
        let seller = Address::new("Dhaka", "Uttara");
        let charge = calculate_delivery_charge(&buyer(), Some(&seller), &settings, Some(dec(3)));
        // 110 + 2 * 12.25
        assert_eq!(charge, Decimal::new(13450, 2));
    }

    #[test]
    fn breakdown_components_add_up() {
        let seller = Address::new("Dhaka", "Dhanmondi");
        let b = calculate_delivery_breakdown(
            &buyer(),
            Some(&seller),
            &DeliverySettings::default(),
            PackageWeight::new(kg(24, 1)),
        );
        assert_eq!(b.tier, DeliveryTier::IntraDistrict);
        assert_eq!(b.base_charge, dec(110));
        assert_eq!(b.extra_kg_charge, dec(30));
        assert_eq!(b.extra_units, dec(2));
        assert_eq!(b.surcharge, dec(60));
        assert_eq!(b.total, dec(170));
        assert_eq!(b.format_total("BDT"), "170.00 BDT");
    }

    #[test]
    fn weight_from_loose_values() {
        assert_eq!(PackageWeight::from_value(None).kg(), dec(1));
        assert_eq!(PackageWeight::from_value(Some(&json!(null))).kg(), dec(1));
        assert_eq!(PackageWeight::from_value(Some(&json!(2.5))).kg(), Decimal::new(25, 1));
        assert_eq!(PackageWeight::from_value(Some(&json!("3"))).kg(), dec(3));
        assert_eq!(PackageWeight::from_value(Some(&json!(-4))).kg(), Decimal::ZERO);
        assert_eq!(PackageWeight::from_value(Some(&json!("heavy"))).kg(), Decimal::ZERO);
        assert_eq!(PackageWeight::from_value(Some(&json!({"kg": 2}))).kg(), Decimal::ZERO);
    }

    #[test]
    fn weight_beyond_decimal_range_saturates() {
        let huge = PackageWeight::from_value(Some(&json!(1e30)));
        assert_eq!(huge.kg(), Decimal::MAX);
        assert_eq!(PackageWeight::from_value(Some(&json!("1e30"))).kg(), Decimal::MAX);
        assert_eq!(PackageWeight::from_value(Some(&json!(-1e30))).kg(), Decimal::ZERO);

        let settings = DeliverySettings::default();
        let five = calculate_delivery_breakdown(&buyer(), None, &settings, PackageWeight::new(Some(dec(5))));
        let b = calculate_delivery_breakdown(&buyer(), None, &settings, huge);
        assert!(b.total > five.total);
    }

    #[test]
    fn huge_weight_saturates_instead_of_overflowing() {
        let settings = DeliverySettings::default();
        let weight = Decimal::from_str_exact("70000000000000000000000000000").unwrap();
        let charge = calculate_delivery_charge(&buyer(), None, &settings, Some(weight));
        assert_eq!(charge, Decimal::MAX);

        let max = calculate_delivery_charge(&buyer(), None, &settings, Some(Decimal::MAX));
        assert_eq!(max, Decimal::MAX);

        // 1e27 kg still fits: 130 + (1e27 - 1) * 40
        let weight = Decimal::from_str_exact("1000000000000000000000000000").unwrap();
        let charge = calculate_delivery_charge(&buyer(), None, &settings, Some(weight));
        assert_eq!(charge, (weight - Decimal::ONE) * dec(40) + dec(130));
        assert!(charge < Decimal::MAX);

        // 2e27 kg * 40 overflows and saturates
        let weight = Decimal::from_str_exact("2000000000000000000000000000").unwrap();
        let charge = calculate_delivery_charge(&buyer(), None, &settings, Some(weight));
        assert_eq!(charge, Decimal::MAX);
    }

    #[test]
    fn summed_weights_saturate() {
        let total = PackageWeight::new(Some(Decimal::MAX)) + PackageWeight::new(Some(dec(5)));
        assert_eq!(total.kg(), Decimal::MAX);
    }

    #[test]
    fn extra_units_boundaries() {
        let units = |m, s| PackageWeight::new(kg(m, s)).extra_units();
        assert_eq!(units(0, 0), Decimal::ZERO);
        assert_eq!(units(1, 0), Decimal::ZERO);
        assert_eq!(units(1001, 3), dec(1));
        assert_eq!(units(2, 0), dec(1));
        assert_eq!(units(201, 2), dec(2));
    }

    #[test]
    fn tier_display() {
        assert_eq!(DeliveryTier::IntraUpazilla.to_string(), "intra_upazilla");
        assert_eq!(DeliveryTier::InterDistrict.to_string(), "inter_district");
    }

    #[test]
    fn example_table_covers_every_tier() {
        let rows = example_calculations(&DeliverySettings::default());
        assert_eq!(rows.len(), DeliveryTier::ALL.len() * example_weights().len());

        let intra_district_2_4 = rows
            .iter()
            .find(|r| r.tier == DeliveryTier::IntraDistrict && r.weight_kg == Decimal::new(24, 1))
            .unwrap();
        assert_eq!(intra_district_2_4.breakdown.total, dec(170));

        let inter_5 = rows
            .iter()
            .find(|r| r.tier == DeliveryTier::InterDistrict && r.weight_kg == dec(5))
            .unwrap();
        assert_eq!(inter_5.breakdown.total, dec(290));
    }
}
