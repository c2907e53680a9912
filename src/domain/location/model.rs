//! Postal address as supplied by buyers and sellers

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Buyer or seller address.
///
/// Only `district` and `upazilla` take part in delivery pricing; the other
/// fields are carried through for display.
/// Every field is optional: profiles are often half-filled, and the
/// locality fields arrive from forms that may send numbers or `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    /// Sub-district. Older clients still send it as `thana`.
    #[serde(
        default,
        alias = "thana",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub upazilla: Option<String>,
}

impl Address {
    pub fn new(district: impl Into<String>, upazilla: impl Into<String>) -> Self {
        Self {
            district: Some(district.into()),
            upazilla: Some(upazilla.into()),
            ..Default::default()
        }
    }

    /// Locality fields trimmed and lowercased, absent fields as `""`.
    pub fn locality(&self) -> Locality {
        Locality {
            district: normalize_field(self.district.as_deref()),
            upazilla: normalize_field(self.upazilla.as_deref()),
        }
    }
}

/// Normalized locality of an [`Address`], ready for comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locality {
    pub district: String,
    pub upazilla: String,
}

impl Locality {
    /// Same non-empty district.
    pub fn shares_district(&self, other: &Locality) -> bool {
        !self.district.is_empty() && self.district == other.district
    }

    /// Same non-empty upazilla within the same district.
    ///
    /// Two empty upazillas never count as a match.
    pub fn shares_upazilla(&self, other: &Locality) -> bool {
        !self.upazilla.is_empty()
            && self.upazilla == other.upazilla
            && self.district == other.district
    }
}

pub fn normalize_field(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_lowercase()).unwrap_or_default()
}

/// Accepts strings, numbers and booleans; anything else reads as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locality_trims_and_lowercases() {
        let loc = Address::new("  Dhaka ", "MIRPUR").locality();
        assert_eq!(loc.district, "dhaka");
        assert_eq!(loc.upazilla, "mirpur");
    }

    #[test]
    fn division_does_not_affect_locality() {
        let a = Address {
            division: Some("Dhaka".into()),
            ..Address::new("Gazipur", "Tongi")
        };
        let b = Address {
            division: Some("Chattogram".into()),
            ..Address::new("gazipur", "tongi")
        };
        assert_eq!(a.locality(), b.locality());
        assert!(a.locality().shares_upazilla(&b.locality()));
    }

    #[test]
    fn missing_fields_become_empty() {
        let loc = Address::default().locality();
        assert_eq!(loc, Locality::default());
    }

    #[test]
    fn empty_upazillas_do_not_match() {
        let a = Address::new("Dhaka", "").locality();
        let b = Address::new("dhaka", "   ").locality();
        assert!(!a.shares_upazilla(&b));
        assert!(a.shares_district(&b));
    }

    #[test]
    fn empty_districts_do_not_match() {
        let a = Address::default().locality();
        let b = Address::default().locality();
        assert!(!a.shares_district(&b));
    }

    #[test]
    fn upazilla_match_requires_same_district() {
        let a = Address::new("Dhaka", "Sadar").locality();
        let b = Address::new("Khulna", "Sadar").locality();
        assert!(!a.shares_upazilla(&b));
    }

    #[test]
    fn deserializes_non_string_fields() {
        let json = serde_json::json!({
            "district": 42,
            "upazilla": null,
            "division": {"nested": true},
            "phone": "01700000000"
        });
        let addr: Address = serde_json::from_value(json).unwrap();
        assert_eq!(addr.district.as_deref(), Some("42"));
        assert_eq!(addr.upazilla, None);
        assert_eq!(addr.division, None);
        assert_eq!(addr.phone.as_deref(), Some("01700000000"));
    }

    #[test]
    fn accepts_legacy_thana_key() {
        let json = serde_json::json!({ "district": "Dhaka", "thana": "Gulshan" });
        let addr: Address = serde_json::from_value(json).unwrap();
        assert_eq!(addr.upazilla.as_deref(), Some("Gulshan"));
    }
}
