//! Shipping address.

use serde::{Deserialize, Serialize};
use souk_commerce::ids::AddressId;

/// A shipping address.
///
/// Order creation is refused locally until a complete address has been
/// selected; completeness is a hard precondition, not a validation
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Address {
    /// Saved-address id, when picked from the viewer's address book.
    pub id: Option<AddressId>,
    /// Recipient name.
    pub recipient: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Street address.
    pub line1: String,
    /// Apartment, suite, unit.
    pub line2: Option<String>,
    /// City.
    pub city: String,
    /// State or province.
    pub province: Option<String>,
    /// Postal code.
    pub postal_code: String,
    /// ISO country code (e.g. "US").
    pub country_code: String,
}

impl Address {
    /// Create an address from the required fields.
    pub fn new(
        recipient: impl Into<String>,
        line1: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            recipient: recipient.into(),
            phone: None,
            line1: line1.into(),
            line2: None,
            city: city.into(),
            province: None,
            postal_code: postal_code.into(),
            country_code: country_code.into(),
        }
    }

    /// Whether every required field is filled in.
    pub fn is_complete(&self) -> bool {
        !self.recipient.is_empty()
            && !self.line1.is_empty()
            && !self.city.is_empty()
            && !self.postal_code.is_empty()
            && !self.country_code.is_empty()
    }

    /// Single-line rendering for confirmations and logs.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.line1.clone()];
        if let Some(ref line2) = self.line2 {
            parts.push(line2.clone());
        }
        parts.push(self.city.clone());
        if let Some(ref province) = self.province {
            parts.push(province.clone());
        }
        parts.push(self.postal_code.clone());
        parts.push(self.country_code.clone());
        parts.join(", ")
    }
}
