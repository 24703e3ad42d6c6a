//! Address Model

use serde::{Deserialize, Serialize};

/// Role of an address attached to a supplies record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressType {
    Billing,
    Shipping,
}

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Billing => "billing",
            AddressType::Shipping => "shipping",
        }
    }
}

impl std::fmt::Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Postal address row, owned by exactly one record (`related_id`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: String,
    pub uid: String,
    pub related_id: String,
    pub addr_type: AddressType,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub zip_code: String,
}

/// Address fields as submitted by a client (no ids yet)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInput {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub zip_code: String,
}

impl AddressInput {
    /// Materialize into an address row owned by `related_id`
    pub fn into_address(self, addr_type: AddressType, uid: &str, related_id: &str) -> Address {
        Address {
            id: crate::util::new_id(),
            uid: uid.to_string(),
            related_id: related_id.to_string(),
            addr_type,
            country: self.country,
            province: self.province,
            city: self.city,
            district: self.district,
            address: self.address,
            zip_code: self.zip_code,
        }
    }
}
