//! Party Model

use serde::{Deserialize, Serialize};

/// 交易方角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Donor,
    Beneficiary,
    Distributor,
    Recipient,
}

/// One side of a movement as it appears on the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub uid: String,
    pub name: String,
    pub role: PartyRole,
}

impl Party {
    pub fn new(uid: &str, name: &str, role: PartyRole) -> Self {
        Self {
            uid: uid.to_string(),
            name: name.to_string(),
            role,
        }
    }
}
