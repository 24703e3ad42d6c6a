//! Domain Record Model
//!
//! One donation or supplies movement. A record is created in memory with a
//! fresh id and no ledger reference; the ledger reference is only ever
//! written by the publish coordinator after the ledger accepted the payload.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::address::{Address, AddressInput, AddressType};
use super::image::{ProofImage, ProofImageInput};
use crate::ledger::PublicationKind;

/// What moved: money or goods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum RecordItem {
    Funds {
        pay_type: String,
        amount: Decimal,
        target_bank_card_num: Option<String>,
    },
    Supplies {
        way_bill_num: String,
        name: String,
        number: i64,
        unit: String,
    },
}

impl RecordItem {
    pub fn category(&self) -> &'static str {
        match self {
            RecordItem::Funds { .. } => "funds",
            RecordItem::Supplies { .. } => "supplies",
        }
    }
}

/// Publication record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub id: String,
    pub kind: PublicationKind,
    /// Submitting account (its DID signs the ledger submission)
    pub uid: String,
    #[serde(default)]
    pub donor_name: String,
    #[serde(default)]
    pub user_type: String,
    #[serde(default)]
    pub target_uid: String,
    #[serde(default)]
    pub target_name: String,
    pub remark: Option<String>,
    pub item: RecordItem,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub proof_images: Vec<ProofImage>,
    /// Unix millis, fixed at creation so payloads stay reproducible
    pub created_at: i64,
    /// Ledger correlation id, present only after a successful publish
    pub ledger_ref: Option<String>,
}

impl DomainRecord {
    pub fn new(kind: PublicationKind, uid: impl Into<String>, item: RecordItem) -> Self {
        Self {
            id: crate::util::new_id(),
            kind,
            uid: uid.into(),
            donor_name: String::new(),
            user_type: String::new(),
            target_uid: String::new(),
            target_name: String::new(),
            remark: None,
            item,
            billing_address: None,
            shipping_address: None,
            proof_images: Vec::new(),
            created_at: crate::util::now_millis(),
            ledger_ref: None,
        }
    }

    pub fn with_donor(mut self, donor_name: impl Into<String>, user_type: impl Into<String>) -> Self {
        self.donor_name = donor_name.into();
        self.user_type = user_type.into();
        self
    }

    pub fn with_target(mut self, target_uid: impl Into<String>, target_name: impl Into<String>) -> Self {
        self.target_uid = target_uid.into();
        self.target_name = target_name.into();
        self
    }

    pub fn with_remark(mut self, remark: Option<String>) -> Self {
        self.remark = remark;
        self
    }

    /// Attach billing/shipping addresses; rows are bound to this record
    pub fn with_addresses(mut self, billing: AddressInput, shipping: AddressInput) -> Self {
        self.billing_address = Some(billing.into_address(AddressType::Billing, &self.uid, &self.id));
        self.shipping_address =
            Some(shipping.into_address(AddressType::Shipping, &self.uid, &self.id));
        self
    }

    /// Attach proof images; rows are bound to this record
    pub fn with_proof_images(mut self, images: impl IntoIterator<Item = ProofImageInput>) -> Self {
        let id = self.id.clone();
        self.proof_images
            .extend(images.into_iter().map(|img| img.into_image(&id)));
        self
    }

    /// Billing then shipping, whichever are present
    pub fn addresses(&self) -> Vec<&Address> {
        self.billing_address
            .iter()
            .chain(self.shipping_address.iter())
            .collect()
    }

    pub fn is_published(&self) -> bool {
        self.ledger_ref.is_some()
    }
}
