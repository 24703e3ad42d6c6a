//! Request bodies

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::PublicationKind;
use shared::error::ErrorCode;
use shared::models::{AddressInput, DomainRecord, ProofImageInput, RecordItem};

use crate::utils::AppError;

/// POST /api/v1/pub/funds
#[derive(Debug, Clone, Deserialize)]
pub struct FundsRequest {
    pub uid: String,
    #[serde(default)]
    pub donor_name: String,
    #[serde(default)]
    pub user_type: String,
    #[serde(default)]
    pub target_uid: String,
    #[serde(default)]
    pub target_name: String,
    pub target_bank_card_num: Option<String>,
    pub pub_type: String,
    pub pay_type: String,
    pub amount: Decimal,
    pub remark: Option<String>,
    #[serde(default)]
    pub proof_images: Vec<ProofImageInput>,
}

impl FundsRequest {
    pub fn into_record(self) -> Result<DomainRecord, AppError> {
        let kind = parse_kind(&self.pub_type)?;
        Ok(DomainRecord::new(
            kind,
            self.uid,
            RecordItem::Funds {
                pay_type: self.pay_type,
                amount: self.amount,
                target_bank_card_num: self.target_bank_card_num,
            },
        )
        .with_donor(self.donor_name, self.user_type)
        .with_target(self.target_uid, self.target_name)
        .with_remark(self.remark)
        .with_proof_images(self.proof_images))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuppliesItem {
    pub name: String,
    pub number: i64,
    pub unit: String,
}

/// POST /api/v1/pub/supplies
///
/// One waybill, several items; every item becomes its own record.
#[derive(Debug, Clone, Deserialize)]
pub struct SuppliesRequest {
    pub way_bill_num: String,
    pub uid: String,
    #[serde(default)]
    pub donor_name: String,
    #[serde(default)]
    pub user_type: String,
    #[serde(default)]
    pub target_uid: String,
    #[serde(default)]
    pub target_name: String,
    pub pub_type: String,
    pub remark: Option<String>,
    #[serde(default)]
    pub billing_address: AddressInput,
    #[serde(default)]
    pub shipping_address: AddressInput,
    #[serde(default)]
    pub supplies: Vec<SuppliesItem>,
    #[serde(default)]
    pub proof_images: Vec<ProofImageInput>,
}

impl SuppliesRequest {
    pub fn into_records(self) -> Result<Vec<DomainRecord>, AppError> {
        let kind = parse_kind(&self.pub_type)?;
        if self.supplies.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::EmptySupplies,
                "supplies must contain at least one item",
            ));
        }

        // 每条记录各自持有地址和凭证行
        Ok(self
            .supplies
            .into_iter()
            .map(|item| {
                DomainRecord::new(
                    kind,
                    self.uid.clone(),
                    RecordItem::Supplies {
                        way_bill_num: self.way_bill_num.clone(),
                        name: item.name,
                        number: item.number,
                        unit: item.unit,
                    },
                )
                .with_donor(self.donor_name.clone(), self.user_type.clone())
                .with_target(self.target_uid.clone(), self.target_name.clone())
                .with_remark(self.remark.clone())
                .with_addresses(self.billing_address.clone(), self.shipping_address.clone())
                .with_proof_images(self.proof_images.clone())
            })
            .collect())
    }
}

fn parse_kind(pub_type: &str) -> Result<PublicationKind, AppError> {
    PublicationKind::parse(pub_type).map_err(|e| {
        AppError::with_message(ErrorCode::UnsupportedPubType, e.to_string())
            .with_detail("pub_type", pub_type)
    })
}
