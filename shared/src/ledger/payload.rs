//! Ledger Payload Builder
//!
//! Pure conversion from a [`DomainRecord`] plus its related rows into the
//! canonical JSON document submitted to the ledger. No I/O, no clock reads:
//! the same inputs always produce byte-identical output.

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::kind::PublicationKind;
use crate::models::{Address, DomainRecord, Party, PartyRole, ProofImage, RecordItem};
use crate::util::mask_card_number;

/// Payload schema version
pub const PAYLOAD_VERSION: u16 = 1;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("unsupported publication kind: {0}")]
    UnsupportedKind(String),

    #[error("{kind} payload for record {record_id} requires {field}")]
    MissingField {
        kind: PublicationKind,
        record_id: String,
        field: &'static str,
    },

    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Canonical, versioned ledger entry for exactly one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPayload {
    pub version: u16,
    pub kind: PublicationKind,
    pub record_id: String,
    body: String,
}

impl LedgerPayload {
    pub fn as_bytes(&self) -> &[u8] {
        self.body.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.body
    }

    /// Lowercase hex SHA-256 of the payload bytes
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.body.as_bytes()))
    }
}

// ========== canonical document ==========
// Field order here is the byte order on the wire; only structs, no maps.

#[derive(Serialize)]
struct EntryDoc<'a> {
    version: u16,
    action: &'static str,
    record_id: &'a str,
    from: Party,
    to: Party,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_type: Option<&'a str>,
    item: ItemDoc<'a>,
    addresses: Vec<AddressDoc<'a>>,
    proofs: Vec<ProofDoc<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remark: Option<&'a str>,
    created_at: i64,
}

#[derive(Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
enum ItemDoc<'a> {
    Funds {
        pay_type: &'a str,
        amount: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        bank_card: Option<String>,
    },
    Supplies {
        way_bill_num: &'a str,
        name: &'a str,
        number: i64,
        unit: &'a str,
    },
}

#[derive(Serialize)]
struct AddressDoc<'a> {
    addr_type: &'static str,
    country: &'a str,
    province: &'a str,
    city: &'a str,
    district: &'a str,
    address: &'a str,
    zip_code: &'a str,
}

#[derive(Serialize)]
struct ProofDoc<'a> {
    index: i32,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash: Option<&'a str>,
    format: &'a str,
}

/// Build the ledger payload for one record.
///
/// Batches call this once per record; payloads are never merged since each
/// one gets its own correlation id.
pub fn build(
    kind: PublicationKind,
    record: &DomainRecord,
    addresses: &[&Address],
    images: &[ProofImage],
) -> Result<LedgerPayload, PayloadError> {
    let doc = match kind {
        PublicationKind::Donate => donate_entry(record, addresses, images)?,
        PublicationKind::Distribute => distribute_entry(record, addresses, images)?,
        PublicationKind::Receive => receive_entry(record, addresses, images)?,
    };

    Ok(LedgerPayload {
        version: PAYLOAD_VERSION,
        kind,
        record_id: record.id.clone(),
        body: serde_json::to_string(&doc)?,
    })
}

/// [`build`] with the record's own kind and related rows
pub fn build_for(record: &DomainRecord) -> Result<LedgerPayload, PayloadError> {
    build(record.kind, record, &record.addresses(), &record.proof_images)
}

/// 捐赠: uid gives to target
fn donate_entry<'a>(
    record: &'a DomainRecord,
    addresses: &[&'a Address],
    images: &'a [ProofImage],
) -> Result<EntryDoc<'a>, PayloadError> {
    let kind = PublicationKind::Donate;
    require(kind, record, "target_uid", &record.target_uid)?;
    let from = Party::new(&record.uid, &record.donor_name, PartyRole::Donor);
    let to = Party::new(&record.target_uid, &record.target_name, PartyRole::Beneficiary);
    entry(kind, record, from, to, addresses, images)
}

/// 发放: uid hands out to target; the goods need somewhere to go
fn distribute_entry<'a>(
    record: &'a DomainRecord,
    addresses: &[&'a Address],
    images: &'a [ProofImage],
) -> Result<EntryDoc<'a>, PayloadError> {
    let kind = PublicationKind::Distribute;
    require(kind, record, "target_uid", &record.target_uid)?;
    if matches!(record.item, RecordItem::Supplies { .. }) && record.shipping_address.is_none() {
        return Err(missing(kind, record, "shipping_address"));
    }
    let from = Party::new(&record.uid, &record.donor_name, PartyRole::Distributor);
    let to = Party::new(&record.target_uid, &record.target_name, PartyRole::Recipient);
    entry(kind, record, from, to, addresses, images)
}

/// 接收: uid acknowledges receipt from target
fn receive_entry<'a>(
    record: &'a DomainRecord,
    addresses: &[&'a Address],
    images: &'a [ProofImage],
) -> Result<EntryDoc<'a>, PayloadError> {
    let kind = PublicationKind::Receive;
    let from = Party::new(&record.target_uid, &record.target_name, PartyRole::Donor);
    let to = Party::new(&record.uid, &record.donor_name, PartyRole::Recipient);
    entry(kind, record, from, to, addresses, images)
}

fn entry<'a>(
    kind: PublicationKind,
    record: &'a DomainRecord,
    from: Party,
    to: Party,
    addresses: &[&'a Address],
    images: &'a [ProofImage],
) -> Result<EntryDoc<'a>, PayloadError> {
    let item = match &record.item {
        RecordItem::Funds {
            pay_type,
            amount,
            target_bank_card_num,
        } => ItemDoc::Funds {
            pay_type,
            // normalize: 100.00 and 100 are the same amount on the ledger
            amount: amount.normalize().to_string(),
            bank_card: target_bank_card_num
                .as_deref()
                .filter(|c| !c.is_empty())
                .map(mask_card_number),
        },
        RecordItem::Supplies {
            way_bill_num,
            name,
            number,
            unit,
        } => {
            require(kind, record, "way_bill_num", way_bill_num)?;
            ItemDoc::Supplies {
                way_bill_num,
                name,
                number: *number,
                unit,
            }
        }
    };

    let mut proofs: Vec<ProofDoc<'a>> = images
        .iter()
        .map(|img| ProofDoc {
            index: img.index,
            url: &img.url,
            hash: img.hash.as_deref(),
            format: &img.format,
        })
        .collect();
    proofs.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.url.cmp(b.url)));

    Ok(EntryDoc {
        version: PAYLOAD_VERSION,
        action: kind.as_str(),
        record_id: &record.id,
        from,
        to,
        user_type: Some(record.user_type.as_str()).filter(|t| !t.is_empty()),
        item,
        addresses: addresses
            .iter()
            .map(|a| AddressDoc {
                addr_type: a.addr_type.as_str(),
                country: &a.country,
                province: &a.province,
                city: &a.city,
                district: &a.district,
                address: &a.address,
                zip_code: &a.zip_code,
            })
            .collect(),
        proofs,
        remark: record.remark.as_deref().filter(|r| !r.is_empty()),
        created_at: record.created_at,
    })
}

fn require(
    kind: PublicationKind,
    record: &DomainRecord,
    field: &'static str,
    value: &str,
) -> Result<(), PayloadError> {
    if value.trim().is_empty() {
        return Err(missing(kind, record, field));
    }
    Ok(())
}

fn missing(kind: PublicationKind, record: &DomainRecord, field: &'static str) -> PayloadError {
    PayloadError::MissingField {
        kind,
        record_id: record.id.clone(),
        field,
    }
}
