//! Validating stage: nothing is opened or sent until the whole batch passes.

use shared::error::ErrorCode;
use shared::models::{Address, DomainRecord, RecordItem};
use std::collections::HashSet;

use crate::utils::AppError;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_RECORDS_PER_SUBMISSION, MAX_SHORT_TEXT_LEN,
    MAX_URL_LEN, validate_amount, validate_optional_text, validate_quantity, validate_required_text,
    validate_text_len,
};

pub fn validate_batch(records: &[DomainRecord]) -> Result<(), AppError> {
    let Some(first) = records.first() else {
        return Err(AppError::validation("No records to publish"));
    };
    if records.len() > MAX_RECORDS_PER_SUBMISSION {
        return Err(AppError::validation(format!(
            "Too many records in one submission: {} (max {MAX_RECORDS_PER_SUBMISSION})",
            records.len()
        ))
        .with_detail("max_records", MAX_RECORDS_PER_SUBMISSION));
    }

    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id.as_str()) {
            return Err(AppError::validation(format!("Duplicate record id {}", record.id))
                .with_detail("record_id", record.id.clone()));
        }
        // 一次发布只对应一个链上身份
        if record.uid != first.uid || record.kind != first.kind {
            return Err(AppError::with_message(
                ErrorCode::MixedSubmission,
                "All records of one submission must share submitter and publication kind",
            ));
        }
        validate_record(record)?;
    }
    Ok(())
}

fn validate_record(record: &DomainRecord) -> Result<(), AppError> {
    if record.ledger_ref.is_some() {
        return Err(
            AppError::validation(format!("Record {} is already published", record.id))
                .with_detail("record_id", record.id.clone()),
        );
    }

    validate_required_text(&record.uid, "uid", MAX_SHORT_TEXT_LEN)?;
    validate_text_len(&record.donor_name, "donor_name", MAX_NAME_LEN)?;
    validate_text_len(&record.user_type, "user_type", MAX_SHORT_TEXT_LEN)?;
    validate_text_len(&record.target_uid, "target_uid", MAX_SHORT_TEXT_LEN)?;
    validate_text_len(&record.target_name, "target_name", MAX_NAME_LEN)?;
    validate_optional_text(&record.remark, "remark", MAX_NOTE_LEN)?;

    match &record.item {
        RecordItem::Funds {
            pay_type,
            amount,
            target_bank_card_num,
        } => {
            validate_required_text(pay_type, "pay_type", MAX_SHORT_TEXT_LEN)?;
            validate_amount(*amount, "amount")?;
            validate_optional_text(target_bank_card_num, "target_bank_card_num", MAX_SHORT_TEXT_LEN)?;
        }
        RecordItem::Supplies {
            way_bill_num,
            name,
            number,
            unit,
        } => {
            validate_required_text(way_bill_num, "way_bill_num", MAX_SHORT_TEXT_LEN)?;
            validate_required_text(name, "name", MAX_NAME_LEN)?;
            validate_quantity(*number, "number")?;
            validate_required_text(unit, "unit", MAX_SHORT_TEXT_LEN)?;
        }
    }

    for address in record.addresses() {
        validate_address(address)?;
    }
    for image in &record.proof_images {
        validate_required_text(&image.url, "proof_images.url", MAX_URL_LEN)?;
        validate_optional_text(&image.hash, "proof_images.hash", MAX_SHORT_TEXT_LEN)?;
    }
    Ok(())
}

fn validate_address(address: &Address) -> Result<(), AppError> {
    for (field, value) in [
        ("country", &address.country),
        ("province", &address.province),
        ("city", &address.city),
        ("district", &address.district),
        ("zip_code", &address.zip_code),
    ] {
        validate_text_len(value, field, MAX_SHORT_TEXT_LEN)?;
    }
    validate_text_len(&address.address, "address", MAX_ADDRESS_LEN)
}
