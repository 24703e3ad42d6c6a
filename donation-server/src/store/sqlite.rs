//! SQLite record store
//!
//! Funds and supplies live in separate tables (`pub_funds`, `pub_supplies`);
//! their address and image rows reference the record through `related_id`.
//! The ledger reference is the `tx_id` column.

use async_trait::async_trait;
use shared::models::{Address, DomainRecord, ProofImage, RecordItem};
use shared::PublicationKind;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use super::{RecordStore, RecordTx, StoreError, StoredRecord};

#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Look a record up in either table
    pub async fn find_record(&self, id: &str) -> Result<Option<StoredRecord>, StoreError> {
        for table in ["pub_funds", "pub_supplies"] {
            let row: Option<(String, String, Option<String>)> =
                sqlx::query_as(&format!("SELECT id, pub_type, tx_id FROM {table} WHERE id = ?"))
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;

            if let Some((id, pub_type, ledger_ref)) = row {
                let kind = PublicationKind::parse(&pub_type).map_err(|e| StoreError::Corrupt {
                    id: id.clone(),
                    reason: e.to_string(),
                })?;
                return Ok(Some(StoredRecord {
                    id,
                    kind,
                    ledger_ref,
                }));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn begin(&self) -> Result<Box<dyn RecordTx>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqliteTx { tx }))
    }
}

/// sqlx rolls the transaction back when it is dropped uncommitted
struct SqliteTx {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl RecordTx for SqliteTx {
    async fn insert(&mut self, records: &[DomainRecord]) -> Result<(), StoreError> {
        for record in records {
            insert_record(&mut self.tx, record).await.map_err(|e| map_unique(e, &record.id))?;
            for address in record.addresses() {
                insert_address(&mut self.tx, address)
                    .await
                    .map_err(|e| map_unique(e, &address.id))?;
            }
            for image in &record.proof_images {
                insert_image(&mut self.tx, image)
                    .await
                    .map_err(|e| map_unique(e, &image.id))?;
            }
        }
        Ok(())
    }

    async fn update_ledger_ref(
        &mut self,
        record_id: &str,
        ledger_ref: &str,
    ) -> Result<(), StoreError> {
        for table in ["pub_funds", "pub_supplies"] {
            let result = sqlx::query(&format!("UPDATE {table} SET tx_id = ? WHERE id = ?"))
                .bind(ledger_ref)
                .bind(record_id)
                .execute(&mut *self.tx)
                .await?;
            if result.rows_affected() > 0 {
                return Ok(());
            }
        }
        Err(StoreError::NotFound(record_id.to_string()))
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

fn map_unique(e: sqlx::Error, id: &str) -> StoreError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => StoreError::Duplicate(id.to_string()),
        _ => StoreError::Database(e),
    }
}

async fn insert_record(conn: &mut SqliteConnection, record: &DomainRecord) -> Result<(), sqlx::Error> {
    match &record.item {
        RecordItem::Funds {
            pay_type,
            amount,
            target_bank_card_num,
        } => {
            sqlx::query(
                r#"
                INSERT INTO pub_funds (id, pub_type, uid, donor_name, user_type, target_uid,
                    target_name, target_bank_card_num, pay_type, amount, remark, tx_id, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&record.id)
            .bind(record.kind.as_str())
            .bind(&record.uid)
            .bind(&record.donor_name)
            .bind(&record.user_type)
            .bind(&record.target_uid)
            .bind(&record.target_name)
            .bind(target_bank_card_num)
            .bind(pay_type)
            .bind(amount.to_string())
            .bind(&record.remark)
            .bind(&record.ledger_ref)
            .bind(record.created_at)
            .execute(conn)
            .await?;
        }
        RecordItem::Supplies {
            way_bill_num,
            name,
            number,
            unit,
        } => {
            sqlx::query(
                r#"
                INSERT INTO pub_supplies (id, pub_type, uid, donor_name, user_type, target_uid,
                    target_name, way_bill_num, name, number, unit, remark, tx_id, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&record.id)
            .bind(record.kind.as_str())
            .bind(&record.uid)
            .bind(&record.donor_name)
            .bind(&record.user_type)
            .bind(&record.target_uid)
            .bind(&record.target_name)
            .bind(way_bill_num)
            .bind(name)
            .bind(number)
            .bind(unit)
            .bind(&record.remark)
            .bind(&record.ledger_ref)
            .bind(record.created_at)
            .execute(conn)
            .await?;
        }
    }
    Ok(())
}

async fn insert_address(conn: &mut SqliteConnection, address: &Address) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO address (id, uid, related_id, addr_type, country, province, city,
            district, address, zip_code)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&address.id)
    .bind(&address.uid)
    .bind(&address.related_id)
    .bind(address.addr_type.as_str())
    .bind(&address.country)
    .bind(&address.province)
    .bind(&address.city)
    .bind(&address.district)
    .bind(&address.address)
    .bind(&address.zip_code)
    .execute(conn)
    .await?;
    Ok(())
}

async fn insert_image(conn: &mut SqliteConnection, image: &ProofImage) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO image (id, related_id, url, hash, idx, format) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&image.id)
    .bind(&image.related_id)
    .bind(&image.url)
    .bind(&image.hash)
    .bind(image.index)
    .bind(&image.format)
    .execute(conn)
    .await?;
    Ok(())
}
