//! HTTP surface against a real SQLite file and a stub ledger gateway

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use donation_server::api::build_app;
use donation_server::confirmation::SqliteConfirmationChannel;
use donation_server::db::DbService;
use donation_server::ledger::{LedgerError, LedgerPublisher, PublishResult, SubmitterIdentity};
use donation_server::store::SqliteRecordStore;
use donation_server::utils::validation::MAX_RECORDS_PER_SUBMISSION;
use donation_server::{Config, ServerState};
use http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use shared::ledger::BlockInfo;
use shared::{ConfirmationEntry, LedgerPayload};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

/// Gateway stub: ids `tx-1, tx-2, ...`; optionally confirms each id shortly after
#[derive(Clone)]
struct StubGateway {
    next: Arc<AtomicUsize>,
    auto_confirm: Option<SqliteConfirmationChannel>,
}

#[async_trait]
impl LedgerPublisher for StubGateway {
    async fn publish(
        &self,
        _identity: &SubmitterIdentity,
        payloads: &[LedgerPayload],
    ) -> Result<Vec<PublishResult>, LedgerError> {
        let results: Vec<PublishResult> = (0..payloads.len())
            .map(|i| PublishResult {
                correlation_id: format!("tx-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1),
                payload_index: i,
            })
            .collect();

        if let Some(channel) = self.auto_confirm.clone() {
            let ids: Vec<String> = results.iter().map(|r| r.correlation_id.clone()).collect();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                for (n, id) in ids.into_iter().enumerate() {
                    let entry = ConfirmationEntry::from_block_info(&block(&id, n as u64 + 100), 0).unwrap();
                    channel.record(&entry).await.unwrap();
                }
            });
        }
        Ok(results)
    }
}

fn block(id: &str, block_num: u64) -> BlockInfo {
    BlockInfo {
        blockchain: "cornerstone-chain".into(),
        id: id.into(),
        block_num,
        tx_id: format!("0x{block_num:x}"),
        time: 1_700_000_000,
    }
}

struct TestApp {
    app: Router,
    db: DbService,
    _dir: TempDir,
}

async fn test_app(auto_confirm: bool) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("donation.db");
    let config = Config {
        database_path: path.to_str().unwrap().to_string(),
        http_port: 0,
        environment: "test".into(),
        ledger_gateway_url: "http://127.0.0.1:1".into(),
        ledger_timeout_ms: 1_000,
        confirm_poll_interval_ms: 20,
        confirm_deadline_per_record_secs: 1,
        log_level: "debug".into(),
        log_dir: None,
    };
    let db = DbService::new(&config.database_path).await.unwrap();
    let gateway = StubGateway {
        next: Arc::new(AtomicUsize::new(0)),
        auto_confirm: auto_confirm.then(|| SqliteConfirmationChannel::new(db.pool.clone())),
    };
    let state = ServerState::with_publisher(config, db.clone(), Arc::new(gateway));
    TestApp {
        app: build_app(state),
        db,
        _dir: dir,
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router) {
    let (status, body) = send(
        app,
        Method::PUT,
        "/api/v1/accounts/uid_charity/did",
        Some(json!({ "did": "did:axn:charity" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

fn funds_body() -> Value {
    json!({
        "uid": "uid_charity",
        "donor_name": "Alice",
        "user_type": "personal",
        "target_uid": "uid_hospital",
        "target_name": "City Hospital",
        "target_bank_card_num": "6222000011114321",
        "pub_type": "donate",
        "pay_type": "bank",
        "amount": "100.00",
        "proof_images": [{ "url": "https://img.example/receipt.png", "index": 0, "format": "png" }]
    })
}

fn supplies_body(items: Value) -> Value {
    json!({
        "way_bill_num": "700074134800",
        "uid": "uid_charity",
        "target_uid": "uid_hospital",
        "target_name": "City Hospital",
        "pub_type": "distribute",
        "shipping_address": { "province": "Hubei", "city": "Wuhan", "address": "1 Jiefang Rd" },
        "supplies": items
    })
}

#[tokio::test]
async fn test_health() {
    let t = test_app(false).await;
    let (status, body) = send(&t.app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn test_funds_confirmed() {
    let t = test_app(true).await;
    register(&t.app).await;

    let (status, body) = send(&t.app, Method::POST, "/api/v1/pub/funds", Some(funds_body())).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["code"], 0);

    let record = &body["data"]["records"][0];
    assert_eq!(record["ledger_ref"], "tx-1");
    assert_eq!(record["block"]["block_num"], 100);

    let store = SqliteRecordStore::new(t.db.pool.clone());
    let id = record["record_id"].as_str().unwrap();
    let stored = store.find_record(id).await.unwrap().unwrap();
    assert_eq!(stored.ledger_ref.as_deref(), Some("tx-1"));
}

#[tokio::test]
async fn test_supplies_confirmed_by_callbacks() {
    let t = test_app(false).await;
    register(&t.app).await;

    let app = t.app.clone();
    let request = tokio::spawn(async move {
        let items = json!([
            { "name": "N95 mask", "number": 100, "unit": "box" },
            { "name": "gloves", "number": 20, "unit": "box" }
        ]);
        send(&app, Method::POST, "/api/v1/pub/supplies", Some(supplies_body(items))).await
    });

    tokio::time::sleep(Duration::from_millis(150)).await;
    for (id, n) in [("tx-2", 8), ("tx-1", 7)] {
        let (status, ack) = send(
            &t.app,
            Method::POST,
            "/api/v1/ledger/callback",
            Some(serde_json::to_value(block(id, n)).unwrap()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack["data"]["stored"], true);
    }

    let (status, body) = request.await.unwrap();
    assert_eq!(status, StatusCode::OK, "{body}");
    let records = body["data"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["ledger_ref"], "tx-1");
    assert_eq!(records[0]["block"]["block_num"], 7);
    assert_eq!(records[1]["ledger_ref"], "tx-2");
}

#[tokio::test]
async fn test_funds_timeout_reports_ledger_refs() {
    let t = test_app(false).await;
    register(&t.app).await;

    let (status, body) = send(&t.app, Method::POST, "/api/v1/pub/funds", Some(funds_body())).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT, "{body}");
    assert_eq!(body["code"], 5003);
    assert_eq!(body["details"]["ledger_refs"], json!(["tx-1"]));
    assert_eq!(body["details"]["pending"], json!(["tx-1"]));

    // 超时不回滚
    let id = body["details"]["record_ids"][0].as_str().unwrap();
    let store = SqliteRecordStore::new(t.db.pool.clone());
    let stored = store.find_record(id).await.unwrap().unwrap();
    assert_eq!(stored.ledger_ref.as_deref(), Some("tx-1"));
}

#[tokio::test]
async fn test_unknown_submitter_rolls_back() {
    let t = test_app(true).await;

    let (status, body) = send(&t.app, Method::POST, "/api/v1/pub/funds", Some(funds_body())).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
    assert_eq!(body["code"], 5005);

    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pub_funds")
        .fetch_one(&t.db.pool)
        .await
        .unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn test_request_rejections() {
    let t = test_app(true).await;
    register(&t.app).await;

    let (status, body) = send(
        &t.app,
        Method::POST,
        "/api/v1/pub/supplies",
        Some(supplies_body(json!([]))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4004);

    let mut refund = funds_body();
    refund["pub_type"] = json!("refund");
    let (status, body) = send(&t.app, Method::POST, "/api/v1/pub/funds", Some(refund)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);

    let mut zero = funds_body();
    zero["amount"] = json!("0");
    let (status, body) = send(&t.app, Method::POST, "/api/v1/pub/funds", Some(zero)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);
}

#[tokio::test]
async fn test_oversized_supplies_rejected_before_persist() {
    let t = test_app(true).await;
    register(&t.app).await;

    let items: Vec<Value> = (0..500)
        .map(|i| json!({ "name": format!("item-{i}"), "number": 1, "unit": "box" }))
        .collect();
    let (status, body) = send(
        &t.app,
        Method::POST,
        "/api/v1/pub/supplies",
        Some(supplies_body(Value::Array(items))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], 2);
    assert_eq!(body["details"]["max_records"], MAX_RECORDS_PER_SUBMISSION);

    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pub_supplies")
        .fetch_one(&t.db.pool)
        .await
        .unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn test_callback_first_write_wins() {
    let t = test_app(false).await;

    let (status, ack) = send(
        &t.app,
        Method::POST,
        "/api/v1/ledger/callback",
        Some(serde_json::to_value(block("tx-9", 1)).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["data"], json!({ "id": "tx-9", "stored": true }));

    let (_, ack) = send(
        &t.app,
        Method::POST,
        "/api/v1/ledger/callback",
        Some(serde_json::to_value(block("tx-9", 2)).unwrap()),
    )
    .await;
    assert_eq!(ack["data"]["stored"], false);

    let (entry,): (Vec<u8>,) =
        sqlx::query_as("SELECT entry FROM ledger_confirmation WHERE correlation_id = 'tx-9'")
            .fetch_one(&t.db.pool)
            .await
            .unwrap();
    let info: BlockInfo = serde_json::from_slice(&entry).unwrap();
    assert_eq!(info.block_num, 1);
}

#[tokio::test]
async fn test_callback_requires_id() {
    let t = test_app(false).await;
    let (status, body) = send(
        &t.app,
        Method::POST,
        "/api/v1/ledger/callback",
        Some(json!({ "blockchain": "cornerstone-chain", "id": "", "block_num": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}
