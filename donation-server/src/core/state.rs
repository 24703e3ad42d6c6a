use std::sync::Arc;

use crate::confirmation::SqliteConfirmationChannel;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::ledger::{HttpLedgerPublisher, LedgerPublisher, SqliteIdentityResolver};
use crate::publish::PublishCoordinator;
use crate::store::SqliteRecordStore;

/// 服务器状态 - 所有处理器共享
///
/// 克隆成本低 (内部均为 Arc / 连接池句柄)
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub db: DbService,
    /// 公示流程协调器
    pub coordinator: PublishCoordinator,
    /// 确认回执写入端 (回调接口使用)
    pub confirmations: SqliteConfirmationChannel,
    /// uid → DID
    pub identities: SqliteIdentityResolver,
}

impl ServerState {
    /// 打开数据库并组装协调器, 上链走 HTTP 网关
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path)
            .await
            .map_err(ServerError::Database)?;
        let publisher =
            HttpLedgerPublisher::new(config.ledger_gateway_url.clone(), config.ledger_timeout())?;
        Ok(Self::with_publisher(config.clone(), db, Arc::new(publisher)))
    }

    /// 使用自定义发布器 (测试替身、其他网关)
    pub fn with_publisher(
        config: Config,
        db: DbService,
        publisher: Arc<dyn LedgerPublisher>,
    ) -> Self {
        let store = SqliteRecordStore::new(db.pool.clone());
        let identities = SqliteIdentityResolver::new(db.pool.clone());
        let confirmations = SqliteConfirmationChannel::new(db.pool.clone());

        let coordinator = PublishCoordinator::new(
            Arc::new(store),
            Arc::new(identities.clone()),
            publisher,
            Arc::new(confirmations.clone()),
        )
        .with_settings(config.confirmation_settings());

        Self {
            config,
            db,
            coordinator,
            confirmations,
            identities,
        }
    }
}
