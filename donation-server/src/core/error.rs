use thiserror::Error;

use crate::ledger::LedgerError;
use crate::utils::AppError;

/// 启动和运行期错误 (HTTP 处理器用 [`AppError`])
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("数据库初始化失败: {0}")]
    Database(AppError),

    #[error("链网关客户端初始化失败: {0}")]
    Ledger(#[from] LedgerError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
