//! Donation Server - 捐赠/物资公示服务
//!
//! # 架构概述
//!
//! 记录先落库 (未提交事务)，再提交到外部账本，拿到 correlation id 后
//! 回写并提交事务，最后在同一个请求里等待账本的最终确认。
//!
//! # 模块结构
//!
//! ```text
//! donation-server/src/
//! ├── core/          # 配置、状态、错误、HTTP 服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── publish/       # Publish-Commit-Confirm 协调器
//! ├── store/         # 记录存储 (事务)
//! ├── ledger/        # 账本发布器、链上身份
//! ├── confirmation/  # 确认回执通道
//! ├── db/            # SQLite 连接池和迁移
//! └── utils/         # 日志、校验、结果类型
//! ```

pub mod api;
pub mod confirmation;
pub mod core;
pub mod db;
pub mod ledger;
pub mod publish;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use publish::{ExecutionContext, Outcome, PublishCoordinator, PublishError, PublishState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;
