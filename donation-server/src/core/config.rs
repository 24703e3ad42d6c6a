use std::time::Duration;

use crate::publish::ConfirmationSettings;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_PATH | ./data/donation.db | SQLite 数据库文件 |
/// | HTTP_PORT | 8080 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LEDGER_GATEWAY_URL | http://localhost:9143 | 链网关地址 |
/// | LEDGER_TIMEOUT_MS | 10000 | 上链请求超时(毫秒) |
/// | CONFIRM_POLL_INTERVAL_MS | 1000 | 确认轮询间隔(毫秒) |
/// | CONFIRM_DEADLINE_PER_RECORD_SECS | 60 | 每条记录的确认等待上限(秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 (设置后按天滚动写文件) |
///
/// # 示例
///
/// ```ignore
/// DATABASE_PATH=/data/donation.db HTTP_PORT=9000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 链网关 base URL
    pub ledger_gateway_url: String,
    /// 上链请求超时 (毫秒)
    pub ledger_timeout_ms: u64,
    /// 确认轮询间隔 (毫秒)
    pub confirm_poll_interval_ms: u64,
    /// 每条记录的确认等待上限 (秒)
    pub confirm_deadline_per_record_secs: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/donation.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            ledger_gateway_url: std::env::var("LEDGER_GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:9143".into()),
            ledger_timeout_ms: std::env::var("LEDGER_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            confirm_poll_interval_ms: std::env::var("CONFIRM_POLL_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &u64| *v > 0)
                .unwrap_or(1_000),
            confirm_deadline_per_record_secs: std::env::var("CONFIRM_DEADLINE_PER_RECORD_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }

    pub fn ledger_timeout(&self) -> Duration {
        Duration::from_millis(self.ledger_timeout_ms)
    }

    pub fn confirmation_settings(&self) -> ConfirmationSettings {
        ConfirmationSettings {
            poll_interval: Duration::from_millis(self.confirm_poll_interval_ms),
            deadline_per_record: Duration::from_secs(self.confirm_deadline_per_record_secs),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
