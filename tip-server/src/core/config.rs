use std::path::PathBuf;
use std::time::Duration;

/// 服务器配置 - tip ledger 的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (`.env` 文件由 main 通过 dotenv 加载)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (unset → stdout) | 日志目录，按天滚动 |
/// | COHORT_LOCK_TIMEOUT_MS | 5000 | 等待 cohort 锁的最长时间(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时时间(毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/tips HTTP_PORT=8080 cargo run -p tip-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别: trace | debug | info | warn | error
    pub log_level: String,
    /// 日志目录 (None 时输出到 stdout)
    pub log_dir: Option<String>,
    /// 获取 (team, date) 锁的超时 (毫秒)
    pub cohort_lock_timeout_ms: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            cohort_lock_timeout_ms: std::env::var("COHORT_LOCK_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录: {work_dir}/database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 数据库文件: {work_dir}/database/tips.redb
    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("tips.redb")
    }

    pub fn cohort_lock_timeout(&self) -> Duration {
        Duration::from_millis(self.cohort_lock_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
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
