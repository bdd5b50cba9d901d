use thiserror::Error;

use crate::db::StoreError;
use crate::utils::ErrorCode;

/// 启动和运行期的服务器错误
///
/// Request-level failures are [`crate::utils::AppError`]; this type only
/// covers bootstrapping and the serve loop.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("存储错误: {0}")]
    Store(#[from] StoreError),

    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServerError {
    /// 错误码 (写入启动失败日志)
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Store(_) => ErrorCode::DatabaseError,
            Self::Io(_) | Self::Internal(_) => ErrorCode::InternalError,
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
