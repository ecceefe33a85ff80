// ==========================================
// 可乐产销协同计划系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换下层错误为用户可读的错误消息
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 业务规则错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ===== 导入错误 =====
    #[error("文件导入失败: {0}")]
    Import(#[from] ImportError),

    // ===== 数据访问错误 =====
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),
}

// Repository 错误归并为 API 错误
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => {
                ApiError::DatabaseConnectionError(msg)
            }
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
