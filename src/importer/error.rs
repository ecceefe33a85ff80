// ==========================================
// 可乐产销协同计划系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 解析失败: {0}")]
    Csv(#[from] csv::Error),

    // ===== 数据映射错误 =====
    #[error("缺少必需列: {column}")]
    MissingColumn { column: String },

    #[error("字段值错误 (行 {row}, 字段 {field}): {message}")]
    FieldValueError {
        row: usize,
        field: String,
        message: String,
    },

    #[error("数值范围错误 (行 {row}, 字段 {field}): 值 {value} 低于下限 {min}")]
    ValueRangeError {
        row: usize,
        field: String,
        value: f64,
        min: f64,
    },
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
