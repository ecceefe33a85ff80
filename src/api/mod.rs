// ==========================================
// 可乐产销协同计划系统 - API 层
// ==========================================
// 职责: 面向调用方的业务接口,组合引擎/导入/仓储/配置
// ==========================================

pub mod error;
pub mod planning_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use planning_api::PlanningApi;
