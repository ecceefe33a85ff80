// ==========================================
// 可乐产销协同计划系统 - 数据仓储层
// ==========================================
// 职责: 数据访问
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod error;
pub mod shipment_plan_repo;

// 重导出核心类型
pub use error::{RepositoryError, RepositoryResult};
pub use shipment_plan_repo::ShipmentPlanRepository;
