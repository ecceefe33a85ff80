// ==========================================
// 可乐产销协同计划系统 - 领域层
// ==========================================
// 职责: 领域实体与类型定义,不含业务规则
// ==========================================

pub mod demand;
pub mod metrics;
pub mod plan;
pub mod types;

// 重导出核心实体
pub use demand::DemandRow;
pub use metrics::PlanMetrics;
pub use plan::{AllocatedRow, PlanRun, PlannedRow, ShipmentPlanRecord};
pub use types::{AllocationMode, CapacityPolicy, PackingStrategy, ViolationFlag};
