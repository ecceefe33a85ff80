// ==========================================
// 可乐产销协同计划系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL; 引擎是输入+参数的纯函数
// ==========================================

pub mod allocation;
pub mod anomaly;
pub mod cluster;
pub mod forecast;
pub mod metrics;
pub mod optimizer;
pub mod orchestrator;
pub mod shipment;

// 重导出核心引擎
pub use allocation::AllocationEngine;
pub use anomaly::{AnomalyDetector, RobustZScoreDetector};
pub use cluster::{KMeansClustering, SkuClusterSummary, SkuClustering, DEFAULT_CLUSTERS};
pub use forecast::{DemandForecaster, MovingAverageForecaster, DEFAULT_FORECAST_HORIZON};
pub use metrics::MetricsCalculator;
pub use optimizer::{AllocationSolver, GreedyCostSolver, SolverError};
pub use orchestrator::{EnrichmentResult, PlanningOrchestrator};
pub use shipment::ShipmentPlanner;
