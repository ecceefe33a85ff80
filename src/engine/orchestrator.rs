// ==========================================
// 可乐产销协同计划系统 - 引擎编排器
// ==========================================
// 用途: 协调 分配 -> 装车 -> 指标 的计算主流程
// 红线: 单线程同步计算;一次运行是输入+参数的纯函数;
//       富化(预测/异常/聚类)失败只降级,不中断主流程
// ==========================================

use crate::config::PlanningParams;
use crate::domain::demand::DemandRow;
use crate::domain::plan::PlanRun;
use crate::domain::types::AllocationMode;
use crate::engine::anomaly::AnomalyDetector;
use crate::engine::cluster::{SkuClusterSummary, SkuClustering, DEFAULT_CLUSTERS};
use crate::engine::forecast::DemandForecaster;
use crate::engine::optimizer::{AllocationSolver, GreedyCostSolver};
use crate::engine::{AllocationEngine, MetricsCalculator, ShipmentPlanner};
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

// ==========================================
// EnrichmentResult - 富化结果
// ==========================================
// 仅供展示,不影响分配与指标
#[derive(Debug, Clone)]
pub struct EnrichmentResult {
    /// 与 planned 表等长的异常列
    pub anomalies: Vec<bool>,
    /// SKU 级聚类画像（失败时为空表）
    pub clusters: Vec<SkuClusterSummary>,
}

// ==========================================
// PlanningOrchestrator - 引擎编排器
// ==========================================
pub struct PlanningOrchestrator {
    allocation: AllocationEngine,
    planner: ShipmentPlanner,
    metrics: MetricsCalculator,
    solver: Box<dyn AllocationSolver>,
}

impl PlanningOrchestrator {
    /// 创建新的编排器实例（默认贪心成本求解器）
    pub fn new() -> Self {
        Self::with_solver(Box::new(GreedyCostSolver::new()))
    }

    /// 注入自定义求解器（成本优化模式使用）
    pub fn with_solver(solver: Box<dyn AllocationSolver>) -> Self {
        Self {
            allocation: AllocationEngine::new(),
            planner: ShipmentPlanner::new(),
            metrics: MetricsCalculator::new(),
            solver,
        }
    }

    /// 执行完整计划流程
    ///
    /// 需求表 -> 产能分配 -> 发运装车 -> 汇总指标
    ///
    /// # 参数
    /// - `demand`: 需求表（调用方持有,不被修改）
    /// - `params`: 计划参数
    ///
    /// # 返回
    /// PlanRun: 带运行ID、参数快照与全部产出表的会话状态
    pub fn run(&self, demand: &[DemandRow], params: &PlanningParams) -> PlanRun {
        info!(
            rows = demand.len(),
            mode = %params.allocation_mode,
            strategy = %params.packing_strategy,
            "开始计划运行"
        );

        let allocated = match params.allocation_mode {
            AllocationMode::Proportional => self.allocation.allocate(demand, params),
            AllocationMode::CostOptimized => {
                self.allocation
                    .allocate_with_solver(demand, params, self.solver.as_ref())
            }
        };

        let planned = self.planner.plan(&allocated, params);
        let metrics = self.metrics.calculate(&planned);

        debug!(
            service_level = metrics.service_level,
            total_shipped = metrics.total_shipped,
            all_safety_met = metrics.all_safety_met,
            "计划运行完成"
        );

        PlanRun {
            run_id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            params_snapshot_json: serde_json::to_string(params).ok(),
            demand: demand.to_vec(),
            planned,
            metrics,
        }
    }

    /// 需求预测（失败降级为空表）
    pub fn forecast(
        &self,
        history: &[DemandRow],
        horizon: u32,
        forecaster: &dyn DemandForecaster,
    ) -> Vec<DemandRow> {
        match forecaster.forecast(history, horizon) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "需求预测失败，降级为空表");
                Vec::new()
            }
        }
    }

    /// 计划富化: 异常列 + SKU 聚类（均为失败降级,不中断）
    pub fn enrich(
        &self,
        run: &PlanRun,
        detector: &dyn AnomalyDetector,
        clustering: &dyn SkuClustering,
    ) -> EnrichmentResult {
        let anomalies = match detector.flag(&run.planned) {
            Ok(flags) if flags.len() == run.planned.len() => flags,
            Ok(flags) => {
                warn!(
                    expected = run.planned.len(),
                    actual = flags.len(),
                    "异常列长度与计划表不一致，降级为全 false"
                );
                vec![false; run.planned.len()]
            }
            Err(e) => {
                warn!(error = %e, "异常检测失败，降级为全 false");
                vec![false; run.planned.len()]
            }
        };

        let clusters = match clustering.cluster(&run.planned, DEFAULT_CLUSTERS) {
            Ok(clusters) => clusters,
            Err(e) => {
                warn!(error = %e, "SKU 聚类失败，降级为空表");
                Vec::new()
            }
        };

        EnrichmentResult {
            anomalies,
            clusters,
        }
    }
}

impl Default for PlanningOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
