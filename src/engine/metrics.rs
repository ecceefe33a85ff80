// ==========================================
// 可乐产销协同计划系统 - 指标计算引擎
// ==========================================
// 职责: 从 PlannedRow 表推导汇总 KPI 与行级违规标志
// 红线: 只读投影,不回写计划表; 除零一律显式兜底
// ==========================================

use crate::domain::metrics::PlanMetrics;
use crate::domain::plan::PlannedRow;
use crate::domain::types::ViolationFlag;
use tracing::instrument;

/// 低装载率提示阈值（百分比）
pub const LOW_UTILIZATION_THRESHOLD_PCT: f64 = 70.0;

// ==========================================
// MetricsCalculator - 指标计算引擎
// ==========================================
pub struct MetricsCalculator {
    // 无状态引擎，不需要注入依赖
}

impl MetricsCalculator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算汇总指标
    ///
    /// - service_level = 100 * total_shipped / total_demand (total_demand=0 时为 0)
    /// - all_safety_met: 全行逻辑与;空表显式约定为 false
    /// - truck_utilization: 行级装载率均值;空表为 0
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub fn calculate(&self, rows: &[PlannedRow]) -> PlanMetrics {
        if rows.is_empty() {
            return PlanMetrics::empty();
        }

        let total_demand: f64 = rows.iter().map(|r| r.demand).sum();
        let total_shipped: i64 = rows.iter().map(|r| r.shipped).sum();

        let service_level = if total_demand > 0.0 {
            100.0 * total_shipped as f64 / total_demand
        } else {
            0.0
        };

        let all_safety_met = rows.iter().all(|r| r.safety_met);

        let truck_utilization =
            rows.iter().map(|r| r.truck_utilization).sum::<f64>() / rows.len() as f64;

        PlanMetrics {
            total_demand,
            total_shipped,
            service_level,
            all_safety_met,
            truck_utilization,
        }
    }

    /// 行级违规分类
    ///
    /// 优先级: 安全库存违规 > 欠配 > 低装载率 > 达标,只报最高一项
    pub fn classify(&self, row: &PlannedRow) -> ViolationFlag {
        if !row.safety_met {
            ViolationFlag::SafetyViolation
        } else if (row.allocated as f64) < row.demand {
            ViolationFlag::UnderFill
        } else if row.truck_utilization < LOW_UTILIZATION_THRESHOLD_PCT {
            ViolationFlag::LowUtilization
        } else {
            ViolationFlag::Compliant
        }
    }

    /// 全表行级违规分类
    pub fn classify_all(&self, rows: &[PlannedRow]) -> Vec<ViolationFlag> {
        rows.iter().map(|r| self.classify(r)).collect()
    }
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new()
    }
}
