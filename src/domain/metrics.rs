// ==========================================
// 可乐产销协同计划系统 - 汇总指标领域模型
// ==========================================
// 用途: PlannedRow 表的只读投影,按需重算不落行级
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// PlanMetrics - 计划汇总指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanMetrics {
    pub total_demand: f64,       // 总需求
    pub total_shipped: i64,      // 总发运量
    pub service_level: f64,      // 服务水平 = 100 * shipped / demand (demand=0 时为 0)
    pub all_safety_met: bool,    // 全行安全库存达标 (空表显式为 false)
    pub truck_utilization: f64,  // 行级装载率均值 (空表为 0)
}

impl PlanMetrics {
    /// 空表指标（显式约定: all_safety_met = false）
    pub fn empty() -> Self {
        Self {
            total_demand: 0.0,
            total_shipped: 0,
            service_level: 0.0,
            all_safety_met: false,
            truck_utilization: 0.0,
        }
    }
}
