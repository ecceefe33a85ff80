// ==========================================
// 可乐产销协同计划系统 - 计划领域模型
// ==========================================
// 管线: DemandRow -> AllocatedRow -> PlannedRow -> PlanMetrics
// 红线: 各阶段产出新表,不回写输入
// ==========================================

use crate::domain::demand::DemandRow;
use crate::domain::metrics::PlanMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// AllocatedRow - 产能分配行
// ==========================================
// 不变量: 0 <= allocated <= demand;
//         同周 allocated 之和 <= 当周有效产能 (当周需求为 0 时除外)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedRow {
    pub sku: String,
    pub dc: String,
    pub week: u32,
    pub demand: f64,
    pub allocated: i64, // 已分配量 (整数截断)
}

impl AllocatedRow {
    pub fn from_demand(row: &DemandRow, allocated: i64) -> Self {
        Self {
            sku: row.sku.clone(),
            dc: row.dc.clone(),
            week: row.week,
            demand: row.demand,
            allocated,
        }
    }
}

// ==========================================
// PlannedRow - 发运计划行
// ==========================================
// 字段顺序即 CSV 导出列序,不要调整
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRow {
    pub sku: String,
    pub dc: String,
    pub week: u32,
    pub demand: f64,
    pub allocated: i64,
    pub total_trucks: i64,      // 发车数
    pub shipped: i64,           // 实际发运量
    pub unshipped: i64,         // 滞留量 = allocated - shipped
    pub safety_met: bool,       // shipped >= 安全库存
    pub truck_utilization: f64, // 装载率 (百分比)
    pub arrival_week: u32,      // 到货周 = week + lead_time(dc)
}

// ==========================================
// ShipmentPlanRecord - 落库记录
// ==========================================
// shipment_plan 表的固定 schema,整表替换语义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentPlanRecord {
    pub sku: String,
    pub dc: String,
    pub week: u32,
    pub demand: f64,
    pub allocated: i64,
    pub total_trucks: i64,
    pub safety_met: bool,
}

impl From<&PlannedRow> for ShipmentPlanRecord {
    fn from(row: &PlannedRow) -> Self {
        Self {
            sku: row.sku.clone(),
            dc: row.dc.clone(),
            week: row.week,
            demand: row.demand,
            allocated: row.allocated,
            total_trucks: row.total_trucks,
            safety_met: row.safety_met,
        }
    }
}

// ==========================================
// PlanRun - 单次计划运行
// ==========================================
// 调用方持有的显式会话状态: 上传新需求或调整参数后整体重建,
// 不存在跨运行的共享可变状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRun {
    pub run_id: String,                       // 运行ID (uuid v4)
    pub created_at: DateTime<Utc>,            // 创建时间
    pub params_snapshot_json: Option<String>, // 参数快照 (JSON)
    pub demand: Vec<DemandRow>,               // 输入需求表
    pub planned: Vec<PlannedRow>,             // 发运计划表
    pub metrics: PlanMetrics,                 // 汇总指标
}
