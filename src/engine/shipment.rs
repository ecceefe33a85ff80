// ==========================================
// 可乐产销协同计划系统 - 发运计划引擎
// ==========================================
// 职责: 把已分配量离散化为整车/尾车发运,并推算到货周
// 输入: AllocatedRow 表 + 计划参数
// 输出: PlannedRow 表
// 失败语义: 异常分配量(负数)按 0 处理,不报错
// ==========================================

use crate::config::PlanningParams;
use crate::domain::plan::{AllocatedRow, PlannedRow};
use crate::domain::types::PackingStrategy;
use tracing::instrument;

// ==========================================
// ShipmentPlanner - 发运计划引擎
// ==========================================
pub struct ShipmentPlanner {
    // 无状态引擎，不需要注入依赖
}

impl ShipmentPlanner {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成发运计划
    ///
    /// 逐行装车后补充派生字段:
    /// - unshipped = allocated - shipped
    /// - safety_met = shipped >= safety_stock
    /// - arrival_week = week + lead_time(dc), 未知 DC 默认 1 周
    ///
    /// # 参数
    /// - `rows`: 分配结果表
    /// - `params`: 计划参数（卡车容量/装车策略/尾车阈值/安全库存/提前期）
    #[instrument(skip(self, rows, params), fields(rows = rows.len(), strategy = %params.packing_strategy))]
    pub fn plan(&self, rows: &[AllocatedRow], params: &PlanningParams) -> Vec<PlannedRow> {
        rows.iter().map(|row| self.plan_row(row, params)).collect()
    }

    fn plan_row(&self, row: &AllocatedRow, params: &PlanningParams) -> PlannedRow {
        // 防御性取值: 负分配量按 0 处理
        let allocated = row.allocated.max(0);

        let (total_trucks, shipped, truck_utilization) = self.pack(allocated, params);
        let unshipped = allocated - shipped;
        let safety_met = shipped >= params.safety_stock;
        // 极端提前期配置下饱和而不回绕
        let arrival_week = row.week.saturating_add(params.lead_time_for(&row.dc));

        PlannedRow {
            sku: row.sku.clone(),
            dc: row.dc.clone(),
            week: row.week,
            demand: row.demand,
            allocated: row.allocated,
            total_trucks,
            shipped,
            unshipped,
            safety_met,
            truck_utilization,
            arrival_week,
        }
    }

    /// 单行装车
    ///
    /// # 返回
    /// (发车数, 发运量, 装载率百分比)
    fn pack(&self, allocated: i64, params: &PlanningParams) -> (i64, i64, f64) {
        let truck_size = params.truck_size;
        if truck_size <= 0 || allocated <= 0 {
            return (0, 0, 0.0);
        }

        match params.packing_strategy {
            // 仅整车: 不足一车的余量滞留
            PackingStrategy::FullTrucksOnly => {
                let total_trucks = allocated / truck_size;
                let shipped = total_trucks * truck_size;
                let utilization = if total_trucks > 0 { 100.0 } else { 0.0 };
                (total_trucks, shipped, utilization)
            }

            // 允许尾车: 余量达到阈值比例时加发一辆
            PackingStrategy::PartialTruck => {
                let full_trucks = allocated / truck_size;
                let remainder = allocated % truck_size;
                let use_partial = remainder > 0
                    && remainder as f64 >= params.partial_truck_threshold * truck_size as f64;

                let total_trucks = full_trucks + i64::from(use_partial);
                let shipped = full_trucks * truck_size + if use_partial { remainder } else { 0 };
                let utilization = if total_trucks > 0 {
                    shipped as f64 / (total_trucks * truck_size) as f64 * 100.0
                } else {
                    0.0
                };
                (total_trucks, shipped, utilization)
            }
        }
    }
}

impl Default for ShipmentPlanner {
    fn default() -> Self {
        Self::new()
    }
}
