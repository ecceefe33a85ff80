// ==========================================
// 测试数据构造器
// ==========================================
// 职责: 提供需求行/分配行/计划行与默认参数的快捷构造
// ==========================================

use cola_planning_aps::config::PlanningParams;
use cola_planning_aps::domain::types::{AllocationMode, CapacityPolicy, PackingStrategy};
use cola_planning_aps::domain::{AllocatedRow, DemandRow, PlannedRow};

/// 需求行
pub fn demand_row(sku: &str, dc: &str, week: u32, demand: f64) -> DemandRow {
    DemandRow::new(sku, dc, week, demand)
}

/// 分配行
pub fn allocated_row(sku: &str, dc: &str, week: u32, demand: f64, allocated: i64) -> AllocatedRow {
    AllocatedRow {
        sku: sku.to_string(),
        dc: dc.to_string(),
        week,
        demand,
        allocated,
    }
}

/// 计划行（指标/分类测试用，派生字段由调用方给定）
#[allow(clippy::too_many_arguments)]
pub fn planned_row(
    sku: &str,
    dc: &str,
    week: u32,
    demand: f64,
    allocated: i64,
    total_trucks: i64,
    shipped: i64,
    safety_met: bool,
    truck_utilization: f64,
) -> PlannedRow {
    PlannedRow {
        sku: sku.to_string(),
        dc: dc.to_string(),
        week,
        demand,
        allocated,
        total_trucks,
        shipped,
        unshipped: allocated - shipped,
        safety_met,
        truck_utilization,
        arrival_week: week + 1,
    }
}

/// 固定产能参数（仅整车）
pub fn flat_params(base_capacity: i64) -> PlanningParams {
    PlanningParams {
        base_capacity,
        capacity_policy: CapacityPolicy::Flat,
        ..Default::default()
    }
}

/// 尾车策略参数
pub fn partial_truck_params(base_capacity: i64, threshold: f64) -> PlanningParams {
    PlanningParams {
        base_capacity,
        capacity_policy: CapacityPolicy::Flat,
        packing_strategy: PackingStrategy::PartialTruck,
        partial_truck_threshold: threshold,
        ..Default::default()
    }
}

/// 成本优化模式参数
pub fn cost_optimized_params(base_capacity: i64) -> PlanningParams {
    PlanningParams {
        base_capacity,
        capacity_policy: CapacityPolicy::Flat,
        allocation_mode: AllocationMode::CostOptimized,
        ..Default::default()
    }
}
