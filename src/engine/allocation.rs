// ==========================================
// 可乐产销协同计划系统 - 产能分配引擎
// ==========================================
// 职责: 将周产能在同周竞争需求行之间分配
// 红线: 产能约束优先; 各周独立优化,不跨周借用、不结转欠量
// 输入: 需求表 + 计划参数
// 输出: AllocatedRow 表 (覆盖每个输入行)
// ==========================================

use crate::config::PlanningParams;
use crate::domain::demand::DemandRow;
use crate::domain::plan::AllocatedRow;
use crate::engine::optimizer::AllocationSolver;
use std::collections::BTreeMap;
use tracing::{instrument, warn};

// ==========================================
// AllocationEngine - 产能分配引擎
// ==========================================
pub struct AllocationEngine {
    // 无状态引擎，不需要注入依赖
}

impl AllocationEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 比例分配（默认路径）
    ///
    /// 规则（按周 w）：
    /// 1) total_demand_w <= capacity_w 时全额满足
    /// 2) 超需求时按份额取整: allocated_i = floor(demand_i / total * capacity)
    /// 3) total_demand_w == 0 时全 0
    ///
    /// 取整余量不做二次分摊，周合计允许低于产能（最多 n_rows - 1 件）。
    ///
    /// # 参数
    /// - `demand`: 需求表
    /// - `params`: 计划参数（产能与产能策略）
    ///
    /// # 返回
    /// AllocatedRow 表，按周升序，周内保持输入顺序
    #[instrument(skip(self, demand, params), fields(rows = demand.len()))]
    pub fn allocate(&self, demand: &[DemandRow], params: &PlanningParams) -> Vec<AllocatedRow> {
        self.allocate_weeks(demand, params, None)
    }

    /// 成本优化分配（可选路径）
    ///
    /// 逐周调用外部求解器；求解失败或解不可行时，该周回退为比例分配。
    #[instrument(skip(self, demand, params, solver), fields(rows = demand.len()))]
    pub fn allocate_with_solver(
        &self,
        demand: &[DemandRow],
        params: &PlanningParams,
        solver: &dyn AllocationSolver,
    ) -> Vec<AllocatedRow> {
        self.allocate_weeks(demand, params, Some(solver))
    }

    fn allocate_weeks(
        &self,
        demand: &[DemandRow],
        params: &PlanningParams,
        solver: Option<&dyn AllocationSolver>,
    ) -> Vec<AllocatedRow> {
        if demand.is_empty() {
            return Vec::new();
        }

        // 按周分组，周内保持输入顺序
        let mut weeks: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (idx, row) in demand.iter().enumerate() {
            weeks.entry(row.week).or_default().push(idx);
        }

        let mut result = Vec::with_capacity(demand.len());
        for (week, indices) in weeks {
            let capacity = params
                .capacity_policy
                .effective_capacity(week, params.base_capacity);

            let week_rows: Vec<&DemandRow> = indices.iter().map(|&i| &demand[i]).collect();

            let allocations = match solver {
                Some(s) => match s.solve(&week_rows, capacity, params) {
                    Ok(alloc) if Self::is_feasible(&alloc, &week_rows, capacity) => alloc,
                    Ok(_) => {
                        warn!(week, "求解器输出不可行，该周回退为比例分配");
                        Self::proportional_fill(&week_rows, capacity)
                    }
                    Err(e) => {
                        warn!(week, error = %e, "求解器失败，该周回退为比例分配");
                        Self::proportional_fill(&week_rows, capacity)
                    }
                },
                None => Self::proportional_fill(&week_rows, capacity),
            };

            for (row, allocated) in week_rows.iter().zip(allocations) {
                result.push(AllocatedRow::from_demand(row, allocated));
            }
        }

        result
    }

    /// 单周比例分配
    fn proportional_fill(rows: &[&DemandRow], capacity: i64) -> Vec<i64> {
        let total_demand: f64 = rows.iter().map(|r| r.demand).sum();

        if total_demand <= capacity as f64 {
            // 全额满足（整数截断）
            rows.iter().map(|r| r.demand.trunc() as i64).collect()
        } else if total_demand > 0.0 {
            // 比例配给，按份额向下取整
            rows.iter()
                .map(|r| (r.demand / total_demand * capacity as f64).floor() as i64)
                .collect()
        } else {
            vec![0; rows.len()]
        }
    }

    /// 可行性复核: 0 <= allocated_i <= demand_i 且周合计 <= 产能
    fn is_feasible(allocations: &[i64], rows: &[&DemandRow], capacity: i64) -> bool {
        if allocations.len() != rows.len() {
            return false;
        }
        let mut sum: i64 = 0;
        for (alloc, row) in allocations.iter().zip(rows) {
            if *alloc < 0 || (*alloc as f64) > row.demand {
                return false;
            }
            sum += alloc;
        }
        sum <= capacity.max(0)
    }
}

impl Default for AllocationEngine {
    fn default() -> Self {
        Self::new()
    }
}
