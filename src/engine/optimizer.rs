// ==========================================
// 可乐产销协同计划系统 - 成本优化求解器
// ==========================================
// 职责: 成本优化分配的可插拔求解接口与默认实现
// 目标函数: min 生产成本*allocated + 运输成本*(allocated/truck_size)
//              + 库存成本*slack, slack = max(0, safety_stock - allocated)
// 约束: allocated_i <= demand_i; 周合计 <= capacity
// 说明: 求解器运行时间不受本模块约束,调用方自行设定超时
// ==========================================

use crate::config::PlanningParams;
use crate::domain::demand::DemandRow;
use thiserror::Error;
use tracing::debug;

/// 求解器错误类型
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("问题不可行: {0}")]
    Infeasible(String),

    #[error("求解失败: {0}")]
    SolveFailed(String),
}

// ==========================================
// Trait: AllocationSolver
// ==========================================
// 用途: 成本优化分配的窄接口;任何满足约束的实现均可接入
pub trait AllocationSolver {
    /// 求解单周分配
    ///
    /// # 参数
    /// - `rows`: 当周需求行
    /// - `capacity`: 当周有效产能
    /// - `params`: 计划参数（成本系数、卡车容量、安全库存）
    ///
    /// # 返回
    /// - Ok(Vec<i64>): 与 rows 等长的分配量
    /// - Err: 不可行或求解失败（调用方回退为比例分配）
    fn solve(
        &self,
        rows: &[&DemandRow],
        capacity: i64,
        params: &PlanningParams,
    ) -> Result<Vec<i64>, SolverError>;
}

// ==========================================
// GreedyCostSolver - 贪心成本求解器
// ==========================================
// 三个成本系数都参与决策:
// 1) 安全库存层: inventory 惩罚为正时,每行先配到 min(demand, safety_stock),
//    缺口越大越先配(平局按输入顺序); 惩罚为 0 时该层没有成本收益,跳过
// 2) 余量层: 剩余产能按剩余需求比例向下取整分摊
// 3) 整车化: 单件摊薄运输成本 transport/truck_size 超过单件生产成本时,
//    非整车尾量不值得发运,分配量向下取整到整车(安全层配额保留)
// 确定性,运行时间 O(n log n)
pub struct GreedyCostSolver;

impl GreedyCostSolver {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for GreedyCostSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationSolver for GreedyCostSolver {
    fn solve(
        &self,
        rows: &[&DemandRow],
        capacity: i64,
        params: &PlanningParams,
    ) -> Result<Vec<i64>, SolverError> {
        if capacity < 0 {
            return Err(SolverError::Infeasible(format!(
                "产能为负: {}",
                capacity
            )));
        }
        if params.truck_size <= 0 {
            return Err(SolverError::SolveFailed(format!(
                "truck_size 必须为正: {}",
                params.truck_size
            )));
        }

        let n = rows.len();
        let mut allocations = vec![0i64; n];
        let mut remaining = capacity;

        // 单件摊薄运输成本
        let unit_transport = params.costs.transport / params.truck_size as f64;

        // 第一层: 安全库存缺口,缺口大者优先
        // inventory 惩罚为 0 时消除缺口没有成本收益,整层跳过
        let mut safety_floor = vec![0i64; n];
        if params.costs.inventory > 0.0 {
            let mut order: Vec<usize> = (0..n).collect();
            order.sort_by(|&a, &b| {
                let need_a = safety_tier_need(rows[a].demand, params.safety_stock);
                let need_b = safety_tier_need(rows[b].demand, params.safety_stock);
                need_b.cmp(&need_a).then(a.cmp(&b))
            });

            for &i in &order {
                if remaining <= 0 {
                    break;
                }
                let need = safety_tier_need(rows[i].demand, params.safety_stock);
                let give = need.min(remaining);
                allocations[i] = give;
                safety_floor[i] = give;
                remaining -= give;
            }
        }

        // 第二层: 剩余需求按比例分摊（向下取整,余量不分摊）
        let residuals: Vec<i64> = rows
            .iter()
            .zip(&allocations)
            .map(|(row, &alloc)| (row.demand.trunc() as i64 - alloc).max(0))
            .collect();
        let residual_total: i64 = residuals.iter().sum();

        if remaining > 0 && residual_total > 0 {
            let pool = remaining;
            for i in 0..n {
                let extra =
                    (residuals[i] as f64 / residual_total as f64 * pool as f64).floor() as i64;
                allocations[i] += extra.min(residuals[i]);
            }
        }

        // 高运输成本制度: 非整车尾量不值得发运,向下取整到整车
        if unit_transport > params.costs.production {
            for i in 0..n {
                let quantized = allocations[i] / params.truck_size * params.truck_size;
                allocations[i] = quantized.max(safety_floor[i]);
            }
        }

        debug!(
            rows = n,
            capacity,
            allocated_total = allocations.iter().sum::<i64>(),
            "贪心成本求解完成"
        );

        Ok(allocations)
    }
}

/// 单行安全库存层需求量
fn safety_tier_need(demand: f64, safety_stock: i64) -> i64 {
    (demand.trunc() as i64).clamp(0, safety_stock.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sku: &str, demand: f64) -> DemandRow {
        DemandRow::new(sku, "North", 1, demand)
    }

    #[test]
    fn test_greedy_respects_capacity_and_demand() {
        let rows = [row("A", 60_000.0), row("B", 90_000.0)];
        let refs: Vec<&DemandRow> = rows.iter().collect();
        let params = PlanningParams::default();

        let alloc = GreedyCostSolver::new()
            .solve(&refs, 100_000, &params)
            .unwrap();

        assert!(alloc.iter().sum::<i64>() <= 100_000);
        for (a, r) in alloc.iter().zip(&rows) {
            assert!(*a >= 0 && (*a as f64) <= r.demand);
        }
    }

    #[test]
    fn test_greedy_covers_safety_tier_first() {
        // 产能只够安全库存层
        let rows = [row("A", 60_000.0), row("B", 90_000.0)];
        let refs: Vec<&DemandRow> = rows.iter().collect();
        let params = PlanningParams::default(); // safety_stock = 5000

        let alloc = GreedyCostSolver::new().solve(&refs, 10_000, &params).unwrap();

        assert_eq!(alloc, vec![5_000, 5_000]);
    }

    #[test]
    fn test_zero_inventory_cost_skips_safety_tier() {
        // inventory 惩罚为 0: 安全库存层无收益,直接按比例分摊
        let rows = [row("A", 60_000.0), row("B", 90_000.0)];
        let refs: Vec<&DemandRow> = rows.iter().collect();
        let mut params = PlanningParams::default();
        params.costs.inventory = 0.0;

        let alloc = GreedyCostSolver::new().solve(&refs, 10_000, &params).unwrap();

        assert_eq!(alloc, vec![4_000, 6_000]);
    }

    #[test]
    fn test_high_transport_cost_quantizes_to_full_trucks() {
        // 单件摊薄运输成本 20 > 单件生产成本 1: 尾量不发,取整到整车
        let rows = [row("A", 48_000.0)];
        let refs: Vec<&DemandRow> = rows.iter().collect();
        let mut params = PlanningParams::default();
        params.costs.transport = 200_000.0;

        let alloc = GreedyCostSolver::new().solve(&refs, 33_000, &params).unwrap();

        // 安全层 5000 + 余量层 28000 = 33000,整车化后 30000
        assert_eq!(alloc, vec![30_000]);
    }

    #[test]
    fn test_cost_coefficients_change_allocation() {
        let rows = [row("A", 60_000.0), row("B", 90_000.0)];
        let refs: Vec<&DemandRow> = rows.iter().collect();
        let solver = GreedyCostSolver::new();

        let base = solver.solve(&refs, 100_000, &PlanningParams::default()).unwrap();

        let mut cheap_holding = PlanningParams::default();
        cheap_holding.costs.inventory = 0.0;
        let no_safety = solver.solve(&refs, 100_000, &cheap_holding).unwrap();

        // 默认成本: 安全层 5000+5000,余量按比例 → [40357, 59642]
        assert_eq!(base, vec![40_357, 59_642]);
        // 零持有惩罚: 退化为纯比例分摊
        assert_eq!(no_safety, vec![40_000, 60_000]);
        assert_ne!(base, no_safety);
    }

    #[test]
    fn test_greedy_rejects_negative_capacity() {
        let rows = [row("A", 1_000.0)];
        let refs: Vec<&DemandRow> = rows.iter().collect();
        let params = PlanningParams::default();

        assert!(GreedyCostSolver::new().solve(&refs, -1, &params).is_err());
    }
}
