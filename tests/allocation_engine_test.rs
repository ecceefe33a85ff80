// ==========================================
// AllocationEngine 引擎集成测试
// ==========================================
// 测试目标: 验证周产能分配逻辑
// 覆盖范围: 全额满足、比例配给、产能削减、求解器回退
// ==========================================

mod helpers;

use cola_planning_aps::config::PlanningParams;
use cola_planning_aps::domain::DemandRow;
use cola_planning_aps::engine::optimizer::{AllocationSolver, SolverError};
use cola_planning_aps::engine::{AllocationEngine, GreedyCostSolver, PlanningOrchestrator};
use helpers::test_data_builder::{cost_optimized_params, demand_row, flat_params};

#[test]
fn test_full_fill_when_demand_within_capacity() {
    let engine = AllocationEngine::new();
    let demand = vec![
        demand_row("Regular", "North", 1, 30_000.0),
        demand_row("Zero", "South", 1, 50_000.0),
    ];

    let result = engine.allocate(&demand, &flat_params(100_000));

    assert_eq!(result.len(), 2);
    for row in &result {
        assert_eq!(row.allocated as f64, row.demand);
    }
}

#[test]
fn test_single_row_absorbs_full_capacity() {
    // 单 SKU 超需求: 比例分配退化为整周产能
    let engine = AllocationEngine::new();
    let demand = vec![demand_row("Cola", "North", 1, 120_000.0)];

    let result = engine.allocate(&demand, &flat_params(100_000));

    assert_eq!(result[0].allocated, 100_000);
}

#[test]
fn test_proportional_rationing_two_rows() {
    let engine = AllocationEngine::new();
    let demand = vec![
        demand_row("A", "North", 1, 60_000.0),
        demand_row("B", "North", 1, 90_000.0),
    ];

    let result = engine.allocate(&demand, &flat_params(100_000));

    assert_eq!(result[0].allocated, 40_000);
    assert_eq!(result[1].allocated, 60_000);
}

#[test]
fn test_weekly_sum_never_exceeds_capacity() {
    let engine = AllocationEngine::new();
    // 取整余量不分摊: 合计允许低于产能,但绝不超过
    let demand = vec![
        demand_row("A", "North", 1, 33_333.0),
        demand_row("B", "North", 1, 33_333.0),
        demand_row("C", "South", 1, 33_335.0),
    ];
    let capacity = 50_000;

    let result = engine.allocate(&demand, &flat_params(capacity));

    let total: i64 = result.iter().map(|r| r.allocated).sum();
    assert!(total <= capacity);
    for row in &result {
        assert!(row.allocated >= 0);
        assert!((row.allocated as f64) <= row.demand);
    }
}

#[test]
fn test_zero_demand_week_allocates_zero() {
    let engine = AllocationEngine::new();
    let demand = vec![
        demand_row("A", "North", 1, 0.0),
        demand_row("B", "South", 1, 0.0),
    ];

    let result = engine.allocate(&demand, &flat_params(100_000));

    assert!(result.iter().all(|r| r.allocated == 0));
}

#[test]
fn test_empty_input_returns_empty() {
    let engine = AllocationEngine::new();
    let result = engine.allocate(&[], &flat_params(100_000));
    assert!(result.is_empty());
}

#[test]
fn test_weeks_are_independent() {
    let engine = AllocationEngine::new();
    let demand = vec![
        demand_row("A", "North", 1, 150_000.0), // 超产能周
        demand_row("A", "North", 2, 10_000.0),  // 欠载周,不吸收第 1 周欠量
    ];

    let result = engine.allocate(&demand, &flat_params(100_000));

    assert_eq!(result[0].allocated, 100_000);
    assert_eq!(result[1].allocated, 10_000);
}

#[test]
fn test_ramp_down_capacity_from_week_four() {
    let engine = AllocationEngine::new();
    // 默认产能策略: 第 4 周起保留 85%
    let params = PlanningParams {
        base_capacity: 100_000,
        ..Default::default()
    };
    let demand = vec![
        demand_row("A", "North", 3, 200_000.0),
        demand_row("A", "North", 4, 200_000.0),
    ];

    let result = engine.allocate(&demand, &params);

    assert_eq!(result[0].allocated, 100_000);
    assert_eq!(result[1].allocated, 85_000);
}

#[test]
fn test_input_order_preserved_within_week() {
    let engine = AllocationEngine::new();
    let demand = vec![
        demand_row("B", "South", 1, 10_000.0),
        demand_row("A", "North", 1, 10_000.0),
    ];

    let result = engine.allocate(&demand, &flat_params(100_000));

    assert_eq!(result[0].sku, "B");
    assert_eq!(result[1].sku, "A");
}

#[test]
fn test_duplicate_rows_each_get_share() {
    let engine = AllocationEngine::new();
    // 重复 (sku, dc, week) 行不去重,各自按份额参与配给
    let demand = vec![
        demand_row("A", "North", 1, 75_000.0),
        demand_row("A", "North", 1, 75_000.0),
    ];

    let result = engine.allocate(&demand, &flat_params(100_000));

    assert_eq!(result[0].allocated, 50_000);
    assert_eq!(result[1].allocated, 50_000);
}

// ==========================================
// 成本优化路径
// ==========================================

/// 恒定失败的求解器（回退路径测试用）
struct FailingSolver;

impl AllocationSolver for FailingSolver {
    fn solve(
        &self,
        _rows: &[&DemandRow],
        _capacity: i64,
        _params: &PlanningParams,
    ) -> Result<Vec<i64>, SolverError> {
        Err(SolverError::SolveFailed("测试用失败".to_string()))
    }
}

/// 输出超产能的求解器（可行性复核测试用）
struct OverCapacitySolver;

impl AllocationSolver for OverCapacitySolver {
    fn solve(
        &self,
        rows: &[&DemandRow],
        capacity: i64,
        _params: &PlanningParams,
    ) -> Result<Vec<i64>, SolverError> {
        Ok(vec![capacity; rows.len()])
    }
}

#[test]
fn test_solver_failure_falls_back_to_proportional() {
    let engine = AllocationEngine::new();
    let demand = vec![
        demand_row("A", "North", 1, 60_000.0),
        demand_row("B", "North", 1, 90_000.0),
    ];

    let result = engine.allocate_with_solver(&demand, &flat_params(100_000), &FailingSolver);

    // 与比例分配完全一致
    assert_eq!(result[0].allocated, 40_000);
    assert_eq!(result[1].allocated, 60_000);
}

#[test]
fn test_infeasible_solver_output_falls_back() {
    let engine = AllocationEngine::new();
    let demand = vec![
        demand_row("A", "North", 1, 60_000.0),
        demand_row("B", "North", 1, 90_000.0),
    ];

    let result = engine.allocate_with_solver(&demand, &flat_params(100_000), &OverCapacitySolver);

    let total: i64 = result.iter().map(|r| r.allocated).sum();
    assert!(total <= 100_000);
}

#[test]
fn test_greedy_solver_within_constraints() {
    let engine = AllocationEngine::new();
    let demand = vec![
        demand_row("A", "North", 1, 60_000.0),
        demand_row("B", "North", 1, 90_000.0),
        demand_row("C", "South", 2, 40_000.0),
    ];
    let params = flat_params(100_000);

    let result = engine.allocate_with_solver(&demand, &params, &GreedyCostSolver::new());

    for row in &result {
        assert!(row.allocated >= 0);
        assert!((row.allocated as f64) <= row.demand);
    }
    let week1_total: i64 = result
        .iter()
        .filter(|r| r.week == 1)
        .map(|r| r.allocated)
        .sum();
    assert!(week1_total <= 100_000);
}

#[test]
fn test_cost_optimized_mode_through_orchestrator() {
    let orchestrator = PlanningOrchestrator::new();
    let demand = vec![
        demand_row("A", "North", 1, 60_000.0),
        demand_row("B", "North", 1, 90_000.0),
    ];

    let run = orchestrator.run(&demand, &cost_optimized_params(100_000));

    // 产能紧张时安全库存层先行: 两行都至少配到 5000
    assert_eq!(run.planned.len(), 2);
    for row in &run.planned {
        assert!(row.allocated >= 5_000);
        assert!((row.allocated as f64) <= row.demand);
    }
    let total: i64 = run.planned.iter().map(|r| r.allocated).sum();
    assert!(total <= 100_000);
}

#[test]
fn test_cost_coefficients_reach_allocation_output() {
    // 同一需求、不同成本系数必须产出不同分配
    let engine = AllocationEngine::new();
    let demand = vec![
        demand_row("A", "North", 1, 60_000.0),
        demand_row("B", "North", 1, 90_000.0),
    ];
    let solver = GreedyCostSolver::new();

    let base_params = cost_optimized_params(100_000);
    let mut no_holding = base_params.clone();
    no_holding.costs.inventory = 0.0;

    let base = engine.allocate_with_solver(&demand, &base_params, &solver);
    let flat = engine.allocate_with_solver(&demand, &no_holding, &solver);

    assert_eq!(base[0].allocated, 40_357);
    assert_eq!(base[1].allocated, 59_642);
    assert_eq!(flat[0].allocated, 40_000);
    assert_eq!(flat[1].allocated, 60_000);
}
