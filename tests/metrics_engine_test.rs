// ==========================================
// MetricsCalculator 引擎集成测试
// ==========================================
// 测试目标: 验证汇总 KPI 与行级违规分类
// 覆盖范围: 服务水平、安全库存合规、空表约定、分类优先级
// ==========================================

mod helpers;

use cola_planning_aps::domain::types::ViolationFlag;
use cola_planning_aps::engine::MetricsCalculator;
use helpers::test_data_builder::planned_row;

#[test]
fn test_service_level_formula() {
    let calc = MetricsCalculator::new();
    let rows = vec![
        planned_row("A", "North", 1, 50_000.0, 40_000, 4, 40_000, true, 100.0),
        planned_row("B", "South", 1, 50_000.0, 40_000, 4, 40_000, true, 100.0),
    ];

    let metrics = calc.calculate(&rows);

    assert_eq!(metrics.total_demand, 100_000.0);
    assert_eq!(metrics.total_shipped, 80_000);
    assert!((metrics.service_level - 80.0).abs() < 1e-9);
    assert!(metrics.service_level >= 0.0 && metrics.service_level <= 100.0 + 1e-9);
}

#[test]
fn test_service_level_zero_when_no_demand() {
    let calc = MetricsCalculator::new();
    let rows = vec![planned_row("A", "North", 1, 0.0, 0, 0, 0, false, 0.0)];

    let metrics = calc.calculate(&rows);

    assert_eq!(metrics.service_level, 0.0);
}

#[test]
fn test_empty_table_metrics_convention() {
    let calc = MetricsCalculator::new();

    let metrics = calc.calculate(&[]);

    // 空表显式约定: all_safety_met = false
    assert!(!metrics.all_safety_met);
    assert_eq!(metrics.service_level, 0.0);
    assert_eq!(metrics.truck_utilization, 0.0);
    assert_eq!(metrics.total_shipped, 0);
}

#[test]
fn test_all_safety_met_requires_every_row() {
    let calc = MetricsCalculator::new();
    let mut rows = vec![
        planned_row("A", "North", 1, 10_000.0, 10_000, 1, 10_000, true, 100.0),
        planned_row("B", "South", 1, 10_000.0, 10_000, 1, 10_000, true, 100.0),
    ];

    assert!(calc.calculate(&rows).all_safety_met);

    rows[1].safety_met = false;
    assert!(!calc.calculate(&rows).all_safety_met);
}

#[test]
fn test_truck_utilization_is_row_mean() {
    let calc = MetricsCalculator::new();
    let rows = vec![
        planned_row("A", "North", 1, 10_000.0, 10_000, 1, 10_000, true, 100.0),
        planned_row("B", "South", 1, 10_000.0, 10_000, 1, 10_000, true, 50.0),
    ];

    let metrics = calc.calculate(&rows);

    assert!((metrics.truck_utilization - 75.0).abs() < 1e-9);
}

// ==========================================
// 行级违规分类
// ==========================================

#[test]
fn test_classify_safety_violation_has_highest_priority() {
    let calc = MetricsCalculator::new();
    // 同时满足 安全库存违规 + 欠配 + 低装载率: 只报安全库存
    let row = planned_row("A", "North", 1, 50_000.0, 3_000, 0, 0, false, 0.0);

    assert_eq!(calc.classify(&row), ViolationFlag::SafetyViolation);
}

#[test]
fn test_classify_under_fill() {
    let calc = MetricsCalculator::new();
    let row = planned_row("A", "North", 1, 50_000.0, 40_000, 4, 40_000, true, 100.0);

    assert_eq!(calc.classify(&row), ViolationFlag::UnderFill);
}

#[test]
fn test_classify_low_utilization() {
    let calc = MetricsCalculator::new();
    let row = planned_row("A", "North", 1, 40_000.0, 40_000, 5, 40_000, true, 65.0);

    assert_eq!(calc.classify(&row), ViolationFlag::LowUtilization);
}

#[test]
fn test_classify_compliant() {
    let calc = MetricsCalculator::new();
    let row = planned_row("A", "North", 1, 40_000.0, 40_000, 4, 40_000, true, 100.0);

    assert_eq!(calc.classify(&row), ViolationFlag::Compliant);
}

#[test]
fn test_classify_all_lengths_match() {
    let calc = MetricsCalculator::new();
    let rows = vec![
        planned_row("A", "North", 1, 40_000.0, 40_000, 4, 40_000, true, 100.0),
        planned_row("B", "South", 1, 50_000.0, 3_000, 0, 0, false, 0.0),
    ];

    let flags = calc.classify_all(&rows);

    assert_eq!(flags.len(), rows.len());
    assert_eq!(flags[0], ViolationFlag::Compliant);
    assert_eq!(flags[1], ViolationFlag::SafetyViolation);
}
