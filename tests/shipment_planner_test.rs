// ==========================================
// ShipmentPlanner 引擎集成测试
// ==========================================
// 测试目标: 验证装车、安全库存标志与到货周推算
// 覆盖范围: 整车策略、尾车策略、提前期回退、防御性取值
// ==========================================

mod helpers;

use cola_planning_aps::domain::types::PackingStrategy;
use cola_planning_aps::engine::ShipmentPlanner;
use helpers::test_data_builder::{allocated_row, flat_params, partial_truck_params};

#[test]
fn test_full_trucks_only_ships_multiples_of_truck_size() {
    let planner = ShipmentPlanner::new();
    let rows = vec![
        allocated_row("A", "North", 1, 25_000.0, 25_000),
        allocated_row("B", "South", 1, 9_999.0, 9_999),
        allocated_row("C", "North", 1, 40_000.0, 40_000),
    ];
    let params = flat_params(150_000); // truck_size = 10000

    let result = planner.plan(&rows, &params);

    for row in &result {
        assert_eq!(row.shipped % params.truck_size, 0);
        assert_eq!(row.unshipped, row.allocated - row.shipped);
        assert!(row.unshipped >= 0);
    }
    assert_eq!(result[0].total_trucks, 2);
    assert_eq!(result[0].shipped, 20_000);
    assert_eq!(result[0].unshipped, 5_000);
    // 不足一车: 不发运
    assert_eq!(result[1].total_trucks, 0);
    assert_eq!(result[1].shipped, 0);
    assert_eq!(result[1].truck_utilization, 0.0);
}

#[test]
fn test_full_trucks_only_utilization_is_binary() {
    let planner = ShipmentPlanner::new();
    let rows = vec![
        allocated_row("A", "North", 1, 20_000.0, 20_000),
        allocated_row("B", "North", 1, 5_000.0, 5_000),
    ];

    let result = planner.plan(&rows, &flat_params(150_000));

    assert_eq!(result[0].truck_utilization, 100.0);
    assert_eq!(result[1].truck_utilization, 0.0);
}

#[test]
fn test_partial_truck_below_threshold_holds_remainder() {
    // allocated=23000, truck=10000, threshold=0.6: 余量 3000 < 6000,不加发
    let planner = ShipmentPlanner::new();
    let rows = vec![allocated_row("A", "North", 1, 23_000.0, 23_000)];

    let result = planner.plan(&rows, &partial_truck_params(150_000, 0.6));

    assert_eq!(result[0].total_trucks, 2);
    assert_eq!(result[0].shipped, 20_000);
    assert_eq!(result[0].unshipped, 3_000);
}

#[test]
fn test_partial_truck_at_threshold_dispatches_tail_truck() {
    // allocated=27000, 余量 7000 >= 6000,加发尾车
    let planner = ShipmentPlanner::new();
    let rows = vec![allocated_row("A", "North", 1, 27_000.0, 27_000)];

    let result = planner.plan(&rows, &partial_truck_params(150_000, 0.6));

    assert_eq!(result[0].total_trucks, 3);
    assert_eq!(result[0].shipped, 27_000);
    assert_eq!(result[0].unshipped, 0);
    assert!((result[0].truck_utilization - 90.0).abs() < 1e-9);
}

#[test]
fn test_partial_truck_utilization_zero_when_no_trucks() {
    let planner = ShipmentPlanner::new();
    let rows = vec![allocated_row("A", "North", 1, 2_000.0, 2_000)];

    let result = planner.plan(&rows, &partial_truck_params(150_000, 0.6));

    assert_eq!(result[0].total_trucks, 0);
    assert_eq!(result[0].truck_utilization, 0.0);
}

#[test]
fn test_safety_met_flag() {
    let planner = ShipmentPlanner::new();
    // safety_stock 默认 5000
    let rows = vec![
        allocated_row("A", "North", 1, 10_000.0, 10_000), // shipped 10000 >= 5000
        allocated_row("B", "South", 1, 4_000.0, 4_000),   // shipped 0 < 5000
    ];

    let result = planner.plan(&rows, &flat_params(150_000));

    assert!(result[0].safety_met);
    assert!(!result[1].safety_met);
}

#[test]
fn test_arrival_week_uses_lead_time_map_with_fallback() {
    let planner = ShipmentPlanner::new();
    let rows = vec![
        allocated_row("A", "North", 2, 10_000.0, 10_000),
        allocated_row("A", "South", 2, 10_000.0, 10_000),
        allocated_row("A", "East", 2, 10_000.0, 10_000), // 未知 DC
    ];

    let result = planner.plan(&rows, &flat_params(150_000));

    assert_eq!(result[0].arrival_week, 3); // North: 1 周
    assert_eq!(result[1].arrival_week, 4); // South: 2 周
    assert_eq!(result[2].arrival_week, 3); // 默认 1 周
}

#[test]
fn test_negative_allocated_coerced_to_zero() {
    let planner = ShipmentPlanner::new();
    let rows = vec![allocated_row("A", "North", 1, 10_000.0, -5_000)];

    let result = planner.plan(&rows, &flat_params(150_000));

    assert_eq!(result[0].total_trucks, 0);
    assert_eq!(result[0].shipped, 0);
    assert_eq!(result[0].unshipped, 0);
}

#[test]
fn test_empty_input_returns_empty() {
    let planner = ShipmentPlanner::new();
    let result = planner.plan(&[], &flat_params(150_000));
    assert!(result.is_empty());
}

#[test]
fn test_strategy_switch_changes_shipped() {
    let planner = ShipmentPlanner::new();
    let rows = vec![allocated_row("A", "North", 1, 27_000.0, 27_000)];

    let mut params = flat_params(150_000);
    params.packing_strategy = PackingStrategy::FullTrucksOnly;
    let full_only = planner.plan(&rows, &params);

    let partial = planner.plan(&rows, &partial_truck_params(150_000, 0.6));

    assert_eq!(full_only[0].shipped, 20_000);
    assert_eq!(partial[0].shipped, 27_000);
}
