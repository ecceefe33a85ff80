// ==========================================
// 可乐产销协同计划系统 - 命令行入口
// ==========================================
// 用法: cola-planning-aps <demand.csv> [plan_out.csv]
// 环境变量: COLA_APS_DB 指定数据库路径（默认 planning_results.db）
// ==========================================

use cola_planning_aps::api::{ApiError, PlanningApi};
use cola_planning_aps::domain::types::ViolationFlag;
use cola_planning_aps::logging;
use std::path::Path;

fn main() {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", cola_planning_aps::APP_NAME);
    tracing::info!("系统版本: {}", cola_planning_aps::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("用法: {} <demand.csv> [plan_out.csv]", args[0]);
        eprintln!("环境变量: COLA_APS_DB 指定数据库路径（默认 planning_results.db）");
        std::process::exit(2);
    }

    let demand_path = Path::new(&args[1]);
    let out_path = args.get(2).map(Path::new);
    let db_path =
        std::env::var("COLA_APS_DB").unwrap_or_else(|_| "planning_results.db".to_string());

    tracing::info!("使用数据库: {}", db_path);

    if let Err(e) = run(demand_path, out_path, &db_path) {
        tracing::error!("计划运行失败: {}", e);
        std::process::exit(1);
    }
}

fn run(demand_path: &Path, out_path: Option<&Path>, db_path: &str) -> Result<(), ApiError> {
    let api = PlanningApi::new(db_path)?;

    let demand = api.import_demand_csv(demand_path)?;
    let params = api.load_params()?;
    tracing::info!(
        "装车策略: {}, 周产能: {}",
        params.packing_strategy.title_cn(),
        params.base_capacity
    );
    let run = api.run_plan(&demand, &params)?;

    tracing::info!("服务水平: {:.1}%", run.metrics.service_level);
    tracing::info!("装载率: {:.1}%", run.metrics.truck_utilization);
    tracing::info!(
        "安全库存: {}",
        if run.metrics.all_safety_met { "全部达标" } else { "存在违规" }
    );

    let flags = api.classify_rows(&run);
    for flag in [
        ViolationFlag::SafetyViolation,
        ViolationFlag::UnderFill,
        ViolationFlag::LowUtilization,
    ] {
        let count = flags.iter().filter(|f| **f == flag).count();
        if count > 0 {
            tracing::warn!("{}: {} 行", flag.title_cn(), count);
        }
    }

    for line in api.summarize(&run) {
        tracing::info!("建议: {}", line);
    }

    if let Some(out) = out_path {
        api.export_plan_csv(&run, out)?;
        tracing::info!("计划已导出: {}", out.display());
    }

    let saved = api.save_plan(&run)?;
    tracing::info!("计划已落库: {} 行", saved);

    Ok(())
}
