// ==========================================
// 可乐产销协同计划系统 - 计划业务接口
// ==========================================
// 职责: 导入 -> 计划 -> 富化 -> 导出/落库 的门面
// 约定: 会话状态是调用方持有的 PlanRun,本层无跨调用可变状态
// ==========================================

use crate::config::{ConfigManager, PlanningParams};
use crate::domain::demand::DemandRow;
use crate::domain::plan::{PlanRun, ShipmentPlanRecord};
use crate::domain::types::{AllocationMode, ViolationFlag};
use crate::engine::anomaly::AnomalyDetector;
use crate::engine::cluster::SkuClustering;
use crate::engine::forecast::DemandForecaster;
use crate::engine::{EnrichmentResult, MetricsCalculator, PlanningOrchestrator};
use crate::importer::demand_importer::DemandImporter;
use crate::importer::exporter;
use crate::repository::shipment_plan_repo::ShipmentPlanRepository;
use crate::api::error::{ApiError, ApiResult};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// 服务水平提示阈值（百分比）
pub const SERVICE_LEVEL_ADVISORY_PCT: f64 = 90.0;

// ==========================================
// PlanningApi - 计划业务接口
// ==========================================
pub struct PlanningApi {
    repo: ShipmentPlanRepository,
    config: ConfigManager,
    orchestrator: PlanningOrchestrator,
    importer: DemandImporter,
    metrics: MetricsCalculator,
}

impl PlanningApi {
    /// 创建新的 PlanningApi 实例
    ///
    /// 打开数据库、初始化 schema,所有组件共享同一连接
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ApiResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        crate::db::init_schema(&conn)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let conn = Arc::new(Mutex::new(conn));
        Self::from_connection(conn)
    }

    /// 从已有连接创建 PlanningApi
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        let repo = ShipmentPlanRepository::from_connection(conn.clone());
        let config = ConfigManager::from_connection(conn)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        Ok(Self {
            repo,
            config,
            orchestrator: PlanningOrchestrator::new(),
            importer: DemandImporter::new(),
            metrics: MetricsCalculator::new(),
        })
    }

    /// 配置管理器（参数覆写入口）
    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    // ==========================================
    // 导入 / 参数
    // ==========================================

    /// 导入需求 CSV
    pub fn import_demand_csv(&self, file_path: &Path) -> ApiResult<Vec<DemandRow>> {
        Ok(self.importer.import_file(file_path)?)
    }

    /// 装载计划参数（config_kv 覆写 + 内置默认值）
    pub fn load_params(&self) -> ApiResult<PlanningParams> {
        self.config
            .load_planning_params()
            .map_err(|e| ApiError::InternalError(e.to_string()))
    }

    // ==========================================
    // 计划运行
    // ==========================================

    /// 执行计划运行
    ///
    /// # 参数
    /// - demand: 需求表
    /// - params: 计划参数（先做合法性校验）
    pub fn run_plan(&self, demand: &[DemandRow], params: &PlanningParams) -> ApiResult<PlanRun> {
        params
            .validate()
            .map_err(ApiError::InvalidInput)?;

        Ok(self.orchestrator.run(demand, params))
    }

    /// 执行计划运行并富化（异常列 + SKU 聚类）
    ///
    /// 富化失败只降级为中性默认值,主计划仍然产出
    pub fn run_plan_with_enrichments(
        &self,
        demand: &[DemandRow],
        params: &PlanningParams,
        detector: &dyn AnomalyDetector,
        clustering: &dyn SkuClustering,
    ) -> ApiResult<(PlanRun, EnrichmentResult)> {
        let run = self.run_plan(demand, params)?;
        let enrichment = self.orchestrator.enrich(&run, detector, clustering);
        Ok((run, enrichment))
    }

    /// 预测式计划: 历史需求 -> 预测需求 -> 成本优化计划
    ///
    /// # 参数
    /// - history: 历史需求表
    /// - params: 计划参数（本方法强制成本优化模式）
    /// - horizon: 预测周数
    pub fn run_forecast_plan(
        &self,
        history: &[DemandRow],
        params: &PlanningParams,
        horizon: u32,
        forecaster: &dyn DemandForecaster,
    ) -> ApiResult<PlanRun> {
        params
            .validate()
            .map_err(ApiError::InvalidInput)?;

        let forecast = self.orchestrator.forecast(history, horizon, forecaster);
        info!(history = history.len(), forecast = forecast.len(), "预测需求生成完成");

        let params = PlanningParams {
            allocation_mode: AllocationMode::CostOptimized,
            ..params.clone()
        };
        Ok(self.orchestrator.run(&forecast, &params))
    }

    // ==========================================
    // 导出 / 落库
    // ==========================================

    /// 导出发运计划 CSV
    pub fn export_plan_csv(&self, run: &PlanRun, file_path: &Path) -> ApiResult<()> {
        Ok(exporter::write_plan_csv(file_path, &run.planned)?)
    }

    /// 落库发运计划（整表替换）
    pub fn save_plan(&self, run: &PlanRun) -> ApiResult<usize> {
        Ok(self.repo.replace_all(&run.planned)?)
    }

    /// 读取已落库的发运计划
    pub fn load_saved_plan(&self) -> ApiResult<Vec<ShipmentPlanRecord>> {
        Ok(self.repo.load_all()?)
    }

    // ==========================================
    // 摘要 / 分类
    // ==========================================

    /// 行级违规分类
    pub fn classify_rows(&self, run: &PlanRun) -> Vec<ViolationFlag> {
        self.metrics.classify_all(&run.planned)
    }

    /// 执行摘要: 面向决策者的建议文本
    pub fn summarize(&self, run: &PlanRun) -> Vec<String> {
        let mut lines = Vec::new();

        if !run.metrics.all_safety_met {
            lines.push("部分 SKU/DC 未满足安全库存，建议提高产能或调整安全库存参数".to_string());
        }

        if run.metrics.service_level < SERVICE_LEVEL_ADVISORY_PCT {
            lines.push(format!(
                "服务水平 {:.0}% 低于 {:.0}%，建议优化分配或提升产能",
                run.metrics.service_level, SERVICE_LEVEL_ADVISORY_PCT
            ));
        } else if run.metrics.all_safety_met {
            lines.push("各项 KPI 均在可接受范围内".to_string());
        }

        lines
    }
}
