// ==========================================
// 可乐产销协同计划系统 - 需求预测协作方
// ==========================================
// 职责: 基于历史需求生成未来周次的合成需求行
// 约定: 预测只是富化输入,不回写历史;失败由编排层降级为空表
// ==========================================

use crate::domain::demand::DemandRow;
use std::collections::BTreeMap;
use tracing::instrument;

/// 默认预测期数（周）
pub const DEFAULT_FORECAST_HORIZON: u32 = 8;

/// 预测基准的需求下限
const MIN_BASE_DEMAND: f64 = 1_000.0;

/// 单周预测值下限
const MIN_FORECAST_DEMAND: i64 = 500;

// ==========================================
// Trait: DemandForecaster
// ==========================================
// 用途: 预测算法的窄接口;输出形状必须与 DemandRow 一致,
//       算法本身(统计/启发式/学习)不做约定
pub trait DemandForecaster {
    /// 生成未来 horizon 周的需求预测
    ///
    /// # 参数
    /// - `history`: 历史需求行
    /// - `horizon`: 向前延伸的周数
    ///
    /// # 返回
    /// - Ok(Vec<DemandRow>): 预测行,周次紧接各组历史最大周
    /// - Err: 预测失败（调用方降级为空表）
    fn forecast(&self, history: &[DemandRow], horizon: u32) -> anyhow::Result<Vec<DemandRow>>;
}

// ==========================================
// MovingAverageForecaster - 均值外推预测器
// ==========================================
// 规则（按 (sku, dc) 分组）:
// - 基准 = max(1000, 组内需求均值)
// - 第 i 期预测 = max(500, floor(基准 * (0.9 + 0.2 * (i mod 3))))
pub struct MovingAverageForecaster;

impl MovingAverageForecaster {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for MovingAverageForecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl DemandForecaster for MovingAverageForecaster {
    #[instrument(skip(self, history), fields(rows = history.len(), horizon))]
    fn forecast(&self, history: &[DemandRow], horizon: u32) -> anyhow::Result<Vec<DemandRow>> {
        if history.is_empty() {
            return Ok(Vec::new());
        }

        // 按 (sku, dc) 分组（BTreeMap 保证输出顺序确定）
        let mut groups: BTreeMap<(String, String), Vec<&DemandRow>> = BTreeMap::new();
        for row in history {
            groups
                .entry((row.sku.clone(), row.dc.clone()))
                .or_default()
                .push(row);
        }

        let mut forecast = Vec::new();
        for ((sku, dc), rows) in groups {
            let mean = rows.iter().map(|r| r.demand).sum::<f64>() / rows.len() as f64;
            let base = mean.max(MIN_BASE_DEMAND);
            let last_week = rows.iter().map(|r| r.week).max().unwrap_or(0);

            for i in 0..horizon {
                let week = last_week + i + 1;
                let factor = 0.9 + 0.2 * (i % 3) as f64;
                let demand = ((base * factor) as i64).max(MIN_FORECAST_DEMAND);
                forecast.push(DemandRow::new(sku.clone(), dc.clone(), week, demand as f64));
            }
        }

        Ok(forecast)
    }
}
