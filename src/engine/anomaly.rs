// ==========================================
// 可乐产销协同计划系统 - 异常检测协作方
// ==========================================
// 职责: 给 PlannedRow 表附加布尔异常列,仅用于展示
// 红线: 异常标志不反馈到分配与指标;失败降级为全 false
// ==========================================

use crate::domain::plan::PlannedRow;
use tracing::instrument;

/// 默认异常占比上限（近似 5% 污染率）
pub const DEFAULT_CONTAMINATION: f64 = 0.05;

/// 稳健 z 分数阈值
const Z_THRESHOLD: f64 = 3.5;

/// MAD 与标准差的换算系数（正态假设）
const MAD_SCALE: f64 = 1.4826;

// ==========================================
// Trait: AnomalyDetector
// ==========================================
// 用途: 异常检测算法的窄接口;输出为与输入等长的布尔列
pub trait AnomalyDetector {
    /// 标记异常行
    ///
    /// # 返回
    /// - Ok(Vec<bool>): 与 rows 等长,true 表示该行异常
    /// - Err: 检测失败（调用方降级为全 false）
    fn flag(&self, rows: &[PlannedRow]) -> anyhow::Result<Vec<bool>>;
}

// ==========================================
// RobustZScoreDetector - 稳健 z 分数检测器
// ==========================================
// 对 (demand, allocated) 两列分别计算中位数/MAD 的稳健 z 分数,
// 任一维超过阈值即候选异常;候选超过污染率上限时只保留最极端者
pub struct RobustZScoreDetector {
    pub contamination: f64,
}

impl RobustZScoreDetector {
    pub fn new() -> Self {
        Self {
            contamination: DEFAULT_CONTAMINATION,
        }
    }

    pub fn with_contamination(contamination: f64) -> Self {
        Self { contamination }
    }
}

impl Default for RobustZScoreDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyDetector for RobustZScoreDetector {
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    fn flag(&self, rows: &[PlannedRow]) -> anyhow::Result<Vec<bool>> {
        let n = rows.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let demand: Vec<f64> = rows.iter().map(|r| r.demand).collect();
        let allocated: Vec<f64> = rows.iter().map(|r| r.allocated as f64).collect();

        let z_demand = robust_z_scores(&demand);
        let z_allocated = robust_z_scores(&allocated);

        // 行级得分: 两维稳健 z 的较大者
        let scores: Vec<f64> = z_demand
            .iter()
            .zip(&z_allocated)
            .map(|(a, b)| a.abs().max(b.abs()))
            .collect();

        let mut flags: Vec<bool> = scores.iter().map(|&s| s > Z_THRESHOLD).collect();

        // 污染率上限: 候选过多时只保留得分最高的前 ceil(contamination * n) 行
        let max_flags = ((self.contamination * n as f64).ceil() as usize).max(1);
        let flagged = flags.iter().filter(|&&f| f).count();
        if flagged > max_flags {
            let mut order: Vec<usize> = (0..n).collect();
            order.sort_by(|&a, &b| {
                scores[b]
                    .partial_cmp(&scores[a])
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.cmp(&b))
            });
            flags = vec![false; n];
            for &i in order.iter().take(max_flags) {
                flags[i] = true;
            }
        }

        Ok(flags)
    }
}

/// 中位数（输入为空时返回 0）
fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// 稳健 z 分数: (x - median) / (MAD * 1.4826)
///
/// MAD 为 0（过半数值相同）时退化为普通 z 分数;
/// 标准差也为 0 的常数列返回全 0
fn robust_z_scores(values: &[f64]) -> Vec<f64> {
    let med = median(values);
    let deviations: Vec<f64> = values.iter().map(|v| (v - med).abs()).collect();
    let mad = median(&deviations);

    if mad <= f64::EPSILON {
        return standard_z_scores(values);
    }

    values
        .iter()
        .map(|v| (v - med) / (mad * MAD_SCALE))
        .collect()
}

/// 普通 z 分数: (x - mean) / std; 标准差为 0 时全 0
fn standard_z_scores(values: &[f64]) -> Vec<f64> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();

    if std <= f64::EPSILON {
        return vec![0.0; values.len()];
    }

    values.iter().map(|v| (v - mean) / std).collect()
}
