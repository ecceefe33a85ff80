// ==========================================
// 可乐产销协同计划系统 - SKU 聚类协作方
// ==========================================
// 职责: 把 PlannedRow 表汇总为 SKU 级画像并打聚类标签
// 红线: 聚类结果仅供展示,不反馈到分配;失败降级为等宽分箱
// ==========================================

use crate::domain::plan::PlannedRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{instrument, warn};

/// 默认聚类数
pub const DEFAULT_CLUSTERS: usize = 4;

/// Lloyd 迭代上限
const MAX_KMEANS_ITERATIONS: usize = 300;

// ==========================================
// SkuClusterSummary - SKU 级聚类画像
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuClusterSummary {
    pub sku: String,
    pub avg_demand: f64,        // 需求均值
    pub demand_volatility: f64, // 需求波动 (样本标准差,单点组为 0)
    pub total_demand: f64,      // 需求合计
    pub avg_allocated: f64,     // 分配均值
    pub total_allocated: f64,   // 分配合计
    pub cluster: u32,           // 聚类标签
}

// ==========================================
// Trait: SkuClustering
// ==========================================
// 用途: 聚类算法的窄接口;任何输出整数标签的实现均可接入
pub trait SkuClustering {
    /// SKU 聚类
    ///
    /// # 参数
    /// - `rows`: 发运计划表
    /// - `n_clusters`: 期望聚类数（会被样本数截断）
    ///
    /// # 返回
    /// - Ok(Vec<SkuClusterSummary>): SKU 级画像 + 聚类标签
    /// - Err: 聚类失败（调用方降级为空表）
    fn cluster(
        &self,
        rows: &[PlannedRow],
        n_clusters: usize,
    ) -> anyhow::Result<Vec<SkuClusterSummary>>;
}

// ==========================================
// KMeansClustering - 确定性 k-means 聚类
// ==========================================
// 特征: 标准化后的 (total_demand, demand_volatility)
// 初始化: 按 total_demand 排序取分位点,保证可复现
// 退化兜底: 聚类失败时按 total_demand 等宽分箱
pub struct KMeansClustering;

impl KMeansClustering {
    pub fn new() -> Self {
        Self {}
    }

    /// 按 SKU 汇总（cluster 置 0,由上层填充）
    fn aggregate(rows: &[PlannedRow]) -> Vec<SkuClusterSummary> {
        let mut groups: BTreeMap<String, Vec<&PlannedRow>> = BTreeMap::new();
        for row in rows {
            groups.entry(row.sku.clone()).or_default().push(row);
        }

        groups
            .into_iter()
            .map(|(sku, rows)| {
                let n = rows.len() as f64;
                let total_demand: f64 = rows.iter().map(|r| r.demand).sum();
                let avg_demand = total_demand / n;

                // 样本标准差,单点组记 0
                let demand_volatility = if rows.len() > 1 {
                    let var = rows
                        .iter()
                        .map(|r| (r.demand - avg_demand).powi(2))
                        .sum::<f64>()
                        / (n - 1.0);
                    var.sqrt()
                } else {
                    0.0
                };

                let total_allocated: f64 = rows.iter().map(|r| r.allocated as f64).sum();
                let avg_allocated = total_allocated / n;

                SkuClusterSummary {
                    sku,
                    avg_demand,
                    demand_volatility,
                    total_demand,
                    avg_allocated,
                    total_allocated,
                    cluster: 0,
                }
            })
            .collect()
    }

    /// 等宽分箱兜底: 按 total_demand 切 k 个等宽区间
    fn bin_by_total_demand(summaries: &mut [SkuClusterSummary], k: usize) {
        let min = summaries
            .iter()
            .map(|s| s.total_demand)
            .fold(f64::INFINITY, f64::min);
        let max = summaries
            .iter()
            .map(|s| s.total_demand)
            .fold(f64::NEG_INFINITY, f64::max);
        let width = (max - min) / k as f64;

        for summary in summaries.iter_mut() {
            summary.cluster = if width > 0.0 {
                (((summary.total_demand - min) / width) as usize).min(k - 1) as u32
            } else {
                0
            };
        }
    }
}

impl Default for KMeansClustering {
    fn default() -> Self {
        Self::new()
    }
}

impl SkuClustering for KMeansClustering {
    #[instrument(skip(self, rows), fields(rows = rows.len(), n_clusters))]
    fn cluster(
        &self,
        rows: &[PlannedRow],
        n_clusters: usize,
    ) -> anyhow::Result<Vec<SkuClusterSummary>> {
        let mut summaries = Self::aggregate(rows);
        let n = summaries.len();

        if n == 0 {
            return Ok(Vec::new());
        }
        if n == 1 {
            summaries[0].cluster = 0;
            return Ok(summaries);
        }

        let k = n_clusters.clamp(1, n);

        // 特征矩阵: 标准化 (total_demand, demand_volatility)
        let features: Vec<[f64; 2]> = {
            let raw: Vec<[f64; 2]> = summaries
                .iter()
                .map(|s| [s.total_demand, s.demand_volatility])
                .collect();
            standardize(&raw)
        };

        match kmeans(&features, k) {
            Some(labels) => {
                for (summary, label) in summaries.iter_mut().zip(labels) {
                    summary.cluster = label as u32;
                }
            }
            None => {
                warn!("k-means 未收敛到有效划分，降级为 total_demand 等宽分箱");
                Self::bin_by_total_demand(&mut summaries, k);
            }
        }

        Ok(summaries)
    }
}

/// 按列标准化: (x - mean) / std, std 为 0 的列整列置 0
fn standardize(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let n = points.len() as f64;
    let mut out = vec![[0.0; 2]; points.len()];

    for dim in 0..2 {
        let mean = points.iter().map(|p| p[dim]).sum::<f64>() / n;
        let var = points.iter().map(|p| (p[dim] - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();

        for (i, p) in points.iter().enumerate() {
            out[i][dim] = if std > f64::EPSILON {
                (p[dim] - mean) / std
            } else {
                0.0
            };
        }
    }

    out
}

/// 确定性 Lloyd k-means
///
/// 种子取第一维排序后的 k 个分位点;空簇保留旧质心。
/// 返回 None 表示输入退化（k 无效或特征含非有限值）。
fn kmeans(points: &[[f64; 2]], k: usize) -> Option<Vec<usize>> {
    let n = points.len();
    if k == 0 || k > n {
        return None;
    }
    // NaN/Inf 会破坏距离比较与质心更新
    if points
        .iter()
        .any(|p| !p[0].is_finite() || !p[1].is_finite())
    {
        return None;
    }

    // 分位点种子（按第一维排序）
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        points[a][0]
            .partial_cmp(&points[b][0])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    let mut centroids: Vec<[f64; 2]> = (0..k)
        .map(|j| {
            let idx = if k == 1 { 0 } else { j * (n - 1) / (k - 1) };
            points[order[idx]]
        })
        .collect();

    let mut labels = vec![0usize; n];
    for _ in 0..MAX_KMEANS_ITERATIONS {
        // 指派最近质心（平局取编号较小者）
        let mut changed = false;
        for (i, point) in points.iter().enumerate() {
            let mut best = 0usize;
            let mut best_dist = f64::INFINITY;
            for (j, centroid) in centroids.iter().enumerate() {
                let dist = (point[0] - centroid[0]).powi(2) + (point[1] - centroid[1]).powi(2);
                if dist < best_dist {
                    best = j;
                    best_dist = dist;
                }
            }
            if labels[i] != best {
                labels[i] = best;
                changed = true;
            }
        }

        if !changed {
            break;
        }

        // 重算质心,空簇保留旧质心
        for j in 0..k {
            let members: Vec<&[f64; 2]> = points
                .iter()
                .zip(&labels)
                .filter(|(_, &l)| l == j)
                .map(|(p, _)| p)
                .collect();
            if !members.is_empty() {
                let m = members.len() as f64;
                centroids[j] = [
                    members.iter().map(|p| p[0]).sum::<f64>() / m,
                    members.iter().map(|p| p[1]).sum::<f64>() / m,
                ];
            }
        }
    }

    Some(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kmeans_separates_two_groups() {
        let points = vec![[0.0, 0.0], [0.1, 0.0], [10.0, 0.0], [10.1, 0.0]];
        let labels = kmeans(&points, 2).unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_kmeans_deterministic() {
        let points = vec![[1.0, 2.0], [3.0, 1.0], [8.0, 0.5], [9.0, 4.0], [2.0, 2.0]];
        assert_eq!(kmeans(&points, 3), kmeans(&points, 3));
    }

    #[test]
    fn test_standardize_constant_column_is_zero() {
        let out = standardize(&[[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]]);
        assert!(out.iter().all(|p| p[1] == 0.0));
    }

    #[test]
    fn test_kmeans_rejects_non_finite_features() {
        let points = vec![[1.0, 0.0], [f64::NAN, 0.0], [3.0, 0.0]];
        assert!(kmeans(&points, 2).is_none());
    }
}
