// ==========================================
// 可乐产销协同计划系统 - 计划参数
// ==========================================
// 职责: 单次计划运行的全部可调参数
// 说明: 调用方持有并显式传入引擎,引擎不读全局状态
// ==========================================

use crate::domain::types::{AllocationMode, CapacityPolicy, PackingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 默认周产能（单位: 件）
pub const DEFAULT_BASE_CAPACITY: i64 = 150_000;

/// 默认卡车容量（单位: 件）
pub const DEFAULT_TRUCK_SIZE: i64 = 10_000;

/// 默认安全库存（每 SKU 每 DC 每周最低发运量）
pub const DEFAULT_SAFETY_STOCK: i64 = 5_000;

/// 默认尾车阈值（余量达到卡车容量的该比例才加发尾车）
pub const DEFAULT_PARTIAL_TRUCK_THRESHOLD: f64 = 0.6;

/// 未知 DC 的默认提前期（周）
pub const DEFAULT_LEAD_TIME_WEEKS: u32 = 1;

// ==========================================
// CostParams - 成本参数
// ==========================================
// 用途: 成本优化分配模式的目标函数系数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostParams {
    pub production: f64, // 单件生产成本
    pub transport: f64,  // 单车运输成本
    pub inventory: f64,  // 单件安全库存缺口持有成本
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            production: 1.0,
            transport: 200.0,
            inventory: 0.5,
        }
    }
}

// ==========================================
// PlanningParams - 计划参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningParams {
    /// 基准周产能
    pub base_capacity: i64,

    /// 产能策略（固定 / 第 N 周起削减）
    #[serde(default)]
    pub capacity_policy: CapacityPolicy,

    /// 卡车容量
    pub truck_size: i64,

    /// 安全库存
    pub safety_stock: i64,

    /// 装车策略
    #[serde(default)]
    pub packing_strategy: PackingStrategy,

    /// 尾车阈值 (0~1)
    pub partial_truck_threshold: f64,

    /// 各 DC 提前期（周）
    #[serde(default)]
    pub lead_time_weeks: HashMap<String, u32>,

    /// 未知 DC 的默认提前期
    pub default_lead_time_weeks: u32,

    /// 分配模式
    #[serde(default)]
    pub allocation_mode: AllocationMode,

    /// 成本参数（仅成本优化模式使用）
    #[serde(default)]
    pub costs: CostParams,
}

impl Default for PlanningParams {
    fn default() -> Self {
        let mut lead_time_weeks = HashMap::new();
        lead_time_weeks.insert("North".to_string(), 1);
        lead_time_weeks.insert("South".to_string(), 2);

        Self {
            base_capacity: DEFAULT_BASE_CAPACITY,
            capacity_policy: CapacityPolicy::default(),
            truck_size: DEFAULT_TRUCK_SIZE,
            safety_stock: DEFAULT_SAFETY_STOCK,
            packing_strategy: PackingStrategy::default(),
            partial_truck_threshold: DEFAULT_PARTIAL_TRUCK_THRESHOLD,
            lead_time_weeks,
            default_lead_time_weeks: DEFAULT_LEAD_TIME_WEEKS,
            allocation_mode: AllocationMode::default(),
            costs: CostParams::default(),
        }
    }
}

impl PlanningParams {
    /// 查询 DC 提前期，未知 DC 回退为默认值
    pub fn lead_time_for(&self, dc: &str) -> u32 {
        self.lead_time_weeks
            .get(dc)
            .copied()
            .unwrap_or(self.default_lead_time_weeks)
    }

    /// 参数合法性校验
    ///
    /// # 返回
    /// - Ok(()): 参数合法
    /// - Err(String): 首个不合法项的说明
    pub fn validate(&self) -> Result<(), String> {
        if self.base_capacity < 0 {
            return Err(format!("base_capacity 不能为负: {}", self.base_capacity));
        }
        if self.truck_size <= 0 {
            return Err(format!("truck_size 必须为正: {}", self.truck_size));
        }
        if self.safety_stock < 0 {
            return Err(format!("safety_stock 不能为负: {}", self.safety_stock));
        }
        if !(0.0..=1.0).contains(&self.partial_truck_threshold) {
            return Err(format!(
                "partial_truck_threshold 必须在 [0, 1] 内: {}",
                self.partial_truck_threshold
            ));
        }
        if let CapacityPolicy::RampDown { retain_ratio, .. } = self.capacity_policy {
            if !(0.0..=1.0).contains(&retain_ratio) {
                return Err(format!("retain_ratio 必须在 [0, 1] 内: {}", retain_ratio));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        assert!(PlanningParams::default().validate().is_ok());
    }

    #[test]
    fn test_lead_time_fallback() {
        let params = PlanningParams::default();
        assert_eq!(params.lead_time_for("North"), 1);
        assert_eq!(params.lead_time_for("South"), 2);
        assert_eq!(params.lead_time_for("East"), 1);
    }

    #[test]
    fn test_validate_rejects_zero_truck() {
        let params = PlanningParams {
            truck_size: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
