// ==========================================
// 可乐产销协同计划系统 - 领域类型定义
// ==========================================
// 约定: 枚举序列化为 snake_case,与配置/导出格式一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 装车策略 (Packing Strategy)
// ==========================================
// 用途: ShipmentPlanner 对已分配量的离散化装车方式
// 说明: 合箱/跨周递延属于扩展点,当前版本不提供
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingStrategy {
    /// 仅整车发运: 不足一车的余量一律滞留为 unshipped
    FullTrucksOnly,
    /// 允许尾车: 余量达到阈值比例时加发一辆非满载卡车
    PartialTruck,
}

impl PackingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackingStrategy::FullTrucksOnly => "full_trucks_only",
            PackingStrategy::PartialTruck => "partial_truck",
        }
    }

    pub fn title_cn(&self) -> &'static str {
        match self {
            PackingStrategy::FullTrucksOnly => "仅整车",
            PackingStrategy::PartialTruck => "允许尾车",
        }
    }
}

impl Default for PackingStrategy {
    fn default() -> Self {
        PackingStrategy::FullTrucksOnly
    }
}

impl fmt::Display for PackingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PackingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full_trucks_only" | "full-trucks-only" => Ok(PackingStrategy::FullTrucksOnly),
            "partial_truck" | "partial-truck" => Ok(PackingStrategy::PartialTruck),
            other => Err(format!("未知装车策略: {}", other)),
        }
    }
}

// ==========================================
// 分配模式 (Allocation Mode)
// ==========================================
// 默认: 比例分配(确定性); 成本优化为可选策略,由外部求解器驱动
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    Proportional,
    CostOptimized,
}

impl AllocationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationMode::Proportional => "proportional",
            AllocationMode::CostOptimized => "cost_optimized",
        }
    }
}

impl Default for AllocationMode {
    fn default() -> Self {
        AllocationMode::Proportional
    }
}

impl fmt::Display for AllocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AllocationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proportional" => Ok(AllocationMode::Proportional),
            "cost_optimized" | "cost-optimized" => Ok(AllocationMode::CostOptimized),
            other => Err(format!("未知分配模式: {}", other)),
        }
    }
}

// ==========================================
// 产能策略 (Capacity Policy)
// ==========================================
// 用途: 将周次映射为当周有效产能
// 默认: 第 4 周起产能削减 15% (检修/降速效应)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum CapacityPolicy {
    /// 全周期固定产能
    Flat,
    /// 从 from_week 起按 retain_ratio 保留产能
    RampDown { from_week: u32, retain_ratio: f64 },
}

impl CapacityPolicy {
    /// 计算周 week 的有效产能（整数截断）
    pub fn effective_capacity(&self, week: u32, base_capacity: i64) -> i64 {
        match self {
            CapacityPolicy::Flat => base_capacity,
            CapacityPolicy::RampDown {
                from_week,
                retain_ratio,
            } => {
                if week >= *from_week {
                    (base_capacity as f64 * retain_ratio) as i64
                } else {
                    base_capacity
                }
            }
        }
    }
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        CapacityPolicy::RampDown {
            from_week: 4,
            retain_ratio: 0.85,
        }
    }
}

// ==========================================
// 违规标志 (Violation Flag)
// ==========================================
// 行级分类结果,按优先级只报最高一项:
// 安全库存违规 > 欠配 > 低装载率提示 > 达标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationFlag {
    SafetyViolation,
    UnderFill,
    LowUtilization,
    Compliant,
}

impl ViolationFlag {
    pub fn title_cn(&self) -> &'static str {
        match self {
            ViolationFlag::SafetyViolation => "安全库存违规",
            ViolationFlag::UnderFill => "欠配",
            ViolationFlag::LowUtilization => "低装载率",
            ViolationFlag::Compliant => "达标",
        }
    }
}

impl fmt::Display for ViolationFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationFlag::SafetyViolation => write!(f, "SAFETY_VIOLATION"),
            ViolationFlag::UnderFill => write!(f, "UNDER_FILL"),
            ViolationFlag::LowUtilization => write!(f, "LOW_UTILIZATION"),
            ViolationFlag::Compliant => write!(f, "COMPLIANT"),
        }
    }
}
