// ==========================================
// 可乐产销协同计划系统 - 需求领域模型
// ==========================================
// 规范输入: 每行一个 (SKU, DC, 周) 的需求量
// 说明: (sku, dc, week) 的唯一性不强制,重复行在周分组内自然累加
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// DemandRow - 需求行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRow {
    pub sku: String,  // 产品规格
    pub dc: String,   // 配送中心
    pub week: u32,    // 周次 (>= 1)
    pub demand: f64,  // 需求量 (>= 0)
}

impl DemandRow {
    pub fn new(sku: impl Into<String>, dc: impl Into<String>, week: u32, demand: f64) -> Self {
        Self {
            sku: sku.into(),
            dc: dc.into(),
            week,
            demand,
        }
    }
}
