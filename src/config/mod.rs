// ==========================================
// 可乐产销协同计划系统 - 配置层
// ==========================================
// 职责: 计划参数与系统配置管理
// 存储: config_kv 表 (key-value, global scope)
// ==========================================

pub mod config_manager;
pub mod params;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use params::{CostParams, PlanningParams};
