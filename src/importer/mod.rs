// ==========================================
// 可乐产销协同计划系统 - 导入层
// ==========================================
// 职责: 外部数据接入与导出 (CSV)
// 约定: 结构性错误(缺列)直接上抛,由调用方预校验
// ==========================================

pub mod demand_importer;
pub mod error;
pub mod exporter;
pub mod file_parser;

// 重导出核心类型
pub use demand_importer::{DemandImporter, REQUIRED_COLUMNS};
pub use error::ImportError;
pub use exporter::{read_plan_csv, write_demand_csv, write_plan_csv};
pub use file_parser::CsvParser;
