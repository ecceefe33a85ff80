// ==========================================
// 可乐产销协同计划系统 - 需求导入器
// ==========================================
// 职责: 原始记录 -> DemandRow 的字段映射与质量校验
// 校验: 必需列齐全; week >= 1; demand >= 0 且有限
// ==========================================

use crate::domain::demand::DemandRow;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::CsvParser;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// 需求表必需列
pub const REQUIRED_COLUMNS: [&str; 4] = ["sku", "dc", "week", "demand"];

// ==========================================
// DemandImporter - 需求导入器
// ==========================================
pub struct DemandImporter {
    parser: CsvParser,
}

impl DemandImporter {
    pub fn new() -> Self {
        Self {
            parser: CsvParser::new(),
        }
    }

    /// 从 CSV 文件导入需求表
    ///
    /// # 参数
    /// - file_path: CSV 文件路径
    ///
    /// # 返回
    /// - Ok(Vec<DemandRow>): 导入的需求行（保持文件内顺序）
    /// - Err: 文件/格式/字段错误
    pub fn import_file(&self, file_path: &Path) -> ImportResult<Vec<DemandRow>> {
        let records = self.parser.parse_to_raw_records(file_path)?;
        let rows = Self::from_raw_records(&records)?;

        info!(
            file = %file_path.display(),
            rows = rows.len(),
            "需求表导入完成"
        );

        Ok(rows)
    }

    /// 原始记录 -> DemandRow
    ///
    /// 行号从 2 起算（第 1 行为表头），用于错误定位
    pub fn from_raw_records(
        records: &[HashMap<String, String>],
    ) -> ImportResult<Vec<DemandRow>> {
        let mut rows = Vec::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            let row_no = idx + 2;

            // 必需列检查
            for column in REQUIRED_COLUMNS {
                if !record.contains_key(column) {
                    return Err(ImportError::MissingColumn {
                        column: column.to_string(),
                    });
                }
            }

            let sku = record["sku"].clone();
            if sku.is_empty() {
                return Err(ImportError::FieldValueError {
                    row: row_no,
                    field: "sku".to_string(),
                    message: "sku 为空".to_string(),
                });
            }

            let dc = record["dc"].clone();
            if dc.is_empty() {
                return Err(ImportError::FieldValueError {
                    row: row_no,
                    field: "dc".to_string(),
                    message: "dc 为空".to_string(),
                });
            }

            let week = record["week"].parse::<u32>().map_err(|e| {
                ImportError::FieldValueError {
                    row: row_no,
                    field: "week".to_string(),
                    message: format!("不是有效周次: {}", e),
                }
            })?;
            if week < 1 {
                return Err(ImportError::ValueRangeError {
                    row: row_no,
                    field: "week".to_string(),
                    value: week as f64,
                    min: 1.0,
                });
            }

            let demand = record["demand"].parse::<f64>().map_err(|e| {
                ImportError::FieldValueError {
                    row: row_no,
                    field: "demand".to_string(),
                    message: format!("不是有效数值: {}", e),
                }
            })?;
            if !demand.is_finite() || demand < 0.0 {
                return Err(ImportError::ValueRangeError {
                    row: row_no,
                    field: "demand".to_string(),
                    value: demand,
                    min: 0.0,
                });
            }

            rows.push(DemandRow { sku, dc, week, demand });
        }

        Ok(rows)
    }
}

impl Default for DemandImporter {
    fn default() -> Self {
        Self::new()
    }
}
