// ==========================================
// 可乐产销协同计划系统 - 文件解析器
// ==========================================
// 支持: CSV (.csv)
// 输出: 表头映射的原始记录 (列名 -> 去空白的字符串值)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self {}
    }

    /// 解析 CSV 为原始记录
    ///
    /// # 返回
    /// 每行一个 列名 -> 值 的映射；完全空白的行被跳过
    pub fn parse_to_raw_records(
        &self,
        file_path: &Path,
    ) -> ImportResult<Vec<HashMap<String, String>>> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(
                file_path.display().to_string(),
            ));
        }

        // 检查扩展名
        if let Some(ext) = file_path.extension() {
            if ext != "csv" {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        // 打开 CSV 文件
        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        // 读取所有行
        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}
