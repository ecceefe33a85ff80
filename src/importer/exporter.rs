// ==========================================
// 可乐产销协同计划系统 - CSV 导出器
// ==========================================
// 职责: 需求表/发运计划表的 CSV 导出与回读
// 约定: 列序即领域结构体字段序; 导出-回读数值不变
// ==========================================

use crate::domain::demand::DemandRow;
use crate::domain::plan::PlannedRow;
use crate::importer::error::ImportResult;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// 导出需求表 CSV
pub fn write_demand_csv(file_path: &Path, rows: &[DemandRow]) -> ImportResult<()> {
    let file = File::create(file_path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(file = %file_path.display(), rows = rows.len(), "需求表导出完成");
    Ok(())
}

/// 导出发运计划表 CSV
pub fn write_plan_csv(file_path: &Path, rows: &[PlannedRow]) -> ImportResult<()> {
    let file = File::create(file_path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(file = %file_path.display(), rows = rows.len(), "发运计划导出完成");
    Ok(())
}

/// 回读发运计划表 CSV
pub fn read_plan_csv(file_path: &Path) -> ImportResult<Vec<PlannedRow>> {
    let file = File::open(file_path)?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: PlannedRow = result?;
        rows.push(row);
    }

    Ok(rows)
}
