// ==========================================
// 可乐产销协同计划系统 - 发运计划仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 语义: 整表替换写入（无版本化、无追加）
// ==========================================

use crate::domain::plan::{PlannedRow, ShipmentPlanRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use tracing::info;

// ==========================================
// ShipmentPlanRepository - 发运计划仓储
// ==========================================

/// 发运计划仓储
/// 职责: 管理 shipment_plan 表的整表替换与读取
pub struct ShipmentPlanRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ShipmentPlanRepository {
    /// 创建新的发运计划仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        crate::db::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 整表替换写入发运计划
    ///
    /// 单事务内 DELETE + INSERT；两个会话并发保存时后者覆盖前者，
    /// 这一竞争按设计接受。
    ///
    /// # 参数
    /// - rows: 发运计划表
    ///
    /// # 返回
    /// 写入行数
    pub fn replace_all(&self, rows: &[PlannedRow]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;

        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute("DELETE FROM shipment_plan", [])?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO shipment_plan
                    (sku, dc, week, demand, allocated, total_trucks, safety_met)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;

            for row in rows {
                stmt.execute(params![
                    row.sku,
                    row.dc,
                    row.week,
                    row.demand,
                    row.allocated,
                    row.total_trucks,
                    row.safety_met,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(rows = rows.len(), "发运计划整表替换完成");
        Ok(rows.len())
    }

    /// 读取全部落库记录
    pub fn load_all(&self) -> RepositoryResult<Vec<ShipmentPlanRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT sku, dc, week, demand, allocated, total_trucks, safety_met
            FROM shipment_plan
            ORDER BY week, sku, dc
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ShipmentPlanRecord {
                    sku: row.get(0)?,
                    dc: row.get(1)?,
                    week: row.get(2)?,
                    demand: row.get(3)?,
                    allocated: row.get(4)?,
                    total_trucks: row.get(5)?,
                    safety_met: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// 统计落库行数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM shipment_plan", [], |row| row.get(0))?;
        Ok(count)
    }
}
