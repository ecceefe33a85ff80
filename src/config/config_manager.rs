// ==========================================
// 可乐产销协同计划系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value, scope_id='global')
// ==========================================

use crate::config::params::{CostParams, PlanningParams};
use crate::db::open_sqlite_connection;
use crate::domain::types::{AllocationMode, CapacityPolicy, PackingStrategy};
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// 配置键全集
// ==========================================
pub mod config_keys {
    pub const BASE_CAPACITY: &str = "planning/base_capacity";
    pub const TRUCK_SIZE: &str = "planning/truck_size";
    pub const SAFETY_STOCK: &str = "planning/safety_stock";
    pub const PACKING_STRATEGY: &str = "planning/packing_strategy";
    pub const PARTIAL_TRUCK_THRESHOLD: &str = "planning/partial_truck_threshold";
    pub const ALLOCATION_MODE: &str = "planning/allocation_mode";
    pub const DEFAULT_LEAD_TIME_WEEKS: &str = "planning/default_lead_time_weeks";
    pub const COST_PRODUCTION: &str = "cost/production";
    pub const COST_TRANSPORT: &str = "cost/transport";
    pub const COST_INVENTORY: &str = "cost/inventory";

    /// DC 提前期前缀: lead_time/{dc} -> 周数
    pub const LEAD_TIME_PREFIX: &str = "lead_time/";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入配置值（INSERT OR REPLACE, scope_id='global'）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;

        Ok(())
    }

    /// 读取整数配置，缺失或格式错误时回退默认值
    pub fn get_i64_or(&self, key: &str, default: i64) -> Result<i64, Box<dyn Error>> {
        match self.get_config_value(key)? {
            Some(v) => match v.trim().parse::<i64>() {
                Ok(n) => Ok(n),
                Err(_) => {
                    warn!(key, value = %v, "配置值不是整数，回退默认值");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 读取非负整数配置，缺失、负数或格式错误时回退默认值
    pub fn get_u32_or(&self, key: &str, default: u32) -> Result<u32, Box<dyn Error>> {
        match self.get_config_value(key)? {
            Some(v) => match v.trim().parse::<u32>() {
                Ok(n) => Ok(n),
                Err(_) => {
                    warn!(key, value = %v, "配置值不是非负整数，回退默认值");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 读取浮点配置，缺失或格式错误时回退默认值
    pub fn get_f64_or(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        match self.get_config_value(key)? {
            Some(v) => match v.trim().parse::<f64>() {
                Ok(n) => Ok(n),
                Err(_) => {
                    warn!(key, value = %v, "配置值不是数字，回退默认值");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 读取所有 DC 提前期（lead_time/{dc}）
    fn load_lead_times(&self) -> Result<HashMap<String, u32>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' AND key LIKE ?1",
        )?;
        let pattern = format!("{}%", config_keys::LEAD_TIME_PREFIX);

        let mut lead_times = HashMap::new();
        let rows = stmt.query_map(params![pattern], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            let dc = key
                .strip_prefix(config_keys::LEAD_TIME_PREFIX)
                .unwrap_or(&key)
                .to_string();
            match value.trim().parse::<u32>() {
                Ok(weeks) => {
                    lead_times.insert(dc, weeks);
                }
                Err(_) => {
                    warn!(key = %key, value = %value, "提前期配置不是整数，忽略该项");
                }
            }
        }

        Ok(lead_times)
    }

    /// 组装计划参数：config_kv 覆盖项 + 内置默认值
    ///
    /// # 返回
    /// - Ok(PlanningParams): 可直接传入引擎的参数对象
    pub fn load_planning_params(&self) -> Result<PlanningParams, Box<dyn Error>> {
        let defaults = PlanningParams::default();

        let packing_strategy = match self.get_config_value(config_keys::PACKING_STRATEGY)? {
            Some(v) => PackingStrategy::from_str(&v).unwrap_or_else(|e| {
                warn!(error = %e, "装车策略配置无效，回退默认值");
                defaults.packing_strategy
            }),
            None => defaults.packing_strategy,
        };

        let allocation_mode = match self.get_config_value(config_keys::ALLOCATION_MODE)? {
            Some(v) => AllocationMode::from_str(&v).unwrap_or_else(|e| {
                warn!(error = %e, "分配模式配置无效，回退默认值");
                defaults.allocation_mode
            }),
            None => defaults.allocation_mode,
        };

        let mut lead_time_weeks = defaults.lead_time_weeks.clone();
        lead_time_weeks.extend(self.load_lead_times()?);

        Ok(PlanningParams {
            base_capacity: self
                .get_i64_or(config_keys::BASE_CAPACITY, defaults.base_capacity)?,
            capacity_policy: CapacityPolicy::default(),
            truck_size: self.get_i64_or(config_keys::TRUCK_SIZE, defaults.truck_size)?,
            safety_stock: self.get_i64_or(config_keys::SAFETY_STOCK, defaults.safety_stock)?,
            packing_strategy,
            partial_truck_threshold: self.get_f64_or(
                config_keys::PARTIAL_TRUCK_THRESHOLD,
                defaults.partial_truck_threshold,
            )?,
            lead_time_weeks,
            default_lead_time_weeks: self.get_u32_or(
                config_keys::DEFAULT_LEAD_TIME_WEEKS,
                defaults.default_lead_time_weeks,
            )?,
            allocation_mode,
            costs: CostParams {
                production: self
                    .get_f64_or(config_keys::COST_PRODUCTION, defaults.costs.production)?,
                transport: self
                    .get_f64_or(config_keys::COST_TRANSPORT, defaults.costs.transport)?,
                inventory: self
                    .get_f64_or(config_keys::COST_INVENTORY, defaults.costs.inventory)?,
            },
        })
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 在计划运行时记录配置快照，保证结果可复现
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = serde_json::Map::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, json!(value));
        }

        Ok(serde_json::Value::Object(snapshot).to_string())
    }
}
