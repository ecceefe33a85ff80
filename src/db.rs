// ==========================================
// 可乐产销协同计划系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 统一建表入口，保证测试库与生产库 schema 一致
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
///
/// 表：
/// - shipment_plan: 发运计划落库表（整表替换语义）
/// - config_kv: 配置键值表（scope_id + key）
/// - schema_version: schema 版本标记
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS shipment_plan (
            sku TEXT NOT NULL,
            dc TEXT NOT NULL,
            week INTEGER NOT NULL,
            demand REAL NOT NULL,
            allocated INTEGER NOT NULL,
            total_trucks INTEGER NOT NULL,
            safety_met BOOLEAN NOT NULL
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
        [],
        |row| row.get(0),
    )?;

    if has_table == 0 {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
