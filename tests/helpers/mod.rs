// ==========================================
// 集成测试辅助模块
// ==========================================
#![allow(dead_code)]

pub mod test_data_builder;

use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tournament_aps::db;

/// 创建临时 SQLite 数据库并初始化 schema
///
/// 返回的 NamedTempFile 必须由调用方持有，否则文件被提前清理。
pub fn create_test_conn() -> (NamedTempFile, Arc<Mutex<Connection>>) {
    let tmp = NamedTempFile::new().expect("创建临时数据库文件失败");
    let conn = db::open_sqlite_connection(tmp.path().to_str().unwrap())
        .expect("打开测试数据库失败");
    db::init_schema(&conn).expect("初始化 schema 失败");
    (tmp, Arc::new(Mutex::new(conn)))
}

/// 直接插入一个固定 ID 的赛程版本 (测试数据依赖确定的 version_id)
pub fn seed_version(conn: &Arc<Mutex<Connection>>, version_id: &str, tournament_id: &str) {
    let guard = conn.lock().unwrap();
    guard
        .execute(
            "INSERT INTO schedule_version (version_id, tournament_id, version_no, status, created_at)
             VALUES (?1, ?2, 1, 'DRAFT', datetime('now'))",
            rusqlite::params![version_id, tournament_id],
        )
        .expect("插入测试版本失败");
}
