// ==========================================
// 拍类赛事排赛系统 - 场地时段仓储
// ==========================================
// 红线: 时段生成后不可变，引擎只读
// ==========================================

use crate::domain::slot::CourtSlot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// SlotRepository - 场地时段仓储
// ==========================================
pub struct SlotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SlotRepository {
    /// 创建新的SlotRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入时段
    pub fn insert(&self, s: &CourtSlot) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO court_slot (
                slot_id, version_id, day_date, start_time, end_time,
                court_label, block_minutes, is_active
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                &s.slot_id,
                &s.version_id,
                &s.day_date,
                &s.start_time,
                &s.end_time,
                &s.court_label,
                &s.block_minutes,
                &s.is_active,
            ],
        )?;

        Ok(s.slot_id)
    }

    /// 查询一个版本的全部时段 (按slot_id升序)
    pub fn find_by_version(&self, version_id: &str) -> RepositoryResult<Vec<CourtSlot>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT slot_id, version_id, day_date, start_time, end_time,
                      court_label, block_minutes, is_active
               FROM court_slot
               WHERE version_id = ?
               ORDER BY slot_id"#,
        )?;

        let slots = stmt
            .query_map(params![version_id], map_row)?
            .collect::<Result<Vec<CourtSlot>, _>>()?;

        Ok(slots)
    }
}

/// 行映射
fn map_row(row: &Row<'_>) -> rusqlite::Result<CourtSlot> {
    Ok(CourtSlot {
        slot_id: row.get("slot_id")?,
        version_id: row.get("version_id")?,
        day_date: row.get("day_date")?,
        start_time: row.get("start_time")?,
        end_time: row.get("end_time")?,
        court_label: row.get("court_label")?,
        block_minutes: row.get("block_minutes")?,
        is_active: row.get("is_active")?,
    })
}
