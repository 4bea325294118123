// ==========================================
// 拍类赛事排赛系统 - 锁定落位仓储
// ==========================================
// 红线: 锁定由人工创建，引擎永不删除锁定行
// ==========================================

use crate::domain::schedule::SlotLock;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// SlotLockRepository - 锁定落位仓储
// ==========================================
pub struct SlotLockRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SlotLockRepository {
    /// 创建新的SlotLockRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入锁定
    ///
    /// (version, match) 与 (version, slot) 的唯一约束由 schema 保证，
    /// 冲突时返回 UniqueConstraintViolation。
    pub fn create(&self, lock: &SlotLock) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO slot_lock (version_id, match_id, slot_id, created_by, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
            params![
                &lock.version_id,
                &lock.match_id,
                &lock.slot_id,
                &lock.created_by,
                &lock.created_at,
            ],
        )?;

        Ok(())
    }

    /// 查询一个版本的全部锁定 (按match_id升序)
    pub fn find_by_version(&self, version_id: &str) -> RepositoryResult<Vec<SlotLock>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT version_id, match_id, slot_id, created_by, created_at
               FROM slot_lock
               WHERE version_id = ?
               ORDER BY match_id"#,
        )?;

        let locks = stmt
            .query_map(params![version_id], map_row)?
            .collect::<Result<Vec<SlotLock>, _>>()?;

        Ok(locks)
    }
}

/// 行映射
fn map_row(row: &Row<'_>) -> rusqlite::Result<SlotLock> {
    Ok(SlotLock {
        version_id: row.get("version_id")?,
        match_id: row.get("match_id")?,
        slot_id: row.get("slot_id")?,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
    })
}
