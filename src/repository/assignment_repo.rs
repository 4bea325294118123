// ==========================================
// 拍类赛事排赛系统 - 排赛落位仓储
// ==========================================
// 红线: 落位集按版本整体替换，不做增量合并；
//       "最后写者整体重推"是本引擎的并发策略
// ==========================================

use crate::domain::schedule::SlotAssignment;
use crate::domain::types::AssignmentSourceType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_enum;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// SlotAssignmentRepository - 排赛落位仓储
// ==========================================
pub struct SlotAssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SlotAssignmentRepository {
    /// 创建新的SlotAssignmentRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询一个版本的全部落位 (按match_id升序)
    pub fn find_by_version(&self, version_id: &str) -> RepositoryResult<Vec<SlotAssignment>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT version_id, match_id, slot_id, source_type, created_at
               FROM slot_assignment
               WHERE version_id = ?
               ORDER BY match_id"#,
        )?;

        let assignments = stmt
            .query_map(params![version_id], map_row)?
            .collect::<Result<Vec<SlotAssignment>, _>>()?;

        Ok(assignments)
    }

    /// 在单事务内整体替换一个版本的落位集
    ///
    /// 要么全部提交要么全部回滚，避免部分落位对读者可见。
    /// 返回写入的行数。
    pub fn replace_for_version(
        &self,
        version_id: &str,
        assignments: &[SlotAssignment],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM slot_assignment WHERE version_id = ?",
            params![version_id],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO slot_assignment (version_id, match_id, slot_id, source_type, created_at)
                   VALUES (?, ?, ?, ?, ?)"#,
            )?;
            for a in assignments {
                stmt.execute(params![
                    &a.version_id,
                    &a.match_id,
                    &a.slot_id,
                    a.source_type.to_db_str(),
                    &a.created_at,
                ])?;
            }
        }

        tx.commit()?;
        Ok(assignments.len())
    }

    /// 删除一个版本的全部落位
    pub fn delete_for_version(&self, version_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;

        let deleted = conn.execute(
            "DELETE FROM slot_assignment WHERE version_id = ?",
            params![version_id],
        )?;

        Ok(deleted)
    }
}

/// 行映射
fn map_row(row: &Row<'_>) -> rusqlite::Result<SlotAssignment> {
    let source_str: String = row.get("source_type")?;
    Ok(SlotAssignment {
        version_id: row.get("version_id")?,
        match_id: row.get("match_id")?,
        slot_id: row.get("slot_id")?,
        source_type: parse_enum(&source_str, "source_type", AssignmentSourceType::from_db_str)?,
        created_at: row.get("created_at")?,
    })
}
