// ==========================================
// 拍类赛事排赛系统 - 赛程版本仓储
// ==========================================

use crate::domain::schedule::ScheduleVersion;
use crate::domain::types::VersionStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_enum;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ScheduleVersionRepository - 赛程版本仓储
// ==========================================
pub struct ScheduleVersionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleVersionRepository {
    /// 创建新的ScheduleVersionRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建版本（自动分配 version_no，避免并发下 version_no 冲突）
    ///
    /// 说明：
    /// - 在同一事务内查询 MAX(version_no) 并写入，保证对同一 tournament_id
    ///   的 version_no 分配原子性。
    /// - 该方法会覆盖传入的 `version.version_no`。
    pub fn create_with_next_version_no(
        &self,
        version: &mut ScheduleVersion,
    ) -> RepositoryResult<String> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let max_version_no: Option<i32> = tx.query_row(
            "SELECT MAX(version_no) FROM schedule_version WHERE tournament_id = ?",
            params![&version.tournament_id],
            |row| row.get(0),
        )?;

        version.version_no = max_version_no.unwrap_or(0) + 1;

        tx.execute(
            r#"INSERT INTO schedule_version (
                version_id, tournament_id, version_no, status, created_by, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)"#,
            params![
                &version.version_id,
                &version.tournament_id,
                &version.version_no,
                version.status.to_db_str(),
                &version.created_by,
                &version.created_at,
            ],
        )?;

        tx.commit()?;
        Ok(version.version_id.clone())
    }

    /// 按version_id查询版本
    pub fn find_by_id(&self, version_id: &str) -> RepositoryResult<Option<ScheduleVersion>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            r#"SELECT version_id, tournament_id, version_no, status, created_by, created_at
               FROM schedule_version
               WHERE version_id = ?"#,
            params![version_id],
            map_row,
        ) {
            Ok(version) => Ok(Some(version)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询赛事的所有版本 (按版本号倒序)
    pub fn find_by_tournament_id(
        &self,
        tournament_id: &str,
    ) -> RepositoryResult<Vec<ScheduleVersion>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT version_id, tournament_id, version_no, status, created_by, created_at
               FROM schedule_version
               WHERE tournament_id = ?
               ORDER BY version_no DESC"#,
        )?;

        let versions = stmt
            .query_map(params![tournament_id], map_row)?
            .collect::<Result<Vec<ScheduleVersion>, _>>()?;

        Ok(versions)
    }

    /// 查询所有版本 (维护工具用)
    pub fn find_all(&self) -> RepositoryResult<Vec<ScheduleVersion>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT version_id, tournament_id, version_no, status, created_by, created_at
               FROM schedule_version
               ORDER BY created_at DESC"#,
        )?;

        let versions = stmt
            .query_map([], map_row)?
            .collect::<Result<Vec<ScheduleVersion>, _>>()?;

        Ok(versions)
    }

    /// 激活版本
    ///
    /// 同一事务内将该赛事下其他激活版本归档，保证同赛事至多一个 ACTIVE 版本。
    pub fn activate(&self, version_id: &str) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let tournament_id: String = tx
            .query_row(
                "SELECT tournament_id FROM schedule_version WHERE version_id = ?",
                params![version_id],
                |row| row.get(0),
            )
            .map_err(|_| RepositoryError::NotFound {
                entity: "ScheduleVersion".to_string(),
                id: version_id.to_string(),
            })?;

        tx.execute(
            "UPDATE schedule_version SET status = ? WHERE tournament_id = ? AND status = ?",
            params![
                VersionStatus::Archived.to_db_str(),
                &tournament_id,
                VersionStatus::Active.to_db_str()
            ],
        )?;

        tx.execute(
            "UPDATE schedule_version SET status = ? WHERE version_id = ?",
            params![VersionStatus::Active.to_db_str(), version_id],
        )?;

        tx.commit()?;
        Ok(())
    }
}

/// 行映射
fn map_row(row: &Row<'_>) -> rusqlite::Result<ScheduleVersion> {
    let status_str: String = row.get("status")?;
    Ok(ScheduleVersion {
        version_id: row.get("version_id")?,
        tournament_id: row.get("tournament_id")?,
        version_no: row.get("version_no")?,
        status: parse_enum(&status_str, "status", VersionStatus::from_db_str)?,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
    })
}
