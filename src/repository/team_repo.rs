// ==========================================
// 拍类赛事排赛系统 - 队伍仓储
// ==========================================

use crate::domain::team::Team;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// TeamRepository - 队伍仓储
// ==========================================
pub struct TeamRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TeamRepository {
    /// 创建新的TeamRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入队伍
    pub fn insert(&self, team: &Team) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        conn.execute(
            "INSERT INTO team (team_id, team_name, avoid_group) VALUES (?, ?, ?)",
            params![&team.team_id, &team.team_name, &team.avoid_group],
        )?;

        Ok(team.team_id)
    }

    /// 按team_id查询队伍
    pub fn find_by_id(&self, team_id: i64) -> RepositoryResult<Option<Team>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            "SELECT team_id, team_name, avoid_group FROM team WHERE team_id = ?",
            params![team_id],
            map_row,
        ) {
            Ok(team) => Ok(Some(team)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部队伍
    pub fn find_all(&self) -> RepositoryResult<Vec<Team>> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT team_id, team_name, avoid_group FROM team ORDER BY team_id")?;

        let teams = stmt
            .query_map([], map_row)?
            .collect::<Result<Vec<Team>, _>>()?;

        Ok(teams)
    }
}

/// 行映射
fn map_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        team_id: row.get("team_id")?,
        team_name: row.get("team_name")?,
        avoid_group: row.get("avoid_group")?,
    })
}
