// ==========================================
// 拍类赛事排赛系统 - 比赛场次仓储
// ==========================================
// 红线: 引擎侧只允许写 team_a_id/team_b_id (晋级推进)；
//       阶段/轮次/时长等字段由上游签表生成维护
// ==========================================

use crate::domain::match_record::MatchRecord;
use crate::domain::types::{RuntimeStatus, SourceRole, Stage, TeamSide};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_enum;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

/// 晋级推进产生的队伍侧更新 (由引擎计算，仓储在单事务内落库)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSlotUpdate {
    pub match_id: i64,  // 下游场次
    pub side: TeamSide, // 写入侧
    pub team_id: i64,   // 晋级队伍
}

// ==========================================
// MatchRepository - 比赛场次仓储
// ==========================================
pub struct MatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MatchRepository {
    /// 创建新的MatchRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入场次
    pub fn insert(&self, m: &MatchRecord) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO tournament_match (
                match_id, version_id, event_id, stage, round_index, sequence_in_round,
                duration_minutes, team_a_id, team_b_id, preferred_day,
                source_match_a_id, source_a_role, source_match_b_id, source_b_role,
                runtime_status, winner_team_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                &m.match_id,
                &m.version_id,
                &m.event_id,
                m.stage.to_db_str(),
                &m.round_index,
                &m.sequence_in_round,
                &m.duration_minutes,
                &m.team_a_id,
                &m.team_b_id,
                &m.preferred_day,
                &m.source_match_a_id,
                m.source_a_role.map(|r| r.to_db_str()),
                &m.source_match_b_id,
                m.source_b_role.map(|r| r.to_db_str()),
                m.runtime_status.to_db_str(),
                &m.winner_team_id,
            ],
        )?;

        Ok(m.match_id)
    }

    /// 按match_id查询场次
    pub fn find_by_id(&self, match_id: i64) -> RepositoryResult<Option<MatchRecord>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            &format!("{} WHERE match_id = ?", SELECT_MATCH),
            params![match_id],
            map_row,
        ) {
            Ok(m) => Ok(Some(m)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询一个版本的全部场次 (按match_id升序，保证确定性)
    pub fn find_by_version(&self, version_id: &str) -> RepositoryResult<Vec<MatchRecord>> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare(&format!("{} WHERE version_id = ? ORDER BY match_id", SELECT_MATCH))?;

        let matches = stmt
            .query_map(params![version_id], map_row)?
            .collect::<Result<Vec<MatchRecord>, _>>()?;

        Ok(matches)
    }

    /// 记录比赛结果 (完赛 + 胜者)
    ///
    /// 说明: 这是上游计分系统的写入口，放在仓储层供集成测试与维护工具使用。
    pub fn record_result(&self, match_id: i64, winner_team_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let updated = conn.execute(
            "UPDATE tournament_match SET runtime_status = ?, winner_team_id = ? WHERE match_id = ?",
            params![RuntimeStatus::Final.to_db_str(), winner_team_id, match_id],
        )?;

        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "MatchRecord".to_string(),
                id: match_id.to_string(),
            });
        }
        Ok(())
    }

    /// 在单事务内应用晋级推进的队伍侧更新
    ///
    /// 守卫条件: 仅当目标侧仍为空时写入 (已等于胜者的侧由引擎在计划阶段滤除)，
    /// 返回实际更新的行数 (幂等调用第二次返回 0)。
    /// 红线: 引擎计划读与本事务写之间若有并发改写，被改写的行在此跳过而非覆盖，
    ///       调用方以 实际行数 < 计划行数 感知并告警。
    pub fn apply_team_updates(&self, updates: &[TeamSlotUpdate]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut applied = 0usize;
        for u in updates {
            let sql = match u.side {
                TeamSide::A => {
                    r#"UPDATE tournament_match
                       SET team_a_id = ?1
                       WHERE match_id = ?2 AND (team_a_id IS NULL)"#
                }
                TeamSide::B => {
                    r#"UPDATE tournament_match
                       SET team_b_id = ?1
                       WHERE match_id = ?2 AND (team_b_id IS NULL)"#
                }
            };
            applied += tx.execute(sql, params![u.team_id, u.match_id])?;
        }

        tx.commit()?;
        Ok(applied)
    }
}

const SELECT_MATCH: &str = r#"SELECT match_id, version_id, event_id, stage, round_index,
           sequence_in_round, duration_minutes, team_a_id, team_b_id, preferred_day,
           source_match_a_id, source_a_role, source_match_b_id, source_b_role,
           runtime_status, winner_team_id
    FROM tournament_match"#;

/// 行映射
fn map_row(row: &Row<'_>) -> rusqlite::Result<MatchRecord> {
    let stage_str: String = row.get("stage")?;
    let status_str: String = row.get("runtime_status")?;
    let role_a_str: Option<String> = row.get("source_a_role")?;
    let role_b_str: Option<String> = row.get("source_b_role")?;

    let source_a_role = match role_a_str {
        Some(s) => Some(parse_enum(&s, "source_a_role", SourceRole::from_db_str)?),
        None => None,
    };
    let source_b_role = match role_b_str {
        Some(s) => Some(parse_enum(&s, "source_b_role", SourceRole::from_db_str)?),
        None => None,
    };

    Ok(MatchRecord {
        match_id: row.get("match_id")?,
        version_id: row.get("version_id")?,
        event_id: row.get("event_id")?,
        stage: parse_enum(&stage_str, "stage", Stage::from_db_str)?,
        round_index: row.get("round_index")?,
        sequence_in_round: row.get("sequence_in_round")?,
        duration_minutes: row.get("duration_minutes")?,
        team_a_id: row.get("team_a_id")?,
        team_b_id: row.get("team_b_id")?,
        preferred_day: row.get("preferred_day")?,
        source_match_a_id: row.get("source_match_a_id")?,
        source_a_role,
        source_match_b_id: row.get("source_match_b_id")?,
        source_b_role,
        runtime_status: parse_enum(&status_str, "runtime_status", RuntimeStatus::from_db_str)?,
        winner_team_id: row.get("winner_team_id")?,
    })
}
