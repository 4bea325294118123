// ==========================================
// 拍类赛事排赛系统 - 晋级推进引擎
// ==========================================
// 依据: Schedule_Engine_Specs_v1.0.md - 4.4 Advancement Propagator
// 红线: 只产出下游场次 team_a_id/team_b_id 的更新，
//       永不触碰时段与落位；依赖边存在下游侧，推进是常数次边遍历
// 红线: 下游侧已有不同队伍时必须显式报冲突，不得静默改写或忽略
// ==========================================

use crate::domain::match_record::MatchRecord;
use crate::domain::types::{SourceRole, TeamSide};
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::match_repo::TeamSlotUpdate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// 批量推进的汇总结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancementSummary {
    pub processed: usize,           // 处理的已完赛场次数
    pub teams_advanced: usize,      // 实际写入的队伍侧数
    pub unknown_team_before: usize, // 推进前存在未知队伍侧的场次数
    pub unknown_team_after: usize,  // 推进后仍存在未知队伍侧的场次数
}

// ==========================================
// AdvancementPropagator - 晋级推进引擎
// ==========================================
pub struct AdvancementPropagator {
    // 无状态引擎，基于版本快照纯计算
}

impl AdvancementPropagator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算单场完赛的下游推进更新
    ///
    /// 前置条件: 来源场次 FINAL 且有胜者，否则产出空更新 (非错误，
    /// 允许调用方投机调用)。幂等: 已等于胜者的下游侧不再产出更新。
    ///
    /// 作用域严格限定在来源场次所属的赛程版本内。
    #[instrument(skip(self, matches), fields(match_count = matches.len()))]
    pub fn plan_from_match(
        &self,
        matches: &[MatchRecord],
        match_id: i64,
    ) -> EngineResult<Vec<TeamSlotUpdate>> {
        let source = matches
            .iter()
            .find(|m| m.match_id == match_id)
            .ok_or_else(|| {
                EngineError::Validation(format!("来源场次不存在: {}", match_id))
            })?;

        let Some(winner) = source.winner_team_id else {
            debug!(match_id, "来源场次尚无胜者，跳过推进");
            return Ok(Vec::new());
        };
        if !source.is_decided() {
            debug!(match_id, "来源场次未完赛，跳过推进");
            return Ok(Vec::new());
        }

        let mut updates = Vec::new();
        for m in matches {
            if m.match_id == source.match_id || m.version_id != source.version_id {
                continue;
            }

            if m.source_match_a_id == Some(source.match_id)
                && m.source_a_role == Some(SourceRole::Winner)
            {
                match m.team_a_id {
                    None => updates.push(TeamSlotUpdate {
                        match_id: m.match_id,
                        side: TeamSide::A,
                        team_id: winner,
                    }),
                    Some(existing) if existing == winner => {}
                    Some(existing) => {
                        return Err(EngineError::AdvancementConflict {
                            source_match_id: source.match_id,
                            downstream_match_id: m.match_id,
                            side: TeamSide::A,
                            existing_team_id: existing,
                            winner_team_id: winner,
                        });
                    }
                }
            }

            if m.source_match_b_id == Some(source.match_id)
                && m.source_b_role == Some(SourceRole::Winner)
            {
                match m.team_b_id {
                    None => updates.push(TeamSlotUpdate {
                        match_id: m.match_id,
                        side: TeamSide::B,
                        team_id: winner,
                    }),
                    Some(existing) if existing == winner => {}
                    Some(existing) => {
                        return Err(EngineError::AdvancementConflict {
                            source_match_id: source.match_id,
                            downstream_match_id: m.match_id,
                            side: TeamSide::B,
                            existing_team_id: existing,
                            winner_team_id: winner,
                        });
                    }
                }
            }
        }

        debug!(match_id, updates = updates.len(), "下游推进更新计算完成");
        Ok(updates)
    }

    /// 批量回填: 按 match_id 升序处理版本内所有已完赛且有胜者的场次
    ///
    /// 用于人工改数后的修复。更新在内存快照上逐场生效，
    /// 保证后续场次看到前面推进的结果，汇总计数准确。
    #[instrument(skip(self, matches), fields(match_count = matches.len()))]
    pub fn plan_resolve_all(
        &self,
        matches: &[MatchRecord],
    ) -> EngineResult<(Vec<TeamSlotUpdate>, AdvancementSummary)> {
        let unknown_team_before = count_unknown_sides(matches);

        let mut working: Vec<MatchRecord> = matches.to_vec();
        let mut decided_ids: Vec<i64> = working
            .iter()
            .filter(|m| m.is_decided())
            .map(|m| m.match_id)
            .collect();
        decided_ids.sort_unstable();

        let mut all_updates: Vec<TeamSlotUpdate> = Vec::new();
        for source_id in &decided_ids {
            let updates = self.plan_from_match(&working, *source_id)?;
            for u in &updates {
                let target = working
                    .iter_mut()
                    .find(|m| m.match_id == u.match_id)
                    .ok_or_else(|| {
                        EngineError::Validation(format!("下游场次不存在: {}", u.match_id))
                    })?;
                match u.side {
                    TeamSide::A => target.team_a_id = Some(u.team_id),
                    TeamSide::B => target.team_b_id = Some(u.team_id),
                }
            }
            all_updates.extend(updates);
        }

        let summary = AdvancementSummary {
            processed: decided_ids.len(),
            teams_advanced: all_updates.len(),
            unknown_team_before,
            unknown_team_after: count_unknown_sides(&working),
        };
        Ok((all_updates, summary))
    }
}

impl Default for AdvancementPropagator {
    fn default() -> Self {
        Self::new()
    }
}

/// 存在未知队伍侧的场次数
fn count_unknown_sides(matches: &[MatchRecord]) -> usize {
    matches
        .iter()
        .filter(|m| m.team_a_id.is_none() || m.team_b_id.is_none())
        .count()
}
