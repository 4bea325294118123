// ==========================================
// 拍类赛事排赛系统 - 比赛场次领域模型
// ==========================================
// 依据: Schedule_Engine_Specs_v1.0.md - match 实体
// 红线: 引擎只允许通过晋级推进写 team_a_id/team_b_id，其余字段只读
// ==========================================

use crate::domain::types::{RuntimeStatus, SourceRole, Stage};
use serde::{Deserialize, Serialize};

// ==========================================
// MatchRecord - 比赛场次
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: i64,                     // 场次ID
    pub version_id: String,                // 关联赛程版本
    pub event_id: String,                  // 关联项目 (男单/女双等)
    pub stage: Stage,                      // 阶段
    pub round_index: i32,                  // 轮次 (阶段内)
    pub sequence_in_round: i32,            // 轮内序号
    pub duration_minutes: i32,             // 预计时长 (分钟)
    pub team_a_id: Option<i64>,            // A侧队伍 (占位赛允许为空)
    pub team_b_id: Option<i64>,            // B侧队伍
    pub preferred_day: Option<u8>,         // 偏好星期 (0=周一..6=周日)
    pub source_match_a_id: Option<i64>,    // A侧来源比赛
    pub source_a_role: Option<SourceRole>, // A侧来源角色
    pub source_match_b_id: Option<i64>,    // B侧来源比赛
    pub source_b_role: Option<SourceRole>, // B侧来源角色
    pub runtime_status: RuntimeStatus,     // 运行状态
    pub winner_team_id: Option<i64>,       // 胜者队伍 (完赛后写入)
}

impl MatchRecord {
    /// 已知的队伍ID列表 (0/1/2 个)
    pub fn known_team_ids(&self) -> Vec<i64> {
        let mut ids = Vec::with_capacity(2);
        if let Some(a) = self.team_a_id {
            ids.push(a);
        }
        if let Some(b) = self.team_b_id {
            ids.push(b);
        }
        ids
    }

    /// 双侧队伍是否都已知
    pub fn has_both_teams(&self) -> bool {
        self.team_a_id.is_some() && self.team_b_id.is_some()
    }

    /// 双侧队伍是否都未知 (占位场次)
    pub fn is_teamless(&self) -> bool {
        self.team_a_id.is_none() && self.team_b_id.is_none()
    }

    /// 是否声明了任一上游来源
    pub fn has_source_link(&self) -> bool {
        self.source_match_a_id.is_some() || self.source_match_b_id.is_some()
    }

    /// 是否已完赛且有胜者 (晋级推进的前置条件)
    pub fn is_decided(&self) -> bool {
        self.runtime_status == RuntimeStatus::Final && self.winner_team_id.is_some()
    }
}
