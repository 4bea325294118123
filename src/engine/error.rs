// ==========================================
// 拍类赛事排赛系统 - 引擎层错误类型
// ==========================================
// 两类错误:
// - 校验错误: 任何写入前检出，整次运行中止，无部分效果
// - 晋级冲突: 下游侧已有不同队伍，属于上游数据缺陷，必须显式上抛
// 注意: 单场未落位不是错误，以 reason 形式记录在结果中
// ==========================================

use crate::domain::types::TeamSide;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("数据校验失败: {0}")]
    Validation(String),

    #[error(
        "晋级冲突: 下游场次 {downstream_match_id} 的 {side} 侧已是队伍 {existing_team_id}，\
         不能改写为来源场次 {source_match_id} 的胜者 {winner_team_id}"
    )]
    AdvancementConflict {
        source_match_id: i64,
        downstream_match_id: i64,
        side: TeamSide,
        existing_team_id: i64,
        winner_team_id: i64,
    },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
