// ==========================================
// 拍类赛事排赛系统 - 排赛策略配置
// ==========================================
// 依据: Schedule_Engine_Specs_v1.0.md - 6. 约束即配置
// 红线: 阶段次序与休息时间是显式配置，不做环境单例，
//       以便测试中多套策略并存
// ==========================================

use crate::domain::types::Stage;
use serde::{Deserialize, Serialize};

// ==========================================
// V1 默认策略常量
// ==========================================

/// 阶段次序默认值 (数值越小越先排)
pub const DEFAULT_PRECEDENCE_WF: i32 = 0;
pub const DEFAULT_PRECEDENCE_MAIN: i32 = 1;
pub const DEFAULT_PRECEDENCE_CONSOLATION: i32 = 2;
pub const DEFAULT_PRECEDENCE_PLACEMENT: i32 = 3;

/// 瀑布轮之后接计分阶段的最小休息 (分钟)
pub const DEFAULT_REST_WF_TO_SCORING_MIN: i64 = 60;

/// 计分阶段之间的最小休息 (分钟)
pub const DEFAULT_REST_SCORING_TO_SCORING_MIN: i64 = 90;

/// 瀑布轮之间无强制休息，仅要求零重叠
pub const DEFAULT_REST_WF_TO_WF_MIN: i64 = 0;

// ==========================================
// SchedulePolicy - 排赛策略
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePolicy {
    // ===== 阶段次序 =====
    pub precedence_wf: i32,
    pub precedence_main: i32,
    pub precedence_consolation: i32,
    pub precedence_placement: i32,

    // ===== 休息规则 (分钟) =====
    pub rest_wf_to_scoring_min: i64,
    pub rest_scoring_to_scoring_min: i64,
    pub rest_wf_to_wf_min: i64,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            precedence_wf: DEFAULT_PRECEDENCE_WF,
            precedence_main: DEFAULT_PRECEDENCE_MAIN,
            precedence_consolation: DEFAULT_PRECEDENCE_CONSOLATION,
            precedence_placement: DEFAULT_PRECEDENCE_PLACEMENT,
            rest_wf_to_scoring_min: DEFAULT_REST_WF_TO_SCORING_MIN,
            rest_scoring_to_scoring_min: DEFAULT_REST_SCORING_TO_SCORING_MIN,
            rest_wf_to_wf_min: DEFAULT_REST_WF_TO_WF_MIN,
        }
    }
}

impl SchedulePolicy {
    /// 阶段次序值 (数值越小越先排)
    pub fn precedence(&self, stage: Stage) -> i32 {
        match stage {
            Stage::Wf => self.precedence_wf,
            Stage::Main => self.precedence_main,
            Stage::Consolation => self.precedence_consolation,
            Stage::Placement => self.precedence_placement,
        }
    }

    /// 阶段转换所需的最小休息分钟数
    ///
    /// 规则 (依据 Schedule_Engine_Specs 6):
    /// - WF → WF: 无强制休息 (零重叠仍然强制)
    /// - WF → 计分阶段: 60 分钟
    /// - 其余转换: 90 分钟
    pub fn required_rest_minutes(&self, prev: Stage, next: Stage) -> i64 {
        if prev == Stage::Wf && next == Stage::Wf {
            self.rest_wf_to_wf_min
        } else if prev == Stage::Wf {
            self.rest_wf_to_scoring_min
        } else {
            self.rest_scoring_to_scoring_min
        }
    }
}
