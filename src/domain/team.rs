// ==========================================
// 拍类赛事排赛系统 - 队伍领域模型
// ==========================================
// avoid_group 由上游"互识分组"算法维护，排赛引擎不读取
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Team - 队伍
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub team_id: i64,               // 队伍ID
    pub team_name: String,          // 队伍名称
    pub avoid_group: Option<String>, // 规避分组 (上游分组算法写入)
}
