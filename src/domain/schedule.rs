// ==========================================
// 拍类赛事排赛系统 - 赛程版本/锁定/落位领域模型
// ==========================================
// 依据: Schedule_Engine_Specs_v1.0.md - schedule_version/slot_lock/slot_assignment
// 红线: (version, match) 与 (version, slot) 各自唯一；锁定必须原样出现在落位集中
// ==========================================

use crate::domain::types::{AssignmentSourceType, VersionStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// ScheduleVersion - 赛程版本
// ==========================================
// 用途: 草稿沙盘与历史回溯；所有引擎读写均以版本为隔离单元
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleVersion {
    pub version_id: String,         // 版本ID
    pub tournament_id: String,      // 关联赛事
    pub version_no: i32,            // 版本号
    pub status: VersionStatus,      // 状态
    pub created_by: Option<String>, // 创建人
    pub created_at: NaiveDateTime,  // 创建时间
}

impl ScheduleVersion {
    /// 判断是否为激活状态
    pub fn is_active(&self) -> bool {
        self.status == VersionStatus::Active
    }
}

// ==========================================
// SlotLock - 人工锁定落位
// ==========================================
// 红线: 锁定是人工编排结果，算法不得移动、不得复用其时段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotLock {
    pub version_id: String,         // 关联版本
    pub match_id: i64,              // 锁定的场次
    pub slot_id: i64,               // 锁定的时段
    pub created_by: Option<String>, // 锁定人
    pub created_at: NaiveDateTime,  // 锁定时间
}

// ==========================================
// SlotAssignment - 排赛落位
// ==========================================
// 引擎唯一自主创建的实体；由 SlotAssigner 整体替换，审计层只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub version_id: String,                // 关联版本
    pub match_id: i64,                     // 场次
    pub slot_id: i64,                      // 时段
    pub source_type: AssignmentSourceType, // 落位来源 (CALC/LOCKED)
    pub created_at: NaiveDateTime,         // 写入时间
}
