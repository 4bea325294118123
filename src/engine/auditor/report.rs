// ==========================================
// 拍类赛事排赛系统 - 审计报告结构
// ==========================================
// 红线: 纯数据结构，无隐藏状态，可原样经由任何传输层外发
// ==========================================

use crate::domain::types::{OrderingViolationKind, Stage, UnassignedReason};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ScheduleAuditReport - 赛程审计报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleAuditReport {
    /// 总览统计
    pub summary: AuditSummary,

    /// 未落位明细 (按当前占用独立重算 reason)
    pub unassigned: Vec<UnassignedDetail>,

    /// 时段压力分析
    pub slot_pressure: SlotPressure,

    /// 各阶段时间线
    pub stage_timelines: Vec<StageTimeline>,

    /// 次序完整性违规
    pub ordering_violations: Vec<OrderingViolation>,

    /// 队伍撞场 (双侧队伍已知的已落位场次两两比对)
    pub team_conflicts: Vec<TeamConflict>,

    /// 存在未知队伍而被排除出撞场检测的已落位场次数
    pub unknown_team_match_count: usize,

    /// 数据一致性缺陷 (如落位引用了不存在的时段)，已从统计中剔除
    pub data_faults: Vec<String>,
}

// ==========================================
// AuditSummary - 总览统计
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total_slots: usize,
    pub total_matches: usize,
    pub assigned_count: usize,
    pub unassigned_count: usize,
    /// assigned / total * 100，total 为 0 时取 0.0
    pub assignment_rate: f64,
}

/// 未落位明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnassignedDetail {
    pub match_id: i64,
    pub stage: Stage,
    pub duration_minutes: i32,
    pub reason: UnassignedReason,
}

// ==========================================
// SlotPressure - 时段压力
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotPressure {
    /// 未使用的启用时段总数
    pub unused_total: usize,

    /// 未使用时段按比赛日分布 (键: YYYY-MM-DD)
    pub unused_by_day: BTreeMap<String, usize>,

    /// 未使用时段按场地分布
    pub unused_by_court: BTreeMap<String, usize>,

    /// 容量小于最长未落位场次时长的未使用时段数 (结构性浪费)
    pub undersized_below_longest_unassigned: usize,

    /// 最长未落位场次的时长 (无未落位时为 None)
    pub longest_unassigned_minutes: Option<i32>,
}

// ==========================================
// StageTimeline - 阶段时间线
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTimeline {
    pub stage: Stage,
    pub earliest_start: Option<NaiveDateTime>,
    pub latest_start: Option<NaiveDateTime>,
    pub assigned_count: usize,
    pub unassigned_count: usize,
    /// 本阶段开始时前序阶段尚未推进完 (后阶段漏进前阶段时间窗)
    pub spillover: bool,
}

/// 次序完整性违规 (时间相邻的两场比赛次序与确定性全序相悖)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderingViolation {
    pub kind: OrderingViolationKind,
    pub earlier_match_id: i64,
    pub later_match_id: i64,
    pub earlier_start: NaiveDateTime,
    pub later_start: NaiveDateTime,
    pub detail: String,
}

/// 队伍撞场: 同一队伍两场已落位比赛时间区间重叠
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConflict {
    pub team_id: i64,
    pub first_match_id: i64,
    pub second_match_id: i64,
    pub first_start: NaiveDateTime,
    pub first_end: NaiveDateTime,
    pub second_start: NaiveDateTime,
    pub second_end: NaiveDateTime,
}
