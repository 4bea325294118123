// ==========================================
// 拍类赛事排赛系统 - 赛程审计引擎
// ==========================================
// 依据: Schedule_Engine_Specs_v1.0.md - 4.3 Schedule Auditor
// 红线: 纯只读分析，永不改写任何状态，编辑中途随时可调用
// ==========================================
// 职责: 完整度/时段压力/阶段时间线/次序完整性/队伍撞场
// 输入: 比赛 + 时段 + 落位 (同一版本快照)
// 输出: 可直接序列化外发的审计报告
// ==========================================

mod core;
mod report;


pub use core::ScheduleAuditor;
pub use report::{
    AuditSummary, OrderingViolation, ScheduleAuditReport, SlotPressure, StageTimeline,
    TeamConflict, UnassignedDetail,
};
