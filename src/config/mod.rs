// ==========================================
// 拍类赛事排赛系统 - 配置层
// ==========================================
// 职责: 排赛策略参数 (阶段次序/休息规则)
// ==========================================

pub mod schedule_policy;

pub use schedule_policy::SchedulePolicy;
