// ==========================================
// 拍类赛事排赛系统 - 次序预言机
// ==========================================
// 依据: Schedule_Engine_Specs_v1.0.md - 4.1 Ordering Oracle
// 职责: 对比赛与时段各给出一个严格全序，
//       所有组件复用这里的键，不得各自另推次序
// 红线: 纯函数，无 I/O，不依赖存储迭代顺序
// ==========================================

use crate::config::SchedulePolicy;
use crate::domain::match_record::MatchRecord;
use crate::domain::slot::CourtSlot;
use chrono::{NaiveDate, NaiveTime};

/// 比赛排序键: (阶段次序, 轮次, 轮内序号, 场次ID)
///
/// 末位 ID 保证即使业务字段完全相同也无并列，构成严格全序。
pub type MatchOrderKey = (i32, i32, i32, i64);

/// 时段排序键: (比赛日, 开始时间, 场地标签)
///
/// 上游生成保证同版本内 (日, 时, 场地) 不重复，实践中同样是严格全序。
pub type SlotOrderKey<'a> = (NaiveDate, NaiveTime, &'a str);

/// 比赛排序键
pub fn match_order_key(policy: &SchedulePolicy, m: &MatchRecord) -> MatchOrderKey {
    (
        policy.precedence(m.stage),
        m.round_index,
        m.sequence_in_round,
        m.match_id,
    )
}

/// 时段排序键
pub fn slot_order_key(s: &CourtSlot) -> SlotOrderKey<'_> {
    (s.day_date, s.start_time, s.court_label.as_str())
}

/// 按排序键整理比赛引用列表
pub fn sorted_matches<'a>(
    policy: &SchedulePolicy,
    matches: &'a [MatchRecord],
) -> Vec<&'a MatchRecord> {
    let mut refs: Vec<&MatchRecord> = matches.iter().collect();
    refs.sort_by_key(|m| match_order_key(policy, m));
    refs
}

/// 按排序键整理时段引用列表
pub fn sorted_slots<'a>(slots: &'a [CourtSlot]) -> Vec<&'a CourtSlot> {
    let mut refs: Vec<&CourtSlot> = slots.iter().collect();
    refs.sort_by(|a, b| slot_order_key(a).cmp(&slot_order_key(b)));
    refs
}
