// ==========================================
// 拍类赛事排赛系统 - 赛程审计引擎
// ==========================================
// 依据: Schedule_Engine_Specs_v1.0.md - 4.3 Schedule Auditor
// 红线: 只读分析；畸形输入按数据缺陷记录并剔除，不崩溃
// ==========================================

use crate::config::SchedulePolicy;
use crate::domain::match_record::MatchRecord;
use crate::domain::schedule::SlotAssignment;
use crate::domain::slot::CourtSlot;
use crate::domain::types::{OrderingViolationKind, Stage, UnassignedReason};
use crate::engine::ordering;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{instrument, warn};

use super::report::{
    AuditSummary, OrderingViolation, ScheduleAuditReport, SlotPressure, StageTimeline,
    TeamConflict, UnassignedDetail,
};

// ==========================================
// ScheduleAuditor - 赛程审计引擎
// ==========================================
pub struct ScheduleAuditor {
    policy: SchedulePolicy,
}

impl ScheduleAuditor {
    /// 构造函数
    pub fn new(policy: SchedulePolicy) -> Self {
        Self { policy }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 审计一个版本的落位状态
    ///
    /// 对已落位集只做解读不做改写；落位引用缺失场次/时段时
    /// 记入 data_faults 并从所有聚合统计中剔除。
    #[instrument(skip_all, fields(
        match_count = matches.len(),
        slot_count = slots.len(),
        assignment_count = assignments.len(),
    ))]
    pub fn audit(
        &self,
        matches: &[MatchRecord],
        slots: &[CourtSlot],
        assignments: &[SlotAssignment],
    ) -> ScheduleAuditReport {
        let match_by_id: HashMap<i64, &MatchRecord> =
            matches.iter().map(|m| (m.match_id, m)).collect();
        let slot_by_id: HashMap<i64, &CourtSlot> = slots.iter().map(|s| (s.slot_id, s)).collect();

        // ===== 落位有效性过滤 =====
        let mut valid: Vec<(&MatchRecord, &CourtSlot)> = Vec::new();
        let mut data_faults: Vec<String> = Vec::new();
        for a in assignments {
            match (match_by_id.get(&a.match_id), slot_by_id.get(&a.slot_id)) {
                (Some(m), Some(s)) => valid.push((m, s)),
                (None, _) => {
                    warn!(match_id = a.match_id, "落位引用了不存在的场次，剔除");
                    data_faults.push(format!("落位引用了不存在的场次: match_id={}", a.match_id));
                }
                (_, None) => {
                    warn!(slot_id = a.slot_id, "落位引用了不存在的时段，剔除");
                    data_faults.push(format!("落位引用了不存在的时段: slot_id={}", a.slot_id));
                }
            }
        }

        let assigned_ids: HashSet<i64> = valid.iter().map(|(m, _)| m.match_id).collect();
        let used_slot_ids: HashSet<i64> = valid.iter().map(|(_, s)| s.slot_id).collect();

        // ===== 总览 =====
        let total_matches = matches.len();
        let assigned_count = matches
            .iter()
            .filter(|m| assigned_ids.contains(&m.match_id))
            .count();
        let unassigned_count = total_matches - assigned_count;
        let assignment_rate = if total_matches == 0 {
            0.0
        } else {
            assigned_count as f64 / total_matches as f64 * 100.0
        };
        let summary = AuditSummary {
            total_slots: slots.len(),
            total_matches,
            assigned_count,
            unassigned_count,
            assignment_rate,
        };

        // ===== 未落位明细 (按当前占用独立重算 reason) =====
        let free_slots: Vec<&CourtSlot> = slots
            .iter()
            .filter(|s| s.is_active && !used_slot_ids.contains(&s.slot_id))
            .collect();
        let mut unassigned: Vec<UnassignedDetail> = matches
            .iter()
            .filter(|m| !assigned_ids.contains(&m.match_id))
            .map(|m| UnassignedDetail {
                match_id: m.match_id,
                stage: m.stage,
                duration_minutes: m.duration_minutes,
                reason: classify_unassigned(m, &free_slots),
            })
            .collect();
        unassigned.sort_by_key(|d| d.match_id);

        // ===== 时段压力 =====
        let slot_pressure = build_slot_pressure(&free_slots, &unassigned);

        // ===== 阶段时间线 =====
        let stage_timelines = self.build_stage_timelines(matches, &valid);

        // ===== 次序完整性 =====
        let ordering_violations = self.check_ordering(&valid);

        // ===== 队伍撞场 =====
        let (team_conflicts, unknown_team_match_count) = detect_team_conflicts(&valid);

        ScheduleAuditReport {
            summary,
            unassigned,
            slot_pressure,
            stage_timelines,
            ordering_violations,
            team_conflicts,
            unknown_team_match_count,
            data_faults,
        }
    }

    // ==========================================
    // 内部方法
    // ==========================================

    /// 各阶段最早/最晚开赛与 spillover 标记
    ///
    /// spillover: 存在前序阶段 T 使得 T 的最晚开赛晚于本阶段最早开赛，
    /// 即本阶段漏进了前序阶段尚未结束的时间窗。
    fn build_stage_timelines(
        &self,
        matches: &[MatchRecord],
        valid: &[(&MatchRecord, &CourtSlot)],
    ) -> Vec<StageTimeline> {
        let mut timelines: Vec<StageTimeline> = Stage::ALL
            .iter()
            .map(|&stage| {
                let starts: Vec<NaiveDateTime> = valid
                    .iter()
                    .filter(|(m, _)| m.stage == stage)
                    .map(|(_, s)| s.start_datetime())
                    .collect();
                let stage_total = matches.iter().filter(|m| m.stage == stage).count();
                let stage_assigned = starts.len();
                StageTimeline {
                    stage,
                    earliest_start: starts.iter().min().copied(),
                    latest_start: starts.iter().max().copied(),
                    assigned_count: stage_assigned,
                    unassigned_count: stage_total - stage_assigned,
                    spillover: false,
                }
            })
            .collect();

        for i in 0..timelines.len() {
            let Some(own_earliest) = timelines[i].earliest_start else {
                continue;
            };
            let own_prec = self.policy.precedence(timelines[i].stage);
            let leaked = timelines.iter().any(|other| {
                self.policy.precedence(other.stage) < own_prec
                    && other.latest_start.map(|l| l > own_earliest).unwrap_or(false)
            });
            timelines[i].spillover = leaked;
        }

        timelines
    }

    /// 次序完整性: 时间顺序走一遍，相邻两场与确定性全序相悖即违规
    fn check_ordering(&self, valid: &[(&MatchRecord, &CourtSlot)]) -> Vec<OrderingViolation> {
        let mut chrono: Vec<&(&MatchRecord, &CourtSlot)> = valid.iter().collect();
        chrono.sort_by(|a, b| {
            ordering::slot_order_key(a.1)
                .cmp(&ordering::slot_order_key(b.1))
                .then(a.0.match_id.cmp(&b.0.match_id))
        });

        let mut violations = Vec::new();
        for pair in chrono.windows(2) {
            let (earlier, e_slot) = pair[0];
            let (later, l_slot) = pair[1];

            if ordering::match_order_key(&self.policy, earlier)
                <= ordering::match_order_key(&self.policy, later)
            {
                continue;
            }

            let kind = if earlier.stage != later.stage
                && self.policy.precedence(earlier.stage) > self.policy.precedence(later.stage)
            {
                OrderingViolationKind::StageOrderInversion
            } else if earlier.stage == later.stage && earlier.round_index > later.round_index {
                OrderingViolationKind::RoundOrderInversion
            } else {
                OrderingViolationKind::OrderingViolation
            };

            violations.push(OrderingViolation {
                kind,
                earlier_match_id: earlier.match_id,
                later_match_id: later.match_id,
                earlier_start: e_slot.start_datetime(),
                later_start: l_slot.start_datetime(),
                detail: format!(
                    "场次 {} ({} R{}) 开赛早于次序在前的场次 {} ({} R{})",
                    earlier.match_id,
                    earlier.stage,
                    earlier.round_index,
                    later.match_id,
                    later.stage,
                    later.round_index
                ),
            });
        }

        violations
    }
}

/// 未落位原因三分类 (与落位引擎同一口径，对当前占用独立重算)
fn classify_unassigned(m: &MatchRecord, free_slots: &[&CourtSlot]) -> UnassignedReason {
    if free_slots.is_empty() {
        UnassignedReason::SlotsExhausted
    } else if !free_slots
        .iter()
        .any(|s| s.fits_duration(m.duration_minutes))
    {
        UnassignedReason::DurationTooLong
    } else {
        UnassignedReason::NoCompatibleSlot
    }
}

/// 时段压力统计
fn build_slot_pressure(
    free_slots: &[&CourtSlot],
    unassigned: &[UnassignedDetail],
) -> SlotPressure {
    let mut unused_by_day: BTreeMap<String, usize> = BTreeMap::new();
    let mut unused_by_court: BTreeMap<String, usize> = BTreeMap::new();
    for s in free_slots {
        *unused_by_day
            .entry(s.day_date.format("%Y-%m-%d").to_string())
            .or_insert(0) += 1;
        *unused_by_court.entry(s.court_label.clone()).or_insert(0) += 1;
    }

    let longest_unassigned_minutes = unassigned.iter().map(|d| d.duration_minutes).max();
    let undersized = match longest_unassigned_minutes {
        Some(longest) => free_slots
            .iter()
            .filter(|s| s.block_minutes < longest)
            .count(),
        None => 0,
    };

    SlotPressure {
        unused_total: free_slots.len(),
        unused_by_day,
        unused_by_court,
        undersized_below_longest_unassigned: undersized,
        longest_unassigned_minutes,
    }
}

/// 队伍撞场检测
///
/// 只比对双侧队伍已知且已落位的场次；任一侧未知的已落位场次单独计数，
/// 避免悄悄抬高"无撞场"的观感。冲突对按 (队伍, 场次对) 去重。
fn detect_team_conflicts(valid: &[(&MatchRecord, &CourtSlot)]) -> (Vec<TeamConflict>, usize) {
    let mut unknown_team_match_count = 0usize;
    let mut by_team: BTreeMap<i64, Vec<(i64, NaiveDateTime, NaiveDateTime)>> = BTreeMap::new();

    for (m, s) in valid {
        if !m.has_both_teams() {
            unknown_team_match_count += 1;
            continue;
        }
        let (start, end) = s.occupied_interval(m.duration_minutes);
        for team_id in m.known_team_ids() {
            by_team.entry(team_id).or_default().push((m.match_id, start, end));
        }
    }

    let mut seen: BTreeSet<(i64, i64, i64)> = BTreeSet::new();
    let mut conflicts = Vec::new();
    for (team_id, mut entries) in by_team {
        entries.sort_by_key(|(id, _, _)| *id);
        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                let (id_a, start_a, end_a) = entries[i];
                let (id_b, start_b, end_b) = entries[j];
                if start_a < end_b && start_b < end_a {
                    let key = (team_id, id_a.min(id_b), id_a.max(id_b));
                    if seen.insert(key) {
                        conflicts.push(TeamConflict {
                            team_id,
                            first_match_id: id_a,
                            second_match_id: id_b,
                            first_start: start_a,
                            first_end: end_a,
                            second_start: start_b,
                            second_end: end_b,
                        });
                    }
                }
            }
        }
    }

    (conflicts, unknown_team_match_count)
}
