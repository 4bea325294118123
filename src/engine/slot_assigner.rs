// ==========================================
// 拍类赛事排赛系统 - 时段落位引擎
// ==========================================
// 依据: Schedule_Engine_Specs_v1.0.md - 4.2 Slot Assigner
// 红线: 确定性单遍贪心，无回溯、无随机、不依赖墙钟做落位决策
// 职责: 按次序预言机给出的全序，把每场比赛放进最早的相容空闲时段
// 输入: 版本快照 (比赛 + 时段 + 锁定 + 既有落位) + 选项
// 输出: 落位集 + 带 reason 的未落位清单
// ==========================================

use crate::config::SchedulePolicy;
use crate::domain::match_record::MatchRecord;
use crate::domain::schedule::{SlotAssignment, SlotLock};
use crate::domain::slot::CourtSlot;
use crate::domain::types::{AssignmentSourceType, Stage, UnassignedReason};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::ordering;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument, warn};

// ==========================================
// AssignOptions - 落位选项
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignOptions {
    pub clear_existing: bool, // 清空既有落位整体重推 (确定性保证以此为前提)
    pub allow_teamless: bool, // 是否允许占位场次落位
    pub enforce_rest: bool,   // 是否强制队伍休息规则
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self {
            clear_existing: true,
            allow_teamless: true,
            enforce_rest: true,
        }
    }
}

/// 未落位记录 (带确定性 reason)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnassignedMatch {
    pub match_id: i64,
    pub stage: Stage,
    pub duration_minutes: i32,
    pub reason: UnassignedReason,
    pub detail: String,
}

/// 一次落位运行的完整结果
#[derive(Debug, Clone)]
pub struct AssignmentOutcome {
    pub assignments: Vec<SlotAssignment>,
    pub unassigned: Vec<UnassignedMatch>,
}

/// 队伍的已占用时间区间 (休息规则簿记)
#[derive(Debug, Clone)]
struct TeamInterval {
    start: NaiveDateTime,
    end: NaiveDateTime,
    stage: Stage,
}

// ==========================================
// SlotAssigner - 时段落位引擎
// ==========================================
pub struct SlotAssigner {
    policy: SchedulePolicy,
}

impl SlotAssigner {
    /// 构造函数
    pub fn new(policy: SchedulePolicy) -> Self {
        Self { policy }
    }

    /// 当前策略
    pub fn policy(&self) -> &SchedulePolicy {
        &self.policy
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行一次完整落位
    ///
    /// 算法 (依据 Schedule_Engine_Specs 4.2):
    /// 1) 比赛按 match_order_key、时段按 slot_order_key 排序
    /// 2) 锁定先行入座，锁定的场次与时段退出后续分配
    /// 3) 逐场扫描空闲时段，取第一个容量够且约束通过的时段
    /// 4) 偏好日先在当日找，找不到回退全时段 (休息约束优先于偏好)
    /// 5) 落不下的场次按确定性规则分类 reason，运行继续
    ///
    /// 校验失败 (空列表/非法时长/锁定悬挂) 在任何落位前整体中止。
    #[instrument(skip(self, matches, slots, locks, existing), fields(
        match_count = matches.len(),
        slot_count = slots.len(),
        lock_count = locks.len(),
        clear_existing = options.clear_existing,
        enforce_rest = options.enforce_rest,
    ))]
    pub fn assign(
        &self,
        matches: &[MatchRecord],
        slots: &[CourtSlot],
        locks: &[SlotLock],
        existing: &[SlotAssignment],
        options: &AssignOptions,
    ) -> EngineResult<AssignmentOutcome> {
        self.validate(matches, slots, locks)?;

        let match_by_id: HashMap<i64, &MatchRecord> =
            matches.iter().map(|m| (m.match_id, m)).collect();
        let slot_by_id: HashMap<i64, &CourtSlot> = slots.iter().map(|s| (s.slot_id, s)).collect();

        // 只有启用的时段参与分配
        let mut ordered_slots: Vec<&CourtSlot> = slots.iter().filter(|s| s.is_active).collect();
        ordered_slots.sort_by(|a, b| ordering::slot_order_key(a).cmp(&ordering::slot_order_key(b)));

        let ordered_matches = ordering::sorted_matches(&self.policy, matches);

        let now = Utc::now().naive_utc();
        let mut assignments: Vec<SlotAssignment> = Vec::new();
        let mut unassigned: Vec<UnassignedMatch> = Vec::new();
        let mut consumed_slots: HashSet<i64> = HashSet::new();
        let mut placed_matches: HashSet<i64> = HashSet::new();
        let mut team_intervals: HashMap<i64, Vec<TeamInterval>> = HashMap::new();

        // ===== 锁定先行入座 =====
        let mut ordered_locks: Vec<&SlotLock> = locks.iter().collect();
        ordered_locks.sort_by_key(|l| l.match_id);
        for lock in ordered_locks {
            let m = match_by_id[&lock.match_id];
            let s = slot_by_id[&lock.slot_id];

            if !s.fits_duration(m.duration_minutes) {
                // 锁定是人工编排结果，原样保留；容量缺口记告警由审计层暴露
                warn!(
                    match_id = lock.match_id,
                    slot_id = lock.slot_id,
                    duration = m.duration_minutes,
                    block = s.block_minutes,
                    "锁定落位容量不足，按锁定原样保留"
                );
            }

            assignments.push(SlotAssignment {
                version_id: lock.version_id.clone(),
                match_id: lock.match_id,
                slot_id: lock.slot_id,
                source_type: AssignmentSourceType::Locked,
                created_at: now,
            });
            consumed_slots.insert(lock.slot_id);
            placed_matches.insert(lock.match_id);
            record_team_intervals(&mut team_intervals, m, s);
        }

        // ===== 既有落位保留 (clear_existing=false 时视同固定落位) =====
        if !options.clear_existing {
            let mut ordered_existing: Vec<&SlotAssignment> = existing.iter().collect();
            ordered_existing.sort_by_key(|a| a.match_id);
            for a in ordered_existing {
                if placed_matches.contains(&a.match_id) || consumed_slots.contains(&a.slot_id) {
                    continue; // 锁定优先
                }
                let (m, s) = match (match_by_id.get(&a.match_id), slot_by_id.get(&a.slot_id)) {
                    (Some(m), Some(s)) => (*m, *s),
                    _ => {
                        warn!(
                            match_id = a.match_id,
                            slot_id = a.slot_id,
                            "既有落位引用了不存在的场次或时段，忽略"
                        );
                        continue;
                    }
                };

                assignments.push(a.clone());
                consumed_slots.insert(a.slot_id);
                placed_matches.insert(a.match_id);
                record_team_intervals(&mut team_intervals, m, s);
            }
        }

        // ===== 逐场贪心落位 =====
        for m in ordered_matches {
            if placed_matches.contains(&m.match_id) {
                continue;
            }

            if !options.allow_teamless
                && m.is_teamless()
                && !has_satisfied_dependency(m, &match_by_id)
            {
                debug!(match_id = m.match_id, "占位场次且上游依赖未满足，跳过");
                unassigned.push(UnassignedMatch {
                    match_id: m.match_id,
                    stage: m.stage,
                    duration_minutes: m.duration_minutes,
                    reason: UnassignedReason::NullTeam,
                    detail: "双侧队伍未知且无已完赛的上游来源".to_string(),
                });
                continue;
            }

            // 偏好日先试当日，失败回退全时段 (休息约束始终生效)
            let mut chosen: Option<&CourtSlot> = None;
            if let Some(day) = m.preferred_day {
                chosen = self.find_first_fit(
                    m,
                    &ordered_slots,
                    &consumed_slots,
                    &team_intervals,
                    options,
                    Some(day),
                );
                if chosen.is_none() {
                    debug!(
                        match_id = m.match_id,
                        preferred_day = day,
                        "偏好日无相容时段，回退全时段"
                    );
                }
            }
            if chosen.is_none() {
                chosen = self.find_first_fit(
                    m,
                    &ordered_slots,
                    &consumed_slots,
                    &team_intervals,
                    options,
                    None,
                );
            }

            match chosen {
                Some(slot) => {
                    assignments.push(SlotAssignment {
                        version_id: m.version_id.clone(),
                        match_id: m.match_id,
                        slot_id: slot.slot_id,
                        source_type: AssignmentSourceType::Calc,
                        created_at: now,
                    });
                    consumed_slots.insert(slot.slot_id);
                    placed_matches.insert(m.match_id);
                    record_team_intervals(&mut team_intervals, m, slot);
                }
                None => {
                    let (reason, detail) =
                        classify_failure(m, &ordered_slots, &consumed_slots);
                    debug!(match_id = m.match_id, reason = %reason, "场次未落位");
                    unassigned.push(UnassignedMatch {
                        match_id: m.match_id,
                        stage: m.stage,
                        duration_minutes: m.duration_minutes,
                        reason,
                        detail,
                    });
                }
            }
        }

        debug!(
            assigned = assignments.len(),
            unassigned = unassigned.len(),
            "落位运行完成"
        );
        Ok(AssignmentOutcome {
            assignments,
            unassigned,
        })
    }

    // ==========================================
    // 内部方法
    // ==========================================

    /// 运行前校验：空列表/非法时长/锁定悬挂引用 → 整体中止
    fn validate(
        &self,
        matches: &[MatchRecord],
        slots: &[CourtSlot],
        locks: &[SlotLock],
    ) -> EngineResult<()> {
        if matches.is_empty() {
            return Err(EngineError::Validation(
                "比赛列表为空，无法执行排赛".to_string(),
            ));
        }
        if slots.is_empty() {
            return Err(EngineError::Validation(
                "时段列表为空，无法执行排赛".to_string(),
            ));
        }

        for m in matches {
            if m.duration_minutes <= 0 {
                return Err(EngineError::Validation(format!(
                    "场次 {} 的时长非法: {} 分钟",
                    m.match_id, m.duration_minutes
                )));
            }
        }

        let match_ids: HashSet<i64> = matches.iter().map(|m| m.match_id).collect();
        let slot_ids: HashSet<i64> = slots.iter().map(|s| s.slot_id).collect();
        for lock in locks {
            if !match_ids.contains(&lock.match_id) {
                return Err(EngineError::Validation(format!(
                    "锁定引用了不存在的场次: {}",
                    lock.match_id
                )));
            }
            if !slot_ids.contains(&lock.slot_id) {
                return Err(EngineError::Validation(format!(
                    "锁定引用了不存在的时段: {}",
                    lock.slot_id
                )));
            }
        }

        Ok(())
    }

    /// 在排好序的时段里找第一个相容的空闲时段
    fn find_first_fit<'a>(
        &self,
        m: &MatchRecord,
        ordered_slots: &[&'a CourtSlot],
        consumed: &HashSet<i64>,
        team_intervals: &HashMap<i64, Vec<TeamInterval>>,
        options: &AssignOptions,
        day_filter: Option<u8>,
    ) -> Option<&'a CourtSlot> {
        for slot in ordered_slots {
            if consumed.contains(&slot.slot_id) {
                continue;
            }
            if let Some(day) = day_filter {
                if slot.weekday_index() != day {
                    continue;
                }
            }
            if !slot.fits_duration(m.duration_minutes) {
                continue;
            }
            if options.enforce_rest && !self.rest_compatible(m, slot, team_intervals) {
                continue;
            }
            return Some(slot);
        }
        None
    }

    /// 休息规则检查: 候选区间对每支已知队伍既不得重叠其已有区间，
    /// 两侧间隔也必须满足阶段转换的最小休息
    fn rest_compatible(
        &self,
        m: &MatchRecord,
        slot: &CourtSlot,
        team_intervals: &HashMap<i64, Vec<TeamInterval>>,
    ) -> bool {
        let (cand_start, cand_end) = slot.occupied_interval(m.duration_minutes);

        for team_id in m.known_team_ids() {
            let Some(intervals) = team_intervals.get(&team_id) else {
                continue;
            };
            for iv in intervals {
                // 零重叠永远强制
                if cand_start < iv.end && iv.start < cand_end {
                    return false;
                }
                if cand_start >= iv.end {
                    // 候选在已有区间之后: 按 旧阶段→新阶段 取最小休息
                    let gap = (cand_start - iv.end).num_minutes();
                    if gap < self.policy.required_rest_minutes(iv.stage, m.stage) {
                        return false;
                    }
                } else {
                    // 候选在已有区间之前
                    let gap = (iv.start - cand_end).num_minutes();
                    if gap < self.policy.required_rest_minutes(m.stage, iv.stage) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// 记录一次落位对双方队伍的区间占用
fn record_team_intervals(
    team_intervals: &mut HashMap<i64, Vec<TeamInterval>>,
    m: &MatchRecord,
    slot: &CourtSlot,
) {
    let (start, end) = slot.occupied_interval(m.duration_minutes);
    for team_id in m.known_team_ids() {
        team_intervals.entry(team_id).or_default().push(TeamInterval {
            start,
            end,
            stage: m.stage,
        });
    }
}

/// 未落位原因的确定性分类
///
/// SLOTS_EXHAUSTED: 空闲时段为零
/// DURATION_TOO_LONG: 有空闲时段但容量均不足
/// NO_COMPATIBLE_SLOT: 容量满足但休息/偏好约束全部拦截
fn classify_failure(
    m: &MatchRecord,
    ordered_slots: &[&CourtSlot],
    consumed: &HashSet<i64>,
) -> (UnassignedReason, String) {
    let free: Vec<&&CourtSlot> = ordered_slots
        .iter()
        .filter(|s| !consumed.contains(&s.slot_id))
        .collect();

    if free.is_empty() {
        return (
            UnassignedReason::SlotsExhausted,
            "空闲时段已全部占用".to_string(),
        );
    }
    if !free.iter().any(|s| s.fits_duration(m.duration_minutes)) {
        return (
            UnassignedReason::DurationTooLong,
            format!(
                "{} 个空闲时段容量均小于所需时长 {} 分钟",
                free.len(),
                m.duration_minutes
            ),
        );
    }
    (
        UnassignedReason::NoCompatibleSlot,
        "存在容量足够的空闲时段，但休息约束均不满足".to_string(),
    )
}

/// 上游依赖是否已满足: 任一来源场次已完赛且有胜者
fn has_satisfied_dependency(m: &MatchRecord, match_by_id: &HashMap<i64, &MatchRecord>) -> bool {
    let satisfied = |id: Option<i64>| {
        id.and_then(|i| match_by_id.get(&i))
            .map(|src| src.is_decided())
            .unwrap_or(false)
    };
    satisfied(m.source_match_a_id) || satisfied(m.source_match_b_id)
}
