// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{NaiveDate, NaiveTime, Utc};
use tournament_aps::domain::match_record::MatchRecord;
use tournament_aps::domain::schedule::{SlotAssignment, SlotLock};
use tournament_aps::domain::slot::CourtSlot;
use tournament_aps::domain::types::{
    AssignmentSourceType, RuntimeStatus, SourceRole, Stage,
};

// ==========================================
// MatchRecord 构建器
// ==========================================

pub struct MatchBuilder {
    match_id: i64,
    version_id: String,
    event_id: String,
    stage: Stage,
    round_index: i32,
    sequence_in_round: i32,
    duration_minutes: i32,
    team_a_id: Option<i64>,
    team_b_id: Option<i64>,
    preferred_day: Option<u8>,
    source_match_a_id: Option<i64>,
    source_match_b_id: Option<i64>,
    runtime_status: RuntimeStatus,
    winner_team_id: Option<i64>,
}

impl MatchBuilder {
    pub fn new(match_id: i64) -> Self {
        Self {
            match_id,
            version_id: "V001".to_string(),
            event_id: "MS".to_string(),
            stage: Stage::Main,
            round_index: 0,
            sequence_in_round: 0,
            duration_minutes: 60,
            team_a_id: None,
            team_b_id: None,
            preferred_day: None,
            source_match_a_id: None,
            source_match_b_id: None,
            runtime_status: RuntimeStatus::Scheduled,
            winner_team_id: None,
        }
    }

    pub fn version(mut self, version_id: &str) -> Self {
        self.version_id = version_id.to_string();
        self
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    pub fn round(mut self, round_index: i32) -> Self {
        self.round_index = round_index;
        self
    }

    pub fn sequence(mut self, sequence_in_round: i32) -> Self {
        self.sequence_in_round = sequence_in_round;
        self
    }

    pub fn duration(mut self, minutes: i32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn teams(mut self, team_a: i64, team_b: i64) -> Self {
        self.team_a_id = Some(team_a);
        self.team_b_id = Some(team_b);
        self
    }

    pub fn team_a(mut self, team_id: i64) -> Self {
        self.team_a_id = Some(team_id);
        self
    }

    pub fn team_b(mut self, team_id: i64) -> Self {
        self.team_b_id = Some(team_id);
        self
    }

    pub fn preferred_day(mut self, day_index: u8) -> Self {
        self.preferred_day = Some(day_index);
        self
    }

    pub fn source_a(mut self, source_match_id: i64) -> Self {
        self.source_match_a_id = Some(source_match_id);
        self
    }

    pub fn source_b(mut self, source_match_id: i64) -> Self {
        self.source_match_b_id = Some(source_match_id);
        self
    }

    pub fn status(mut self, status: RuntimeStatus) -> Self {
        self.runtime_status = status;
        self
    }

    pub fn winner(mut self, team_id: i64) -> Self {
        self.runtime_status = RuntimeStatus::Final;
        self.winner_team_id = Some(team_id);
        self
    }

    pub fn build(self) -> MatchRecord {
        MatchRecord {
            match_id: self.match_id,
            version_id: self.version_id,
            event_id: self.event_id,
            stage: self.stage,
            round_index: self.round_index,
            sequence_in_round: self.sequence_in_round,
            duration_minutes: self.duration_minutes,
            team_a_id: self.team_a_id,
            team_b_id: self.team_b_id,
            preferred_day: self.preferred_day,
            source_match_a_id: self.source_match_a_id,
            source_a_role: self.source_match_a_id.map(|_| SourceRole::Winner),
            source_match_b_id: self.source_match_b_id,
            source_b_role: self.source_match_b_id.map(|_| SourceRole::Winner),
            runtime_status: self.runtime_status,
            winner_team_id: self.winner_team_id,
        }
    }
}

// ==========================================
// CourtSlot 构建器
// ==========================================

pub struct SlotBuilder {
    slot_id: i64,
    version_id: String,
    day_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    court_label: String,
    block_minutes: i32,
    is_active: bool,
}

impl SlotBuilder {
    pub fn new(slot_id: i64) -> Self {
        Self {
            slot_id,
            version_id: "V001".to_string(),
            day_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            court_label: "C1".to_string(),
            block_minutes: 60,
            is_active: true,
        }
    }

    pub fn version(mut self, version_id: &str) -> Self {
        self.version_id = version_id.to_string();
        self
    }

    pub fn day(mut self, date: &str) -> Self {
        self.day_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        self
    }

    pub fn start(mut self, time: &str) -> Self {
        self.start_time = NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap();
        self
    }

    pub fn court(mut self, label: &str) -> Self {
        self.court_label = label.to_string();
        self
    }

    pub fn block(mut self, minutes: i32) -> Self {
        self.block_minutes = minutes;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn build(self) -> CourtSlot {
        CourtSlot {
            slot_id: self.slot_id,
            version_id: self.version_id,
            day_date: self.day_date,
            start_time: self.start_time,
            end_time: self.end_time,
            court_label: self.court_label,
            block_minutes: self.block_minutes,
            is_active: self.is_active,
        }
    }
}

// ==========================================
// 锁定与预置结果构建函数
// ==========================================

/// 创建一条槽位锁定记录
pub fn build_lock(version_id: &str, match_id: i64, slot_id: i64) -> SlotLock {
    SlotLock {
        version_id: version_id.to_string(),
        match_id,
        slot_id,
        created_by: Some("tester".to_string()),
        created_at: Utc::now().naive_utc(),
    }
}

/// 创建一条既有落位记录 (增量模式的固定占位)
pub fn build_assignment(version_id: &str, match_id: i64, slot_id: i64) -> SlotAssignment {
    SlotAssignment {
        version_id: version_id.to_string(),
        match_id,
        slot_id,
        source_type: AssignmentSourceType::Calc,
        created_at: Utc::now().naive_utc(),
    }
}
