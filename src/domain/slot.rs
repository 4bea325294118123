// ==========================================
// 拍类赛事排赛系统 - 场地时段领域模型
// ==========================================
// 依据: Schedule_Engine_Specs_v1.0.md - slot 实体
// 红线: 时段由上游生成后不可变，引擎只读
// ==========================================

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// CourtSlot - 场地时段
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtSlot {
    pub slot_id: i64,           // 时段ID
    pub version_id: String,     // 关联赛程版本
    pub day_date: NaiveDate,    // 比赛日
    pub start_time: NaiveTime,  // 开始时间
    pub end_time: NaiveTime,    // 结束时间
    pub court_label: String,    // 场地标签 (如 "C1")
    pub block_minutes: i32,     // 容量 (分钟)
    pub is_active: bool,        // 是否启用
}

impl CourtSlot {
    /// 时段起点 (日期 + 开始时间)
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.day_date.and_time(self.start_time)
    }

    /// 时段所在星期 (0=周一..6=周日)
    pub fn weekday_index(&self) -> u8 {
        self.day_date.weekday().num_days_from_monday() as u8
    }

    /// 该时段承载指定时长比赛时占用的时间区间 [start, start+duration)
    pub fn occupied_interval(&self, duration_minutes: i32) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.start_datetime();
        (start, start + chrono::Duration::minutes(duration_minutes as i64))
    }

    /// 容量是否满足指定时长
    pub fn fits_duration(&self, duration_minutes: i32) -> bool {
        self.block_minutes >= duration_minutes
    }
}
