// ==========================================
// 拍类赛事排赛系统 - 领域类型定义
// ==========================================
// 依据: Schedule_Engine_Specs_v1.0.md - 0.2 阶段体系与推进角色
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 比赛阶段 (Stage)
// ==========================================
// 红线: 阶段次序固定 WF < MAIN < CONSOLATION < PLACEMENT
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Wf,          // 瀑布轮 (种子定位轮)
    Main,        // 主赛
    Consolation, // 安慰赛
    Placement,   // 排位赛
}

impl Stage {
    /// 全部阶段，按固定次序枚举
    pub const ALL: [Stage; 4] = [Stage::Wf, Stage::Main, Stage::Consolation, Stage::Placement];

    /// 是否为计分阶段 (非瀑布轮)
    pub fn is_scoring(&self) -> bool {
        !matches!(self, Stage::Wf)
    }

    /// 从数据库字符串解析阶段
    ///
    /// 未知阶段返回 None，由仓储层转换为校验错误 (不静默兜底)
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "WF" => Some(Stage::Wf),
            "MAIN" => Some(Stage::Main),
            "CONSOLATION" => Some(Stage::Consolation),
            "PLACEMENT" => Some(Stage::Placement),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Stage::Wf => "WF",
            Stage::Main => "MAIN",
            Stage::Consolation => "CONSOLATION",
            Stage::Placement => "PLACEMENT",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 运行状态 (Runtime Status)
// ==========================================
// 比赛的实时状态，只有 FINAL 且有胜者才触发晋级推进
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuntimeStatus {
    Scheduled,  // 已编排
    InProgress, // 进行中
    Final,      // 已完赛
}

impl RuntimeStatus {
    /// 从数据库字符串解析状态
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SCHEDULED" => Some(RuntimeStatus::Scheduled),
            "IN_PROGRESS" => Some(RuntimeStatus::InProgress),
            "FINAL" => Some(RuntimeStatus::Final),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RuntimeStatus::Scheduled => "SCHEDULED",
            RuntimeStatus::InProgress => "IN_PROGRESS",
            RuntimeStatus::Final => "FINAL",
        }
    }
}

impl fmt::Display for RuntimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 来源角色 (Source Role)
// ==========================================
// 下游比赛声明其队伍来自上游比赛的哪个结果
// V1 仅支持 WINNER；其他角色在仓储解析边界直接报错
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceRole {
    Winner, // 胜者晋级
}

impl SourceRole {
    /// 从数据库字符串解析角色
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "WINNER" => Some(SourceRole::Winner),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SourceRole::Winner => "WINNER",
        }
    }
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 队伍侧 (Team Side)
// ==========================================
// 晋级写入下游比赛的哪一侧
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamSide {
    A,
    B,
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSide::A => write!(f, "A"),
            TeamSide::B => write!(f, "B"),
        }
    }
}

// ==========================================
// 版本状态 (Schedule Version Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionStatus {
    Draft,    // 草稿
    Active,   // 激活
    Archived, // 归档
}

impl VersionStatus {
    /// 从字符串解析状态，未知值返回 None (不静默兜底)
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Some(VersionStatus::Draft),
            "ACTIVE" => Some(VersionStatus::Active),
            "ARCHIVED" => Some(VersionStatus::Archived),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            VersionStatus::Draft => "DRAFT",
            VersionStatus::Active => "ACTIVE",
            VersionStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 落位来源 (Assignment Source Type)
// ==========================================
// CALC: 算法计算产生; LOCKED: 人工锁定原样保留
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentSourceType {
    Calc,
    Locked,
}

impl AssignmentSourceType {
    /// 从字符串解析，未知值返回 None (不静默兜底)
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CALC" => Some(AssignmentSourceType::Calc),
            "LOCKED" => Some(AssignmentSourceType::Locked),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AssignmentSourceType::Calc => "CALC",
            AssignmentSourceType::Locked => "LOCKED",
        }
    }
}

// ==========================================
// 未落位原因 (Unassigned Reason)
// ==========================================
// 红线: 所有未落位必须输出 reason，不允许静默丢弃
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnassignedReason {
    NullTeam,         // 双侧队伍未知且无已满足的上游依赖
    SlotsExhausted,   // 空闲时段已耗尽
    DurationTooLong,  // 有空闲时段但容量均不足
    NoCompatibleSlot, // 容量满足但休息/日期约束全部不通过
}

impl fmt::Display for UnassignedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnassignedReason::NullTeam => write!(f, "NULL_TEAM"),
            UnassignedReason::SlotsExhausted => write!(f, "SLOTS_EXHAUSTED"),
            UnassignedReason::DurationTooLong => write!(f, "DURATION_TOO_LONG"),
            UnassignedReason::NoCompatibleSlot => write!(f, "NO_COMPATIBLE_SLOT"),
        }
    }
}

// ==========================================
// 次序违规类型 (Ordering Violation Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderingViolationKind {
    StageOrderInversion, // 不同阶段，时间次序与阶段次序相反
    RoundOrderInversion, // 同阶段，时间次序与轮次次序相反
    OrderingViolation,   // 其余次序倒置
}

impl fmt::Display for OrderingViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderingViolationKind::StageOrderInversion => write!(f, "STAGE_ORDER_INVERSION"),
            OrderingViolationKind::RoundOrderInversion => write!(f, "ROUND_ORDER_INVERSION"),
            OrderingViolationKind::OrderingViolation => write!(f, "ORDERING_VIOLATION"),
        }
    }
}
