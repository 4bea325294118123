// ==========================================
// 拍类赛事排赛系统 - 领域层
// ==========================================
// 职责: 定义实体与类型安全的枚举，不含业务规则
// ==========================================

pub mod match_record;
pub mod schedule;
pub mod slot;
pub mod team;
pub mod types;

pub use match_record::MatchRecord;
pub use schedule::{ScheduleVersion, SlotAssignment, SlotLock};
pub use slot::CourtSlot;
pub use team::Team;
pub use types::{
    AssignmentSourceType, OrderingViolationKind, RuntimeStatus, SourceRole, Stage, TeamSide,
    UnassignedReason, VersionStatus,
};
