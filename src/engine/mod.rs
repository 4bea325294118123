// ==========================================
// 拍类赛事排赛系统 - 引擎层
// ==========================================
// 依据: Schedule_Engine_Specs_v1.0.md - 2. 组件拆分
// ==========================================
// 职责: 实现排赛/审计/晋级的业务规则，不拼 SQL
// 红线: 引擎基于版本快照纯计算，落库由 API 层在单事务内完成
// 红线: 所有未落位/未推进必须输出 reason
// ==========================================

pub mod advancement;
pub mod auditor;
pub mod error;
pub mod ordering;
pub mod slot_assigner;

// 重导出核心引擎
pub use advancement::{AdvancementPropagator, AdvancementSummary};
pub use auditor::{ScheduleAuditReport, ScheduleAuditor};
pub use error::{EngineError, EngineResult};
pub use slot_assigner::{AssignOptions, AssignmentOutcome, SlotAssigner, UnassignedMatch};
