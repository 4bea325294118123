// ==========================================
// 拍类赛事排赛系统 - API 层
// ==========================================
// 职责: 对外业务接口，编排 仓储读 → 引擎算 → 事务写
// ==========================================

pub mod error;
pub mod schedule_api;

pub use error::{ApiError, ApiResult};
pub use schedule_api::{AssignmentRunResult, ScheduleApi};
