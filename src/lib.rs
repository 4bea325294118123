// ==========================================
// 拍类赛事排赛系统 - 核心库
// ==========================================
// 依据: Schedule_Engine_Specs_v1.0.md
// 技术栈: Rust + SQLite
// 系统定位: 多日拍类赛事的确定性排赛/审计/晋级引擎
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 排赛策略
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/schema 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AssignmentSourceType, OrderingViolationKind, RuntimeStatus, SourceRole, Stage, TeamSide,
    UnassignedReason, VersionStatus,
};

// 领域实体
pub use domain::{CourtSlot, MatchRecord, ScheduleVersion, SlotAssignment, SlotLock, Team};

// 配置
pub use config::SchedulePolicy;

// 引擎
pub use engine::{
    AdvancementPropagator, AdvancementSummary, AssignOptions, AssignmentOutcome, EngineError,
    ScheduleAuditReport, ScheduleAuditor, SlotAssigner, UnassignedMatch,
};

// API
pub use api::{ApiError, AssignmentRunResult, ScheduleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "拍类赛事排赛系统";

// ==========================================
// 预编译检查
// ==========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
