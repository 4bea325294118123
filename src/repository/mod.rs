// ==========================================
// 拍类赛事排赛系统 - 数据仓储层
// ==========================================
// 职责: SQLite 数据访问，每个聚合一个仓储
// 红线: 仓储不含业务规则，引擎不拼 SQL
// ==========================================

pub mod assignment_repo;
pub mod error;
pub mod lock_repo;
pub mod match_repo;
pub mod slot_repo;
pub mod team_repo;
pub mod version_repo;

/// 枚举字段解析，未知取值在此转换为错误而不是静默兜底
pub(crate) fn parse_enum<T>(
    raw: &str,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    parse(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("未知的{}取值: {}", field, raw).into(),
        )
    })
}

pub use assignment_repo::SlotAssignmentRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use lock_repo::SlotLockRepository;
pub use match_repo::{MatchRepository, TeamSlotUpdate};
pub use slot_repo::SlotRepository;
pub use team_repo::TeamRepository;
pub use version_repo::ScheduleVersionRepository;
