// ==========================================
// 拍类赛事排赛系统 - API层错误类型
// ==========================================
// 职责: 聚合仓储/引擎错误，补充接口级校验错误
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
