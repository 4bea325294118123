// ==========================================
// 拍类赛事排赛系统 - 排赛引擎 API
// ==========================================
// 职责: 版本管理、落位运行、审计、晋级推进
// 红线: 读快照 → 引擎纯计算 → 单事务落库；
//       同版本的两次变更操作串行执行，不做增量交错合并
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::SchedulePolicy;
use crate::domain::schedule::ScheduleVersion;
use crate::domain::types::VersionStatus;
use crate::engine::advancement::{AdvancementPropagator, AdvancementSummary};
use crate::engine::auditor::{ScheduleAuditReport, ScheduleAuditor};
use crate::engine::slot_assigner::{AssignOptions, SlotAssigner, UnassignedMatch};
use crate::repository::{
    MatchRepository, ScheduleVersionRepository, SlotAssignmentRepository, SlotLockRepository,
    SlotRepository,
};

// ==========================================
// AssignmentRunResult - 落位运行结果 DTO
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRunResult {
    pub version_id: String,
    pub assigned_count: usize,
    pub unassigned: Vec<UnassignedMatch>,
    pub assignment_rate: f64,
}

// ==========================================
// ScheduleApi - 排赛引擎 API
// ==========================================

/// 排赛引擎对外接口
///
/// 职责：
/// 1. 版本管理（创建、激活、查询）
/// 2. 落位运行（整版本重推，单事务替换落位集）
/// 3. 赛程审计（只读）
/// 4. 晋级推进（单场与批量回填）
pub struct ScheduleApi {
    version_repo: Arc<ScheduleVersionRepository>,
    match_repo: Arc<MatchRepository>,
    slot_repo: Arc<SlotRepository>,
    lock_repo: Arc<SlotLockRepository>,
    assignment_repo: Arc<SlotAssignmentRepository>,
    assigner: SlotAssigner,
    auditor: ScheduleAuditor,
    propagator: AdvancementPropagator,
}

impl ScheduleApi {
    /// 创建新的ScheduleApi实例
    pub fn new(conn: Arc<Mutex<Connection>>, policy: SchedulePolicy) -> Self {
        Self {
            version_repo: Arc::new(ScheduleVersionRepository::new(conn.clone())),
            match_repo: Arc::new(MatchRepository::new(conn.clone())),
            slot_repo: Arc::new(SlotRepository::new(conn.clone())),
            lock_repo: Arc::new(SlotLockRepository::new(conn.clone())),
            assignment_repo: Arc::new(SlotAssignmentRepository::new(conn)),
            assigner: SlotAssigner::new(policy.clone()),
            auditor: ScheduleAuditor::new(policy),
            propagator: AdvancementPropagator::new(),
        }
    }

    // ==========================================
    // 版本管理
    // ==========================================

    /// 创建新版本 (自动分配版本号)
    pub fn create_version(
        &self,
        tournament_id: &str,
        created_by: Option<&str>,
    ) -> ApiResult<ScheduleVersion> {
        if tournament_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("赛事ID不能为空".to_string()));
        }

        let mut version = ScheduleVersion {
            version_id: Uuid::new_v4().to_string(),
            tournament_id: tournament_id.to_string(),
            version_no: 0,
            status: VersionStatus::Draft,
            created_by: created_by.map(|s| s.to_string()),
            created_at: Utc::now().naive_utc(),
        };
        self.version_repo.create_with_next_version_no(&mut version)?;

        info!(
            version_id = %version.version_id,
            version_no = version.version_no,
            "创建赛程版本"
        );
        Ok(version)
    }

    /// 激活版本 (同赛事其他激活版本自动归档)
    pub fn activate_version(&self, version_id: &str) -> ApiResult<()> {
        self.version_repo.activate(version_id)?;
        info!(version_id, "版本已激活");
        Ok(())
    }

    /// 查询赛事的全部版本
    pub fn list_versions(&self, tournament_id: &str) -> ApiResult<Vec<ScheduleVersion>> {
        Ok(self.version_repo.find_by_tournament_id(tournament_id)?)
    }

    // ==========================================
    // 落位运行
    // ==========================================

    /// 对一个版本执行完整落位
    ///
    /// 流程: 读版本快照 → 引擎纯计算 → 单事务整体替换落位集。
    /// 引擎校验失败时不产生任何写入。
    #[instrument(skip(self, options), fields(version_id))]
    pub fn run_assignment(
        &self,
        version_id: &str,
        options: &AssignOptions,
    ) -> ApiResult<AssignmentRunResult> {
        self.require_version(version_id)?;

        let matches = self.match_repo.find_by_version(version_id)?;
        let slots = self.slot_repo.find_by_version(version_id)?;
        let locks = self.lock_repo.find_by_version(version_id)?;
        let existing = if options.clear_existing {
            Vec::new()
        } else {
            self.assignment_repo.find_by_version(version_id)?
        };

        let outcome = self
            .assigner
            .assign(&matches, &slots, &locks, &existing, options)?;

        self.assignment_repo
            .replace_for_version(version_id, &outcome.assignments)?;

        let total = matches.len();
        let assignment_rate = if total == 0 {
            0.0
        } else {
            outcome.assignments.len() as f64 / total as f64 * 100.0
        };

        info!(
            version_id,
            assigned = outcome.assignments.len(),
            unassigned = outcome.unassigned.len(),
            "落位运行已提交"
        );
        Ok(AssignmentRunResult {
            version_id: version_id.to_string(),
            assigned_count: outcome.assignments.len(),
            unassigned: outcome.unassigned,
            assignment_rate,
        })
    }

    // ==========================================
    // 赛程审计
    // ==========================================

    /// 审计一个版本 (只读，可在编辑中途随时调用)
    pub fn audit_version(&self, version_id: &str) -> ApiResult<ScheduleAuditReport> {
        self.require_version(version_id)?;

        let matches = self.match_repo.find_by_version(version_id)?;
        let slots = self.slot_repo.find_by_version(version_id)?;
        let assignments = self.assignment_repo.find_by_version(version_id)?;

        Ok(self.auditor.audit(&matches, &slots, &assignments))
    }

    // ==========================================
    // 晋级推进
    // ==========================================

    /// 单场完赛后推进下游，返回实际更新的下游侧数
    ///
    /// 来源场次未完赛或无胜者时为空操作返回 0 (允许投机调用)。
    /// 幂等: 无状态变化的第二次调用返回 0。
    #[instrument(skip(self))]
    pub fn advance_from_match(&self, match_id: i64) -> ApiResult<usize> {
        let source = self
            .match_repo
            .find_by_id(match_id)?
            .ok_or_else(|| ApiError::NotFound(format!("场次不存在: {}", match_id)))?;

        if !source.is_decided() {
            return Ok(0);
        }

        let matches = self.match_repo.find_by_version(&source.version_id)?;
        let updates = self.propagator.plan_from_match(&matches, match_id)?;
        let applied = self.match_repo.apply_team_updates(&updates)?;

        if applied < updates.len() {
            warn!(
                match_id,
                planned = updates.len(),
                applied,
                "部分下游侧在计划与写入之间被并发改写，已跳过未覆盖"
            );
        }

        info!(match_id, applied, "晋级推进完成");
        Ok(applied)
    }

    /// 批量回填一个版本的全部晋级 (人工改数后的修复入口)
    #[instrument(skip(self), fields(version_id))]
    pub fn resolve_all(&self, version_id: &str) -> ApiResult<AdvancementSummary> {
        self.require_version(version_id)?;

        let matches = self.match_repo.find_by_version(version_id)?;
        let (updates, mut summary) = self.propagator.plan_resolve_all(&matches)?;
        let applied = self.match_repo.apply_team_updates(&updates)?;
        summary.teams_advanced = applied;

        if applied < updates.len() {
            warn!(
                version_id,
                planned = updates.len(),
                applied,
                "部分下游侧在计划与写入之间被并发改写，已跳过未覆盖"
            );
        }

        info!(
            version_id,
            processed = summary.processed,
            teams_advanced = summary.teams_advanced,
            "批量晋级回填完成"
        );
        Ok(summary)
    }

    // ==========================================
    // 内部方法
    // ==========================================

    fn require_version(&self, version_id: &str) -> ApiResult<()> {
        self.version_repo
            .find_by_id(version_id)?
            .ok_or_else(|| ApiError::NotFound(format!("赛程版本不存在: {}", version_id)))?;
        Ok(())
    }
}
