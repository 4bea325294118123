// ==========================================
// 排赛全流程 E2E 测试
// ==========================================
// 测试范围: 建版本 → 录入数据 → 落位 → 审计 → 完赛 → 晋级推进 → 激活
// ==========================================

mod helpers;

use helpers::test_data_builder::*;
use helpers::create_test_conn;
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tournament_aps::api::ApiError;
use tournament_aps::config::SchedulePolicy;
use tournament_aps::domain::types::{OrderingViolationKind, Stage, VersionStatus};
use tournament_aps::engine::AssignOptions;
use tournament_aps::repository::{MatchRepository, SlotLockRepository, SlotRepository};
use tournament_aps::ScheduleApi;

// ==========================================
// 测试辅助函数
// ==========================================

struct TestContext {
    _tmp: tempfile::NamedTempFile,
    conn: Arc<Mutex<Connection>>,
    api: ScheduleApi,
}

fn setup() -> TestContext {
    let (tmp, conn) = create_test_conn();
    let api = ScheduleApi::new(conn.clone(), SchedulePolicy::default());
    TestContext {
        _tmp: tmp,
        conn,
        api,
    }
}

/// 录入一个小型单打项目: WF 一场 + 正赛首轮两场 + 依赖两者胜者的次轮一场
fn seed_bracket(ctx: &TestContext, version_id: &str) {
    let match_repo = MatchRepository::new(ctx.conn.clone());
    let slot_repo = SlotRepository::new(ctx.conn.clone());

    let matches = vec![
        MatchBuilder::new(1).version(version_id).stage(Stage::Wf).teams(1, 2).build(),
        MatchBuilder::new(2).version(version_id).stage(Stage::Main).teams(3, 4).build(),
        MatchBuilder::new(3)
            .version(version_id)
            .stage(Stage::Main)
            .sequence(1)
            .teams(5, 6)
            .build(),
        MatchBuilder::new(4)
            .version(version_id)
            .stage(Stage::Main)
            .round(1)
            .source_a(2)
            .source_b(3)
            .build(),
    ];
    for m in &matches {
        match_repo.insert(m).unwrap();
    }

    let slots = vec![
        SlotBuilder::new(1).version(version_id).start("09:00:00").build(),
        SlotBuilder::new(2).version(version_id).start("10:30:00").build(),
        SlotBuilder::new(3).version(version_id).start("12:00:00").build(),
        SlotBuilder::new(4).version(version_id).start("14:00:00").build(),
    ];
    for s in &slots {
        slot_repo.insert(s).unwrap();
    }
}

// ==========================================
// 主流程
// ==========================================

#[test]
fn test_full_scheduling_flow() {
    let ctx = setup();

    // 1. 建版本
    let version = ctx.api.create_version("T1", Some("tester")).unwrap();
    assert_eq!(version.version_no, 1);
    seed_bracket(&ctx, &version.version_id);

    // 2. 落位
    let run = ctx
        .api
        .run_assignment(&version.version_id, &AssignOptions::default())
        .unwrap();
    assert_eq!(run.assigned_count, 4);
    assert!(run.unassigned.is_empty());
    assert!((run.assignment_rate - 100.0).abs() < 1e-9);

    // 3. 审计: 无违规，占位场次单独计数
    let report = ctx.api.audit_version(&version.version_id).unwrap();
    assert_eq!(report.summary.assigned_count, 4);
    assert!(report.ordering_violations.is_empty());
    assert!(report.team_conflicts.is_empty());
    assert_eq!(report.unknown_team_match_count, 1);
    assert!(report.data_faults.is_empty());

    // WF 时间线早于正赛
    let timeline: HashMap<Stage, _> = report
        .stage_timelines
        .iter()
        .map(|t| (t.stage, t.earliest_start))
        .collect();
    assert!(timeline[&Stage::Wf] < timeline[&Stage::Main]);

    // 4. 完赛与单场推进
    let match_repo = MatchRepository::new(ctx.conn.clone());
    match_repo.record_result(2, 3).unwrap();
    assert_eq!(ctx.api.advance_from_match(2).unwrap(), 1);
    assert_eq!(ctx.api.advance_from_match(2).unwrap(), 0, "重复推进应为空操作");

    // 5. 批量回填剩余晋级
    match_repo.record_result(3, 5).unwrap();
    let summary = ctx.api.resolve_all(&version.version_id).unwrap();
    assert_eq!(summary.teams_advanced, 1);
    assert_eq!(summary.unknown_team_after, 0);

    let decided = match_repo.find_by_id(4).unwrap().unwrap();
    assert_eq!(decided.team_a_id, Some(3));
    assert_eq!(decided.team_b_id, Some(5));

    // 6. 激活版本
    ctx.api.activate_version(&version.version_id).unwrap();
    let versions = ctx.api.list_versions("T1").unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].status, VersionStatus::Active);
}

// ==========================================
// 重推确定性
// ==========================================

#[test]
fn test_rerun_produces_identical_mapping() {
    let ctx = setup();
    let version = ctx.api.create_version("T1", None).unwrap();
    seed_bracket(&ctx, &version.version_id);

    ctx.api
        .run_assignment(&version.version_id, &AssignOptions::default())
        .unwrap();
    let first: HashMap<i64, i64> = read_assignment_map(&ctx, &version.version_id);

    ctx.api
        .run_assignment(&version.version_id, &AssignOptions::default())
        .unwrap();
    let second = read_assignment_map(&ctx, &version.version_id);

    assert_eq!(first, second, "同一快照整版本重推必须产生相同映射");
}

fn read_assignment_map(ctx: &TestContext, version_id: &str) -> HashMap<i64, i64> {
    let guard = ctx.conn.lock().unwrap();
    let mut stmt = guard
        .prepare("SELECT match_id, slot_id FROM slot_assignment WHERE version_id = ?")
        .unwrap();
    let rows = stmt
        .query_map([version_id], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap();
    rows.collect::<Result<HashMap<i64, i64>, _>>().unwrap()
}

// ==========================================
// 锁定引发的顺序违规要被审计捕获
// ==========================================

#[test]
fn test_audit_flags_inversion_caused_by_lock() {
    let ctx = setup();
    let version = ctx.api.create_version("T1", None).unwrap();

    let match_repo = MatchRepository::new(ctx.conn.clone());
    let slot_repo = SlotRepository::new(ctx.conn.clone());
    let lock_repo = SlotLockRepository::new(ctx.conn.clone());

    match_repo
        .insert(&MatchBuilder::new(1).version(&version.version_id).stage(Stage::Wf).teams(1, 2).build())
        .unwrap();
    match_repo
        .insert(&MatchBuilder::new(2).version(&version.version_id).stage(Stage::Main).teams(3, 4).build())
        .unwrap();
    slot_repo
        .insert(&SlotBuilder::new(1).version(&version.version_id).start("09:00:00").build())
        .unwrap();
    slot_repo
        .insert(&SlotBuilder::new(2).version(&version.version_id).start("10:30:00").build())
        .unwrap();
    // 人工把正赛锁到最早时段，WF 只能落在其后
    lock_repo
        .create(&build_lock(&version.version_id, 2, 1))
        .unwrap();

    let run = ctx
        .api
        .run_assignment(&version.version_id, &AssignOptions::default())
        .unwrap();
    assert_eq!(run.assigned_count, 2);

    let report = ctx.api.audit_version(&version.version_id).unwrap();
    assert_eq!(report.ordering_violations.len(), 1);
    assert_eq!(
        report.ordering_violations[0].kind,
        OrderingViolationKind::StageOrderInversion
    );
}

// ==========================================
// 缺失版本
// ==========================================

#[test]
fn test_unknown_version_is_not_found() {
    let ctx = setup();

    assert!(matches!(
        ctx.api.run_assignment("nope", &AssignOptions::default()),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        ctx.api.audit_version("nope"),
        Err(ApiError::NotFound(_))
    ));
}
