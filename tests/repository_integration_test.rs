// ==========================================
// 仓储层集成测试
// ==========================================
// 测试目标: 真实 SQLite 上的读写往返与约束行为
// 覆盖范围: 版本号分配、枚举解析红线、唯一约束、整体替换、幂等更新守卫
// ==========================================

mod helpers;

use chrono::Utc;
use helpers::test_data_builder::*;
use helpers::{create_test_conn, seed_version};
use tournament_aps::domain::schedule::ScheduleVersion;
use tournament_aps::domain::team::Team;
use tournament_aps::domain::types::{
    RuntimeStatus, SourceRole, Stage, TeamSide, VersionStatus,
};
use tournament_aps::repository::error::RepositoryError;
use tournament_aps::repository::{
    MatchRepository, ScheduleVersionRepository, SlotAssignmentRepository, SlotLockRepository,
    SlotRepository, TeamRepository, TeamSlotUpdate,
};
use uuid::Uuid;

fn new_version(tournament_id: &str) -> ScheduleVersion {
    ScheduleVersion {
        version_id: Uuid::new_v4().to_string(),
        tournament_id: tournament_id.to_string(),
        version_no: 0,
        status: VersionStatus::Draft,
        created_by: Some("tester".to_string()),
        created_at: Utc::now().naive_utc(),
    }
}

// ==========================================
// 版本仓储
// ==========================================

#[test]
fn test_version_no_auto_increment_per_tournament() {
    let (_tmp, conn) = create_test_conn();
    let repo = ScheduleVersionRepository::new(conn);

    let mut v1 = new_version("T1");
    let mut v2 = new_version("T1");
    let mut other = new_version("T2");
    repo.create_with_next_version_no(&mut v1).unwrap();
    repo.create_with_next_version_no(&mut v2).unwrap();
    repo.create_with_next_version_no(&mut other).unwrap();

    assert_eq!(v1.version_no, 1);
    assert_eq!(v2.version_no, 2);
    assert_eq!(other.version_no, 1, "版本号按赛事独立递增");

    let found = repo.find_by_id(&v1.version_id).unwrap().unwrap();
    assert_eq!(found.tournament_id, "T1");
    assert_eq!(found.status, VersionStatus::Draft);
}

#[test]
fn test_activate_archives_previous_active() {
    let (_tmp, conn) = create_test_conn();
    let repo = ScheduleVersionRepository::new(conn);

    let mut v1 = new_version("T1");
    let mut v2 = new_version("T1");
    repo.create_with_next_version_no(&mut v1).unwrap();
    repo.create_with_next_version_no(&mut v2).unwrap();

    repo.activate(&v1.version_id).unwrap();
    repo.activate(&v2.version_id).unwrap();

    let first = repo.find_by_id(&v1.version_id).unwrap().unwrap();
    let second = repo.find_by_id(&v2.version_id).unwrap().unwrap();
    assert_eq!(first.status, VersionStatus::Archived, "旧激活版本自动归档");
    assert_eq!(second.status, VersionStatus::Active);
}

#[test]
fn test_unknown_version_status_is_rejected_not_defaulted() {
    let (_tmp, conn) = create_test_conn();

    {
        let guard = conn.lock().unwrap();
        guard
            .execute(
                "INSERT INTO schedule_version (version_id, tournament_id, version_no, status, created_at)
                 VALUES ('V001', 'T1', 1, 'PUBLISHED', datetime('now'))",
                [],
            )
            .unwrap();
    }

    let repo = ScheduleVersionRepository::new(conn);
    let err = repo.find_by_id("V001").unwrap_err();
    assert!(
        matches!(err, RepositoryError::ValidationError(_)),
        "未知版本状态必须显式报错, 实际: {:?}",
        err
    );
}

// ==========================================
// 场次仓储
// ==========================================

#[test]
fn test_match_roundtrip_with_enums_and_sources() {
    let (_tmp, conn) = create_test_conn();
    seed_version(&conn, "V001", "T1");
    let repo = MatchRepository::new(conn);

    let m = MatchBuilder::new(10)
        .stage(Stage::Consolation)
        .round(2)
        .sequence(3)
        .duration(90)
        .team_a(5)
        .preferred_day(1)
        .source_b(4)
        .build();
    repo.insert(&m).unwrap();

    let found = repo.find_by_id(10).unwrap().expect("应能查到场次");
    assert_eq!(found.stage, Stage::Consolation);
    assert_eq!(found.round_index, 2);
    assert_eq!(found.sequence_in_round, 3);
    assert_eq!(found.team_a_id, Some(5));
    assert_eq!(found.team_b_id, None);
    assert_eq!(found.preferred_day, Some(1));
    assert_eq!(found.source_match_b_id, Some(4));
    assert_eq!(found.source_b_role, Some(SourceRole::Winner));
    assert_eq!(found.runtime_status, RuntimeStatus::Scheduled);
}

#[test]
fn test_unknown_stage_value_is_rejected_not_defaulted() {
    let (_tmp, conn) = create_test_conn();
    seed_version(&conn, "V001", "T1");

    {
        let guard = conn.lock().unwrap();
        guard
            .execute(
                r#"INSERT INTO tournament_match (
                    match_id, version_id, event_id, stage, round_index,
                    sequence_in_round, duration_minutes, runtime_status
                ) VALUES (1, 'V001', 'MS', 'QUALIF', 0, 0, 60, 'SCHEDULED')"#,
                [],
            )
            .unwrap();
    }

    let repo = MatchRepository::new(conn);
    let err = repo.find_by_version("V001").unwrap_err();
    assert!(
        matches!(err, RepositoryError::ValidationError(_)),
        "未知阶段取值必须显式报错, 实际: {:?}",
        err
    );
}

#[test]
fn test_record_result_marks_final() {
    let (_tmp, conn) = create_test_conn();
    seed_version(&conn, "V001", "T1");
    let repo = MatchRepository::new(conn);

    repo.insert(&MatchBuilder::new(1).teams(7, 8).build()).unwrap();
    repo.record_result(1, 7).unwrap();

    let found = repo.find_by_id(1).unwrap().unwrap();
    assert_eq!(found.runtime_status, RuntimeStatus::Final);
    assert_eq!(found.winner_team_id, Some(7));

    assert!(matches!(
        repo.record_result(99, 7),
        Err(RepositoryError::NotFound { .. })
    ));
}

#[test]
fn test_apply_team_updates_guard_is_idempotent() {
    let (_tmp, conn) = create_test_conn();
    seed_version(&conn, "V001", "T1");
    let repo = MatchRepository::new(conn);

    repo.insert(&MatchBuilder::new(2).round(1).source_a(1).build())
        .unwrap();
    let updates = vec![TeamSlotUpdate {
        match_id: 2,
        side: TeamSide::A,
        team_id: 7,
    }];

    assert_eq!(repo.apply_team_updates(&updates).unwrap(), 1);
    // 目标侧已非空，守卫条件让第二次调用不产生写入
    assert_eq!(repo.apply_team_updates(&updates).unwrap(), 0);

    let found = repo.find_by_id(2).unwrap().unwrap();
    assert_eq!(found.team_a_id, Some(7));

    // 计划读与写入之间目标侧被并发改写: 跳过而非覆盖，以行数差感知
    let stale = vec![TeamSlotUpdate {
        match_id: 2,
        side: TeamSide::A,
        team_id: 9,
    }];
    assert_eq!(repo.apply_team_updates(&stale).unwrap(), 0);
    assert_eq!(repo.find_by_id(2).unwrap().unwrap().team_a_id, Some(7));
}

// ==========================================
// 时段与锁定仓储
// ==========================================

#[test]
fn test_slot_unique_constraint() {
    let (_tmp, conn) = create_test_conn();
    seed_version(&conn, "V001", "T1");
    let repo = SlotRepository::new(conn);

    repo.insert(&SlotBuilder::new(1).build()).unwrap();
    // 同版本同日同时刻同场地
    let err = repo.insert(&SlotBuilder::new(2).build()).unwrap_err();
    assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));

    // 换场地即可
    repo.insert(&SlotBuilder::new(3).court("C2").build()).unwrap();
    assert_eq!(repo.find_by_version("V001").unwrap().len(), 2);
}

#[test]
fn test_lock_unique_per_match_and_per_slot() {
    let (_tmp, conn) = create_test_conn();
    seed_version(&conn, "V001", "T1");
    let repo = SlotLockRepository::new(conn);

    repo.create(&build_lock("V001", 1, 1)).unwrap();

    let dup_match = repo.create(&build_lock("V001", 1, 2)).unwrap_err();
    assert!(matches!(
        dup_match,
        RepositoryError::UniqueConstraintViolation(_)
    ));

    let dup_slot = repo.create(&build_lock("V001", 2, 1)).unwrap_err();
    assert!(matches!(
        dup_slot,
        RepositoryError::UniqueConstraintViolation(_)
    ));

    assert_eq!(repo.find_by_version("V001").unwrap().len(), 1);
}

// ==========================================
// 落位仓储
// ==========================================

#[test]
fn test_replace_for_version_is_atomic_swap() {
    let (_tmp, conn) = create_test_conn();
    seed_version(&conn, "V001", "T1");
    let repo = SlotAssignmentRepository::new(conn);

    let first = vec![
        build_assignment("V001", 1, 1),
        build_assignment("V001", 2, 2),
    ];
    repo.replace_for_version("V001", &first).unwrap();
    assert_eq!(repo.find_by_version("V001").unwrap().len(), 2);

    let second = vec![build_assignment("V001", 3, 1)];
    repo.replace_for_version("V001", &second).unwrap();

    let remaining = repo.find_by_version("V001").unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].match_id, 3);

    assert_eq!(repo.delete_for_version("V001").unwrap(), 1);
    assert!(repo.find_by_version("V001").unwrap().is_empty());
}

#[test]
fn test_unknown_source_type_is_rejected_not_defaulted() {
    let (_tmp, conn) = create_test_conn();
    seed_version(&conn, "V001", "T1");

    {
        let guard = conn.lock().unwrap();
        guard
            .execute(
                "INSERT INTO slot_assignment (version_id, match_id, slot_id, source_type, created_at)
                 VALUES ('V001', 1, 1, 'MANUAL', datetime('now'))",
                [],
            )
            .unwrap();
    }

    let repo = SlotAssignmentRepository::new(conn);
    let err = repo.find_by_version("V001").unwrap_err();
    assert!(
        matches!(err, RepositoryError::ValidationError(_)),
        "未知落位来源必须显式报错, 实际: {:?}",
        err
    );
}

// ==========================================
// 队伍仓储
// ==========================================

#[test]
fn test_team_roundtrip() {
    let (_tmp, conn) = create_test_conn();
    let repo = TeamRepository::new(conn);

    repo.insert(&Team {
        team_id: 7,
        team_name: "青羽一队".to_string(),
        avoid_group: Some("G1".to_string()),
    })
    .unwrap();

    let found = repo.find_by_id(7).unwrap().unwrap();
    assert_eq!(found.team_name, "青羽一队");
    assert_eq!(found.avoid_group, Some("G1".to_string()));
    assert!(repo.find_by_id(99).unwrap().is_none());
    assert_eq!(repo.find_all().unwrap().len(), 1);
}
