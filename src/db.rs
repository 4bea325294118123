// ==========================================
// 拍类赛事排赛系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 内嵌 schema DDL，供二进制工具与集成测试共用
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema (幂等)
///
/// 唯一约束与引擎不变量对齐：
/// - slot_assignment / slot_lock 在 (version, match) 与 (version, slot) 上各自唯一
/// - court_slot 在 (version, day, time, court) 上唯一
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schedule_version (
            version_id    TEXT PRIMARY KEY,
            tournament_id TEXT NOT NULL,
            version_no    INTEGER NOT NULL,
            status        TEXT NOT NULL DEFAULT 'DRAFT',
            created_by    TEXT,
            created_at    TEXT NOT NULL,
            UNIQUE(tournament_id, version_no)
        );

        CREATE TABLE IF NOT EXISTS team (
            team_id     INTEGER PRIMARY KEY,
            team_name   TEXT NOT NULL,
            avoid_group TEXT
        );

        CREATE TABLE IF NOT EXISTS tournament_match (
            match_id          INTEGER PRIMARY KEY,
            version_id        TEXT NOT NULL REFERENCES schedule_version(version_id),
            event_id          TEXT NOT NULL,
            stage             TEXT NOT NULL,
            round_index       INTEGER NOT NULL,
            sequence_in_round INTEGER NOT NULL,
            duration_minutes  INTEGER NOT NULL,
            team_a_id         INTEGER,
            team_b_id         INTEGER,
            preferred_day     INTEGER,
            source_match_a_id INTEGER,
            source_a_role     TEXT,
            source_match_b_id INTEGER,
            source_b_role     TEXT,
            runtime_status    TEXT NOT NULL DEFAULT 'SCHEDULED',
            winner_team_id    INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_match_version ON tournament_match(version_id);

        CREATE TABLE IF NOT EXISTS court_slot (
            slot_id       INTEGER PRIMARY KEY,
            version_id    TEXT NOT NULL REFERENCES schedule_version(version_id),
            day_date      TEXT NOT NULL,
            start_time    TEXT NOT NULL,
            end_time      TEXT NOT NULL,
            court_label   TEXT NOT NULL,
            block_minutes INTEGER NOT NULL,
            is_active     INTEGER NOT NULL DEFAULT 1,
            UNIQUE(version_id, day_date, start_time, court_label)
        );
        CREATE INDEX IF NOT EXISTS idx_slot_version ON court_slot(version_id);

        CREATE TABLE IF NOT EXISTS slot_lock (
            version_id TEXT NOT NULL REFERENCES schedule_version(version_id),
            match_id   INTEGER NOT NULL,
            slot_id    INTEGER NOT NULL,
            created_by TEXT,
            created_at TEXT NOT NULL,
            PRIMARY KEY (version_id, match_id),
            UNIQUE (version_id, slot_id)
        );

        CREATE TABLE IF NOT EXISTS slot_assignment (
            version_id  TEXT NOT NULL REFERENCES schedule_version(version_id),
            match_id    INTEGER NOT NULL,
            slot_id     INTEGER NOT NULL,
            source_type TEXT NOT NULL DEFAULT 'CALC',
            created_at  TEXT NOT NULL,
            PRIMARY KEY (version_id, match_id),
            UNIQUE (version_id, slot_id)
        );
        "#,
    )
}
