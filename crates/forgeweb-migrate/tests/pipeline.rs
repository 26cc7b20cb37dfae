//! Pipeline tests: settings in, engine output out.

#![cfg(unix)]

use forgeweb_config::SettingsStore;
use forgeweb_migrate::{
    keys, pipeline, EngineOutcome, MigrationEngine, MigrationError, Subcommand, MIGRATIONS_DIR,
};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

struct App {
    root: TempDir,
    engine: MigrationEngine,
}

impl App {
    /// An application root whose engine records that it ran, echoes its
    /// arguments and exits with `exit_code`.
    fn new(exit_code: i32) -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join(MIGRATIONS_DIR)).unwrap();

        let script = root.path().join("fake-goose");
        let marker = root.path().join("engine-ran");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\ntouch '{}'\necho \"$1 $3\"\necho \"$2\" >&2\nexit {exit_code}\n",
                marker.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let engine = MigrationEngine::locate(script.to_str().unwrap(), root.path()).unwrap();
        Self { root, engine }
    }

    fn marker(&self) -> PathBuf {
        self.root.path().join("engine-ran")
    }
}

fn postgres_store() -> SettingsStore {
    SettingsStore::new("dev")
        .with_file_value(keys::DB, "postgres")
        .with_file_value(keys::USER, "bob")
        .with_file_value(keys::HOST, "localhost")
        .with_file_value(keys::DBNAME, "app_dev")
}

#[tokio::test]
async fn test_run_writes_engine_output() {
    let app = App::new(0);
    let mut store = postgres_store();
    let mut out = Vec::new();

    let outcome = pipeline::run(&mut store, &app.engine, Subcommand::Status, &mut out)
        .await
        .unwrap();

    assert_eq!(outcome, EngineOutcome::Completed);
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("postgres status"));
    assert!(out.contains("user=bob host=localhost port=5432 dbname=app_dev sslmode=require"));
}

#[tokio::test]
async fn test_defaults_persist_in_store() {
    let app = App::new(0);
    let mut store = SettingsStore::new("dev")
        .with_file_value(keys::DB, "mysql")
        .with_file_value(keys::USER, "bob")
        .with_file_value(keys::HOST, "db.internal")
        .with_file_value(keys::DBNAME, "app");
    let mut out = Vec::new();

    pipeline::run(&mut store, &app.engine, Subcommand::Up, &mut out)
        .await
        .unwrap();

    assert_eq!(store.get_int(keys::PORT).unwrap(), 3306);
    assert_eq!(store.get_string(keys::SSLMODE), "true");
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("bob@tcp(db.internal:3306)/app?tls=true"));
}

#[tokio::test]
async fn test_explicit_values_survive_defaulting() {
    let app = App::new(0);
    let mut store = postgres_store()
        .with_env_value(keys::PORT, "6543")
        .with_env_value(keys::SSLMODE, "disable");
    let mut out = Vec::new();

    pipeline::run(&mut store, &app.engine, Subcommand::Version, &mut out)
        .await
        .unwrap();

    assert!(String::from_utf8(out)
        .unwrap()
        .contains("port=6543 dbname=app_dev sslmode=disable"));
}

#[tokio::test]
async fn test_engine_failure_still_prints_output() {
    let app = App::new(1);
    let mut store = postgres_store();
    let mut out = Vec::new();

    let outcome = pipeline::run(&mut store, &app.engine, Subcommand::Redo, &mut out)
        .await
        .unwrap();

    assert!(outcome.is_fatal());
    assert!(String::from_utf8(out).unwrap().contains("postgres redo"));
}

#[tokio::test]
async fn test_invalid_settings_never_reach_engine() {
    let app = App::new(0);
    let mut store = SettingsStore::new("dev")
        .with_file_value(keys::DB, "postgres")
        .with_file_value(keys::USER, "bob")
        .with_file_value(keys::HOST, "localhost");
    let mut out = Vec::new();

    let err = pipeline::run(&mut store, &app.engine, Subcommand::Up, &mut out)
        .await
        .unwrap_err();

    match err {
        MigrationError::Validation(failure) => assert_eq!(failure.fields(), vec!["dbname"]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(out.is_empty());
    assert!(!app.marker().exists());
}

#[tokio::test]
async fn test_unknown_dialect_never_reaches_engine() {
    let app = App::new(0);
    let mut store = postgres_store();
    store.set(keys::DB, "sqlite");
    let mut out = Vec::new();

    let err = pipeline::run(&mut store, &app.engine, Subcommand::Up, &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, MigrationError::UnsupportedDialect(ref d) if d == "sqlite"));
    assert!(err.is_config_error());
    assert!(!app.marker().exists());
}
