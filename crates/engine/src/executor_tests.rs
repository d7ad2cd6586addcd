// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tasse_taskdef::DefinitionError;

fn host_env() -> ExecutionEnvironment {
    ExecutionEnvironment {
        kind: EnvKind::Host,
        vars: HashMap::new(),
        venv_dir: None,
    }
}

fn entrypoint(file: &str, kind: EntrypointKind) -> Entrypoint {
    Entrypoint {
        file: file.to_string(),
        kind,
    }
}

#[test]
fn python_on_host_uses_bare_interpreter() {
    let spec = build_command(&entrypoint("task.py", EntrypointKind::Python), &host_env());
    assert_eq!(spec, CommandSpec::new("python", ["task.py"]));
}

#[test]
fn python_in_venv_uses_the_venv_interpreter() {
    let env = ExecutionEnvironment {
        kind: EnvKind::IsolatedInterpreter,
        vars: HashMap::new(),
        venv_dir: Some("/data/venvs/demo".into()),
    };
    let spec = build_command(&entrypoint("task.py", EntrypointKind::Python), &env);
    assert_eq!(
        spec,
        CommandSpec::new("/data/venvs/demo/bin/python", ["task.py"])
    );
}

#[test]
fn python_under_poetry_uses_the_run_wrapper() {
    let env = ExecutionEnvironment {
        kind: EnvKind::ManagedDependency,
        vars: HashMap::new(),
        venv_dir: None,
    };
    let spec = build_command(&entrypoint("task.py", EntrypointKind::Python), &env);
    assert_eq!(spec, CommandSpec::new("poetry", ["run", "python", "task.py"]));
}

#[yare::parameterized(
    host    = { EnvKind::Host },
    venv    = { EnvKind::IsolatedInterpreter },
    poetry  = { EnvKind::ManagedDependency },
)]
fn shell_scripts_always_trace_through_bash(kind: EnvKind) {
    let env = ExecutionEnvironment {
        kind,
        vars: HashMap::new(),
        venv_dir: None,
    };
    let spec = build_command(&entrypoint("task.sh", EntrypointKind::Shell), &env);
    assert_eq!(spec, CommandSpec::new("bash", ["-x", "task.sh"]));
}

fn write_task(tasks_dir: &Path, name: &str, script: &str) {
    let dir = tasks_dir.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("task.sh"), script).unwrap();
}

fn executor(tasks: &Path, venvs: &Path, logs: &Path) -> (TaskExecutor, Arc<SinkRegistry>) {
    let sinks = Arc::new(SinkRegistry::new(logs));
    (
        TaskExecutor::new(tasks, venvs, Arc::clone(&sinks)),
        sinks,
    )
}

#[tokio::test]
async fn run_streams_output_and_brackets_the_log() {
    let tasks = tempfile::tempdir().unwrap();
    let venvs = tempfile::tempdir().unwrap();
    let logs = tempfile::tempdir().unwrap();
    write_task(tasks.path(), "hello", "echo hello from task\n");
    let (executor, sinks) = executor(tasks.path(), venvs.path(), logs.path());

    let code = executor
        .run("hello", &Metadata::new(json!({})))
        .await
        .unwrap();

    assert_eq!(code, 0);
    let log = fs::read_to_string(sinks.ensure("hello").path()).unwrap();
    assert!(log.contains(">>> Task hello/task.sh"));
    assert!(log.contains("hello from task"));
    assert!(log.contains("<<< Task hello/task.sh ended with status code 0"));
}

#[tokio::test]
async fn non_zero_exit_is_returned_not_raised() {
    let tasks = tempfile::tempdir().unwrap();
    let venvs = tempfile::tempdir().unwrap();
    let logs = tempfile::tempdir().unwrap();
    write_task(tasks.path(), "flaky", "exit 7\n");
    let (executor, sinks) = executor(tasks.path(), venvs.path(), logs.path());

    let code = executor
        .run("flaky", &Metadata::new(json!({})))
        .await
        .unwrap();

    assert_eq!(code, 7);
    let log = fs::read_to_string(sinks.ensure("flaky").path()).unwrap();
    assert!(log.contains("ended with status code 7"));
}

#[tokio::test]
async fn explicit_entrypoint_from_metadata_wins() {
    let tasks = tempfile::tempdir().unwrap();
    let venvs = tempfile::tempdir().unwrap();
    let logs = tempfile::tempdir().unwrap();
    let dir = tasks.path().join("picky");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("task.sh"), "echo wrong one\n").unwrap();
    fs::write(dir.join("main.sh"), "echo right one\n").unwrap();
    let (executor, sinks) = executor(tasks.path(), venvs.path(), logs.path());

    executor
        .run("picky", &Metadata::new(json!({"entrypoint": "main.sh"})))
        .await
        .unwrap();

    let log = fs::read_to_string(sinks.ensure("picky").path()).unwrap();
    assert!(log.contains("right one"));
    assert!(!log.contains("wrong one"));
}

#[tokio::test]
async fn missing_entrypoint_is_a_definition_error() {
    let tasks = tempfile::tempdir().unwrap();
    let venvs = tempfile::tempdir().unwrap();
    let logs = tempfile::tempdir().unwrap();
    fs::create_dir_all(tasks.path().join("empty")).unwrap();
    let (executor, _sinks) = executor(tasks.path(), venvs.path(), logs.path());

    let err = executor
        .run("empty", &Metadata::new(json!({})))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ExecuteError::Definition(DefinitionError::NoEntrypoint)
    ));
}
